//! Derived bench view
//!
//! The bench is never stored: it is whoever on the roster is not on the pitch.

use serde::Serialize;

use super::{Player, Slot, assigned_ids};

/// Starters not currently on the pitch, in roster order
pub fn bench_starters<'a>(roster: &'a [Player], slots: &[Slot]) -> Vec<&'a Player> {
    let assigned = assigned_ids(slots);
    roster
        .iter()
        .filter(|p| p.is_starter && !assigned.contains(&p.id))
        .collect()
}

/// Off-pitch roster, grouped the way the bench panel shows it
#[derive(Debug, Serialize)]
pub struct Bench<'a> {
    /// Starters waiting to come on; the only draggable group
    pub starters: Vec<&'a Player>,
    /// Non-starters with at least one declared position
    pub substitutes: Vec<&'a Player>,
    /// Non-starters without positions
    pub reserves: Vec<&'a Player>,
}

impl<'a> Bench<'a> {
    pub fn compute(roster: &'a [Player], slots: &[Slot]) -> Self {
        let assigned = assigned_ids(slots);
        let mut bench = Bench {
            starters: Vec::new(),
            substitutes: Vec::new(),
            reserves: Vec::new(),
        };

        for player in roster.iter().filter(|p| !assigned.contains(&p.id)) {
            if player.is_starter {
                bench.starters.push(player);
            } else if !player.positions.is_empty() {
                bench.substitutes.push(player);
            } else {
                bench.reserves.push(player);
            }
        }
        bench
    }

    pub fn len(&self) -> usize {
        self.starters.len() + self.substitutes.len() + self.reserves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, player: &Player) -> bool {
        self.starters
            .iter()
            .chain(&self.substitutes)
            .chain(&self.reserves)
            .any(|p| p.id == player.id)
    }
}
