//! Slot and bench display models

use serde::Serialize;
use tabled::Tabled;

use crate::lineup::{Bench, Player, Slot};

/// One pitch slot for table output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct SlotDisplay {
    /// Slot identifier
    #[tabled(rename = "SLOT")]
    pub slot: String,

    /// Expected position category
    #[tabled(rename = "POS")]
    pub position: String,

    /// Shirt number, or "--"
    #[tabled(rename = "NO.")]
    pub number: String,

    /// Player name, or "--" when empty
    #[tabled(rename = "PLAYER")]
    pub player: String,

    /// Whether the slot is exempt from auto-fill
    #[tabled(rename = "LOCKED")]
    pub locked: String,
}

impl SlotDisplay {
    pub fn new(slot: &Slot, roster: &[Player]) -> Self {
        let player = slot
            .player_id
            .as_ref()
            .and_then(|id| roster.iter().find(|p| &p.id == id));

        let (number, name) = match (player, &slot.player_id) {
            (Some(p), _) => (p.number.to_string(), display_name(p)),
            // Assigned id that is not on the roster
            (None, Some(id)) => ("--".to_string(), format!("({})", id)),
            (None, None) => ("--".to_string(), "--".to_string()),
        };

        Self {
            slot: slot.slot_id.clone(),
            position: slot.position_hint.to_string(),
            number,
            player: name,
            locked: if slot.no_auto_fill { "yes" } else { "" }.to_string(),
        }
    }

    pub fn rows(slots: &[Slot], roster: &[Player]) -> Vec<Self> {
        slots.iter().map(|s| Self::new(s, roster)).collect()
    }
}

/// One off-pitch player for table output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct BenchDisplay {
    /// starter / substitute / reserve
    #[tabled(rename = "GROUP")]
    pub group: String,

    #[tabled(rename = "NO.")]
    pub number: String,

    #[tabled(rename = "PLAYER")]
    pub player: String,

    /// Declared positions, comma separated
    #[tabled(rename = "POSITIONS")]
    pub positions: String,
}

impl BenchDisplay {
    fn new(group: &str, player: &Player) -> Self {
        Self {
            group: group.to_string(),
            number: player.number.to_string(),
            player: display_name(player),
            positions: if player.positions.is_empty() {
                "--".to_string()
            } else {
                player.positions.join(", ")
            },
        }
    }

    pub fn rows(bench: &Bench<'_>) -> Vec<Self> {
        let starters = bench.starters.iter().map(|p| Self::new("starter", p));
        let substitutes = bench.substitutes.iter().map(|p| Self::new("substitute", p));
        let reserves = bench.reserves.iter().map(|p| Self::new("reserve", p));
        starters.chain(substitutes).chain(reserves).collect()
    }
}

fn display_name(player: &Player) -> String {
    if player.name.is_empty() {
        player.id.to_string()
    } else {
        player.name.clone()
    }
}
