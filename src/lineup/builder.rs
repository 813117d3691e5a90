//! Initial lineup construction from a slot template and a roster

use std::collections::VecDeque;

use super::position::any_matches;
use super::{Player, Slot};

/// Assign starters to a fresh copy of `template`.
///
/// Pass one gives each slot, in template order, the first unused starter
/// with a position label matching the slot's hint. Pass two fills the
/// remaining slots in template order from the front of the unused pool.
/// Slots beyond the number of starters stay empty.
pub fn build(template: &[Slot], roster: &[Player]) -> Vec<Slot> {
    let mut pool: VecDeque<&Player> = roster.iter().filter(|p| p.is_starter).collect();

    let mut lineup: Vec<Slot> = template
        .iter()
        .map(|s| Slot {
            player_id: None,
            no_auto_fill: false,
            ..s.clone()
        })
        .collect();

    for slot in &mut lineup {
        let found = pool
            .iter()
            .position(|p| any_matches(&p.positions, &slot.position_hint));
        if let Some(idx) = found
            && let Some(player) = pool.remove(idx)
        {
            slot.player_id = Some(player.id.clone());
        }
    }

    for slot in lineup.iter_mut().filter(|s| s.is_empty()) {
        let Some(player) = pool.pop_front() else {
            break;
        };
        slot.player_id = Some(player.id.clone());
    }

    log::debug!(
        "Built lineup: {} of {} slots filled",
        lineup.iter().filter(|s| !s.is_empty()).count(),
        lineup.len()
    );
    lineup
}
