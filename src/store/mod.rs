//! Local lineup cache
//!
//! A best-effort, per-team copy of the working lineup that sits in front of
//! the backend. Every engine mutation writes through to it. Failures are
//! logged and treated as a cache miss; they never reach engine callers.

pub mod storage;

use std::collections::HashMap;

use crate::lineup::{Slot, TeamId};

pub use storage::{CacheEntry, CacheStats, ClearStats, LocalLineupCache};

/// Cache key for a team's lineup
pub fn lineup_key(team: &TeamId) -> String {
    format!("team_lineup_{}", team)
}

/// Durable lineup cache keyed by team.
///
/// Implementations must not fail to the caller.
pub trait LineupStore {
    /// Overwrite the cached lineup for `team`
    fn save(&mut self, team: &TeamId, lineup: &[Slot]);

    /// Cached lineup, or `None` on a miss, a read error or a corrupt entry
    fn load(&self, team: &TeamId) -> Option<Vec<Slot>>;

    /// Drop the cached lineup for `team`
    fn clear(&mut self, team: &TeamId);
}

impl<S: LineupStore + ?Sized> LineupStore for Box<S> {
    fn save(&mut self, team: &TeamId, lineup: &[Slot]) {
        (**self).save(team, lineup)
    }

    fn load(&self, team: &TeamId) -> Option<Vec<Slot>> {
        (**self).load(team)
    }

    fn clear(&mut self, team: &TeamId) {
        (**self).clear(team)
    }
}

/// In-process store holding serialized lineups.
///
/// Used with `--no-cache` and in tests. Entries are kept as JSON text so a
/// round trip goes through the same encoding as the on-disk cache.
#[derive(Debug, Default)]
pub struct MemoryLineupStore {
    entries: HashMap<String, String>,
}

impl MemoryLineupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw entry for a team, for assertions
    pub fn raw(&self, team: &TeamId) -> Option<&str> {
        self.entries.get(&lineup_key(team)).map(String::as_str)
    }

    /// Plant a raw entry, e.g. to simulate corruption
    pub fn insert_raw(&mut self, team: &TeamId, raw: impl Into<String>) {
        self.entries.insert(lineup_key(team), raw.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LineupStore for MemoryLineupStore {
    fn save(&mut self, team: &TeamId, lineup: &[Slot]) {
        match serde_json::to_string(lineup) {
            Ok(json) => {
                self.entries.insert(lineup_key(team), json);
            }
            Err(e) => log::warn!("Failed to serialize lineup for team {}: {}", team, e),
        }
    }

    fn load(&self, team: &TeamId) -> Option<Vec<Slot>> {
        let raw = self.entries.get(&lineup_key(team))?;
        serde_json::from_str(raw)
            .map_err(|e| log::warn!("Discarding corrupt cached lineup for team {}: {}", team, e))
            .ok()
    }

    fn clear(&mut self, team: &TeamId) {
        self.entries.remove(&lineup_key(team));
    }
}
