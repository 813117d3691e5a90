//! SQLite-backed lineup cache
//!
//! One row per team, holding the JSON-encoded `Slot[]`. Writes are full
//! overwrites, so the last writer wins.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};

use super::{LineupStore, lineup_key};
use crate::error::StoreError;
use crate::lineup::{Slot, TeamId};

/// Schema version - increment to trigger nuke-and-rebuild
const SCHEMA_VERSION: i32 = 1;

const DB_FILE: &str = "lineups.db";

type Result<T> = std::result::Result<T, StoreError>;

/// On-disk lineup cache
pub struct LocalLineupCache {
    conn: Connection,
    dir: PathBuf,
}

impl LocalLineupCache {
    /// Open or create the cache at the default XDG cache location
    pub fn open() -> Result<Self> {
        let cache_dir = Self::cache_dir()?;
        Self::open_at(&cache_dir)
    }

    /// Get the cache directory path (~/.cache/pitchside on Linux)
    pub fn cache_dir() -> Result<PathBuf> {
        let cache_base = dirs::cache_dir().ok_or(StoreError::NoHome)?;
        Ok(cache_base.join("pitchside"))
    }

    /// Open the cache at a specific directory
    pub fn open_at(cache_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(cache_dir)
            .map_err(|e| StoreError::Io(format!("Failed to create cache dir: {}", e)))?;

        let db_path = cache_dir.join(DB_FILE);
        let conn = Connection::open(&db_path)?;

        // Check schema version - nuke if mismatched
        let version: i32 = conn
            .pragma_query_value(None, "user_version", |r| r.get(0))
            .unwrap_or(0);

        if version != 0 && version != SCHEMA_VERSION {
            log::info!(
                "Lineup cache schema version mismatch ({} != {}), rebuilding",
                version,
                SCHEMA_VERSION
            );
            drop(conn);
            std::fs::remove_file(&db_path)
                .map_err(|e| StoreError::Io(format!("Failed to remove cache DB: {}", e)))?;
            return Self::open_at(cache_dir);
        }

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS lineups (
                cache_key TEXT PRIMARY KEY NOT NULL,
                team_id TEXT NOT NULL,
                data TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )?;

        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;

        Ok(Self {
            conn,
            dir: cache_dir.to_path_buf(),
        })
    }

    /// Directory holding the database
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Cached lineup for a team, if any
    pub fn get(&self, team: &TeamId) -> Result<Option<Vec<Slot>>> {
        let data: Option<String> = self
            .conn
            .query_row(
                "SELECT data FROM lineups WHERE cache_key = ?1",
                [lineup_key(team)],
                |row| row.get(0),
            )
            .optional()?;

        match data {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Store a lineup, replacing any previous entry
    pub fn put(&self, team: &TeamId, lineup: &[Slot]) -> Result<()> {
        let json = serde_json::to_string(lineup)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO lineups (cache_key, team_id, data, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![lineup_key(team), team.to_string(), json, Utc::now().timestamp()],
        )?;
        Ok(())
    }

    /// Delete a team's entry; returns whether one existed
    pub fn delete(&self, team: &TeamId) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM lineups WHERE cache_key = ?1", [lineup_key(team)])?;
        Ok(deleted > 0)
    }

    /// Clear all cached lineups
    pub fn clear_all(&self) -> Result<ClearStats> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM lineups", [], |r| r.get(0))?;

        self.conn.execute("DELETE FROM lineups", [])?;

        Ok(ClearStats {
            entries_removed: count as usize,
        })
    }

    /// Cached teams with their last write time, newest first
    pub fn entries(&self) -> Result<Vec<CacheEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT team_id, data, updated_at FROM lineups ORDER BY updated_at DESC, team_id",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (team_id, data, updated_at) = row?;
            // Corrupt rows are still listed so they can be cleared
            let assigned = serde_json::from_str::<Vec<Slot>>(&data)
                .map(|slots| slots.iter().filter(|s| !s.is_empty()).count())
                .ok();
            entries.push(CacheEntry {
                team_id,
                assigned,
                updated_at,
            });
        }
        Ok(entries)
    }

    /// Get cache statistics
    pub fn stats(&self) -> Result<CacheStats> {
        let total_entries: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM lineups", [], |r| r.get(0))?;

        let total_size: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(LENGTH(data)), 0) FROM lineups",
            [],
            |r| r.get(0),
        )?;

        let newest: Option<i64> = self
            .conn
            .query_row("SELECT MAX(updated_at) FROM lineups", [], |r| r.get(0))
            .optional()?
            .flatten();

        Ok(CacheStats {
            total_entries: total_entries as usize,
            total_size_bytes: total_size as usize,
            newest_entry: newest,
        })
    }
}

impl LineupStore for LocalLineupCache {
    fn save(&mut self, team: &TeamId, lineup: &[Slot]) {
        if let Err(e) = self.put(team, lineup) {
            log::warn!("Failed to cache lineup for team {}: {}", team, e);
        }
    }

    fn load(&self, team: &TeamId) -> Option<Vec<Slot>> {
        match self.get(team) {
            Ok(lineup) => {
                if lineup.is_some() {
                    log::debug!("Cache hit: lineup for team {}", team);
                }
                lineup
            }
            Err(e) => {
                log::warn!("Ignoring cached lineup for team {}: {}", team, e);
                None
            }
        }
    }

    fn clear(&mut self, team: &TeamId) {
        if let Err(e) = self.delete(team) {
            log::warn!("Failed to clear cached lineup for team {}: {}", team, e);
        }
    }
}

/// One cached team lineup
#[derive(Debug)]
pub struct CacheEntry {
    pub team_id: String,
    /// Occupied slots, or `None` when the entry cannot be decoded
    pub assigned: Option<usize>,
    pub updated_at: i64,
}

/// Statistics about cache clear operation
#[derive(Debug)]
pub struct ClearStats {
    pub entries_removed: usize,
}

/// Statistics about cache state
#[derive(Debug)]
pub struct CacheStats {
    pub total_entries: usize,
    pub total_size_bytes: usize,
    pub newest_entry: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lineup::PlayerId;
    use crate::lineup::formation::default_template;
    use tempfile::TempDir;

    fn test_cache() -> (LocalLineupCache, TempDir) {
        let dir = TempDir::new().unwrap();
        let cache = LocalLineupCache::open_at(dir.path()).unwrap();
        (cache, dir)
    }

    fn sample_lineup() -> Vec<Slot> {
        let mut lineup = default_template();
        lineup[0].player_id = Some(PlayerId::from(1));
        lineup[1].player_id = Some(PlayerId::from("p-2"));
        lineup[2].no_auto_fill = true;
        lineup
    }

    #[test]
    fn test_put_get_round_trip() {
        let (cache, _dir) = test_cache();
        let team = TeamId::from(7);

        cache.put(&team, &sample_lineup()).unwrap();
        assert_eq!(cache.get(&team).unwrap(), Some(sample_lineup()));
    }

    #[test]
    fn test_trait_round_trip() {
        let (mut cache, _dir) = test_cache();
        let team = TeamId::from("club");

        cache.save(&team, &sample_lineup());
        assert_eq!(cache.load(&team), Some(sample_lineup()));

        cache.clear(&team);
        assert!(cache.load(&team).is_none());
    }

    #[test]
    fn test_corrupt_entry_is_a_miss() {
        let (cache, _dir) = test_cache();
        let team = TeamId::from(3);
        cache
            .conn
            .execute(
                "INSERT INTO lineups (cache_key, team_id, data, updated_at) VALUES (?1, '3', 'oops', 0)",
                [lineup_key(&team)],
            )
            .unwrap();

        assert!(cache.get(&team).is_err());
        assert!(cache.load(&team).is_none());

        let entries = cache.entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].assigned, None);
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let team = TeamId::from(11);
        {
            let cache = LocalLineupCache::open_at(dir.path()).unwrap();
            cache.put(&team, &sample_lineup()).unwrap();
        }

        let cache = LocalLineupCache::open_at(dir.path()).unwrap();
        assert_eq!(cache.get(&team).unwrap(), Some(sample_lineup()));
    }

    #[test]
    fn test_schema_mismatch_rebuilds() {
        let dir = TempDir::new().unwrap();
        {
            let conn = Connection::open(dir.path().join(DB_FILE)).unwrap();
            conn.pragma_update(None, "user_version", 99).unwrap();
        }

        let cache = LocalLineupCache::open_at(dir.path()).unwrap();
        assert_eq!(cache.stats().unwrap().total_entries, 0);
    }

    #[test]
    fn test_entries_stats_and_clear_all() {
        let (cache, _dir) = test_cache();
        cache.put(&TeamId::from(1), &sample_lineup()).unwrap();
        cache.put(&TeamId::from(2), &default_template()).unwrap();

        let entries = cache.entries().unwrap();
        assert_eq!(entries.len(), 2);
        let one = entries.iter().find(|e| e.team_id == "1").unwrap();
        assert_eq!(one.assigned, Some(2));

        let stats = cache.stats().unwrap();
        assert_eq!(stats.total_entries, 2);
        assert!(stats.total_size_bytes > 0);
        assert!(stats.newest_entry.is_some());

        let cleared = cache.clear_all().unwrap();
        assert_eq!(cleared.entries_removed, 2);
        assert!(cache.get(&TeamId::from(1)).unwrap().is_none());
    }

    #[test]
    fn test_delete_reports_existence() {
        let (cache, _dir) = test_cache();
        let team = TeamId::from(5);
        assert!(!cache.delete(&team).unwrap());

        cache.put(&team, &sample_lineup()).unwrap();
        assert!(cache.delete(&team).unwrap());
    }
}
