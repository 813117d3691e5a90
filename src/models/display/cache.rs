//! Cache entry display model

use serde::Serialize;
use tabled::Tabled;

use crate::output::formatters::format_timestamp_secs;
use crate::store::CacheEntry;

/// One cached team lineup for table output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct CacheEntryDisplay {
    #[tabled(rename = "TEAM")]
    pub team: String,

    /// Filled slots, or "corrupt" when the entry cannot be read
    #[tabled(rename = "ASSIGNED")]
    pub assigned: String,

    #[tabled(rename = "UPDATED")]
    pub updated: String,
}

impl From<&CacheEntry> for CacheEntryDisplay {
    fn from(entry: &CacheEntry) -> Self {
        Self {
            team: entry.team_id.clone(),
            assigned: entry
                .assigned
                .map(|n| n.to_string())
                .unwrap_or_else(|| "corrupt".to_string()),
            updated: format_timestamp_secs(entry.updated_at),
        }
    }
}
