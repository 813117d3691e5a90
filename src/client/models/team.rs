//! Team record

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::lineup::{Player, Slot, TeamId, lenient_roster};

/// Team as stored by the backend.
///
/// Fields this crate does not use (logo, description, ...) are kept in
/// `extra` so a read-modify-write `PUT` hands them back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    /// Team ID
    pub id: TeamId,

    /// Team name
    #[serde(default)]
    pub name: String,

    /// Outfield shape, e.g. "4-3-3"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formation: Option<String>,

    /// Full roster
    #[serde(default, deserialize_with = "lenient_roster")]
    pub players: Vec<Player>,

    /// Last lineup saved to the backend; unreadable lineups decode as `None`
    #[serde(
        default,
        deserialize_with = "lenient_lineup",
        skip_serializing_if = "Option::is_none"
    )]
    pub lineup: Option<Vec<Slot>>,

    /// Every other field of the record
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Team {
    pub fn new(id: impl Into<TeamId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            formation: None,
            players: Vec::new(),
            lineup: None,
            extra: Map::new(),
        }
    }

    pub fn with_players(mut self, players: Vec<Player>) -> Self {
        self.players = players;
        self
    }

    pub fn with_lineup(mut self, lineup: Vec<Slot>) -> Self {
        self.lineup = Some(lineup);
        self
    }
}

fn lenient_lineup<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<Slot>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(raw) => match serde_json::from_value::<Vec<Slot>>(raw) {
            Ok(slots) => Ok(Some(slots)),
            Err(e) => {
                log::warn!("Ignoring unreadable team lineup: {}", e);
                Ok(None)
            }
        },
    }
}
