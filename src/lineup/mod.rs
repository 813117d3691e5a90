//! Lineup domain: players, pitch slots and the assignment engine
//!
//! - [`position`] - label vs. slot-category matching
//! - [`formation`] - slot templates
//! - [`builder`] - initial starter assignment
//! - [`bench`] - derived bench queries
//! - [`engine`] - the stateful drag/drop engine

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize};

pub mod bench;
pub mod builder;
pub mod engine;
pub mod formation;
pub mod position;

pub use bench::Bench;
pub use builder::build;
pub use engine::{
    CommittedLineup, DragOrigin, DragPayload, DropOutcome, LineupEngine, LineupSource, Move,
    PendingCommit, Rejection,
};
pub use formation::Formation;
pub use position::matches;

/// Defines a JSON identifier that may arrive as a number or a string.
///
/// Equality and hashing go through the canonical string form, so `7` and
/// `"7"` name the same entity.
macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Serialize, Deserialize)]
        #[serde(untagged)]
        pub enum $name {
            Number(u64),
            Text(String),
        }

        impl $name {
            /// Canonical string form used for comparisons and cache keys
            pub fn as_key(&self) -> Cow<'_, str> {
                match self {
                    Self::Number(n) => Cow::Owned(n.to_string()),
                    Self::Text(s) => Cow::Borrowed(s.as_str()),
                }
            }

            /// Parse user input; numeric text becomes a numeric id
            pub fn parse(raw: &str) -> Self {
                let raw = raw.trim();
                match raw.parse::<u64>() {
                    Ok(n) => Self::Number(n),
                    Err(_) => Self::Text(raw.to_string()),
                }
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.as_key() == other.as_key()
            }
        }

        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.as_key().hash(state);
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.as_key())
            }
        }

        impl From<u64> for $name {
            fn from(n: u64) -> Self {
                Self::Number(n)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::Text(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::Text(s)
            }
        }
    };
}

identifier!(
    /// Player identity, unique within a team's roster
    PlayerId
);

identifier!(
    /// Team identity; also the lineup cache key
    TeamId
);

/// Broad position category a slot expects
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PositionHint {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
    /// Any other hint, kept verbatim and matched by containment
    Other(String),
}

impl PositionHint {
    /// Hint for a stored slot that carried none; matches nothing specific
    pub fn unspecified() -> Self {
        PositionHint::Other(String::new())
    }

    pub fn as_str(&self) -> &str {
        match self {
            PositionHint::Goalkeeper => "GK",
            PositionHint::Defender => "DEF",
            PositionHint::Midfielder => "MID",
            PositionHint::Forward => "FWD",
            PositionHint::Other(raw) => raw,
        }
    }
}

impl From<String> for PositionHint {
    fn from(raw: String) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "gk" => PositionHint::Goalkeeper,
            "def" => PositionHint::Defender,
            "mid" => PositionHint::Midfielder,
            "fwd" => PositionHint::Forward,
            _ => PositionHint::Other(raw),
        }
    }
}

impl From<PositionHint> for String {
    fn from(hint: PositionHint) -> Self {
        hint.as_str().to_string()
    }
}

impl fmt::Display for PositionHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Roster entry as delivered by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,

    /// Shirt number; numeric strings are accepted, anything else reads as 0
    #[serde(default, deserialize_with = "lenient_number")]
    pub number: u32,

    /// Declared position labels ("gk", "cb", "cm", ...); a bare string is one label
    #[serde(default, deserialize_with = "lenient_positions")]
    pub positions: Vec<String>,

    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_starter: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl Player {
    /// Short label for output, e.g. `#9 Vega`
    pub fn label(&self) -> String {
        if self.name.is_empty() {
            format!("#{} ({})", self.number, self.id)
        } else {
            format!("#{} {}", self.number, self.name)
        }
    }
}

/// A fixed pitch position in the lineup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub slot_id: String,

    #[serde(default = "PositionHint::unspecified")]
    pub position_hint: PositionHint,

    #[serde(default)]
    pub player_id: Option<PlayerId>,

    /// Horizontal placement, percentage string ("50%")
    #[serde(default)]
    pub left: String,

    /// Vertical placement, percentage string ("82%")
    #[serde(default)]
    pub top: String,

    /// Latch exempting this slot from automatic backfill
    #[serde(default)]
    pub no_auto_fill: bool,
}

impl Slot {
    pub fn new(slot_id: impl Into<String>, hint: PositionHint, left: &str, top: &str) -> Self {
        Self {
            slot_id: slot_id.into(),
            position_hint: hint,
            player_id: None,
            left: left.to_string(),
            top: top.to_string(),
            no_auto_fill: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.player_id.is_none()
    }

    pub fn holds(&self, player: &PlayerId) -> bool {
        self.player_id.as_ref() == Some(player)
    }
}

/// Whether at least one slot holds a player
pub fn has_assignment(slots: &[Slot]) -> bool {
    slots.iter().any(|s| s.player_id.is_some())
}

/// A board where every slot carries the latch.
///
/// Only `clear_field` (and placements made afterwards while suspended)
/// produce this shape; fresh builds and resets never do.
pub fn is_cleared_board(slots: &[Slot]) -> bool {
    !slots.is_empty() && slots.iter().all(|s| s.no_auto_fill)
}

/// Whether a persisted lineup should be adopted instead of a fresh build
pub fn is_usable(slots: &[Slot]) -> bool {
    has_assignment(slots) || is_cleared_board(slots)
}

/// Player ids currently on the pitch
pub fn assigned_ids(slots: &[Slot]) -> HashSet<&PlayerId> {
    slots.iter().filter_map(|s| s.player_id.as_ref()).collect()
}

/// Decode a backend roster entry by entry.
///
/// Entries that are not objects, or that still fail to decode, are skipped.
/// An entry without a usable `id` gets `generated-<index>` so it can still
/// be placed and referenced.
pub(crate) fn lenient_roster<'de, D>(deserializer: D) -> std::result::Result<Vec<Player>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(serde_json::Value::Array(entries)) = value else {
        return Ok(Vec::new());
    };

    let mut players = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let serde_json::Value::Object(mut fields) = entry else {
            log::warn!("Skipping roster entry {}: not an object", index);
            continue;
        };

        let has_id = match fields.get("id") {
            Some(serde_json::Value::String(s)) => !s.is_empty(),
            Some(serde_json::Value::Number(n)) => n.is_u64(),
            _ => false,
        };
        if !has_id {
            log::warn!("Roster entry {} has no usable id, generating one", index);
            fields.insert(
                "id".to_string(),
                serde_json::Value::String(format!("generated-{}", index)),
            );
        }

        match serde_json::from_value::<Player>(serde_json::Value::Object(fields)) {
            Ok(player) => players.push(player),
            Err(e) => log::warn!("Skipping roster entry {}: {}", index, e),
        }
    }
    Ok(players)
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => s,
        _ => String::new(),
    })
}

fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0),
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

fn lenient_positions<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| match v {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Some(serde_json::Value::String(s)) => vec![s],
        _ => Vec::new(),
    })
}

fn lenient_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Bool(b)) => b,
        Some(serde_json::Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(serde_json::Value::String(s)) => !s.is_empty(),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_equality_ignores_json_type() {
        assert_eq!(PlayerId::Number(7), PlayerId::from("7"));
        assert_eq!(PlayerId::parse(" 7 "), PlayerId::Number(7));
        assert_eq!(PlayerId::parse("abc"), PlayerId::Text("abc".to_string()));
        assert_ne!(PlayerId::from(7), PlayerId::from(8));
    }

    #[test]
    fn test_identifier_serializes_as_original_type() {
        assert_eq!(serde_json::to_string(&TeamId::from(3)).unwrap(), "3");
        assert_eq!(serde_json::to_string(&TeamId::from("x")).unwrap(), "\"x\"");
    }

    #[test]
    fn test_position_hint_serde() {
        let hint: PositionHint = serde_json::from_str("\"gk\"").unwrap();
        assert_eq!(hint, PositionHint::Goalkeeper);
        assert_eq!(serde_json::to_string(&PositionHint::Defender).unwrap(), "\"DEF\"");

        let other: PositionHint = serde_json::from_str("\"LW\"").unwrap();
        assert_eq!(other, PositionHint::Other("LW".to_string()));
        assert_eq!(other.as_str(), "LW");
    }

    #[test]
    fn test_slot_layout_uses_camel_case() {
        let slot = Slot::new("GK-1", PositionHint::Goalkeeper, "50%", "82%");
        let json = serde_json::to_value(&slot).unwrap();

        assert_eq!(json["slotId"], "GK-1");
        assert_eq!(json["positionHint"], "GK");
        assert!(json["playerId"].is_null());
        assert_eq!(json["left"], "50%");
        assert_eq!(json["top"], "82%");
        assert_eq!(json["noAutoFill"], false);
    }

    #[test]
    fn test_slot_missing_optional_fields_default() {
        let slot: Slot =
            serde_json::from_str(r#"{"slotId":"MID-1","positionHint":"MID"}"#).unwrap();
        assert!(slot.is_empty());
        assert!(!slot.no_auto_fill);
    }

    #[test]
    fn test_player_lenient_decoding() {
        let player: Player = serde_json::from_str(
            r#"{"id": 4, "name": null, "number": "23", "positions": "cb", "isStarter": 1}"#,
        )
        .unwrap();

        assert_eq!(player.name, "");
        assert_eq!(player.number, 23);
        assert_eq!(player.positions, vec!["cb".to_string()]);
        assert!(player.is_starter);
        assert!(player.photo.is_none());
    }

    #[test]
    fn test_player_non_numeric_number_reads_zero() {
        let player: Player =
            serde_json::from_str(r#"{"id": "p1", "number": "ten"}"#).unwrap();
        assert_eq!(player.number, 0);
        assert!(!player.is_starter);
        assert!(player.positions.is_empty());
    }

    #[test]
    fn test_slot_without_hint_still_decodes() {
        let slot: Slot = serde_json::from_str(r#"{"slotId":"GK-1","playerId":1}"#).unwrap();
        assert_eq!(slot.position_hint, PositionHint::unspecified());
        assert!(slot.holds(&PlayerId::from(1)));
    }

    #[derive(Deserialize)]
    struct Roster {
        #[serde(default, deserialize_with = "lenient_roster")]
        players: Vec<Player>,
    }

    #[test]
    fn test_roster_generates_missing_ids() {
        let roster: Roster = serde_json::from_str(
            r#"{"players": [
                {"id": 1, "positions": ["gk"], "isStarter": true},
                {"name": "Nobody", "isStarter": true},
                {"id": null, "number": 7},
                {"id": -3},
                "junk",
                {"id": 9, "name": "Vega"}
            ]}"#,
        )
        .unwrap();

        let ids: Vec<String> = roster.players.iter().map(|p| p.id.to_string()).collect();
        assert_eq!(ids, vec!["1", "generated-1", "generated-2", "generated-3", "9"]);
        assert_eq!(roster.players[1].name, "Nobody");
        assert!(roster.players[1].is_starter);
        assert_eq!(roster.players[2].number, 7);
    }

    #[test]
    fn test_roster_that_is_not_a_list_reads_empty() {
        let roster: Roster = serde_json::from_str(r#"{"players": {"id": 1}}"#).unwrap();
        assert!(roster.players.is_empty());
    }

    #[test]
    fn test_usability_checks() {
        let mut slots = vec![
            Slot::new("GK-1", PositionHint::Goalkeeper, "50%", "82%"),
            Slot::new("DEF-1", PositionHint::Defender, "12%", "68%"),
        ];
        assert!(!is_usable(&slots));

        slots[1].player_id = Some(PlayerId::from(1));
        assert!(has_assignment(&slots));
        assert!(is_usable(&slots));

        for slot in &mut slots {
            slot.player_id = None;
            slot.no_auto_fill = true;
        }
        assert!(is_cleared_board(&slots));
        assert!(is_usable(&slots));

        assert!(!is_usable(&[]));
    }
}
