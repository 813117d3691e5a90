//! Slot templates for supported formations

use std::fmt;
use std::str::FromStr;

use super::{PositionHint, Slot};
use crate::error::LineupError;

/// Formation used when neither the caller, the team nor the config names one
pub const DEFAULT_FORMATION: &str = "4-3-3";

const MAX_LINE: usize = 5;
const OUTFIELD_PLAYERS: usize = 10;

const GK_TOP: &str = "82%";
const DEF_TOP: &str = "68%";
const MID_TOP: &str = "46%";
const FWD_TOP: &str = "22%";

/// Horizontal lanes for a line of `n` players
fn lanes(n: usize) -> &'static [&'static str] {
    match n {
        1 => &["50%"],
        2 => &["30%", "70%"],
        3 => &["22%", "50%", "78%"],
        4 => &["12%", "32%", "68%", "88%"],
        5 => &["10%", "30%", "50%", "70%", "90%"],
        _ => &[],
    }
}

/// Outfield shape: defenders, midfielders, forwards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Formation {
    pub defenders: usize,
    pub midfielders: usize,
    pub forwards: usize,
}

impl Formation {
    /// Parse a "D-M-F" formation string such as "4-4-2"
    pub fn parse(raw: &str) -> Result<Self, LineupError> {
        let invalid = || LineupError::InvalidFormation(raw.to_string());

        let lines = raw
            .trim()
            .split('-')
            .map(|part| part.trim().parse::<usize>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;

        let &[defenders, midfielders, forwards] = lines.as_slice() else {
            return Err(invalid());
        };

        let in_range = |n: usize| (1..=MAX_LINE).contains(&n);
        if !(in_range(defenders) && in_range(midfielders) && in_range(forwards)) {
            return Err(invalid());
        }
        if defenders + midfielders + forwards != OUTFIELD_PLAYERS {
            return Err(invalid());
        }

        Ok(Self {
            defenders,
            midfielders,
            forwards,
        })
    }

    /// Slot template in pitch order: keeper, defence, midfield, attack
    pub fn template(&self) -> Vec<Slot> {
        let mut slots = vec![Slot::new("GK-1", PositionHint::Goalkeeper, "50%", GK_TOP)];
        push_line(&mut slots, "DEF", PositionHint::Defender, self.defenders, DEF_TOP);
        push_line(&mut slots, "MID", PositionHint::Midfielder, self.midfielders, MID_TOP);
        push_line(&mut slots, "FWD", PositionHint::Forward, self.forwards, FWD_TOP);
        slots
    }
}

fn push_line(slots: &mut Vec<Slot>, prefix: &str, hint: PositionHint, count: usize, top: &str) {
    for (i, left) in lanes(count).iter().enumerate() {
        slots.push(Slot::new(format!("{}-{}", prefix, i + 1), hint.clone(), left, top));
    }
}

impl Default for Formation {
    fn default() -> Self {
        Self {
            defenders: 4,
            midfielders: 3,
            forwards: 3,
        }
    }
}

impl FromStr for Formation {
    type Err = LineupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Formation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.defenders, self.midfielders, self.forwards)
    }
}

/// Pick the formation by precedence: explicit > team record > preference > default
pub fn resolve(
    explicit: Option<&str>,
    team: Option<&str>,
    preference: Option<&str>,
) -> Result<Formation, LineupError> {
    match explicit.or(team).or(preference) {
        Some(raw) if !raw.trim().is_empty() => Formation::parse(raw),
        _ => Ok(Formation::default()),
    }
}

/// The stock 4-3-3 template
pub fn default_template() -> Vec<Slot> {
    Formation::default().template()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_layout() {
        let slots = default_template();
        let ids: Vec<&str> = slots.iter().map(|s| s.slot_id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "GK-1", "DEF-1", "DEF-2", "DEF-3", "DEF-4", "MID-1", "MID-2", "MID-3", "FWD-1",
                "FWD-2", "FWD-3"
            ]
        );

        assert_eq!(slots[0].left, "50%");
        assert_eq!(slots[0].top, "82%");
        assert_eq!(slots[1].left, "12%");
        assert_eq!(slots[4].left, "88%");
        assert_eq!(slots[6].left, "50%");
        assert_eq!(slots[6].top, "46%");
        assert_eq!(slots[10].left, "78%");
        assert_eq!(slots[10].top, "22%");
        assert!(slots.iter().all(|s| s.is_empty() && !s.no_auto_fill));
    }

    #[test]
    fn test_parse_formations() {
        let f = Formation::parse("4-4-2").unwrap();
        assert_eq!(f.template().len(), 11);
        assert_eq!(f.to_string(), "4-4-2");

        let f: Formation = " 3-5-2 ".parse().unwrap();
        let mids = f
            .template()
            .into_iter()
            .filter(|s| s.position_hint == PositionHint::Midfielder)
            .count();
        assert_eq!(mids, 5);
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        for raw in ["4-4", "4-2-3-1", "6-2-2", "4-3-2", "a-b-c", "", "0-5-5"] {
            assert!(Formation::parse(raw).is_err(), "{raw}");
        }
    }

    #[test]
    fn test_resolve_precedence() {
        let f = resolve(Some("5-3-2"), Some("4-4-2"), None).unwrap();
        assert_eq!(f.to_string(), "5-3-2");

        let f = resolve(None, Some("4-4-2"), Some("3-5-2")).unwrap();
        assert_eq!(f.to_string(), "4-4-2");

        let f = resolve(None, None, Some("3-5-2")).unwrap();
        assert_eq!(f.to_string(), "3-5-2");

        let f = resolve(None, Some("  "), None).unwrap();
        assert_eq!(f.to_string(), DEFAULT_FORMATION);
    }
}
