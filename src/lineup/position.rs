//! Position label matching

use super::PositionHint;

const GOALKEEPER_MARKERS: &[&str] = &["gk", "goal"];
const DEFENDER_MARKERS: &[&str] = &["cb", "lb", "rb", "fb", "def", "dc"];
const MIDFIELDER_MARKERS: &[&str] = &["cm", "dm", "am", "mid", "mc"];
const FORWARD_MARKERS: &[&str] = &["st", "cf", "fw", "att"];

/// Whether a declared position label satisfies a slot's category hint.
///
/// Case-insensitive substring test; unknown hints fall back to plain
/// containment of the hint text.
pub fn matches(label: &str, hint: &PositionHint) -> bool {
    let label = label.to_lowercase();
    let markers = match hint {
        PositionHint::Goalkeeper => GOALKEEPER_MARKERS,
        PositionHint::Defender => DEFENDER_MARKERS,
        PositionHint::Midfielder => MIDFIELDER_MARKERS,
        PositionHint::Forward => FORWARD_MARKERS,
        PositionHint::Other(raw) => return label.contains(&raw.to_lowercase()),
    };
    markers.iter().any(|m| label.contains(m))
}

/// Whether any of a player's labels satisfies the hint
pub fn any_matches(labels: &[String], hint: &PositionHint) -> bool {
    labels.iter().any(|label| matches(label, hint))
}
