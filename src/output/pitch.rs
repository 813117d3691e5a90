//! Pitch diagram for pretty output

use colored::Colorize;

use super::formatters::parse_percent;
use crate::lineup::{Bench, Player, Slot};

/// Slots grouped into horizontal lines, attack at the top, left to right
pub fn pitch_rows(slots: &[Slot]) -> Vec<Vec<&Slot>> {
    let mut rows: Vec<(f32, Vec<&Slot>)> = Vec::new();
    for slot in slots {
        let top = parse_percent(&slot.top);
        match rows.iter_mut().find(|(t, _)| (*t - top).abs() < 0.5) {
            Some((_, row)) => row.push(slot),
            None => rows.push((top, vec![slot])),
        }
    }

    rows.sort_by(|a, b| a.0.total_cmp(&b.0));
    rows.into_iter()
        .map(|(_, mut row)| {
            row.sort_by(|a, b| parse_percent(&a.left).total_cmp(&parse_percent(&b.left)));
            row
        })
        .collect()
}

/// Plain text for one slot, e.g. `MID-2 #8 Okafor`; `*` marks a latched slot
fn slot_cell(slot: &Slot, roster: &[Player]) -> String {
    let occupant = match &slot.player_id {
        Some(id) => roster
            .iter()
            .find(|p| &p.id == id)
            .map(Player::label)
            .unwrap_or_else(|| format!("({})", id)),
        None => "·".to_string(),
    };
    let latch = if slot.no_auto_fill { "*" } else { "" };
    format!("{}{} {}", slot.slot_id, latch, occupant)
}

pub fn render_pitch(slots: &[Slot], roster: &[Player]) -> String {
    let mut out = String::new();
    for row in pitch_rows(slots) {
        let cells: Vec<String> = row
            .iter()
            .map(|slot| {
                let text = slot_cell(slot, roster);
                if slot.is_empty() {
                    text.dimmed().to_string()
                } else {
                    text.bold().to_string()
                }
            })
            .collect();
        out.push_str("  ");
        out.push_str(&cells.join("   "));
        out.push('\n');
    }
    out
}

fn bench_line(player: &Player) -> String {
    if player.positions.is_empty() {
        format!("    {}", player.label())
    } else {
        format!("    {} ({})", player.label(), player.positions.join(", "))
    }
}

pub fn render_bench(bench: &Bench<'_>) -> String {
    let groups = [
        ("Bench starters".green().bold(), &bench.starters),
        ("Substitutes".bold(), &bench.substitutes),
        ("Reserves".dimmed(), &bench.reserves),
    ];

    let mut out = String::new();
    for (title, players) in groups {
        out.push_str(&format!("  {}\n", title));
        if players.is_empty() {
            out.push_str(&format!("    {}\n", "(none)".dimmed()));
        }
        for player in players.iter() {
            out.push_str(&bench_line(player));
            out.push('\n');
        }
    }
    out
}
