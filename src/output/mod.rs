//! Output formatting for CLI results

use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::lineup::{Bench, Formation, LineupEngine, LineupSource, Player, Slot, TeamId};
use crate::models::{BenchDisplay, SlotDisplay};
use crate::store::LineupStore;

pub mod formatters;
pub mod json;
pub mod pitch;
pub mod table;

/// Snapshot of an engine for printing
#[derive(Debug, Serialize)]
pub struct LineupView<'a> {
    pub team_id: &'a TeamId,
    pub team_name: &'a str,
    pub formation: String,
    pub source: LineupSource,
    /// Auto-fill suspended
    pub suspended: bool,
    /// Board differs from the backend copy
    pub unsaved: bool,
    pub slots: &'a [Slot],
    pub bench: Bench<'a>,
    #[serde(skip)]
    roster: &'a [Player],
}

impl<'a> LineupView<'a> {
    pub fn new<S: LineupStore>(engine: &'a LineupEngine<S>, formation: &Formation) -> Self {
        let team = engine.team();
        Self {
            team_id: &team.id,
            team_name: &team.name,
            formation: formation.to_string(),
            source: engine.source(),
            suspended: engine.is_suspended(),
            unsaved: engine.is_dirty(),
            slots: engine.slots(),
            bench: engine.bench(),
            roster: engine.roster(),
        }
    }

    /// Render in the requested format
    pub fn format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(json::format_json(json::Kind::Lineup, self)?),
            OutputFormat::Table => Ok(format!(
                "{}\n{}",
                table::format_table(&SlotDisplay::rows(self.slots, self.roster), "No slots"),
                table::format_table(&BenchDisplay::rows(&self.bench), "Bench is empty"),
            )),
            OutputFormat::Pretty => Ok(self.pretty()),
        }
    }

    fn pretty(&self) -> String {
        let name = if self.team_name.is_empty() {
            format!("Team {}", self.team_id)
        } else {
            self.team_name.to_string()
        };

        let mut out = format!(
            "{} {}\n\n",
            name.bold(),
            format!("({}, from {})", self.formation, source_label(self.source)).dimmed()
        );
        out.push_str(&pitch::render_pitch(self.slots, self.roster));
        out.push('\n');
        out.push_str(&pitch::render_bench(&self.bench));

        if self.suspended {
            out.push_str(&format!("\n{} Auto-fill suspended\n", "⚠".yellow()));
        }
        if self.unsaved {
            out.push_str(&format!("{} Unsaved changes\n", "○".dimmed()));
        }
        out
    }
}

fn source_label(source: LineupSource) -> &'static str {
    match source {
        LineupSource::Backend => "saved lineup",
        LineupSource::Cache => "local cache",
        LineupSource::Fresh => "fresh build",
    }
}

/// Spinner on stderr; hidden when stderr is not a terminal
pub fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"]));
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
