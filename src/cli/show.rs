//! Show command implementation

use colored::Colorize;

use crate::cli::{CommandContext, GlobalOptions};
use crate::error::Result;
use crate::output::LineupView;
use crate::session::LoadGuard;

/// Print a team's lineup and bench
pub async fn run(
    opts: &GlobalOptions,
    team: &str,
    formation: Option<&str>,
    guard: &LoadGuard,
) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let Some((engine, formation)) = ctx.open_engine(team, formation, guard).await? else {
        eprintln!("{}", "Load cancelled".yellow());
        return Ok(());
    };

    println!("{}", LineupView::new(&engine, &formation).format(ctx.format)?);
    Ok(())
}
