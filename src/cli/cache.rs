//! Cache management commands

use colored::Colorize;

use crate::cli::{CommandContext, GlobalOptions, OutputFormat};
use crate::error::Result;
use crate::lineup::TeamId;
use crate::models::CacheEntryDisplay;
use crate::output::formatters::{format_size, format_timestamp_secs};
use crate::output::{json, table};

/// Show cache statistics and cached teams
pub fn status(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let cache = ctx.open_cache()?;
    let stats = cache.stats()?;
    let entries = cache.entries()?;
    let rows: Vec<CacheEntryDisplay> = entries.iter().map(CacheEntryDisplay::from).collect();

    match ctx.format {
        OutputFormat::Json => {
            let data = serde_json::json!({
                "path": cache.dir().display().to_string(),
                "total_entries": stats.total_entries,
                "total_size_bytes": stats.total_size_bytes,
                "total_size_human": format_size(stats.total_size_bytes),
                "newest_entry_timestamp": stats.newest_entry,
                "entries": rows,
            });
            println!("{}", json::format_json(json::Kind::CacheStatus, &data)?);
        }
        OutputFormat::Table => println!("{}", table::format_table(&rows, "No cached lineups")),
        OutputFormat::Pretty => {
            println!("{}", "Lineup Cache".bold());
            println!("────────────────────────────────────────");
            println!("Location:       {}", cache.dir().display());
            println!("Teams cached:   {}", stats.total_entries);
            println!("Total size:     {}", format_size(stats.total_size_bytes));

            if let Some(newest) = stats.newest_entry {
                println!("Last write:     {}", format_timestamp_secs(newest));
            }

            if !rows.is_empty() {
                println!();
                println!("{}", table::format_table(&rows, ""));
            }
        }
    }

    Ok(())
}

/// Clear every cached lineup, or one team's
pub fn clear(opts: &GlobalOptions, team: Option<&str>) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let cache = ctx.open_cache()?;

    let removed = match team {
        Some(team) => usize::from(cache.delete(&TeamId::parse(team))?),
        None => cache.clear_all()?.entries_removed,
    };

    match ctx.format {
        OutputFormat::Json => {
            let data = serde_json::json!({
                "team": team,
                "entries_removed": removed,
                "success": true,
            });
            println!("{}", json::format_json(json::Kind::CacheClear, &data)?);
        }
        _ => match (team, removed) {
            (Some(team), 0) => println!("No cached lineup for team {}", team),
            (Some(team), _) => println!("Cleared cached lineup for team {}", team),
            (None, 0) => println!("Cache was already empty"),
            (None, n) => println!("Cleared {} cached lineups", n),
        },
    }

    Ok(())
}

/// Show cache path
pub fn path(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    println!("{}", ctx.cache_dir()?.display());
    Ok(())
}
