//! Init command implementation

use colored::Colorize;

use crate::cli::GlobalOptions;
use crate::config::Config;
use crate::error::Result;
use crate::lineup::Formation;

/// Run the init command
///
/// Existing settings are kept; values given on the command line replace them.
pub fn run(opts: &GlobalOptions, formation: Option<&str>) -> Result<()> {
    let path = Config::resolve_path(opts.config_ref())?;
    let mut config = if path.exists() {
        Config::load_from(&path)?
    } else {
        Config::default()
    };

    if let Some(base) = opts.api_base_ref() {
        config.api_base = Some(base.trim_end_matches('/').to_string());
    }
    if let Some(dir) = &opts.cache_dir {
        config.cache_dir = Some(dir.into());
    }
    if let Some(raw) = formation {
        config.preferences.formation = Some(Formation::parse(raw)?.to_string());
    }
    config.validate()?;
    config.save_to(&path)?;

    println!("{} Configuration saved to: {}", "✓".green(), path.display());
    println!("  Backend: {}", config.api_base().bold());
    if let Some(formation) = &config.preferences.formation {
        println!("  Default formation: {}", formation.bold());
    }

    println!("\n{}", "You're all set! Try running:".bold());
    println!("  {} - Show configuration status", "pitchside status".cyan());
    println!("  {} - Print a team's lineup", "pitchside show <TEAM>".cyan());

    Ok(())
}
