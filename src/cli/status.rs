//! Status command implementation

use std::path::PathBuf;

use colored::Colorize;

use crate::cli::GlobalOptions;
use crate::config::Config;
use crate::error::Result;
use crate::store::LocalLineupCache;

/// Run the status command to display configuration status
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}\n", "Pitchside Configuration Status".bold());

    let config_path = Config::resolve_path(opts.config_ref())?;
    let config = match Config::load_from(&config_path) {
        Ok(config) => {
            println!("Config file: {}", config_path.display().to_string().cyan());
            config
        }
        Err(e) => {
            println!("{} Configuration not found ({})", "✗".red(), e);
            println!(
                "  → Run {} to create {}",
                "pitchside init".cyan(),
                config_path.display()
            );
            Config::default()
        }
    };
    println!();

    // Flags win over the file
    let api_base = opts
        .api_base_ref()
        .unwrap_or_else(|| config.api_base());
    let api_source = if opts.api_base.is_some() {
        "(flag/env)"
    } else if config.api_base.is_some() {
        "(config)"
    } else {
        "(default)"
    };
    println!("{} Backend: {} {}", "✓".green(), api_base.cyan(), api_source.dimmed());
    println!(
        "{} Request timeout: {}s",
        "✓".green(),
        config.preferences.timeout_secs
    );

    match &config.preferences.formation {
        Some(formation) => println!("{} Default formation: {}", "✓".green(), formation),
        None => println!("{} Default formation: 4-3-3 {}", "○".dimmed(), "(built in)".dimmed()),
    }

    if opts.no_cache {
        println!("{} Lineup cache disabled (--no-cache)", "○".dimmed());
    } else {
        let cache_dir = match (&opts.cache_dir, &config.cache_dir) {
            (Some(dir), _) => Some(PathBuf::from(dir)),
            (None, Some(dir)) => Some(dir.clone()),
            (None, None) => LocalLineupCache::cache_dir().ok(),
        };
        match cache_dir {
            Some(dir) => println!("{} Lineup cache: {}", "✓".green(), dir.display()),
            None => println!("{} Lineup cache: no cache directory available", "⚠".yellow()),
        }
    }

    if let Err(e) = config.validate() {
        println!();
        println!("{} {}", "⚠".yellow(), e);
    }

    println!();
    Ok(())
}
