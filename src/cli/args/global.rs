//! Flags every subcommand accepts

use crate::cli::{Cli, OutputFormat};

/// The global flags, detached from the parsed `Cli`.
///
/// Only the flag/env layer lives here. `CommandContext` merges it over the
/// config file, so a `None` means "not given", not "use the default".
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub format: Option<OutputFormat>,

    /// Config file, when not `~/.pitchside/config.yaml`
    pub config: Option<String>,

    pub api_base: Option<String>,

    pub cache_dir: Option<String>,

    /// Keep lineups in memory only
    pub no_cache: bool,
}

impl GlobalOptions {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            config: cli.config.clone(),
            api_base: cli.api_base.clone(),
            cache_dir: cli.cache_dir.clone(),
            no_cache: cli.no_cache,
        }
    }

    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }

    pub fn api_base_ref(&self) -> Option<&str> {
        self.api_base.as_deref()
    }
}
