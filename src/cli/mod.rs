//! CLI command definitions and handlers

use clap::{Parser, Subcommand};
pub use clap_complete::Shell;

pub mod args;
pub mod cache;
pub mod completions;
pub mod context;
pub mod edit;
pub mod init;
pub mod show;
pub mod status;

pub use args::{GlobalOptions, OutputFormat};
pub use context::CommandContext;

/// Pitchside - arrange a team's starting eleven from the terminal
#[derive(Parser, Debug)]
#[command(name = "pitchside")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, table, json)
    #[arg(
        long,
        global = true,
        env = "PITCHSIDE_FORMAT",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: Option<OutputFormat>,

    /// Override config file location
    #[arg(long, global = true, env = "PITCHSIDE_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Team backend base URL
    #[arg(long, global = true, env = "PITCHSIDE_API_BASE", hide_env = true)]
    pub api_base: Option<String>,

    /// Directory for the local lineup cache
    #[arg(long, global = true, env = "PITCHSIDE_CACHE_DIR", hide_env = true)]
    pub cache_dir: Option<String>,

    /// Keep lineups in memory only; nothing is read from or written to the local cache
    #[arg(long, global = true, env = "PITCHSIDE_NO_CACHE", hide_env = true)]
    pub no_cache: bool,

    /// Enable debug logging
    #[arg(long, global = true, env = "PITCHSIDE_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a configuration file (stores --api-base when given)
    Init {
        /// Default formation, e.g. 4-4-2
        #[arg(long)]
        formation: Option<String>,
    },

    /// Show resolved configuration
    Status,

    /// Display version information
    Version,

    /// Print a team's lineup and bench
    Show {
        /// Team ID
        team: String,

        /// Formation to lay out, e.g. 4-4-2 (defaults to the team's)
        #[arg(long)]
        formation: Option<String>,
    },

    /// Rearrange a team's lineup interactively
    #[command(after_help = "\
Commands read from stdin, one per line:
  show                     Print the pitch and bench
  move <player> <slot>     Drag a player onto a slot
  bench <player>           Take a player off the pitch
  sub <pitch> <bench>      Swap a pitch player for a bench starter
  reset                    Rebuild the default lineup
  clear                    Empty the pitch and stop auto-fill
  save                     Save the lineup to the backend
  quit                     Leave the session

Players are referenced by ID or by shirt number, e.g. #9.")]
    Edit {
        /// Team ID
        team: String,

        /// Formation to lay out, e.g. 4-4-2 (defaults to the team's)
        #[arg(long)]
        formation: Option<String>,

        /// Skip confirmation prompts
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Manage the local lineup cache
    #[command(subcommand)]
    Cache(CacheCommands),

    /// Generate shell completions
    #[command(after_help = "\
Examples:
  bash:   pitchside completions bash > /etc/bash_completion.d/pitchside
  zsh:    pitchside completions zsh > \"${fpath[1]}/_pitchside\"
  fish:   pitchside completions fish > ~/.config/fish/completions/pitchside.fish")]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Cache management subcommands
#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Show cache statistics and cached teams
    Status,

    /// Remove cached lineups (all teams, or one)
    Clear {
        /// Only clear this team's lineup
        team: Option<String>,
    },

    /// Print the cache directory
    Path,
}
