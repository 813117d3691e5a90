//! Pitchside CLI - arrange a team's starting eleven from the terminal

use clap::Parser;

use pitchside::cli::{self, CacheCommands, Cli, Commands, GlobalOptions};
use pitchside::error::Result;
use pitchside::session::LoadGuard;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    let opts = GlobalOptions::from_cli(&cli);

    // Ctrl-C abandons an in-flight team load; once loaded it exits
    let guard = LoadGuard::new();
    let canceller = guard.clone();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if canceller.is_settled() || canceller.is_cancelled() {
                std::process::exit(130);
            }
            log::debug!("Interrupt received, cancelling load");
            canceller.cancel();
        }
    });

    match cli.command {
        Commands::Init { formation } => cli::init::run(&opts, formation.as_deref()),
        Commands::Status => cli::status::run(&opts),
        Commands::Version => {
            println!("pitchside version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Show { team, formation } => {
            cli::show::run(&opts, &team, formation.as_deref(), &guard).await
        }
        Commands::Edit {
            team,
            formation,
            yes,
        } => cli::edit::run(&opts, &team, formation.as_deref(), yes, &guard).await,
        Commands::Cache(cache_cmd) => match cache_cmd {
            CacheCommands::Status => cli::cache::status(&opts),
            CacheCommands::Clear { team } => cli::cache::clear(&opts, team.as_deref()),
            CacheCommands::Path => cli::cache::path(&opts),
        },
        Commands::Completions { shell } => {
            cli::completions::run(shell);
            Ok(())
        }
    }
}
