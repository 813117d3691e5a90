//! Command execution context
//!
//! Resolves configuration, the backend client and the lineup store once, so
//! handlers only deal with lineups.

use std::path::PathBuf;

use crate::cli::{GlobalOptions, OutputFormat};
use crate::client::RestClient;
use crate::config::Config;
use crate::error::{ConfigError, Result};
use crate::lineup::formation::{self, Formation};
use crate::lineup::{LineupEngine, TeamId};
use crate::output;
use crate::session::{LoadGuard, load_team};
use crate::store::{LineupStore, LocalLineupCache, MemoryLineupStore};

/// Store chosen at runtime: on-disk cache, or memory with `--no-cache`
pub type DynStore = Box<dyn LineupStore>;

/// Context for command execution
pub struct CommandContext {
    /// Loaded configuration with command-line overrides applied
    pub config: Config,
    /// Output format preference
    pub format: OutputFormat,
    /// Global flags as given
    pub opts: GlobalOptions,
}

impl CommandContext {
    /// Load config and apply overrides.
    ///
    /// A missing config file is not an error; defaults apply.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let mut config = Config::load_or_default(opts.config_ref())?;

        if let Some(base) = opts.api_base_ref() {
            config.api_base = Some(base.to_string());
        }
        if let Some(dir) = &opts.cache_dir {
            config.cache_dir = Some(PathBuf::from(dir));
        }
        config.validate()?;

        let format = resolve_format(opts.format, config.preferences.format.as_deref())?;

        Ok(Self {
            config,
            format,
            opts: opts.clone(),
        })
    }

    /// REST client for the configured backend
    pub fn client(&self) -> Result<RestClient> {
        RestClient::new(self.config.api_base(), self.config.timeout())
    }

    /// Lineup cache directory: flag > config > platform default
    pub fn cache_dir(&self) -> Result<PathBuf> {
        match &self.config.cache_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(LocalLineupCache::cache_dir()?),
        }
    }

    /// Open the on-disk cache
    pub fn open_cache(&self) -> Result<LocalLineupCache> {
        Ok(LocalLineupCache::open_at(&self.cache_dir()?)?)
    }

    /// Store for an editing session.
    ///
    /// An unusable cache directory degrades to memory with a warning.
    pub fn open_store(&self) -> DynStore {
        if self.opts.no_cache {
            return Box::new(MemoryLineupStore::new());
        }
        match self.open_cache() {
            Ok(cache) => Box::new(cache),
            Err(e) => {
                log::warn!("Lineup cache unavailable, keeping changes in memory: {}", e);
                Box::new(MemoryLineupStore::new())
            }
        }
    }

    /// Fetch a team and build its engine, along with the formation laid out.
    ///
    /// `Ok(None)` means the load was cancelled.
    pub async fn open_engine(
        &self,
        team: &str,
        formation: Option<&str>,
        guard: &LoadGuard,
    ) -> Result<Option<(LineupEngine<DynStore>, Formation)>> {
        let team_id = TeamId::parse(team);
        let client = self.client()?;

        let spinner = output::spinner(format!("Loading team {}", team_id));
        let loaded = load_team(&client, &team_id, guard).await;
        spinner.finish_and_clear();

        let Some(team) = loaded? else {
            return Ok(None);
        };

        let formation = self.formation_for(formation, team.formation.as_deref())?;
        log::debug!("Team {} uses formation {}", team.id, formation);

        let roster = team.players.clone();
        let engine = LineupEngine::initialize(team, roster, formation.template(), self.open_store());
        Ok(Some((engine, formation)))
    }

    /// Formation by precedence: flag > team record > config > default
    pub fn formation_for(&self, explicit: Option<&str>, team: Option<&str>) -> Result<Formation> {
        Ok(formation::resolve(
            explicit,
            team,
            self.config.preferences.formation.as_deref(),
        )?)
    }
}

/// Output format: flag or env > config preference > pretty
fn resolve_format(explicit: Option<OutputFormat>, preference: Option<&str>) -> Result<OutputFormat> {
    if let Some(format) = explicit {
        return Ok(format);
    }
    match preference {
        Some(raw) => raw
            .parse()
            .map_err(|e: String| ConfigError::Invalid(e).into()),
        None => Ok(OutputFormat::default()),
    }
}
