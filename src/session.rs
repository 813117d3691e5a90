//! Cancellable team loading
//!
//! The initial fetch is the only backend call a caller may abandon. A
//! cancelled load resolves to `Ok(None)` and its result is discarded, so a
//! late response never overwrites state set up by whoever cancelled it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

use crate::client::{Team, TeamApi};
use crate::error::Result;
use crate::lineup::TeamId;

#[derive(Debug, Default)]
struct GuardState {
    cancelled: AtomicBool,
    /// A load using this guard has finished, either way
    settled: AtomicBool,
    notify: Notify,
}

/// Cancellation handle shared between a load and its owner
#[derive(Debug, Clone, Default)]
pub struct LoadGuard {
    state: Arc<GuardState>,
}

impl LoadGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abandon any load using this guard
    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::SeqCst);
        self.state.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }

    /// Whether a load has completed; cancelling after this has no effect
    pub fn is_settled(&self) -> bool {
        self.state.settled.load(Ordering::SeqCst)
    }

    fn settle(&self) {
        self.state.settled.store(true, Ordering::SeqCst);
    }

    async fn cancelled(&self) {
        let notified = self.state.notify.notified();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }
}

/// Fetch a team unless `guard` is cancelled first.
///
/// Returns `Ok(None)` when the load was cancelled, before or during the request.
pub async fn load_team<A: TeamApi + ?Sized>(
    api: &A,
    team_id: &TeamId,
    guard: &LoadGuard,
) -> Result<Option<Team>> {
    let result = fetch(api, team_id, guard).await;
    guard.settle();
    result
}

async fn fetch<A: TeamApi + ?Sized>(
    api: &A,
    team_id: &TeamId,
    guard: &LoadGuard,
) -> Result<Option<Team>> {
    if guard.is_cancelled() {
        return Ok(None);
    }

    let team = tokio::select! {
        team = api.get_team(team_id) => team?,
        _ = guard.cancelled() => {
            log::debug!("Load of team {} cancelled in flight", team_id);
            return Ok(None);
        }
    };

    if guard.is_cancelled() {
        log::debug!("Discarding team {} loaded after cancellation", team_id);
        return Ok(None);
    }

    log::debug!("Loaded team {} with {} players", team_id, team.players.len());
    Ok(Some(team))
}
