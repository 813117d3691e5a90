//! Slot assignment engine
//!
//! Owns the working lineup for one team and applies drag/drop gestures to
//! it. Every mutation writes through to the [`LineupStore`]; the backend is
//! only written by an explicit commit.
//!
//! Invariants held after every operation:
//! - slot ids match the template; slots are never added or removed
//! - a player occupies at most one slot, and only starters occupy slots
//! - with suspension off, every unlatched slot is filled while bench
//!   starters remain

use serde::Serialize;

use super::bench::{Bench, bench_starters};
use super::{Player, PlayerId, Slot, build, is_cleared_board, is_usable};
use crate::client::{Team, TeamApi};
use crate::error::{LineupError, Result};
use crate::store::LineupStore;

/// Where a drag started
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOrigin {
    /// A pitch slot, by id
    Slot(String),
    /// The off-pitch bench
    Bench,
}

/// Transfer record produced by [`LineupEngine::begin_drag`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPayload {
    pub player: PlayerId,
    pub origin: DragOrigin,
}

impl DragPayload {
    pub fn from_bench(player: PlayerId) -> Self {
        Self {
            player,
            origin: DragOrigin::Bench,
        }
    }

    pub fn from_slot(player: PlayerId, slot_id: impl Into<String>) -> Self {
        Self {
            player,
            origin: DragOrigin::Slot(slot_id.into()),
        }
    }
}

/// What an applied drop did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Move {
    /// Player put into an empty slot
    Placed,
    /// Field to field: the two slots exchanged players (`with` was in the target)
    Swapped { with: Option<PlayerId> },
    /// Bench player took an occupied slot; the occupant went to the bench
    Replaced { displaced: PlayerId },
    /// Placement without backfill (suspended board or latched slot)
    Manual { displaced: Option<PlayerId> },
    /// Player taken off the pitch
    Benched,
    /// Bench player took the dragged player's slot
    Substituted { incoming: PlayerId },
}

/// Why a drop was refused; the lineup is untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    /// Player is not on the roster
    UnknownPlayer,
    /// Only starters may be dragged onto the pitch
    NotStarter,
    /// Substitution source is not on the pitch
    NotOnPitch,
    /// Substitution target is already on the pitch
    TargetNotOnBench,
}

/// Result of a drop handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Applied(Move),
    Rejected(Rejection),
    /// Nothing to do (unknown slot, no-op gesture)
    Ignored,
}

impl DropOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, DropOutcome::Applied(_))
    }
}

/// Which tier the initial lineup came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineupSource {
    Backend,
    Cache,
    Fresh,
}

/// Team payload captured for a backend write
#[derive(Debug, Clone)]
pub struct PendingCommit {
    team: Team,
}

impl PendingCommit {
    /// Lineup snapshot carried by this commit
    pub fn lineup(&self) -> &[Slot] {
        self.team.lineup.as_deref().unwrap_or_default()
    }

    /// Write the snapshot to the backend.
    ///
    /// Runs to completion; there is no cancellation.
    pub async fn send<A: TeamApi + ?Sized>(self, api: &A) -> Result<CommittedLineup> {
        api.update_team(&self.team.id, &self.team).await?;
        Ok(CommittedLineup {
            lineup: self.team.lineup.unwrap_or_default(),
        })
    }
}

/// A lineup the backend accepted
#[derive(Debug, Clone)]
pub struct CommittedLineup {
    pub lineup: Vec<Slot>,
}

/// Stateful lineup editor for one team
pub struct LineupEngine<S: LineupStore> {
    team: Team,
    roster: Vec<Player>,
    template: Vec<Slot>,
    slots: Vec<Slot>,
    prevent_auto_fill: bool,
    source: LineupSource,
    store: S,
}

impl<S: LineupStore> LineupEngine<S> {
    /// Load the working lineup for `team`.
    ///
    /// Tiers, first usable wins: the backend lineup on `team`, the cached
    /// lineup, a fresh build. Backend and fresh lineups are written to the
    /// cache. A backend lineup replaces `team.lineup` in its reconciled
    /// form. A cleared board comes back suspended.
    pub fn initialize(mut team: Team, roster: Vec<Player>, template: Vec<Slot>, mut store: S) -> Self {
        let remote = team
            .lineup
            .as_deref()
            .and_then(|candidate| reconcile(candidate, &template, &roster));

        let (slots, source) = match remote {
            Some(slots) => (slots, LineupSource::Backend),
            None => match store
                .load(&team.id)
                .and_then(|candidate| reconcile(&candidate, &template, &roster))
            {
                Some(slots) => (slots, LineupSource::Cache),
                None => (build(&template, &roster), LineupSource::Fresh),
            },
        };

        log::debug!("Team {} lineup loaded from {:?}", team.id, source);

        if source != LineupSource::Cache {
            store.save(&team.id, &slots);
        }
        if source == LineupSource::Backend {
            team.lineup = Some(slots.clone());
        }

        Self {
            prevent_auto_fill: is_cleared_board(&slots),
            team,
            roster,
            template,
            slots,
            source,
            store,
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, slot_id: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.slot_id == slot_id)
    }

    /// Slot currently holding `player`
    pub fn slot_of(&self, player: &PlayerId) -> Option<&Slot> {
        self.slots.iter().find(|s| s.holds(player))
    }

    pub fn roster(&self) -> &[Player] {
        &self.roster
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.roster.iter().find(|p| &p.id == id)
    }

    /// Look a player up by id, or by shirt number written as `#10`
    pub fn find_player(&self, reference: &str) -> std::result::Result<&Player, LineupError> {
        let reference = reference.trim();
        let found = match reference.strip_prefix('#') {
            Some(number) => number
                .parse::<u32>()
                .ok()
                .and_then(|n| self.roster.iter().find(|p| p.number == n)),
            None => self.player(&PlayerId::parse(reference)),
        };
        found.ok_or_else(|| LineupError::UnknownPlayer(reference.to_string()))
    }

    /// Off-pitch roster, grouped
    pub fn bench(&self) -> Bench<'_> {
        Bench::compute(&self.roster, &self.slots)
    }

    pub fn team(&self) -> &Team {
        &self.team
    }

    /// Whether auto-fill is suspended
    pub fn is_suspended(&self) -> bool {
        self.prevent_auto_fill
    }

    pub fn source(&self) -> LineupSource {
        self.source
    }

    /// Lineup last accepted by the backend
    pub fn persisted_lineup(&self) -> Option<&[Slot]> {
        self.team.lineup.as_deref()
    }

    /// Whether the working board differs from the backend copy
    pub fn is_dirty(&self) -> bool {
        self.persisted_lineup() != Some(self.slots.as_slice())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ========================================================================
    // Gestures
    // ========================================================================

    /// Start dragging `player`.
    ///
    /// Bench drags are only allowed for starters; a refused drag yields no
    /// payload. An accepted drag lifts the suspension.
    pub fn begin_drag(&mut self, player: PlayerId, origin: DragOrigin) -> Option<DragPayload> {
        if origin == DragOrigin::Bench && !self.is_starter(&player) {
            log::debug!("Refusing bench drag of non-starter {}", player);
            return None;
        }

        self.prevent_auto_fill = false;
        Some(DragPayload { player, origin })
    }

    /// Drop a dragged player on a pitch slot
    pub fn drop_on_slot(&mut self, payload: &DragPayload, target_slot: &str) -> DropOutcome {
        if let Some(rejection) = self.check_dragged(payload) {
            return DropOutcome::Rejected(rejection);
        }
        let Some(target) = self.slot_index(target_slot) else {
            log::debug!("Drop on unknown slot {}", target_slot);
            return DropOutcome::Ignored;
        };

        let origin = self.slot_index_of(&payload.player);
        let occupant = self.slots[target].player_id.clone();

        if self.prevent_auto_fill || self.slots[target].no_auto_fill {
            if let Some(origin) = origin {
                self.slots[origin].player_id = None;
            }
            self.slots[target].player_id = Some(payload.player.clone());
            if self.prevent_auto_fill {
                self.slots[target].no_auto_fill = true;
            }
            self.persist();
            return DropOutcome::Applied(Move::Manual {
                displaced: occupant.filter(|p| p != &payload.player),
            });
        }

        let applied = match (origin, occupant) {
            (Some(origin), with) if origin != target => {
                self.slots[target].player_id = self.slots[origin].player_id.take();
                self.slots[origin].player_id = with.clone();
                Move::Swapped { with }
            }
            (None, Some(displaced)) => {
                self.slots[target].player_id = Some(payload.player.clone());
                Move::Replaced { displaced }
            }
            _ => {
                self.slots[target].player_id = Some(payload.player.clone());
                Move::Placed
            }
        };

        self.backfill();
        self.persist();
        DropOutcome::Applied(applied)
    }

    /// Drop a dragged player on the bench area, taking them off the pitch.
    ///
    /// Backfill runs even when the player held no slot, so holes left in a
    /// loaded board get filled. `Ignored` means nothing changed.
    pub fn drop_on_bench(&mut self, payload: &DragPayload) -> DropOutcome {
        if let Some(rejection) = self.check_dragged(payload) {
            return DropOutcome::Rejected(rejection);
        }

        let origin = self.slot_index_of(&payload.player);
        if let Some(origin) = origin {
            self.slots[origin].player_id = None;
        }
        let filled = self.backfill();
        self.persist();

        if origin.is_some() || filled > 0 {
            DropOutcome::Applied(Move::Benched)
        } else {
            DropOutcome::Ignored
        }
    }

    /// Drop a pitch player onto a bench starter: the bench player takes the slot.
    ///
    /// No backfill; the swap is one for one.
    pub fn drop_on_bench_player(&mut self, payload: &DragPayload, bench_player: &PlayerId) -> DropOutcome {
        if &payload.player == bench_player {
            return DropOutcome::Ignored;
        }
        match self.player(bench_player) {
            None => return DropOutcome::Rejected(Rejection::UnknownPlayer),
            Some(p) if !p.is_starter => return DropOutcome::Rejected(Rejection::NotStarter),
            Some(_) => {}
        }
        if let Some(rejection) = self.check_dragged(payload) {
            return DropOutcome::Rejected(rejection);
        }
        if self.slot_index_of(bench_player).is_some() {
            return DropOutcome::Rejected(Rejection::TargetNotOnBench);
        }
        let Some(origin) = self.slot_index_of(&payload.player) else {
            return DropOutcome::Rejected(Rejection::NotOnPitch);
        };

        self.slots[origin].player_id = Some(bench_player.clone());
        self.persist();
        DropOutcome::Applied(Move::Substituted {
            incoming: bench_player.clone(),
        })
    }

    /// Rebuild from the template, unlock every slot and lift the suspension
    pub fn reset_to_initial(&mut self) {
        self.slots = build(&self.template, &self.roster);
        self.prevent_auto_fill = false;
        self.store.clear(&self.team.id);
        self.persist();
    }

    /// Empty and latch every slot, and suspend auto-fill.
    ///
    /// The board stays empty until a reset or a manual placement.
    pub fn clear_field(&mut self) {
        for slot in &mut self.slots {
            slot.player_id = None;
            slot.no_auto_fill = true;
        }
        self.prevent_auto_fill = true;
        self.persist();
    }

    // ========================================================================
    // Backend
    // ========================================================================

    /// Capture `{...team, lineup}` for a backend write
    pub fn prepare_commit(&self) -> PendingCommit {
        let mut team = self.team.clone();
        team.lineup = Some(self.slots.clone());
        PendingCommit { team }
    }

    /// Record a lineup the backend accepted and refresh the cache
    pub fn finish_commit(&mut self, committed: CommittedLineup) {
        self.team.lineup = Some(committed.lineup);
        self.persist();
    }

    /// Save the current board to the backend.
    ///
    /// On failure the working board and the persisted copy are unchanged,
    /// so the caller can retry.
    pub async fn commit_to_backend<A: TeamApi + ?Sized>(&mut self, api: &A) -> Result<()> {
        let pending = self.prepare_commit();
        match pending.send(api).await {
            Ok(committed) => {
                self.finish_commit(committed);
                Ok(())
            }
            Err(e) => {
                log::warn!("Saving lineup for team {} failed: {}", self.team.id, e);
                Err(e)
            }
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn is_starter(&self, player: &PlayerId) -> bool {
        self.player(player).is_some_and(|p| p.is_starter)
    }

    fn check_dragged(&self, payload: &DragPayload) -> Option<Rejection> {
        match self.player(&payload.player) {
            None => Some(Rejection::UnknownPlayer),
            Some(p) if !p.is_starter => Some(Rejection::NotStarter),
            Some(_) => None,
        }
    }

    fn slot_index(&self, slot_id: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.slot_id == slot_id)
    }

    fn slot_index_of(&self, player: &PlayerId) -> Option<usize> {
        self.slots.iter().position(|s| s.holds(player))
    }

    /// Fill empty unlatched slots from bench starters, in roster order.
    /// Returns how many slots were filled.
    fn backfill(&mut self) -> usize {
        if self.prevent_auto_fill || !self.roster.iter().any(|p| p.is_starter) {
            return 0;
        }

        let mut bench = bench_starters(&self.roster, &self.slots)
            .into_iter()
            .map(|p| p.id.clone())
            .collect::<Vec<_>>()
            .into_iter();

        let mut filled = 0;
        for slot in self
            .slots
            .iter_mut()
            .filter(|s| s.is_empty() && !s.no_auto_fill)
        {
            let Some(player) = bench.next() else {
                break;
            };
            slot.player_id = Some(player);
            filled += 1;
        }
        filled
    }

    fn persist(&mut self) {
        self.store.save(&self.team.id, &self.slots);
    }
}

/// Fit a persisted lineup onto the template, or `None` if it is unusable.
///
/// The slot id set must equal the template's. Geometry comes from the
/// template. Assignments to unknown players, non-starters or repeated ids
/// are dropped.
fn reconcile(candidate: &[Slot], template: &[Slot], roster: &[Player]) -> Option<Vec<Slot>> {
    if candidate.len() != template.len() {
        return None;
    }

    let mut seen: Vec<&PlayerId> = Vec::new();
    let mut slots = Vec::with_capacity(template.len());

    for base in template {
        let stored = candidate.iter().find(|s| s.slot_id == base.slot_id)?;
        let mut slot = Slot {
            player_id: None,
            no_auto_fill: stored.no_auto_fill,
            ..base.clone()
        };

        if let Some(id) = stored.player_id.as_ref() {
            let starter = roster.iter().any(|p| &p.id == id && p.is_starter);
            if !starter || seen.contains(&id) {
                log::warn!("Dropping stored assignment of {} to {}", id, base.slot_id);
            } else {
                seen.push(id);
                slot.player_id = Some(id.clone());
            }
        }
        slots.push(slot);
    }

    is_usable(&slots).then_some(slots)
}
