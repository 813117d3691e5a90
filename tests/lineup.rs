//! Lineup engine scenarios through the public API

use std::sync::Mutex;

use async_trait::async_trait;
use pitchside::client::{Team, TeamApi};
use pitchside::error::ApiError;
use pitchside::lineup::formation::{Formation, default_template};
use pitchside::lineup::{
    DragOrigin, DropOutcome, LineupEngine, LineupSource, Move, Player, PlayerId, Rejection, TeamId,
};
use pitchside::store::{LineupStore, LocalLineupCache, MemoryLineupStore};
use tempfile::tempdir;

fn player(id: u64, position: &str, starter: bool) -> Player {
    Player {
        id: PlayerId::from(id),
        name: format!("Player {id}"),
        number: id as u32 + 10,
        positions: vec![position.to_string()],
        is_starter: starter,
        photo: None,
    }
}

/// 1 keeper, 4 defenders, 3 midfielders, 4 forwards as starters; 13 is a spare
fn squad() -> Vec<Player> {
    let mut players = vec![player(1, "gk", true)];
    players.extend((2..=5).map(|id| player(id, "cb", true)));
    players.extend((6..=8).map(|id| player(id, "cm", true)));
    players.extend((9..=12).map(|id| player(id, "st", true)));
    players.push(player(13, "cm", false));
    players
}

fn team() -> Team {
    Team::new(5u64, "Rovers").with_players(squad())
}

fn engine_with<S: LineupStore>(team: Team, store: S) -> LineupEngine<S> {
    let roster = team.players.clone();
    LineupEngine::initialize(team, roster, default_template(), store)
}

fn holder(engine: &LineupEngine<impl LineupStore>, slot: &str) -> Option<PlayerId> {
    engine.slot(slot).and_then(|s| s.player_id.clone())
}

/// Backend stand-in recording every write
#[derive(Default)]
struct RecordingApi {
    writes: Mutex<Vec<Team>>,
    fail: bool,
}

#[async_trait]
impl TeamApi for RecordingApi {
    async fn get_team(&self, _team_id: &TeamId) -> pitchside::Result<Team> {
        Ok(team())
    }

    async fn update_team(&self, _team_id: &TeamId, team: &Team) -> pitchside::Result<Team> {
        if self.fail {
            return Err(ApiError::ServerError("database unavailable".to_string()).into());
        }
        self.writes.lock().unwrap().push(team.clone());
        Ok(team.clone())
    }
}

#[test]
fn fresh_lineup_places_starters_by_position() {
    let engine = engine_with(team(), MemoryLineupStore::new());

    assert_eq!(engine.source(), LineupSource::Fresh);
    assert_eq!(holder(&engine, "GK-1"), Some(PlayerId::from(1)));
    assert_eq!(holder(&engine, "DEF-4"), Some(PlayerId::from(5)));
    assert_eq!(holder(&engine, "MID-1"), Some(PlayerId::from(6)));
    assert_eq!(holder(&engine, "FWD-3"), Some(PlayerId::from(11)));
    assert!(!engine.is_suspended());

    let bench = engine.bench();
    let spare: Vec<&PlayerId> = bench.starters.iter().map(|p| &p.id).collect();
    assert_eq!(spare, vec![&PlayerId::from(12)]);
    assert_eq!(bench.substitutes.len(), 1);

    assert!(engine.store().raw(&TeamId::from(5)).is_some());
}

#[test]
fn short_roster_leaves_slots_empty() {
    let players = vec![
        player(1, "gk", true),
        player(6, "cm", true),
        player(9, "st", true),
        player(13, "cm", false),
    ];
    let engine = engine_with(Team::new(2u64, "Reserves").with_players(players), MemoryLineupStore::new());

    assert_eq!(holder(&engine, "GK-1"), Some(PlayerId::from(1)));
    assert_eq!(holder(&engine, "MID-1"), Some(PlayerId::from(6)));
    assert_eq!(holder(&engine, "FWD-1"), Some(PlayerId::from(9)));
    assert_eq!(engine.slots().iter().filter(|s| s.is_empty()).count(), 8);
    assert!(engine.bench().starters.is_empty());
}

#[test]
fn keeper_and_unlabeled_starters_fill_front_slots() {
    let unlabeled = |id| Player {
        positions: Vec::new(),
        ..player(id, "", true)
    };
    let players = vec![player(1, "gk", true), unlabeled(2), unlabeled(3)];
    let engine = engine_with(Team::new(3u64, "Colts").with_players(players), MemoryLineupStore::new());

    assert_eq!(holder(&engine, "GK-1"), Some(PlayerId::from(1)));
    assert_eq!(holder(&engine, "DEF-1"), Some(PlayerId::from(2)));
    assert_eq!(holder(&engine, "DEF-2"), Some(PlayerId::from(3)));
    let empty: Vec<&str> = engine
        .slots()
        .iter()
        .filter(|s| s.is_empty())
        .map(|s| s.slot_id.as_str())
        .collect();
    assert_eq!(
        empty,
        vec!["DEF-3", "DEF-4", "MID-1", "MID-2", "MID-3", "FWD-1", "FWD-2", "FWD-3"]
    );
}

#[test]
fn formation_template_drives_slot_count() {
    let template = Formation::parse("3-5-2").unwrap().template();
    let t = team();
    let roster = t.players.clone();
    let engine = LineupEngine::initialize(t, roster, template, MemoryLineupStore::new());

    assert!(engine.slot("MID-5").is_some());
    assert!(engine.slot("DEF-4").is_none());
    assert!(engine.slots().iter().all(|s| !s.is_empty()));
}

#[test]
fn swap_persists_and_reloads_from_cache() {
    let team_id = TeamId::from(5);
    let mut engine = engine_with(team(), MemoryLineupStore::new());

    let payload = engine
        .begin_drag(PlayerId::from(9), DragOrigin::Slot("FWD-1".to_string()))
        .unwrap();
    let outcome = engine.drop_on_slot(&payload, "FWD-3");
    assert_eq!(
        outcome,
        DropOutcome::Applied(Move::Swapped {
            with: Some(PlayerId::from(11))
        })
    );
    assert_eq!(holder(&engine, "FWD-1"), Some(PlayerId::from(11)));
    assert_eq!(holder(&engine, "FWD-3"), Some(PlayerId::from(9)));

    let mut store = MemoryLineupStore::new();
    store.insert_raw(&team_id, engine.store().raw(&team_id).unwrap());
    let reloaded = engine_with(team(), store);

    assert_eq!(reloaded.source(), LineupSource::Cache);
    assert_eq!(reloaded.slots(), engine.slots());
}

#[test]
fn dropping_on_bench_heals_a_cached_hole() {
    let team_id = TeamId::from(5);
    let mut store = MemoryLineupStore::new();
    {
        let mut holed = engine_with(team(), MemoryLineupStore::new()).slots().to_vec();
        holed[8].player_id = None;
        store.save(&team_id, &holed);
    }

    let mut engine = engine_with(team(), store);
    assert_eq!(engine.source(), LineupSource::Cache);
    assert_eq!(holder(&engine, "FWD-1"), None);

    let payload = engine.begin_drag(PlayerId::from(12), DragOrigin::Bench).unwrap();
    assert_eq!(engine.drop_on_bench(&payload), DropOutcome::Applied(Move::Benched));

    // Bench starters in roster order are [9, 12]
    assert_eq!(holder(&engine, "FWD-1"), Some(PlayerId::from(9)));
    assert!(!engine.is_suspended());
    assert_eq!(engine.store().load(&team_id).as_deref(), Some(engine.slots()));
}

#[test]
fn bench_starter_replaces_and_substitutes() {
    let mut engine = engine_with(team(), MemoryLineupStore::new());

    let payload = engine.begin_drag(PlayerId::from(12), DragOrigin::Bench).unwrap();
    assert_eq!(
        engine.drop_on_slot(&payload, "FWD-2"),
        DropOutcome::Applied(Move::Replaced {
            displaced: PlayerId::from(10)
        })
    );
    assert_eq!(holder(&engine, "FWD-2"), Some(PlayerId::from(12)));

    let payload = engine
        .begin_drag(PlayerId::from(9), DragOrigin::Slot("FWD-1".to_string()))
        .unwrap();
    assert_eq!(
        engine.drop_on_bench_player(&payload, &PlayerId::from(10)),
        DropOutcome::Applied(Move::Substituted {
            incoming: PlayerId::from(10)
        })
    );
    assert_eq!(holder(&engine, "FWD-1"), Some(PlayerId::from(10)));
    assert!(engine.bench().starters.iter().any(|p| p.id == PlayerId::from(9)));
}

#[test]
fn non_starters_stay_off_the_pitch() {
    let mut engine = engine_with(team(), MemoryLineupStore::new());
    let before = engine.slots().to_vec();

    assert!(engine.begin_drag(PlayerId::from(13), DragOrigin::Bench).is_none());

    let payload = engine
        .begin_drag(PlayerId::from(6), DragOrigin::Slot("MID-1".to_string()))
        .unwrap();
    assert_eq!(
        engine.drop_on_bench_player(&payload, &PlayerId::from(13)),
        DropOutcome::Rejected(Rejection::NotStarter)
    );
    assert_eq!(engine.slots(), before.as_slice());
}

#[test]
fn cleared_board_survives_reload_until_reset() {
    let dir = tempdir().unwrap();

    {
        let cache = LocalLineupCache::open_at(dir.path()).unwrap();
        let mut engine = engine_with(team(), cache);
        engine.clear_field();
        assert!(engine.is_suspended());
        assert!(engine.slots().iter().all(|s| s.is_empty() && s.no_auto_fill));
    }

    let cache = LocalLineupCache::open_at(dir.path()).unwrap();
    let mut engine = engine_with(team(), cache);
    assert_eq!(engine.source(), LineupSource::Cache);
    assert!(engine.is_suspended());

    let payload = engine
        .begin_drag(PlayerId::from(12), DragOrigin::Bench)
        .unwrap();
    assert!(!engine.is_suspended());
    assert_eq!(
        engine.drop_on_slot(&payload, "MID-2"),
        DropOutcome::Applied(Move::Manual { displaced: None })
    );
    assert_eq!(engine.slots().iter().filter(|s| !s.is_empty()).count(), 1);

    engine.reset_to_initial();
    assert!(!engine.is_suspended());
    assert!(engine.slots().iter().all(|s| !s.is_empty() && !s.no_auto_fill));
    assert_eq!(holder(&engine, "GK-1"), Some(PlayerId::from(1)));
}

#[test]
fn backend_lineup_wins_over_cache() {
    let dir = tempdir().unwrap();
    let team_id = TeamId::from(5);

    let mut saved = default_template();
    saved[0].player_id = Some(PlayerId::from(1));
    saved[10].player_id = Some(PlayerId::from(12));

    let mut cache = LocalLineupCache::open_at(dir.path()).unwrap();
    cache.save(&team_id, &default_template());

    let engine = engine_with(team().with_lineup(saved.clone()), cache);

    assert_eq!(engine.source(), LineupSource::Backend);
    assert_eq!(engine.slots(), saved.as_slice());
    assert!(!engine.is_dirty());

    let cached = LocalLineupCache::open_at(dir.path())
        .unwrap()
        .load(&team_id)
        .unwrap();
    assert_eq!(cached, saved);
}

#[test]
fn unreadable_backend_lineup_falls_back_to_cache() {
    let team_id = TeamId::from(5);
    let mut body = serde_json::to_value(team()).unwrap();
    body["lineup"] = serde_json::json!([{"playerId": 1}, "GK-1"]);
    let decoded: Team = serde_json::from_value(body).unwrap();
    assert!(decoded.lineup.is_none());

    let mut cached = default_template();
    cached[0].player_id = Some(PlayerId::from(1));
    let mut store = MemoryLineupStore::new();
    store.save(&team_id, &cached);

    let engine = engine_with(decoded, store);
    assert_eq!(engine.source(), LineupSource::Cache);
    assert_eq!(engine.slots(), cached.as_slice());
}

#[tokio::test]
async fn swap_then_commit_is_what_reloads() {
    let team_id = TeamId::from(5);
    let api = RecordingApi::default();
    let mut engine = engine_with(team(), MemoryLineupStore::new());

    let payload = engine
        .begin_drag(PlayerId::from(2), DragOrigin::Slot("DEF-1".to_string()))
        .unwrap();
    engine.drop_on_slot(&payload, "DEF-4");
    engine.commit_to_backend(&api).await.unwrap();

    let stored = engine.store().load(&team_id).unwrap();
    let held = |slot: &str| {
        stored
            .iter()
            .find(|s| s.slot_id == slot)
            .and_then(|s| s.player_id.clone())
    };
    assert_eq!(held("DEF-1"), Some(PlayerId::from(5)));
    assert_eq!(held("DEF-4"), Some(PlayerId::from(2)));
    assert_eq!(engine.persisted_lineup(), Some(stored.as_slice()));

    let written = api.writes.lock().unwrap()[0].clone();
    let reloaded = engine_with(written, MemoryLineupStore::new());
    assert_eq!(reloaded.source(), LineupSource::Backend);
    assert_eq!(reloaded.slots(), stored.as_slice());
    assert!(!reloaded.is_dirty());
}

#[tokio::test]
async fn commit_writes_full_team_record() {
    let api = RecordingApi::default();
    let mut engine = engine_with(team(), MemoryLineupStore::new());
    assert!(engine.is_dirty());

    engine.commit_to_backend(&api).await.unwrap();

    let writes = api.writes.lock().unwrap();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].name, "Rovers");
    assert_eq!(writes[0].players.len(), 13);
    assert_eq!(writes[0].lineup.as_deref(), Some(engine.slots()));
    assert!(!engine.is_dirty());
}

#[tokio::test]
async fn failed_commit_keeps_working_board() {
    let api = RecordingApi {
        fail: true,
        ..Default::default()
    };
    let mut engine = engine_with(team(), MemoryLineupStore::new());
    engine.clear_field();
    let board = engine.slots().to_vec();

    assert!(engine.commit_to_backend(&api).await.is_err());
    assert_eq!(engine.slots(), board.as_slice());
    assert!(engine.persisted_lineup().is_none());
    assert!(engine.is_dirty());
}
