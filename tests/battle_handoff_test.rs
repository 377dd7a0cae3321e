//! Integration test: battle handoff
//!
//! Covers the full trip from a tall-grass step into a battle session and
//! back: freezing the active mode, writing the battle's damage into the
//! party, autosave, the end listener, the input reset on return and which
//! surface is drawn at each stage.

use std::cell::{Cell, RefCell};
use std::io;
use std::rc::Rc;

use overworld::battle::{
    BattleFactory, BattleHandoff, BattleResult, BattleSession, BattleSignal, EncounterFactory,
    Handback,
};
use overworld::input::{InputSnapshot, LogicalKey};
use overworld::locale::Locale;
use overworld::modes::{ModeId, ModeRegistry, ModeSwitchboard};
use overworld::party::{Creature, Party, PartyStore};
use overworld::world::{Overworld, Player, Tile, WorldMap};
use overworld::{Game, GameError};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use ratatui::{backend::TestBackend, layout::Rect, Frame, Terminal};

/// Damage every scripted battle deals to the player's creature.
const SCRIPTED_HIT: u32 = 4;

#[derive(Clone, Default)]
struct FakeStore {
    saves: Rc<Cell<u32>>,
    last_saved: Rc<RefCell<Option<Party>>>,
    fail: Rc<Cell<bool>>,
}

impl PartyStore for FakeStore {
    fn save(&self, party: &Party) -> io::Result<()> {
        if self.fail.get() {
            return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
        }
        self.saves.set(self.saves.get() + 1);
        *self.last_saved.borrow_mut() = Some(party.clone());
        Ok(())
    }

    fn load(&self) -> io::Result<Option<Party>> {
        Ok(None)
    }
}

/// Ends with a fixed result when Confirm is held, after one hit to the
/// player. Back is swallowed so a test can check it never reaches the
/// frozen mode.
struct ScriptedSession {
    signal: Option<BattleSignal>,
    player: Creature,
    result: BattleResult,
    updates: Rc<Cell<u32>>,
}

impl BattleSession for ScriptedSession {
    fn update(&mut self, _now_ms: u64, input: &mut InputSnapshot) {
        self.updates.set(self.updates.get() + 1);
        if input.is_pressed(LogicalKey::Confirm) {
            if let Some(signal) = self.signal.take() {
                self.player.current_hp = self.player.current_hp.saturating_sub(SCRIPTED_HIT);
                signal.finish(self.result, self.player.clone());
            }
        }
    }

    fn render(&self, _frame: &mut Frame, _area: Rect, _locale: Locale) {}
}

/// Builds sessions that never report and are dropped on the spot.
struct VanishingFactory;

impl BattleFactory for VanishingFactory {
    fn create(
        &mut self,
        player: Creature,
        _opponent: Creature,
        signal: BattleSignal,
    ) -> Box<dyn BattleSession> {
        drop(signal);
        Box::new(ScriptedSession {
            signal: None,
            player,
            result: BattleResult::Victory,
            updates: Rc::default(),
        })
    }
}

struct ScriptedFactory {
    result: BattleResult,
    opponents: Rc<RefCell<Vec<String>>>,
    updates: Rc<Cell<u32>>,
}

impl BattleFactory for ScriptedFactory {
    fn create(
        &mut self,
        player: Creature,
        opponent: Creature,
        signal: BattleSignal,
    ) -> Box<dyn BattleSession> {
        self.opponents.borrow_mut().push(opponent.name);
        Box::new(ScriptedSession {
            signal: Some(signal),
            player,
            result: self.result,
            updates: self.updates.clone(),
        })
    }
}

struct Harness {
    game: Game,
    store: FakeStore,
    opponents: Rc<RefCell<Vec<String>>>,
    session_updates: Rc<Cell<u32>>,
    now_ms: u64,
}

impl Harness {
    /// A field of tall grass with guaranteed encounters.
    fn new(result: BattleResult) -> Self {
        Self::with_party(result, Party::starter())
    }

    fn with_party(result: BattleResult, party: Party) -> Self {
        let store = FakeStore::default();
        let opponents = Rc::new(RefCell::new(Vec::new()));
        let session_updates = Rc::new(Cell::new(0));
        let factory = ScriptedFactory {
            result,
            opponents: opponents.clone(),
            updates: session_updates.clone(),
        };
        let world = Overworld::new(WorldMap::filled(12, 12, Tile::Grass), Player::new(5, 5));
        let game = Game::new(
            ModeSwitchboard::new(ModeRegistry::standard(1.0)),
            BattleHandoff::new(Box::new(factory)),
            world,
            party,
            Box::new(store.clone()),
            Box::new(ChaCha8Rng::seed_from_u64(3)),
            0,
        )
        .unwrap();
        Self {
            game,
            store,
            opponents,
            session_updates,
            now_ms: 1000,
        }
    }

    fn tick(&mut self, keys: &[LogicalKey]) -> InputSnapshot {
        let mut input = InputSnapshot::from_keys(keys);
        self.game.update(self.now_ms, &mut input).unwrap();
        self.now_ms += 300;
        input
    }

    fn position(&self) -> (i32, i32) {
        (self.game.world().player.x, self.game.world().player.y)
    }
}

#[test]
fn test_grass_step_starts_battle() {
    let mut h = Harness::new(BattleResult::Victory);
    h.tick(&[LogicalKey::Right]);

    assert!(h.game.in_battle());
    assert_eq!(h.position(), (6, 5));
    assert_eq!(h.opponents.borrow().len(), 1);
    assert_eq!(h.game.battle().resume_mode(), Some(ModeId::World));
}

#[test]
fn test_active_mode_is_frozen_during_battle() {
    let mut h = Harness::new(BattleResult::Victory);
    h.tick(&[LogicalKey::Right]);
    let before = h.position();

    h.tick(&[LogicalKey::Right]);
    h.tick(&[LogicalKey::Back]);

    assert!(h.game.in_battle());
    assert_eq!(h.position(), before);
    assert_eq!(h.game.active_mode(), Some(ModeId::World));
    assert_eq!(h.session_updates.get(), 2);
}

#[test]
fn test_battle_end_autosaves_and_resumes_world() {
    let mut h = Harness::new(BattleResult::Victory);
    h.tick(&[LogicalKey::Right]);

    let input = h.tick(&[LogicalKey::Confirm]);
    assert!(!h.game.in_battle());
    assert_eq!(h.game.active_mode(), Some(ModeId::World));
    assert_eq!(h.store.saves.get(), 1);
    // Keys held at the end of the battle are consumed.
    assert!(input.reset_requested());
    assert!(!input.is_pressed(LogicalKey::Confirm));
}

#[test]
fn test_listener_hears_each_result_once() {
    let mut h = Harness::new(BattleResult::Fled);
    let heard = Rc::new(RefCell::new(Vec::<BattleResult>::new()));
    let sink = heard.clone();
    h.game
        .set_battle_end_listener(Box::new(move |result: BattleResult| {
            sink.borrow_mut().push(result)
        }));

    h.tick(&[LogicalKey::Right]);
    h.tick(&[LogicalKey::Confirm]);
    h.tick(&[LogicalKey::Confirm]);

    assert_eq!(heard.borrow().as_slice(), &[BattleResult::Fled]);
    assert_eq!(h.store.saves.get(), 1);
}

#[test]
fn test_failed_autosave_still_returns_control() {
    let mut h = Harness::new(BattleResult::Defeat);
    h.store.fail.set(true);
    h.tick(&[LogicalKey::Right]);

    let end_ms = h.now_ms;
    h.tick(&[LogicalKey::Confirm]);
    assert!(!h.game.in_battle());
    assert_eq!(h.game.toast_text(end_ms), Some("Save failed!"));
}

#[test]
fn test_walking_resumes_after_battle() {
    let mut h = Harness::new(BattleResult::Victory);
    h.tick(&[LogicalKey::Right]);
    h.tick(&[LogicalKey::Confirm]);

    h.tick(&[LogicalKey::Down]);
    assert_eq!(h.position(), (6, 6));
    assert_eq!(h.opponents.borrow().len(), 2);
}

#[test]
fn test_battle_damage_reaches_party_and_autosave() {
    let mut h = Harness::new(BattleResult::Defeat);
    let max_hp = h.game.party().lead().map(|c| c.max_hp).unwrap();
    h.tick(&[LogicalKey::Right]);
    h.tick(&[LogicalKey::Confirm]);

    let lead = h.game.party().lead().unwrap();
    assert_eq!(lead.current_hp, max_hp - SCRIPTED_HIT);

    let saved = h.store.last_saved.borrow().clone().unwrap();
    assert_eq!(saved, *h.game.party());
}

#[test]
fn test_damage_carries_into_next_battle() {
    let mut h = Harness::new(BattleResult::Victory);
    let max_hp = h.game.party().lead().map(|c| c.max_hp).unwrap();
    h.tick(&[LogicalKey::Right]);
    h.tick(&[LogicalKey::Confirm]);
    h.tick(&[LogicalKey::Down]);
    h.tick(&[LogicalKey::Confirm]);

    let lead = h.game.party().lead().unwrap();
    assert_eq!(lead.current_hp, max_hp - 2 * SCRIPTED_HIT);
    assert_eq!(h.store.saves.get(), 2);
}

#[test]
fn test_empty_party_never_enters_battle() {
    let mut h = Harness::with_party(BattleResult::Victory, Party::default());
    let mut input = InputSnapshot::from_keys(&[LogicalKey::Right]);

    assert!(h.game.update(h.now_ms, &mut input).is_ok());
    assert!(!h.game.in_battle());
    assert_eq!(h.position(), (6, 5));
    assert!(h.opponents.borrow().is_empty());
}

// =============================================================================
// Rendering
// =============================================================================

fn encounter_game() -> Game {
    let world = Overworld::new(WorldMap::filled(12, 12, Tile::Grass), Player::new(5, 5));
    Game::new(
        ModeSwitchboard::new(ModeRegistry::standard(1.0)),
        BattleHandoff::new(Box::new(EncounterFactory)),
        world,
        Party::starter(),
        Box::new(FakeStore::default()),
        Box::new(ChaCha8Rng::seed_from_u64(11)),
        0,
    )
    .unwrap()
}

fn screen_text(terminal: &mut Terminal<TestBackend>, game: &Game, now_ms: u64) -> String {
    terminal.draw(|frame| game.render(frame, now_ms)).unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

#[test]
fn test_battle_surface_replaces_world_and_hands_back() {
    let mut game = encounter_game();
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();

    let before = screen_text(&mut terminal, &game, 1000);
    assert!(before.contains("@v"));
    assert!(!before.contains("Battle"));

    let mut input = InputSnapshot::from_keys(&[LogicalKey::Right]);
    game.update(1000, &mut input).unwrap();
    assert!(game.in_battle());

    // Drawn every tick while the battle runs, with no trace of the map
    for now_ms in [1000, 1016, 1033] {
        let during = screen_text(&mut terminal, &game, now_ms);
        assert!(during.contains("Battle"));
        assert!(during.contains("Sproutle"));
        assert!(!during.contains('@'));
    }

    // Run away, then acknowledge the result
    let mut input = InputSnapshot::from_keys(&[LogicalKey::Back]);
    game.update(1300, &mut input).unwrap();
    let mut input = InputSnapshot::from_keys(&[LogicalKey::Confirm]);
    game.update(1600, &mut input).unwrap();
    assert!(!game.in_battle());

    let after = screen_text(&mut terminal, &game, 1600);
    assert!(after.contains("@>"));
    assert!(!after.contains("Battle"));
}

// =============================================================================
// Controller contract
// =============================================================================

#[test]
fn test_missing_combatant_is_rejected() {
    let mut battle = BattleHandoff::new(Box::new(VanishingFactory));
    let opponent = Some(Creature::new("Mossling", 3, 16, 7, 6));

    let err = battle
        .start_battle(None, opponent, ModeId::World)
        .unwrap_err();
    assert!(matches!(err, GameError::MissingCombatant(_)));
    assert!(!battle.in_battle());
    assert_eq!(battle.sessions_started(), 0);
}

#[test]
fn test_second_start_is_ignored() {
    let mut battle = BattleHandoff::new(Box::new(VanishingFactory));
    let player = || Some(Creature::new("Sproutle", 5, 22, 9, 7));
    let opponent = || Some(Creature::new("Mossling", 3, 16, 7, 6));

    assert!(battle.start_battle(player(), opponent(), ModeId::World).unwrap());
    assert!(!battle.start_battle(player(), opponent(), ModeId::World).unwrap());
    assert_eq!(battle.sessions_started(), 1);
}

#[test]
fn test_vanished_session_reports_abandoned() {
    let mut battle = BattleHandoff::new(Box::new(VanishingFactory));
    let store = FakeStore::default();
    let mut party = Party::starter();
    battle
        .start_battle(
            party.lead().cloned(),
            Some(Creature::new("Mossling", 3, 16, 7, 6)),
            ModeId::World,
        )
        .unwrap();

    let end = battle
        .poll_completion(Handback {
            party: &mut party,
            store: &store,
        })
        .unwrap();
    assert_eq!(end.result, BattleResult::Abandoned);
    assert!(end.saved);
    assert!(!battle.in_battle());
    assert_eq!(party, Party::starter());
}
