//! Battle handoff: suspend the mode loop, run one isolated battle session,
//! then hand control back with an autosave.
//!
//! A battle is not a mode. While a session is active it owns both update and
//! render; the switchboard's active mode stays frozen exactly where it was.
//! The session reports completion through a one-shot [`BattleSignal`], which
//! by construction can fire at most once; the controller additionally
//! ignores completions that arrive after cleanup already ran.

pub mod encounter;

use std::fmt;

use ratatui::{layout::Rect, Frame};
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use crate::core::error::GameError;
use crate::input::InputSnapshot;
use crate::locale::Locale;
use crate::modes::ModeId;
use crate::party::{Creature, Party, PartyStore};

pub use encounter::{wild_opponent, EncounterFactory, EncounterPhase, EncounterSession};

/// Which side of a battle a combatant fights on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Player,
    Opponent,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => write!(f, "player"),
            Side::Opponent => write!(f, "opponent"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleResult {
    Victory,
    Defeat,
    Fled,
    /// The session went away without reporting an outcome.
    Abandoned,
}

/// What a session hands back when it completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleReport {
    pub result: BattleResult,
    /// The player's combatant as it left the battle. `None` when the session
    /// went away without reporting, in which case the party is left as is.
    pub player: Option<Creature>,
}

impl BattleReport {
    pub fn abandoned() -> Self {
        Self {
            result: BattleResult::Abandoned,
            player: None,
        }
    }
}

/// Completion handle given to a session. Sending consumes it.
#[derive(Debug)]
pub struct BattleSignal {
    sender: oneshot::Sender<BattleReport>,
}

impl BattleSignal {
    pub fn channel() -> (BattleSignal, oneshot::Receiver<BattleReport>) {
        let (sender, receiver) = oneshot::channel();
        (BattleSignal { sender }, receiver)
    }

    /// Reports the outcome together with the player's final state.
    pub fn finish(self, result: BattleResult, player: Creature) {
        let report = BattleReport {
            result,
            player: Some(player),
        };
        // The controller may already be gone (game shutting down).
        let _ = self.sender.send(report);
    }
}

/// An isolated battle with its own update and render path.
pub trait BattleSession {
    fn update(&mut self, now_ms: u64, input: &mut InputSnapshot);

    fn render(&self, frame: &mut Frame, area: Rect, locale: Locale);
}

/// Builds sessions. Swapped for a scripted fake in tests.
pub trait BattleFactory {
    fn create(
        &mut self,
        player: Creature,
        opponent: Creature,
        signal: BattleSignal,
    ) -> Box<dyn BattleSession>;
}

/// Collaborators needed to hand control back after a battle.
pub struct Handback<'a> {
    pub party: &'a mut Party,
    pub store: &'a dyn PartyStore,
}

/// What happened when a battle session completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleEnd {
    pub result: BattleResult,
    /// The mode that was active when the battle started and is shown again now.
    pub resume_mode: ModeId,
    /// Whether the autosave succeeded. A failed save never blocks the handback.
    pub saved: bool,
}

pub type BattleEndListener = Box<dyn FnMut(BattleResult)>;

struct ActiveBattle {
    session: Box<dyn BattleSession>,
    completion: oneshot::Receiver<BattleReport>,
    resume_mode: ModeId,
}

pub struct BattleHandoff {
    factory: Box<dyn BattleFactory>,
    active: Option<ActiveBattle>,
    listener: Option<BattleEndListener>,
    sessions_started: u64,
}

impl BattleHandoff {
    pub fn new(factory: Box<dyn BattleFactory>) -> Self {
        Self {
            factory,
            active: None,
            listener: None,
            sessions_started: 0,
        }
    }

    /// Registers the listener notified with each result after cleanup.
    pub fn set_battle_end_listener(&mut self, listener: BattleEndListener) {
        self.listener = Some(listener);
    }

    pub fn in_battle(&self) -> bool {
        self.active.is_some()
    }

    pub fn sessions_started(&self) -> u64 {
        self.sessions_started
    }

    /// The mode that will be shown again once the current battle ends.
    pub fn resume_mode(&self) -> Option<ModeId> {
        self.active.as_ref().map(|active| active.resume_mode)
    }

    /// Starts a battle between `player` and `opponent`.
    ///
    /// Missing combatants are rejected before anything changes. A call while
    /// a battle is already running is ignored and returns `Ok(false)`.
    pub fn start_battle(
        &mut self,
        player: Option<Creature>,
        opponent: Option<Creature>,
        resume_mode: ModeId,
    ) -> Result<bool, GameError> {
        let player = player.ok_or(GameError::MissingCombatant(Side::Player))?;
        let opponent = opponent.ok_or(GameError::MissingCombatant(Side::Opponent))?;

        if self.in_battle() {
            tracing::debug!("battle already in progress, ignoring start request");
            return Ok(false);
        }

        tracing::info!(
            player = %player.name,
            opponent = %opponent.name,
            "battle started"
        );

        let (signal, completion) = BattleSignal::channel();
        let session = self.factory.create(player, opponent, signal);
        self.active = Some(ActiveBattle {
            session,
            completion,
            resume_mode,
        });
        self.sessions_started += 1;
        Ok(true)
    }

    /// Runs the session's own update path. Does nothing outside a battle.
    pub fn update_session(&mut self, now_ms: u64, input: &mut InputSnapshot) {
        if let Some(active) = self.active.as_mut() {
            active.session.update(now_ms, input);
        }
    }

    pub fn render_session(&self, frame: &mut Frame, area: Rect, locale: Locale) {
        if let Some(active) = self.active.as_ref() {
            active.session.render(frame, area, locale);
        }
    }

    /// Checks the completion signal and hands control back if it fired.
    pub fn poll_completion(&mut self, handback: Handback<'_>) -> Option<BattleEnd> {
        let received = match self.active.as_mut()?.completion.try_recv() {
            Ok(report) => report,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Closed) => BattleReport::abandoned(),
        };
        self.on_battle_end(received, handback)
    }

    /// Cleanup after a battle: leave battle state, write the player's
    /// combatant back into the lead slot, autosave, restore the previous
    /// surface, then notify the listener.
    ///
    /// Returns `None` when no battle is active, so a repeated completion is
    /// a no-op rather than a second save.
    pub fn on_battle_end(
        &mut self,
        report: BattleReport,
        handback: Handback<'_>,
    ) -> Option<BattleEnd> {
        let finished = self.active.take()?;
        drop(finished.session);

        let BattleReport { result, player } = report;
        // The mode loop is frozen during a battle, so slot 0 still holds the
        // creature that was sent out.
        if let (Some(fought), Some(lead)) = (player, handback.party.lead_mut()) {
            *lead = fought;
        }

        let saved = match handback.store.save(handback.party) {
            Ok(()) => {
                tracing::info!("party autosaved after battle");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "autosave after battle failed");
                false
            }
        };

        tracing::info!(
            ?result,
            resume_mode = ?finished.resume_mode,
            "battle ended"
        );

        if let Some(listener) = self.listener.as_mut() {
            listener(result);
        }

        Some(BattleEnd {
            result,
            resume_mode: finished.resume_mode,
            saved,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::LogicalKey;
    use std::cell::{Cell, RefCell};
    use std::io;
    use std::rc::Rc;

    const HIT: u32 = 5;

    /// Session that takes one hit and finishes with a fixed result as soon
    /// as Confirm is held.
    struct ScriptedSession {
        signal: Option<BattleSignal>,
        player: Creature,
        result: BattleResult,
    }

    impl BattleSession for ScriptedSession {
        fn update(&mut self, _now_ms: u64, input: &mut InputSnapshot) {
            if input.is_pressed(LogicalKey::Confirm) {
                if let Some(signal) = self.signal.take() {
                    self.player.current_hp = self.player.current_hp.saturating_sub(HIT);
                    signal.finish(self.result, self.player.clone());
                }
            }
        }

        fn render(&self, _frame: &mut Frame, _area: Rect, _locale: Locale) {}
    }

    struct ScriptedFactory {
        result: BattleResult,
        created: Rc<Cell<u32>>,
    }

    impl BattleFactory for ScriptedFactory {
        fn create(
            &mut self,
            player: Creature,
            _opponent: Creature,
            signal: BattleSignal,
        ) -> Box<dyn BattleSession> {
            self.created.set(self.created.get() + 1);
            Box::new(ScriptedSession {
                signal: Some(signal),
                player,
                result: self.result,
            })
        }
    }

    struct CountingStore {
        saves: Cell<u32>,
        last_saved: RefCell<Option<Party>>,
        fail: bool,
    }

    impl PartyStore for CountingStore {
        fn save(&self, party: &Party) -> io::Result<()> {
            self.saves.set(self.saves.get() + 1);
            if self.fail {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
            }
            *self.last_saved.borrow_mut() = Some(party.clone());
            Ok(())
        }

        fn load(&self) -> io::Result<Option<Party>> {
            Ok(None)
        }
    }

    fn handoff(result: BattleResult) -> (BattleHandoff, Rc<Cell<u32>>) {
        let created = Rc::new(Cell::new(0));
        let factory = ScriptedFactory {
            result,
            created: Rc::clone(&created),
        };
        (BattleHandoff::new(Box::new(factory)), created)
    }

    fn wild() -> Option<Creature> {
        Some(Creature::new("Mossling", 5, 18, 7, 6))
    }

    fn lead() -> Option<Creature> {
        Party::starter().lead().cloned()
    }

    fn store(fail: bool) -> CountingStore {
        CountingStore {
            saves: Cell::new(0),
            last_saved: RefCell::new(None),
            fail,
        }
    }

    fn confirm(handoff: &mut BattleHandoff, now_ms: u64) {
        let mut input = InputSnapshot::from_keys(&[LogicalKey::Confirm]);
        handoff.update_session(now_ms, &mut input);
    }

    #[test]
    fn test_missing_player_is_rejected_without_state_change() {
        let (mut handoff, created) = handoff(BattleResult::Victory);
        let err = handoff.start_battle(None, wild(), ModeId::World).unwrap_err();
        assert!(matches!(err, GameError::MissingCombatant(Side::Player)));
        assert!(!handoff.in_battle());
        assert_eq!(created.get(), 0);
    }

    #[test]
    fn test_missing_opponent_is_rejected_without_state_change() {
        let (mut handoff, created) = handoff(BattleResult::Victory);
        let err = handoff.start_battle(lead(), None, ModeId::World).unwrap_err();
        assert!(matches!(err, GameError::MissingCombatant(Side::Opponent)));
        assert!(!handoff.in_battle());
        assert_eq!(created.get(), 0);
    }

    #[test]
    fn test_second_start_while_in_battle_is_ignored() {
        let (mut handoff, created) = handoff(BattleResult::Victory);
        assert!(handoff.start_battle(lead(), wild(), ModeId::World).unwrap());
        assert!(!handoff.start_battle(lead(), wild(), ModeId::MainMenu).unwrap());

        assert_eq!(created.get(), 1);
        assert_eq!(handoff.sessions_started(), 1);
        assert_eq!(handoff.resume_mode(), Some(ModeId::World));
    }

    #[test]
    fn test_completion_saves_once_and_restores_mode() {
        let (mut handoff, _) = handoff(BattleResult::Victory);
        let store = store(false);
        let mut party = Party::starter();
        handoff.start_battle(lead(), wild(), ModeId::World).unwrap();

        // Nothing signalled yet
        let handback = Handback {
            party: &mut party,
            store: &store,
        };
        assert!(handoff.poll_completion(handback).is_none());
        assert!(handoff.in_battle());

        confirm(&mut handoff, 100);

        let handback = Handback {
            party: &mut party,
            store: &store,
        };
        let end = handoff.poll_completion(handback).expect("battle should end");
        assert_eq!(end.result, BattleResult::Victory);
        assert_eq!(end.resume_mode, ModeId::World);
        assert!(end.saved);
        assert!(!handoff.in_battle());
        assert_eq!(store.saves.get(), 1);

        // Repeated delivery after cleanup is a no-op
        let handback = Handback {
            party: &mut party,
            store: &store,
        };
        let again = BattleReport {
            result: BattleResult::Victory,
            player: lead(),
        };
        assert!(handoff.on_battle_end(again, handback).is_none());
        let handback = Handback {
            party: &mut party,
            store: &store,
        };
        assert!(handoff.poll_completion(handback).is_none());
        assert_eq!(store.saves.get(), 1);
    }

    #[test]
    fn test_battle_damage_is_written_back_before_autosave() {
        let (mut handoff, _) = handoff(BattleResult::Defeat);
        let store = store(false);
        let mut party = Party::starter();
        let max_hp = party.lead().map(|c| c.max_hp).unwrap_or_default();
        handoff.start_battle(party.lead().cloned(), wild(), ModeId::World).unwrap();

        confirm(&mut handoff, 100);
        let handback = Handback {
            party: &mut party,
            store: &store,
        };
        handoff.poll_completion(handback).expect("battle should end");

        assert_eq!(party.lead().map(|c| c.current_hp), Some(max_hp - HIT));
        let saved = store.last_saved.borrow().clone().expect("party was saved");
        assert_eq!(saved.lead().map(|c| c.current_hp), Some(max_hp - HIT));
        // Only the lead fought
        assert_eq!(saved.members()[1..], Party::starter().members()[1..]);
    }

    #[test]
    fn test_failed_autosave_still_hands_back() {
        let (mut handoff, _) = handoff(BattleResult::Fled);
        let store = store(true);
        let mut party = Party::starter();
        handoff.start_battle(lead(), wild(), ModeId::World).unwrap();

        let handback = Handback {
            party: &mut party,
            store: &store,
        };
        let report = BattleReport {
            result: BattleResult::Fled,
            player: lead(),
        };
        let end = handoff
            .on_battle_end(report, handback)
            .expect("battle should end");
        assert!(!end.saved);
        assert!(!handoff.in_battle());
        assert_eq!(store.saves.get(), 1);
    }

    #[test]
    fn test_listener_sees_result_after_cleanup() {
        let (mut handoff, _) = handoff(BattleResult::Defeat);
        let seen = Rc::new(RefCell::new(Vec::<BattleResult>::new()));
        let sink = Rc::clone(&seen);
        handoff.set_battle_end_listener(Box::new(move |result: BattleResult| {
            sink.borrow_mut().push(result)
        }));

        let store = store(false);
        let mut party = Party::starter();
        handoff.start_battle(lead(), wild(), ModeId::World).unwrap();
        confirm(&mut handoff, 0);
        handoff.poll_completion(Handback {
            party: &mut party,
            store: &store,
        });

        assert_eq!(*seen.borrow(), vec![BattleResult::Defeat]);
    }

    #[test]
    fn test_dropped_session_resolves_as_abandoned() {
        let (signal, receiver) = BattleSignal::channel();
        drop(signal);

        let (mut handoff, _) = handoff(BattleResult::Victory);
        handoff.start_battle(lead(), wild(), ModeId::World).unwrap();
        // Swap in a receiver whose sender is already gone
        if let Some(active) = handoff.active.as_mut() {
            active.completion = receiver;
        }

        let store = store(false);
        let mut party = Party::starter();
        let end = handoff
            .poll_completion(Handback {
                party: &mut party,
                store: &store,
            })
            .expect("closed channel ends the battle");
        assert_eq!(end.result, BattleResult::Abandoned);
        // Nothing came back, so the party is saved untouched
        assert_eq!(party, Party::starter());
    }
}
