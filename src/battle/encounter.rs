//! The wild-encounter session the game ships with.
//!
//! Deliberately simple: Confirm trades one blow each way, Back runs away.
//! Once an outcome is reached the session waits for Confirm before it
//! signals completion, so the player can read the result.

use rand::{Rng, RngCore};
use ratatui::{layout::Rect, Frame};

use super::{BattleFactory, BattleResult, BattleSession, BattleSignal};
use crate::core::clock::cooldown_elapsed;
use crate::core::constants::{MENU_NAV_COOLDOWN_MS, WILD_LEVEL_MAX, WILD_LEVEL_MIN};
use crate::input::{InputSnapshot, LogicalKey};
use crate::locale::Locale;
use crate::party::Creature;

/// (name, base hp, attack, defense)
const WILD_ROSTER: &[(&str, u32, u32, u32)] = &[
    ("Mossling", 16, 7, 6),
    ("Pebblit", 18, 6, 9),
    ("Zapwing", 14, 9, 4),
    ("Burrowl", 17, 8, 5),
];

/// Rolls a wild opponent for a tall-grass encounter.
pub fn wild_opponent(rng: &mut dyn RngCore) -> Creature {
    let (name, hp, attack, defense) = WILD_ROSTER[rng.gen_range(0..WILD_ROSTER.len())];
    let level = rng.gen_range(WILD_LEVEL_MIN..=WILD_LEVEL_MAX);
    Creature::new(name, level, hp + level * 2, attack, defense)
}

fn damage(attacker: &Creature, defender: &Creature) -> u32 {
    (attacker.attack + attacker.level)
        .saturating_sub(defender.defense / 2)
        .max(1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncounterPhase {
    Fighting,
    Finished(BattleResult),
}

pub struct EncounterSession {
    player: Creature,
    opponent: Creature,
    phase: EncounterPhase,
    last_action_ms: u64,
    signal: Option<BattleSignal>,
}

impl EncounterSession {
    pub fn new(player: Creature, opponent: Creature, signal: BattleSignal) -> Self {
        Self {
            player,
            opponent,
            phase: EncounterPhase::Fighting,
            last_action_ms: 0,
            signal: Some(signal),
        }
    }

    pub fn player(&self) -> &Creature {
        &self.player
    }

    pub fn opponent(&self) -> &Creature {
        &self.opponent
    }

    pub fn phase(&self) -> EncounterPhase {
        self.phase
    }

    fn exchange_blows(&mut self) {
        let hit = damage(&self.player, &self.opponent);
        self.opponent.current_hp = self.opponent.current_hp.saturating_sub(hit);
        if self.opponent.is_fainted() {
            self.phase = EncounterPhase::Finished(BattleResult::Victory);
            return;
        }

        let hit = damage(&self.opponent, &self.player);
        self.player.current_hp = self.player.current_hp.saturating_sub(hit);
        if self.player.is_fainted() {
            self.phase = EncounterPhase::Finished(BattleResult::Defeat);
        }
    }
}

impl BattleSession for EncounterSession {
    fn update(&mut self, now_ms: u64, input: &mut InputSnapshot) {
        if !cooldown_elapsed(self.last_action_ms, now_ms, MENU_NAV_COOLDOWN_MS) {
            return;
        }

        match self.phase {
            EncounterPhase::Fighting => {
                if input.is_pressed(LogicalKey::Confirm) {
                    self.exchange_blows();
                } else if input.is_pressed(LogicalKey::Back) {
                    self.phase = EncounterPhase::Finished(BattleResult::Fled);
                } else {
                    return;
                }
            }
            EncounterPhase::Finished(result) => {
                if !input.is_pressed(LogicalKey::Confirm) {
                    return;
                }
                if let Some(signal) = self.signal.take() {
                    signal.finish(result, self.player.clone());
                }
            }
        }

        self.last_action_ms = now_ms;
        input.reset();
    }

    fn render(&self, frame: &mut Frame, area: Rect, locale: Locale) {
        crate::ui::battle::draw_encounter(frame, area, self, locale);
    }
}

/// Creates [`EncounterSession`]s for the battle handoff.
#[derive(Debug, Default)]
pub struct EncounterFactory;

impl BattleFactory for EncounterFactory {
    fn create(
        &mut self,
        player: Creature,
        opponent: Creature,
        signal: BattleSignal,
    ) -> Box<dyn BattleSession> {
        Box::new(EncounterSession::new(player, opponent, signal))
    }
}
