//! The game context object: everything one tick needs, owned in one place
//! and handed to modes and the battle controller explicitly.

use rand::RngCore;
use ratatui::Frame;

use super::constants::{DEFAULT_VOLUME, TOAST_DURATION_MS};
use super::error::GameError;
use crate::battle::{BattleEnd, BattleEndListener, BattleHandoff, Handback};
use crate::input::InputSnapshot;
use crate::locale::{tr, Locale};
use crate::modes::{Command, ModeContext, ModeId, ModeSwitchboard, RenderView};
use crate::party::{Party, PartyStore};
use crate::world::Overworld;

/// Player-adjustable settings, edited from the settings menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub locale: Locale,
    pub volume: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            volume: DEFAULT_VOLUME,
        }
    }
}

/// A single transient on-screen message. A newer one replaces the older.
#[derive(Debug, Clone, Default)]
pub struct Toast {
    message: Option<(String, u64)>,
}

impl Toast {
    pub fn show(&mut self, text: impl Into<String>, now_ms: u64) {
        self.message = Some((text.into(), now_ms));
    }

    pub fn visible(&self, now_ms: u64) -> Option<&str> {
        match &self.message {
            Some((text, shown_at)) if now_ms.saturating_sub(*shown_at) < TOAST_DURATION_MS => {
                Some(text.as_str())
            }
            _ => None,
        }
    }
}

pub struct Game {
    switchboard: ModeSwitchboard,
    battle: BattleHandoff,
    world: Overworld,
    party: Party,
    settings: Settings,
    store: Box<dyn PartyStore>,
    rng: Box<dyn RngCore>,
    toast: Toast,
    quit: bool,
}

impl Game {
    /// Builds the game and enters the world at `now_ms`.
    pub fn new(
        switchboard: ModeSwitchboard,
        battle: BattleHandoff,
        world: Overworld,
        party: Party,
        store: Box<dyn PartyStore>,
        rng: Box<dyn RngCore>,
        now_ms: u64,
    ) -> Result<Self, GameError> {
        let mut game = Self {
            switchboard,
            battle,
            world,
            party,
            settings: Settings::default(),
            store,
            rng,
            toast: Toast::default(),
            quit: false,
        };
        game.switchboard.change_mode(ModeId::World, now_ms)?;
        Ok(game)
    }

    /// One update pass. While a battle runs only the battle session updates;
    /// the active mode is frozen and sees none of the input.
    pub fn update(&mut self, now_ms: u64, input: &mut InputSnapshot) -> Result<(), GameError> {
        if self.battle.in_battle() {
            self.battle.update_session(now_ms, input);
        } else {
            self.update_active_mode(now_ms, input)?;
        }

        let handback = Handback {
            party: &mut self.party,
            store: self.store.as_ref(),
        };
        if let Some(end) = self.battle.poll_completion(handback) {
            self.after_battle(end, now_ms, input);
        }
        Ok(())
    }

    fn update_active_mode(
        &mut self,
        now_ms: u64,
        input: &mut InputSnapshot,
    ) -> Result<(), GameError> {
        let mut commands = Vec::new();
        let last_menu_toggle_ms = self.switchboard.last_menu_toggle_ms();

        if let Some(mode) = self.switchboard.active_mode_mut() {
            let mut ctx = ModeContext {
                now_ms,
                input,
                world: &mut self.world,
                party: &mut self.party,
                settings: &mut self.settings,
                rng: self.rng.as_mut(),
                commands: &mut commands,
                last_menu_toggle_ms,
            };
            mode.update(&mut ctx);
        }

        // A failed save cancels a quit queued behind it in the same batch.
        let mut save_failed = false;
        for command in commands {
            match command {
                Command::SaveParty => save_failed |= !self.save_party(now_ms),
                Command::Quit if save_failed => {
                    tracing::warn!("quit cancelled after failed save");
                    self.switchboard.change_mode(ModeId::World, now_ms)?;
                }
                other => self.apply(other, now_ms)?,
            }
        }
        Ok(())
    }

    fn apply(&mut self, command: Command, now_ms: u64) -> Result<(), GameError> {
        match command {
            Command::ChangeMode(id) => self.switchboard.change_mode(id, now_ms)?,
            Command::StartBattle { player, opponent } => {
                let resume_mode = self.switchboard.active_id().unwrap_or(ModeId::World);
                self.battle.start_battle(player, opponent, resume_mode)?;
            }
            Command::ConfigureChoice(context) => {
                self.switchboard.choice_dialog_mut()?.configure(context);
            }
            Command::SaveParty => {
                self.save_party(now_ms);
            }
            Command::ShowMessage(text) => self.toast.show(text, now_ms),
            Command::Quit => {
                tracing::info!("quit requested");
                self.quit = true;
            }
        }
        Ok(())
    }

    /// Saves the party and reports the outcome on screen. Never fatal.
    pub fn save_party(&mut self, now_ms: u64) -> bool {
        let locale = self.settings.locale;
        match self.store.save(&self.party) {
            Ok(()) => {
                tracing::info!("party saved");
                self.toast.show(tr(locale, "save.success"), now_ms);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "party save failed");
                self.toast.show(tr(locale, "save.failure"), now_ms);
                false
            }
        }
    }

    fn after_battle(&mut self, end: BattleEnd, now_ms: u64, input: &mut InputSnapshot) {
        if !end.saved {
            self.toast.show(tr(self.settings.locale, "save.failure"), now_ms);
        }
        // Keys still held from the battle must not reach the resumed mode.
        input.reset();
    }

    pub fn render(&self, frame: &mut Frame, now_ms: u64) {
        let area = frame.size();
        if self.battle.in_battle() {
            self.battle.render_session(frame, area, self.settings.locale);
        } else if let Some(mode) = self.switchboard.active_mode() {
            let view = RenderView {
                world: &self.world,
                party: &self.party,
                settings: &self.settings,
            };
            mode.render(frame, area, &view);
        }

        if let Some(text) = self.toast.visible(now_ms) {
            crate::ui::toast::draw_toast(frame, area, text);
        }
    }

    pub fn set_battle_end_listener(&mut self, listener: BattleEndListener) {
        self.battle.set_battle_end_listener(listener);
    }

    pub fn in_battle(&self) -> bool {
        self.battle.in_battle()
    }

    pub fn active_mode(&self) -> Option<ModeId> {
        self.switchboard.active_id()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn world(&self) -> &Overworld {
        &self.world
    }

    pub fn party(&self) -> &Party {
        &self.party
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn toast_text(&self, now_ms: u64) -> Option<&str> {
        self.toast.visible(now_ms)
    }

    pub fn battle(&self) -> &BattleHandoff {
        &self.battle
    }

    pub fn switchboard_mut(&mut self) -> &mut ModeSwitchboard {
        &mut self.switchboard
    }
}
