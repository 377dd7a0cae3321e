//! Mode state machine.
//!
//! Exactly one [`Mode`] is active at a time. Modes never switch directly:
//! during `update` they queue [`Command`]s, and the game applies them once the
//! mode has returned. Instances live in the [`ModeRegistry`] for the whole
//! process and are reused on every activation, so per-visit state is reset
//! in `on_enter`.

pub mod choice_dialog;
pub mod dialogs;
pub mod main_menu;
pub mod party_screen;
pub mod settings_menu;
pub mod world;

use std::collections::HashMap;

use rand::RngCore;
use ratatui::{layout::Rect, Frame};

use crate::core::clock::cooldown_elapsed;
use crate::core::constants::{MENU_NAV_COOLDOWN_MS, MENU_TOGGLE_COOLDOWN_MS};
use crate::core::error::GameError;
use crate::core::game::Settings;
use crate::input::{InputSnapshot, LogicalKey};
use crate::party::{Creature, Party};
use crate::world::Overworld;

pub use choice_dialog::{ChoiceContext, ChoiceDialogMode, Continuation};
pub use main_menu::MainMenuMode;
pub use party_screen::PartyScreenMode;
pub use settings_menu::SettingsMenuMode;
pub use world::WorldMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeId {
    World,
    MainMenu,
    SettingsMenu,
    PartyScreen,
    ChoiceDialog,
}

impl ModeId {
    pub const ALL: [ModeId; 5] = [
        ModeId::World,
        ModeId::MainMenu,
        ModeId::SettingsMenu,
        ModeId::PartyScreen,
        ModeId::ChoiceDialog,
    ];
}

/// A request queued by a mode (or a dialog continuation) during one tick.
pub enum Command {
    ChangeMode(ModeId),
    StartBattle {
        player: Option<Creature>,
        opponent: Option<Creature>,
    },
    /// Replace the context held by the choice dialog.
    ConfigureChoice(ChoiceContext),
    /// Save the party; show a toast with the outcome.
    SaveParty,
    ShowMessage(String),
    Quit,
}

/// Everything a mode may read or change during `update`.
pub struct ModeContext<'a> {
    pub now_ms: u64,
    pub input: &'a mut InputSnapshot,
    pub world: &'a mut Overworld,
    pub party: &'a mut Party,
    pub settings: &'a mut Settings,
    pub rng: &'a mut dyn RngCore,
    pub commands: &'a mut Vec<Command>,
    pub last_menu_toggle_ms: u64,
}

impl ModeContext<'_> {
    /// Back/menu presses are honored only once the toggle cooldown since the
    /// last mode change has passed, so a held key does not flicker modes.
    pub fn menu_toggle_ready(&self) -> bool {
        cooldown_elapsed(self.last_menu_toggle_ms, self.now_ms, MENU_TOGGLE_COOLDOWN_MS)
    }

    pub fn request(&mut self, command: Command) {
        self.commands.push(command);
    }
}

/// Read-only data handed to `render`.
pub struct RenderView<'a> {
    pub world: &'a Overworld,
    pub party: &'a Party,
    pub settings: &'a Settings,
}

pub trait Mode {
    fn id(&self) -> ModeId;

    fn on_enter(&mut self) {}

    fn on_exit(&mut self) {}

    fn update(&mut self, ctx: &mut ModeContext<'_>);

    fn render(&self, frame: &mut Frame, area: Rect, view: &RenderView<'_>);

    /// Only the choice dialog returns itself here.
    fn as_choice_dialog(&mut self) -> Option<&mut ChoiceDialogMode> {
        None
    }
}

/// Fixed mapping from [`ModeId`] to its single instance.
#[derive(Default)]
pub struct ModeRegistry {
    modes: HashMap<ModeId, Box<dyn Mode>>,
}

impl ModeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// All five game modes.
    pub fn standard(encounter_chance: f64) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(WorldMode::new(encounter_chance)));
        registry.register(Box::new(MainMenuMode::new()));
        registry.register(Box::new(SettingsMenuMode::new()));
        registry.register(Box::new(PartyScreenMode::new()));
        registry.register(Box::new(ChoiceDialogMode::new()));
        registry
    }

    /// Registers a mode under its own id, replacing any previous one.
    pub fn register(&mut self, mode: Box<dyn Mode>) {
        self.modes.insert(mode.id(), mode);
    }

    pub fn contains(&self, id: ModeId) -> bool {
        self.modes.contains_key(&id)
    }

    pub fn get(&self, id: ModeId) -> Option<&dyn Mode> {
        self.modes.get(&id).map(|mode| mode.as_ref())
    }

    pub fn get_mut(&mut self, id: ModeId) -> Option<&mut (dyn Mode + 'static)> {
        self.modes.get_mut(&id).map(|mode| mode.as_mut())
    }
}

/// Holds the active mode and runs the enter/exit lifecycle.
pub struct ModeSwitchboard {
    registry: ModeRegistry,
    active: Option<ModeId>,
    last_menu_toggle_ms: u64,
}

impl ModeSwitchboard {
    pub fn new(registry: ModeRegistry) -> Self {
        Self {
            registry,
            active: None,
            last_menu_toggle_ms: 0,
        }
    }

    /// Exits the current mode, enters `id` and stamps the toggle time.
    ///
    /// An unregistered id is rejected before the current mode is touched.
    pub fn change_mode(&mut self, id: ModeId, now_ms: u64) -> Result<(), GameError> {
        if !self.registry.contains(id) {
            return Err(GameError::UnregisteredMode(id));
        }

        if let Some(current) = self.active.and_then(|current| self.registry.get_mut(current)) {
            current.on_exit();
        }

        let next = self
            .registry
            .get_mut(id)
            .ok_or(GameError::UnregisteredMode(id))?;
        next.on_enter();

        tracing::debug!(from = ?self.active, to = ?id, "mode change");
        self.active = Some(id);
        self.last_menu_toggle_ms = now_ms;
        Ok(())
    }

    pub fn active_id(&self) -> Option<ModeId> {
        self.active
    }

    pub fn active_mode(&self) -> Option<&dyn Mode> {
        self.active.and_then(|id| self.registry.get(id))
    }

    pub fn active_mode_mut(&mut self) -> Option<&mut (dyn Mode + 'static)> {
        let id = self.active?;
        self.registry.get_mut(id)
    }

    pub fn last_menu_toggle_ms(&self) -> u64 {
        self.last_menu_toggle_ms
    }

    pub fn choice_dialog_mut(&mut self) -> Result<&mut ChoiceDialogMode, GameError> {
        self.registry
            .get_mut(ModeId::ChoiceDialog)
            .and_then(|mode| mode.as_choice_dialog())
            .ok_or(GameError::ChoiceDialogUnavailable)
    }
}

/// Selection index over a fixed-length option list with a local
/// navigation cooldown. Up/Down wrap around.
#[derive(Debug, Clone, Default)]
pub struct MenuCursor {
    pub index: usize,
    last_nav_ms: u64,
}

impl MenuCursor {
    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// Moves on Down/Up if the cooldown allows. Returns true when it moved.
    pub fn navigate(&mut self, input: &InputSnapshot, now_ms: u64, len: usize) -> bool {
        if len == 0 || !cooldown_elapsed(self.last_nav_ms, now_ms, MENU_NAV_COOLDOWN_MS) {
            return false;
        }

        if input.is_pressed(LogicalKey::Down) {
            self.index = (self.index + 1) % len;
        } else if input.is_pressed(LogicalKey::Up) {
            self.index = (self.index + len - 1) % len;
        } else {
            return false;
        }
        self.last_nav_ms = now_ms;
        true
    }

    /// Keeps the index valid if the list shrank.
    pub fn clamp(&mut self, len: usize) {
        if self.index >= len {
            self.index = len.saturating_sub(1);
        }
    }
}
