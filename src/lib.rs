//! Overworld - a tile-based exploration game for the terminal.
//!
//! The library holds the mode state machine, the battle handoff and every
//! piece of game state so they can be driven headless from tests.

pub mod battle;
pub mod build_info;
pub mod core;
pub mod input;
pub mod locale;
pub mod modes;
pub mod party;
pub mod ui;
pub mod world;

pub use crate::battle::{BattleHandoff, BattleResult, EncounterFactory};
pub use crate::core::{Game, GameError, Settings};
pub use crate::modes::{ModeId, ModeRegistry, ModeSwitchboard};
pub use crate::party::{Creature, JsonPartyStore, Party, PartyStore};
pub use crate::world::Overworld;
