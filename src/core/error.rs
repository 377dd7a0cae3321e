//! Error taxonomy for the runtime core.
//!
//! Only programming errors surface here. Recoverable conditions (a failed
//! save, a blocked move) are reported to the player and never become `Err`.

use crate::battle::Side;
use crate::modes::ModeId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// `change_mode` was asked for a mode nobody registered.
    #[error("no mode registered for {0:?}")]
    UnregisteredMode(ModeId),

    /// `start_battle` was called without one of its combatants.
    #[error("cannot start a battle without the {0} combatant")]
    MissingCombatant(Side),

    /// A choice context was pushed but the registered choice mode cannot hold it.
    #[error("the choice dialog mode is not registered or cannot be configured")]
    ChoiceDialogUnavailable,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
