//! Runtime core: timing, the game context and the frame loop driver.

pub mod clock;
pub mod constants;
pub mod error;
pub mod frame_loop;
pub mod game;
pub mod runtime;

pub use clock::{cooldown_elapsed, Clock, SystemClock};
pub use error::GameError;
pub use frame_loop::FrameLoop;
pub use game::{Game, Settings, Toast};
