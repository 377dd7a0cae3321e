// Tick and timing
pub const TICKS_PER_SECOND: u32 = 60;
pub const MAX_CATCH_UP_TICKS: u32 = 5;
pub const IDLE_SLEEP_MS: u64 = 2;

// Debounce windows
pub const MENU_TOGGLE_COOLDOWN_MS: u64 = 200;
pub const MENU_NAV_COOLDOWN_MS: u64 = 150;
pub const PLAYER_MOVE_COOLDOWN_MS: u64 = 200;

// Terminals that cannot report key releases hold a press for this long
pub const KEY_HOLD_WINDOW_MS: u64 = 120;

// World
pub const MAP_WIDTH: usize = 30;
pub const MAP_HEIGHT: usize = 20;
pub const PLAYER_START: (usize, usize) = (4, 6);
pub const ENCOUNTER_CHANCE: f64 = 0.1;

// Wild opponents
pub const WILD_LEVEL_MIN: u32 = 3;
pub const WILD_LEVEL_MAX: u32 = 7;

// Messages
pub const TOAST_DURATION_MS: u64 = 2000;

// Settings
pub const VOLUME_STEP: u8 = 10;
pub const DEFAULT_VOLUME: u8 = 70;

// Persistence
pub const SAVE_DIR_NAME: &str = ".overworld";
pub const PARTY_FILE_NAME: &str = "party.json";
pub const LOG_FILE_NAME: &str = "overworld.log";
pub const PARTY_SAVE_VERSION: u32 = 1;
