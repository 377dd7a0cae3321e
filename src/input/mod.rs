//! Input capture and per-tick snapshots.
//!
//! The capture thread writes key transitions into [`SharedInput`]; the frame
//! loop takes one [`InputSnapshot`] per tick under the same lock, so a tick
//! never observes a half-applied key state.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use parking_lot::Mutex;

/// Logical controls, independent of the physical key bound to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalKey {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Back,
}

impl LogicalKey {
    pub const ALL: [LogicalKey; 6] = [
        LogicalKey::Up,
        LogicalKey::Down,
        LogicalKey::Left,
        LogicalKey::Right,
        LogicalKey::Confirm,
        LogicalKey::Back,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Maps a terminal key code to a logical control.
    pub fn from_key_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(LogicalKey::Up),
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(LogicalKey::Down),
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(LogicalKey::Left),
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(LogicalKey::Right),
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('z') | KeyCode::Char('Z') => {
                Some(LogicalKey::Confirm)
            }
            KeyCode::Esc | KeyCode::Char('x') | KeyCode::Char('X') => Some(LogicalKey::Back),
            _ => None,
        }
    }
}

const KEY_COUNT: usize = LogicalKey::ALL.len();

/// What the modes see during one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    held: [bool; KEY_COUNT],
    reset_requested: bool,
}

impl InputSnapshot {
    pub fn from_keys(keys: &[LogicalKey]) -> Self {
        let mut snapshot = Self::default();
        for key in keys {
            snapshot.held[key.index()] = true;
        }
        snapshot
    }

    pub fn is_pressed(&self, key: LogicalKey) -> bool {
        self.held[key.index()]
    }

    /// Consumes every held key for the rest of this tick and asks the
    /// provider to forget them, so the press that triggered an action is not
    /// read again as a repeat.
    pub fn reset(&mut self) {
        self.held = [false; KEY_COUNT];
        self.reset_requested = true;
    }

    pub fn reset_requested(&self) -> bool {
        self.reset_requested
    }

    pub fn any_pressed(&self) -> bool {
        self.held.iter().any(|held| *held)
    }
}

/// Key state as seen by the capture thread.
#[derive(Debug, Clone)]
pub struct InputState {
    /// Per key: `Some(expiry)` while held. `u64::MAX` means held until released.
    held_until: [Option<u64>; KEY_COUNT],
    /// `None` when the terminal reports releases.
    hold_window_ms: Option<u64>,
    quit_requested: bool,
}

impl InputState {
    pub fn new(hold_window_ms: Option<u64>) -> Self {
        Self {
            held_until: [None; KEY_COUNT],
            hold_window_ms,
            quit_requested: false,
        }
    }

    pub fn press(&mut self, key: LogicalKey, now_ms: u64) {
        let until = match self.hold_window_ms {
            Some(window) => now_ms.saturating_add(window),
            None => u64::MAX,
        };
        self.held_until[key.index()] = Some(until);
    }

    pub fn release(&mut self, key: LogicalKey) {
        self.held_until[key.index()] = None;
    }

    pub fn reset(&mut self) {
        self.held_until = [None; KEY_COUNT];
    }

    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Applies one terminal key event.
    pub fn apply_key_event(&mut self, event: KeyEvent, now_ms: u64) {
        if event.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(event.code, KeyCode::Char('c') | KeyCode::Char('C'))
        {
            self.request_quit();
            return;
        }

        let Some(key) = LogicalKey::from_key_code(event.code) else {
            return;
        };
        match event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => self.press(key, now_ms),
            KeyEventKind::Release => self.release(key),
        }
    }

    pub fn snapshot(&self, now_ms: u64) -> InputSnapshot {
        let mut snapshot = InputSnapshot::default();
        for (slot, until) in snapshot.held.iter_mut().zip(self.held_until.iter()) {
            *slot = matches!(until, Some(expiry) if *expiry > now_ms);
        }
        snapshot
    }
}

/// The one structure shared between the capture thread and the frame loop.
#[derive(Debug, Clone)]
pub struct SharedInput {
    inner: Arc<Mutex<InputState>>,
}

impl SharedInput {
    pub fn new(hold_window_ms: Option<u64>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(InputState::new(hold_window_ms))),
        }
    }

    pub fn apply_key_event(&self, event: KeyEvent, now_ms: u64) {
        self.inner.lock().apply_key_event(event, now_ms);
    }

    pub fn snapshot(&self, now_ms: u64) -> InputSnapshot {
        self.inner.lock().snapshot(now_ms)
    }

    pub fn reset(&self) {
        self.inner.lock().reset();
    }

    pub fn request_quit(&self) {
        self.inner.lock().request_quit();
    }

    pub fn quit_requested(&self) -> bool {
        self.inner.lock().quit_requested()
    }
}
