//! Frame loop driver and terminal input capture.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event};
use ratatui::{backend::Backend, Terminal};

use super::clock::{Clock, SystemClock};
use super::constants::IDLE_SLEEP_MS;
use super::error::GameError;
use super::frame_loop::FrameLoop;
use super::game::Game;
use crate::input::SharedInput;

const INPUT_POLL_MS: u64 = 50;

/// One update pass against the shared input.
pub fn tick(game: &mut Game, input: &SharedInput, now_ms: u64) -> Result<(), GameError> {
    let mut snapshot = input.snapshot(now_ms);
    game.update(now_ms, &mut snapshot)?;
    if snapshot.reset_requested() {
        input.reset();
    }
    Ok(())
}

/// Runs update and render at the frame loop's rate until the game or the
/// input layer asks to quit.
pub fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    game: &mut Game,
    input: &SharedInput,
    clock: &dyn Clock,
) -> Result<(), GameError> {
    let mut frames = FrameLoop::default();
    let mut last_ms = clock.now_ms();
    tracing::info!(interval = ?frames.interval(), "frame loop started");

    loop {
        let now_ms = clock.now_ms();
        let due = frames.advance(Duration::from_millis(now_ms.saturating_sub(last_ms)));
        last_ms = now_ms;

        for _ in 0..due {
            let now_ms = clock.now_ms();
            tick(game, input, now_ms)?;
            terminal.draw(|frame| game.render(frame, now_ms))?;
            if game.should_quit() {
                break;
            }
        }

        if game.should_quit() || input.quit_requested() {
            break;
        }

        if due == 0 {
            let idle = Duration::from_millis(IDLE_SLEEP_MS);
            thread::sleep(frames.until_next_tick().min(idle));
        }
    }

    // Stops the capture thread.
    input.request_quit();
    tracing::info!("frame loop stopped");
    Ok(())
}

/// Reads terminal key events on a background thread into `input` until a
/// quit is requested.
pub fn spawn_input_capture(input: SharedInput, clock: SystemClock) -> JoinHandle<()> {
    thread::spawn(move || {
        while !input.quit_requested() {
            match event::poll(Duration::from_millis(INPUT_POLL_MS)) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => input.apply_key_event(key, clock.now_ms()),
                    Ok(_) => {}
                    Err(e) => {
                        tracing::error!(error = %e, "reading terminal event failed");
                        input.request_quit();
                    }
                },
                Ok(false) => {}
                Err(e) => {
                    tracing::error!(error = %e, "polling terminal events failed");
                    input.request_quit();
                }
            }
        }
    })
}
