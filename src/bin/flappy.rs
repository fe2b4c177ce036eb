//! Flappy Bird in the terminal.
//!
//! The host: puts the terminal into raw mode on the alternate screen, pumps
//! input into the event walk, and drives one update + render pass per frame
//! at roughly 60 fps. `q` or `Esc` quits.

use std::io;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};

use twig_tui::engine::{event_tree, render_tree, update_tree};
use twig_tui::game::{self, SKY_BLUE, WORLD_HEIGHT, WORLD_WIDTH};
use twig_tui::renderer::{DiffRenderer, FrameBuffer};

const FRAME_BUDGET: Duration = Duration::from_millis(16);
const MAX_DT: f64 = 0.1;

/// Puts the terminal into raw mode on the alternate screen, and restores it
/// on drop so a panicking callback still leaves a usable terminal.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

fn is_quit(event: &Event) -> bool {
    matches!(
        event,
        Event::Key(KeyEvent {
            code: KeyCode::Char('q') | KeyCode::Esc,
            kind: KeyEventKind::Press,
            ..
        })
    )
}

fn main() -> io::Result<()> {
    let _guard = TerminalGuard::enter()?;

    let root = game::game();
    let mut frame = FrameBuffer::new(WORLD_WIDTH as u16, WORLD_HEIGHT as u16);
    let mut renderer = DiffRenderer::new();
    let mut last = Instant::now();

    loop {
        // Drain whatever input arrived since the previous frame.
        while event::poll(Duration::ZERO)? {
            let event = event::read()?;
            if is_quit(&event) {
                return Ok(());
            }
            if matches!(event, Event::Resize(..)) {
                renderer.invalidate();
                continue;
            }
            event_tree(&root, &event);
        }

        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f64().min(MAX_DT);
        last = now;

        update_tree(&root, dt);

        frame.clear(SKY_BLUE);
        render_tree(&root, &mut frame);
        renderer.present(&frame)?;

        let elapsed = last.elapsed();
        if elapsed < FRAME_BUDGET {
            std::thread::sleep(FRAME_BUDGET - elapsed);
        }
    }
}
