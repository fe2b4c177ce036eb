//! The Flappy Bird demo built on the engine.
//!
//! The game is one scene graph: a root node owning the shared state cells
//! (status, score, bird collision rect) and providing them as context, with
//! the bird, the pipe manager, the HUD and the menu/banner text as children.
//! All rules live in hooks; the host only pumps the loop.

mod bird;
mod pipes;
mod text;

use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::deps;
use crate::engine::{Event, Node, NodePtr, Prop, conditional};
use crate::types::{Rect, Rgba};

pub use bird::bird;
pub use pipes::pipes;
pub use text::text;

// =============================================================================
// World constants (units are terminal cells; a cell is roughly 1:2 w:h)
// =============================================================================

pub const WORLD_WIDTH: f32 = 72.0;
pub const WORLD_HEIGHT: f32 = 44.0;
pub const SKY_BLUE: Rgba = Rgba::rgb(135, 206, 235);

const GRAVITY: f32 = 60.0;
const FLAP_VELOCITY: f32 = -18.0;
const BIRD_X_POSITION: f32 = WORLD_WIDTH / 4.0;
const BIRD_WIDTH: f32 = 3.0;
const BIRD_HEIGHT: f32 = 2.0;

const PIPE_WIDTH: f32 = 8.0;
const PIPE_GAP_HEIGHT: f32 = 10.0;
const PIPE_SPEED: f32 = 18.0;
const PIPE_SPAWN_INTERVAL: f32 = 1.6;
const MIN_PIPE_HEIGHT: f32 = 6.0;
const MAX_PIPE_HEIGHT_OFFSET: u32 = (WORLD_HEIGHT - PIPE_GAP_HEIGHT - 2.0 * MIN_PIPE_HEIGHT) as u32;

// =============================================================================
// Shared game state
// =============================================================================

/// Phase of a run. Context-provided by the game root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameStatus {
    #[default]
    MainMenu,
    Playing,
    GameOver,
}

/// Pipes cleared this run. A newtype so context lookup by type cannot
/// collide with other integer cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score(pub u32);

/// Whether this input should count as a flap (space or up arrow, key press
/// only - repeats and releases are ignored).
pub(crate) fn flap_requested(event: &Event) -> bool {
    matches!(
        event,
        Event::Key(KeyEvent {
            code: KeyCode::Char(' ') | KeyCode::Up,
            kind: KeyEventKind::Press,
            ..
        })
    )
}

// =============================================================================
// Root component
// =============================================================================

/// Build the whole game tree.
///
/// The returned root provides [`GameStatus`] and [`Score`] as context, so
/// tests and the host can resolve them with `root.context::<GameStatus>()`.
pub fn game() -> NodePtr {
    let root = Node::new();

    let status = root.state(GameStatus::MainMenu);
    let score = root.state(Score(0));
    let bird_rect = root.state(Rect::new(
        BIRD_X_POSITION - BIRD_WIDTH / 2.0,
        WORLD_HEIGHT / 2.0 - BIRD_HEIGHT / 2.0,
        BIRD_WIDTH,
        BIRD_HEIGHT,
    ));

    root.provide_context(status.clone());
    root.provide_context(score.clone());

    // Flap starts a run from the menu and leaves the game-over screen.
    // Flapping mid-run is the bird's business, not the root's.
    let status_on_flap = status.clone();
    let score_on_flap = score.clone();
    root.on_event(move |event| {
        if !flap_requested(event) {
            return;
        }
        match status_on_flap.get() {
            GameStatus::MainMenu => {
                score_on_flap.set(Score(0));
                status_on_flap.set(GameStatus::Playing);
            }
            GameStatus::GameOver => {
                score_on_flap.set(Score(0));
                status_on_flap.set(GameStatus::MainMenu);
            }
            GameStatus::Playing => {}
        }
    });

    root.add_child(&bird(status.clone(), bird_rect.clone()));
    root.add_child(&pipes(
        status.clone(),
        Prop::from(bird_rect.clone()),
        score.clone(),
    ));
    root.add_child(&hud());

    // Menu title, visible only before the first flap.
    let status_for_title = status.clone();
    root.add_child(&text(
        Prop::from(String::from("Flap to Start")),
        Prop::from((WORLD_WIDTH as i32 / 2, WORLD_HEIGHT as i32 / 3)),
        Prop::from(Rgba::WHITE),
        Prop::getter(move || status_for_title.get() == GameStatus::MainMenu),
    ));

    // Game-over banner, mounted only while the run is over.
    let status_for_banner = status.clone();
    let over = root.derived(
        move || status_for_banner.get() == GameStatus::GameOver,
        deps![status],
    );
    let score_for_banner = score.clone();
    let banner = text(
        Prop::getter(move || format!("Game Over! Score: {}.", score_for_banner.get().0)),
        Prop::from((WORLD_WIDTH as i32 / 2, WORLD_HEIGHT as i32 / 2)),
        Prop::from(Rgba::WHITE),
        Prop::from(true),
    );
    root.add_child(&conditional(over, banner));

    root
}

/// Score readout during play. Resolves its cells through context at render
/// time, so it works wherever it is mounted under the game root.
fn hud() -> NodePtr {
    let node = Node::new();
    let node_for_render = Rc::downgrade(&node);
    node.render(move |frame| {
        let Some(node) = node_for_render.upgrade() else {
            return;
        };
        let (Some(status), Some(score)) = (node.context::<GameStatus>(), node.context::<Score>())
        else {
            return;
        };
        if status.get() == GameStatus::Playing {
            let line = format!("Score: {}", score.get().0);
            let x = WORLD_WIDTH as i32 / 2 - line.len() as i32 / 2;
            frame.draw_text(x, 1, &line, Rgba::WHITE);
        }
    });
    node
}
