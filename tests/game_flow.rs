//! Headless playthrough of the demo game: synthetic input, fixed timesteps,
//! assertions on the state cells the root provides as context and on
//! rendered frames.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use twig_tui::engine::{Event, event_tree, render_tree, update_tree};
use twig_tui::game::{GameStatus, SKY_BLUE, Score, WORLD_HEIGHT, WORLD_WIDTH, game};
use twig_tui::renderer::FrameBuffer;
use twig_tui::types::Rgba;

const DT: f64 = 0.05;

fn flap() -> Event {
    Event::Key(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE))
}

fn render(root: &twig_tui::engine::NodePtr) -> FrameBuffer {
    let mut frame = FrameBuffer::new(WORLD_WIDTH as u16, WORLD_HEIGHT as u16);
    frame.clear(SKY_BLUE);
    render_tree(root, &mut frame);
    frame
}

fn count_cells_with_bg(frame: &FrameBuffer, bg: Rgba) -> usize {
    let mut hits = 0;
    for y in 0..frame.height() {
        for x in 0..frame.width() {
            if frame.get(x, y).unwrap().bg == bg {
                hits += 1;
            }
        }
    }
    hits
}

/// Step the game with a flap every 0.6 simulated seconds. At that cadence
/// the bird oscillates a couple of cells around its starting row and never
/// reaches the world bounds.
fn play_with_steady_flaps(root: &twig_tui::engine::NodePtr, seconds: f64) {
    let steps = (seconds / DT).round() as usize;
    let flap_every = (0.6 / DT).round() as usize;
    for step in 0..steps {
        if step % flap_every == 0 {
            event_tree(root, &flap());
        }
        update_tree(root, DT);
    }
}

#[test]
fn full_run_cycles_through_every_status() {
    let root = game();
    let status = root.context::<GameStatus>().expect("root provides status");
    let score = root.context::<Score>().expect("root provides score");

    assert_eq!(status.get(), GameStatus::MainMenu);
    update_tree(&root, DT);

    event_tree(&root, &flap());
    assert_eq!(status.get(), GameStatus::Playing);
    assert_eq!(score.get(), Score(0));

    // Stop flapping: gravity ends the run well within four seconds.
    for _ in 0..80 {
        update_tree(&root, DT);
    }
    assert_eq!(status.get(), GameStatus::GameOver);

    // One flap leaves the game-over screen, the next starts a fresh run.
    event_tree(&root, &flap());
    assert_eq!(status.get(), GameStatus::MainMenu);
    event_tree(&root, &flap());
    assert_eq!(status.get(), GameStatus::Playing);
}

#[test]
fn pipes_appear_during_play_and_are_cleared_after_the_crash() {
    let root = game();
    let status = root.context::<GameStatus>().unwrap();

    event_tree(&root, &flap());
    // Three seconds is past the first spawn but before the first pair can
    // reach the bird, so the run is still alive regardless of gap heights.
    play_with_steady_flaps(&root, 3.0);
    assert_eq!(status.get(), GameStatus::Playing);

    let playing = render(&root);
    assert!(
        count_cells_with_bg(&playing, Rgba::GREEN) > 0,
        "a pipe pair must be on screen"
    );

    for _ in 0..80 {
        update_tree(&root, DT);
    }
    assert_eq!(status.get(), GameStatus::GameOver);
    update_tree(&root, DT);

    let over = render(&root);
    assert_eq!(
        count_cells_with_bg(&over, Rgba::GREEN),
        0,
        "pipes are cleared when the run ends"
    );
}

#[test]
fn bird_is_drawn_every_frame() {
    let root = game();
    update_tree(&root, DT);
    let frame = render(&root);
    assert!(
        count_cells_with_bg(&frame, Rgba::YELLOW) > 0,
        "bird must be visible on the menu"
    );
}

#[test]
fn replay_starts_from_a_clean_slate() {
    let root = game();
    let status = root.context::<GameStatus>().unwrap();
    let score = root.context::<Score>().unwrap();

    event_tree(&root, &flap());
    for _ in 0..80 {
        update_tree(&root, DT);
    }
    assert_eq!(status.get(), GameStatus::GameOver);

    event_tree(&root, &flap()); // back to the menu
    event_tree(&root, &flap()); // and into a new run
    update_tree(&root, DT);

    assert_eq!(status.get(), GameStatus::Playing);
    assert_eq!(score.get(), Score(0));

    let frame = render(&root);
    assert_eq!(count_cells_with_bg(&frame, Rgba::GREEN), 0, "no stale pipes");
    assert!(count_cells_with_bg(&frame, Rgba::YELLOW) > 0);
}
