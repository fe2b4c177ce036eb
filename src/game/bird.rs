//! The bird: flap input, gravity, and the shared collision rect.

use crate::deps;
use crate::engine::{Node, NodePtr, State};
use crate::types::{Cell, Rect, Rgba};

use super::{
    BIRD_HEIGHT, BIRD_WIDTH, BIRD_X_POSITION, FLAP_VELOCITY, GRAVITY, GameStatus, WORLD_HEIGHT,
    flap_requested,
};

fn bird_rect_at(y_pos: f32) -> Rect {
    Rect::new(
        BIRD_X_POSITION - BIRD_WIDTH / 2.0,
        y_pos - BIRD_HEIGHT / 2.0,
        BIRD_WIDTH,
        BIRD_HEIGHT,
    )
}

/// Build the bird node.
///
/// `status` drives the physics (active only while playing, reset otherwise)
/// and is flipped to `GameOver` when the bird leaves the world vertically.
/// `bird_rect` is written every physics step so the pipe manager can collide
/// against it.
pub fn bird(status: State<GameStatus>, bird_rect: State<Rect>) -> NodePtr {
    let node = Node::new();

    let y_pos = node.state(WORLD_HEIGHT / 2.0);
    let y_vel = node.state(0.0f32);

    let status_for_event = status.clone();
    let vel_for_event = y_vel.clone();
    node.on_event(move |event| {
        if flap_requested(event) && status_for_event.get() == GameStatus::Playing {
            vel_for_event.set(FLAP_VELOCITY);
        }
    });

    // Snap back to the resting pose whenever a run ends or the menu shows.
    let status_for_reset = status.clone();
    let pos_for_reset = y_pos.clone();
    let vel_for_reset = y_vel.clone();
    let rect_for_reset = bird_rect.clone();
    node.effect(
        move || match status_for_reset.get() {
            GameStatus::MainMenu | GameStatus::GameOver => {
                pos_for_reset.set(WORLD_HEIGHT / 2.0);
                vel_for_reset.set(0.0);
                rect_for_reset.set(bird_rect_at(WORLD_HEIGHT / 2.0));
            }
            GameStatus::Playing => {}
        },
        deps![status],
    );

    let pos_for_update = y_pos.clone();
    let vel_for_update = y_vel.clone();
    node.update(move |dt| {
        if status.get() != GameStatus::Playing {
            return;
        }
        let dt = dt as f32;

        let mut vel = vel_for_update.get();
        let mut pos = pos_for_update.get();
        vel += GRAVITY * dt;
        pos += vel * dt;
        vel_for_update.set(vel);
        pos_for_update.set(pos);

        bird_rect.set(bird_rect_at(pos));

        if pos + BIRD_HEIGHT / 2.0 > WORLD_HEIGHT || pos - BIRD_HEIGHT / 2.0 < 0.0 {
            status.set(GameStatus::GameOver);
        }
    });

    node.render(move |frame| {
        let rect = bird_rect_at(y_pos.get());
        frame.fill_rect(
            rect.x.round() as i32,
            rect.y.round() as i32,
            rect.w as i32,
            rect.h as i32,
            Cell::blank(Rgba::YELLOW),
        );
    });

    node
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::*;
    use crate::engine::{Event, event_tree, update_tree};

    struct Fixture {
        node: NodePtr,
        status: State<GameStatus>,
        rect: State<Rect>,
    }

    fn fixture(status: GameStatus) -> Fixture {
        let owner = Node::new();
        let status = owner.state(status);
        let rect = owner.state(bird_rect_at(WORLD_HEIGHT / 2.0));
        let node = bird(status.clone(), rect.clone());
        Fixture { node, status, rect }
    }

    fn flap() -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE))
    }

    #[test]
    fn gravity_pulls_the_bird_down_while_playing() {
        let f = fixture(GameStatus::Playing);
        let start_y = f.rect.get().y;
        for _ in 0..5 {
            update_tree(&f.node, 0.016);
        }
        assert!(f.rect.get().y > start_y, "bird must fall under gravity");
    }

    #[test]
    fn physics_is_frozen_outside_playing() {
        let f = fixture(GameStatus::MainMenu);
        let start = f.rect.get();
        for _ in 0..5 {
            update_tree(&f.node, 0.016);
        }
        assert_eq!(f.rect.get(), start);
    }

    #[test]
    fn flap_sends_the_bird_upward() {
        let f = fixture(GameStatus::Playing);
        let start_y = f.rect.get().y;

        event_tree(&f.node, &flap());
        update_tree(&f.node, 0.016);

        assert!(f.rect.get().y < start_y, "flap must move the bird up");
    }

    #[test]
    fn flap_is_ignored_on_the_menu() {
        let f = fixture(GameStatus::MainMenu);
        event_tree(&f.node, &flap());
        update_tree(&f.node, 0.016);
        assert_eq!(f.rect.get().y, bird_rect_at(WORLD_HEIGHT / 2.0).y);
    }

    #[test]
    fn leaving_the_world_ends_the_run() {
        let f = fixture(GameStatus::Playing);
        for _ in 0..100 {
            update_tree(&f.node, 0.05);
            if f.status.get() == GameStatus::GameOver {
                break;
            }
        }
        assert_eq!(f.status.get(), GameStatus::GameOver);
    }

    #[test]
    fn menu_status_resets_the_pose() {
        let f = fixture(GameStatus::Playing);
        for _ in 0..10 {
            update_tree(&f.node, 0.05);
        }
        assert_ne!(f.rect.get(), bird_rect_at(WORLD_HEIGHT / 2.0));

        f.status.set(GameStatus::MainMenu);
        update_tree(&f.node, 0.016);
        assert_eq!(f.rect.get(), bird_rect_at(WORLD_HEIGHT / 2.0));
    }
}
