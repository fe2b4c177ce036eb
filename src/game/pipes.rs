//! Pipe pairs and the manager that spawns, scrolls and retires them.
//!
//! Each pipe pair is its own node holding a [`PipeData`] cell; the manager
//! keeps them as children, so the render walk draws them for free. The
//! manager reaches into each pair's cell by typed slot lookup to scroll it
//! and run collision and scoring against the bird rect.

use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::deps;
use crate::engine::{Node, NodePtr, Prop, State};
use crate::types::{Cell, Rect, Rgba};

use super::{
    GameStatus, MAX_PIPE_HEIGHT_OFFSET, MIN_PIPE_HEIGHT, PIPE_GAP_HEIGHT, PIPE_SPAWN_INTERVAL,
    PIPE_SPEED, PIPE_WIDTH, Score, WORLD_HEIGHT, WORLD_WIDTH,
};

/// Per-pair state: center x, where the gap starts, and the two solid rects.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PipeData {
    x: f32,
    gap_top: f32,
    scored: bool,
    top: Rect,
    bottom: Rect,
}

fn pipe_pair(initial_x: f32, gap_top: f32) -> NodePtr {
    let node = Node::new();
    let data = node.state(PipeData {
        x: initial_x,
        gap_top,
        scored: false,
        top: Rect::new(initial_x - PIPE_WIDTH / 2.0, 0.0, PIPE_WIDTH, gap_top),
        bottom: Rect::new(
            initial_x - PIPE_WIDTH / 2.0,
            gap_top + PIPE_GAP_HEIGHT,
            PIPE_WIDTH,
            WORLD_HEIGHT - (gap_top + PIPE_GAP_HEIGHT),
        ),
    });

    node.render(move |frame| {
        let data = data.get();
        for rect in [data.top, data.bottom] {
            frame.fill_rect(
                rect.x.round() as i32,
                rect.y.round() as i32,
                rect.w.round() as i32,
                rect.h.round() as i32,
                Cell::blank(Rgba::GREEN),
            );
        }
    });

    node
}

/// Build the pipe manager node.
///
/// While playing it spawns a pair every [`PIPE_SPAWN_INTERVAL`] seconds at a
/// random gap height, scrolls them left, flips `status` to `GameOver` on
/// contact with `bird_rect`, and counts a point the moment a pair's center
/// passes the bird. Leaving the playing state clears every pipe.
pub fn pipes(status: State<GameStatus>, bird_rect: Prop<Rect>, score: State<Score>) -> NodePtr {
    let node = Node::new();
    let spawn_timer = node.state(PIPE_SPAWN_INTERVAL);

    let node_for_clear = Rc::downgrade(&node);
    let status_for_clear = status.clone();
    let timer_for_clear = spawn_timer.clone();
    node.effect(
        move || {
            if status_for_clear.get() != GameStatus::Playing {
                if let Some(node) = node_for_clear.upgrade() {
                    node.set_children(Vec::new());
                }
                timer_for_clear.set(PIPE_SPAWN_INTERVAL);
            }
        },
        deps![status],
    );

    let node_for_update = Rc::downgrade(&node);
    let mut rng = StdRng::from_entropy();
    node.update(move |dt| {
        if status.get() != GameStatus::Playing {
            return;
        }
        let Some(node) = node_for_update.upgrade() else {
            return;
        };
        let dt = dt as f32;

        let mut timer = spawn_timer.get() - dt;
        if timer <= 0.0 {
            let gap_top = MIN_PIPE_HEIGHT + rng.gen_range(0..=MAX_PIPE_HEIGHT_OFFSET) as f32;
            node.add_child(&pipe_pair(WORLD_WIDTH + PIPE_WIDTH / 2.0, gap_top));
            timer = PIPE_SPAWN_INTERVAL;
        }
        spawn_timer.set(timer);

        let current_bird = bird_rect.get();
        for pipe in node.children() {
            let Some(cell) = pipe.state_slot::<PipeData>() else {
                continue;
            };
            let mut data = cell.get();
            data.x -= PIPE_SPEED * dt;
            data.top.x = data.x - PIPE_WIDTH / 2.0;
            data.bottom.x = data.x - PIPE_WIDTH / 2.0;

            if current_bird.intersects(&data.top) || current_bird.intersects(&data.bottom) {
                status.set(GameStatus::GameOver);
            }
            if !data.scored && data.x < current_bird.x {
                data.scored = true;
                score.set(Score(score.get().0 + 1));
            }
            cell.set(data);
        }

        // The leftmost pair is always the oldest; retire it once fully gone.
        let children = node.children();
        if let Some(front) = children.first() {
            if let Some(cell) = front.state_slot::<PipeData>() {
                if cell.get().x < -PIPE_WIDTH {
                    node.remove_child(front);
                }
            }
        }
    });

    node
}
