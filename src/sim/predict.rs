//! Forward simulation of the ball
//!
//! Re-runs [`resolve_contacts`] on a copied [`Body`] without touching live
//! state. Each macro iteration advances the copy by one frame of velocity in
//! `ceil(speed / stride)` sub-steps and ends early at the first contact, so
//! the step size is recomputed from the reflected velocity.
//!
//! Bricks act as static reflectors here; the copy never destroys them.

use glam::Vec2;

use super::collision::{Arena, Body, resolve_contacts};
use super::state::{Brick, Paddle};

/// Budget for one prediction run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictParams {
    /// Sub-step length in pixels
    pub stride: f32,
    pub max_iterations: u32,
    pub max_bounces: u32,
}

impl PredictParams {
    /// Sub-steps needed to cover one frame of `speed` in `stride`-sized moves
    ///
    /// A non-positive or non-finite stride falls back to one step per frame.
    fn sub_steps(&self, speed: f32) -> u32 {
        if !(self.stride > 0.0 && self.stride.is_finite()) {
            return 1;
        }
        ((speed / self.stride).ceil() as u32).max(1)
    }
}

/// Predict the ball center x when it first descends to paddle height
///
/// The paddle itself is left out of the simulation; only its `y` matters.
/// Returns `None` if the ball is stationary, leaves through the bottom, or
/// the iteration/bounce budget runs out. The result lies within `[0, width]`.
pub fn predict_landing_x(
    start: &Body,
    bricks: &[Brick],
    paddle: &Paddle,
    width: f32,
    height: f32,
    params: PredictParams,
) -> Option<f32> {
    if start.vel == Vec2::ZERO {
        return None;
    }

    let arena = Arena {
        width,
        height,
        paddle: None,
        bricks,
    };
    let mut body = *start;
    let mut bounces = 0;

    for _ in 0..params.max_iterations {
        if bounces > params.max_bounces {
            break;
        }
        let speed = body.speed();
        if speed == 0.0 {
            break;
        }

        let steps = params.sub_steps(speed);
        let delta = body.vel / steps as f32;
        for _ in 0..steps {
            body.pos += delta;
            let contacts = resolve_contacts(&mut body, &arena);

            if body.vel.y > 0.0 && body.pos.y + body.radius >= paddle.y {
                return Some(body.pos.x.clamp(0.0, width));
            }
            if arena.below_floor(&body) {
                return None;
            }
            if contacts.any() {
                bounces += contacts.count();
                break;
            }
        }
    }

    None
}

/// Predict the path of the ball for the visual trail
///
/// Simulates walls, the paddle at its rendered position and bricks, recording
/// the center after every sub-step. The path stops past the bounce cap, the
/// iteration cap, or the bottom edge. Only points beyond `speed * delay_secs`
/// of travelled path length are returned, so the trail starts ahead of the
/// ball.
pub fn predict_trajectory(
    start: &Body,
    bricks: &[Brick],
    paddle: &Paddle,
    width: f32,
    height: f32,
    params: PredictParams,
    delay_secs: f32,
) -> Vec<Vec2> {
    if start.vel == Vec2::ZERO {
        return Vec::new();
    }

    let arena = Arena {
        width,
        height,
        paddle: Some(paddle),
        bricks,
    };
    let mut body = *start;
    let mut points = vec![body.pos];
    let mut bounces = 0;
    let mut iterations = 0;

    'sim: while bounces <= params.max_bounces && iterations < params.max_iterations {
        iterations += 1;
        let speed = body.speed();
        if speed == 0.0 {
            break;
        }

        let steps = params.sub_steps(speed);
        let delta = body.vel / steps as f32;
        for _ in 0..steps {
            body.pos += delta;
            points.push(body.pos);

            let contacts = resolve_contacts(&mut body, &arena);
            if contacts.any() {
                bounces += contacts.count();
                break;
            }
            if arena.below_floor(&body) {
                break 'sim;
            }
        }
    }

    let threshold = start.speed() * delay_secs;
    let mut travelled = 0.0;
    points
        .windows(2)
        .filter_map(|pair| {
            travelled += pair[0].distance(pair[1]);
            (travelled >= threshold).then_some(pair[1])
        })
        .collect()
}
