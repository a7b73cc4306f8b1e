//! Autoplay: paddle steering and ball aiming

use super::collision::Body;
use super::predict::predict_landing_x;
use super::state::{BallState, Brick, GameState};

/// Speed used to aim a ball that is (almost) stationary
pub const AIM_FALLBACK_SPEED: f32 = 6.0;

/// Point the ball at the nearest intact brick
///
/// With `prefer_above_y`, bricks whose center is above that line are chosen
/// first; if only lower bricks remain the ball is still sent upward. The
/// current speed is kept unless `speed` overrides it. Returns false when no
/// brick is available or the ball sits on the target center.
pub fn aim_ball_at_brick(
    body: &mut Body,
    bricks: &[Brick],
    prefer_above_y: Option<f32>,
    speed: Option<f32>,
) -> bool {
    let intact = || bricks.iter().filter(|b| !b.destroyed);
    let above_exists = prefer_above_y
        .is_some_and(|limit| intact().any(|b| b.rect.center().y < limit));

    let target = intact()
        .filter(|b| match prefer_above_y {
            Some(limit) if above_exists => b.rect.center().y < limit,
            _ => true,
        })
        .map(|b| b.rect.center())
        .min_by(|a, b| a.distance(body.pos).total_cmp(&b.distance(body.pos)));
    let Some(target) = target else {
        return false;
    };

    let mut dir = target - body.pos;
    if let Some(limit) = prefer_above_y
        && target.y >= limit
    {
        dir.y = dir.y.min(-dir.y.abs() - 1.0);
    }

    let mag = dir.length();
    if mag == 0.0 {
        return false;
    }

    let speed = speed.unwrap_or_else(|| {
        let current = body.speed();
        if current <= 0.001 {
            AIM_FALLBACK_SPEED
        } else {
            current
        }
    });
    body.vel = dir / mag * speed;
    true
}

/// Paddle left-edge target that centers the paddle under the predicted landing
///
/// `None` while the ball is attached or when no landing can be predicted.
pub fn paddle_target_x(state: &GameState) -> Option<f32> {
    if state.ball.state != BallState::Free {
        return None;
    }

    let landing = predict_landing_x(
        &state.ball.body(),
        &state.grid.bricks,
        &state.paddle,
        state.settings.window_width,
        state.settings.window_height,
        state.landing_params(),
    )?;
    Some(landing - state.paddle.width / 2.0)
}
