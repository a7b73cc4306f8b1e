//! Per-frame simulation step
//!
//! Advances the game by one frame: paddle smoothing, launch, boost, power-up
//! expiry, integration, collisions and round bookkeeping.

use glam::Vec2;
use rand::Rng;

use super::autoplay::{aim_ball_at_brick, paddle_target_x};
use super::collision::{Arena, resolve_contacts};
use super::state::{BallState, GameEvent, GamePhase, GameState};

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer x (the paddle centers on it)
    pub pointer_x: Option<f32>,
    /// Boost key held
    pub boost: bool,
    /// Launch requested (attached ball, or a new round after a clear)
    pub launch: bool,
    /// Toggle autoplay
    pub toggle_autoplay: bool,
    /// Frame timestamp in milliseconds, for power-up expiry
    pub now_ms: u64,
}

/// Advance the game state by one frame and return what happened
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    state.frame += 1;

    if input.toggle_autoplay {
        state.autoplay = !state.autoplay;
        log::info!(
            "Autoplay {}",
            if state.autoplay { "enabled" } else { "disabled" }
        );
        events.push(GameEvent::AutoplayToggled {
            enabled: state.autoplay,
        });
    }

    update_paddle(state, input);

    match state.phase {
        GamePhase::Serve => {
            if input.launch {
                launch_ball(state, &mut events);
                step_ball(state, input, &mut events);
            } else {
                state.ball.attach_to(&state.paddle);
            }
        }
        GamePhase::Playing => step_ball(state, input, &mut events),
        GamePhase::Cleared => {
            if input.launch {
                state.reset_round();
                events.push(GameEvent::RoundReset);
            } else {
                step_ball(state, input, &mut events);
            }
        }
    }

    events
}

/// Steer the rendered paddle toward the pointer, or the predicted landing in autoplay
fn update_paddle(state: &mut GameState, input: &TickInput) {
    if let Some(pointer_x) = input.pointer_x {
        state.pointer_target_x = pointer_x - state.paddle.width / 2.0;
    }

    let mut target = state.pointer_target_x;
    if state.autoplay
        && let Some(predicted) = paddle_target_x(state)
    {
        target = predicted;
    }

    let settings = &state.settings;
    state.paddle.move_toward(
        target,
        settings.paddle_max_step,
        settings.paddle_lerp,
        settings.window_width,
    );
}

/// Release the attached ball up and to a random side
fn launch_ball(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let speed = state.settings.launch_speed;
    let vx = if state.rng().random_bool(0.5) {
        speed
    } else {
        -speed
    };

    state.ball.state = BallState::Free;
    state.ball.vel = Vec2::new(vx, -speed);

    if state.autoplay {
        let mut body = state.ball.body();
        if aim_ball_at_brick(&mut body, &state.grid.bricks, Some(state.paddle.y), None) {
            state.ball.apply_body(&body);
        }
    }

    state.phase = GamePhase::Playing;
    events.push(GameEvent::BallLaunched);
}

/// Move the free ball one frame and resolve everything it touches
fn step_ball(state: &mut GameState, input: &TickInput, events: &mut Vec<GameEvent>) {
    let multiplier = state.settings.boost_multiplier;
    if input.boost && !state.boost_active {
        state.boost_active = true;
        state.ball.vel *= multiplier;
    } else if !input.boost && state.boost_active {
        state.boost_active = false;
        state.ball.vel /= multiplier;
    }

    state.ball.pos += state.ball.vel;
    if state.ball.update_powerups(input.now_ms) {
        events.push(GameEvent::PowerUpExpired);
    }

    let mut body = state.ball.body();
    let arena = Arena {
        width: state.settings.window_width,
        height: state.settings.window_height,
        paddle: Some(&state.paddle),
        bricks: &state.grid.bricks,
    };
    let contacts = resolve_contacts(&mut body, &arena);
    let below_floor = arena.below_floor(&body);

    if contacts.wall {
        events.push(GameEvent::WallHit);
    }

    if contacts.paddle.is_some() {
        events.push(GameEvent::PaddleHit { pos: body.pos });
        if state.autoplay {
            aim_ball_at_brick(&mut body, &state.grid.bricks, Some(state.paddle.y), None);
        }
    }
    state.ball.apply_body(&body);

    if let Some(index) = contacts.brick {
        break_brick(state, index, input.now_ms, events);
    }

    if below_floor {
        if state.autoplay || state.phase == GamePhase::Cleared {
            bounce_off_floor(state);
        } else {
            log::info!("Ball lost in round {}", state.round);
            events.push(GameEvent::BallLost);
            state.reset_round();
            events.push(GameEvent::RoundReset);
            return;
        }
    }

    if state.phase == GamePhase::Playing && state.remaining() == 0 {
        log::info!("Round {} cleared", state.round);
        events.push(GameEvent::RoundCleared);
        if state.autoplay {
            state.phase = GamePhase::Cleared;
        } else {
            state.reset_round();
            events.push(GameEvent::RoundReset);
        }
    }
}

/// Destroy a brick, applying the special-brick blast and ball growth
fn break_brick(state: &mut GameState, index: usize, now_ms: u64, events: &mut Vec<GameEvent>) {
    let Some(broken) = state.grid.destroy(index) else {
        return;
    };

    if broken.special {
        let settings = &state.settings;
        state.ball.apply_temporary_scale(
            settings.special_scale,
            settings.special_duration_ms,
            now_ms,
        );
        log::debug!(
            "Special brick {} cleared {:?}",
            broken.index,
            broken.cleared
        );
        events.push(GameEvent::SpecialBrickDestroyed {
            index: broken.index,
            cleared: broken.cleared,
        });
    } else {
        events.push(GameEvent::BrickDestroyed {
            index: broken.index,
        });
    }
}

/// Autoplay keeps the ball in play by reflecting it off the bottom edge
fn bounce_off_floor(state: &mut GameState) {
    let width = state.settings.window_width;
    let height = state.settings.window_height;
    let fallback = state.settings.launch_speed;
    let ball = &mut state.ball;
    let r = ball.effective_radius();

    ball.pos.y = height - r - 1.0;
    ball.vel.y = if ball.vel.y != 0.0 {
        -ball.vel.y.abs()
    } else {
        -fallback
    };
    if ball.pos.x < r {
        ball.pos.x = r + 2.0;
    } else if ball.pos.x > width - r {
        ball.pos.x = width - r - 2.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;

    fn new_state() -> GameState {
        GameState::new(Settings::default(), 12345)
    }

    /// Free ball at `pos` with `vel`, and every brick destroyed but `keep`
    fn free_ball(state: &mut GameState, pos: Vec2, vel: Vec2, keep: &[usize]) {
        for (i, brick) in state.grid.bricks.iter_mut().enumerate() {
            brick.destroyed = !keep.contains(&i);
            brick.special = false;
        }
        state.ball.state = BallState::Free;
        state.ball.pos = pos;
        state.ball.vel = vel;
        state.phase = GamePhase::Playing;
    }

    #[test]
    fn test_serve_to_playing() {
        let mut state = new_state();
        assert_eq!(state.phase, GamePhase::Serve);

        let events = tick(&mut state, &TickInput::default());
        assert!(events.is_empty());
        assert_eq!(state.phase, GamePhase::Serve);
        assert_eq!(state.ball.vel, Vec2::ZERO);

        let launch = TickInput {
            launch: true,
            ..Default::default()
        };
        let events = tick(&mut state, &launch);
        assert_eq!(events, vec![GameEvent::BallLaunched]);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.ball.state, BallState::Free);
        assert_eq!(state.ball.vel.y, -5.0);
        assert_eq!(state.ball.vel.x.abs(), 5.0);
    }

    #[test]
    fn test_attached_ball_follows_paddle() {
        let mut state = new_state();
        let input = TickInput {
            pointer_x: Some(100.0),
            ..Default::default()
        };
        for _ in 0..60 {
            tick(&mut state, &input);
        }
        // Target left edge 46, reached after smoothing
        assert!((state.paddle.x - 46.0).abs() < 0.5, "x {}", state.paddle.x);
        assert_eq!(state.ball.pos.x, state.paddle.center_x());
        assert_eq!(state.ball.pos.y, state.paddle.y - state.ball.radius);
    }

    #[test]
    fn test_boost_applies_and_restores() {
        let mut state = new_state();
        free_ball(&mut state, Vec2::new(400.0, 300.0), Vec2::new(1.0, -1.0), &[0]);

        let boost = TickInput {
            boost: true,
            ..Default::default()
        };
        tick(&mut state, &boost);
        assert!(state.boost_active);
        assert_eq!(state.ball.vel, Vec2::new(5.0, -5.0));
        assert_eq!(state.ball.pos, Vec2::new(405.0, 295.0));

        tick(&mut state, &TickInput::default());
        assert!(!state.boost_active);
        assert_eq!(state.ball.vel, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_one_brick_per_frame() {
        let mut state = new_state();
        // Ball box straddles bricks 0, 1, 10 and 11
        let gap_corner = Vec2::new(144.0, 86.0);
        free_ball(&mut state, gap_corner, Vec2::new(0.0, -0.5), &[0, 1, 10, 11, 20]);

        let events = tick(&mut state, &TickInput::default());
        assert_eq!(events, vec![GameEvent::BrickDestroyed { index: 0 }]);
        assert!(state.grid.bricks[0].destroyed);
        assert!(!state.grid.bricks[1].destroyed);
        assert!(!state.grid.bricks[10].destroyed);
        assert!(!state.grid.bricks[11].destroyed);
        assert_eq!(state.remaining(), 4);
    }

    #[test]
    fn test_special_brick_blast_and_growth() {
        let mut state = new_state();
        let center = state.grid.index(2, 5);
        let all: Vec<usize> = (0..50).collect();
        let brick = state.grid.bricks[center].rect;
        free_ball(
            &mut state,
            Vec2::new(brick.center().x, brick.bottom() + 31.0),
            Vec2::new(0.0, -2.0),
            &all,
        );
        state.grid.bricks[center].special = true;

        let input = TickInput {
            now_ms: 10_000,
            ..Default::default()
        };
        let events = tick(&mut state, &input);
        let expected: Vec<usize> = vec![14, 15, 16, 24, 26, 34, 35, 36];
        assert_eq!(
            events,
            vec![GameEvent::SpecialBrickDestroyed {
                index: center,
                cleared: expected.clone(),
            }]
        );
        assert_eq!(state.remaining(), 41);
        assert_eq!(state.ball.scale, 2.0);
        assert_eq!(state.ball.vel, Vec2::new(0.0, 2.0));

        // Scale reverts once the deadline passes
        let later = TickInput {
            now_ms: 11_000,
            ..Default::default()
        };
        let events = tick(&mut state, &later);
        assert!(events.contains(&GameEvent::PowerUpExpired));
        assert_eq!(state.ball.scale, 1.0);
    }

    #[test]
    fn test_ball_lost_resets_round() {
        let mut state = new_state();
        free_ball(&mut state, Vec2::new(50.0, 630.0), Vec2::new(0.0, 5.0), &[3, 4]);
        let round = state.round;

        let events = tick(&mut state, &TickInput::default());
        assert_eq!(events, vec![GameEvent::BallLost, GameEvent::RoundReset]);
        assert_eq!(state.phase, GamePhase::Serve);
        assert_eq!(state.ball.state, BallState::Attached);
        assert_eq!(state.remaining(), 50);
        assert_eq!(state.round, round + 1);
    }

    #[test]
    fn test_autoplay_ball_bounces_off_floor() {
        let mut state = new_state();
        state.autoplay = true;
        free_ball(&mut state, Vec2::new(50.0, 630.0), Vec2::new(0.0, 5.0), &[3, 4]);

        let events = tick(&mut state, &TickInput::default());
        assert!(!events.contains(&GameEvent::BallLost));
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.ball.vel.y, -5.0);
        assert_eq!(state.ball.pos.y, 600.0 - 32.0 - 1.0);
        assert_eq!(state.remaining(), 2);
    }

    #[test]
    fn test_last_brick_manual_resets() {
        let mut state = new_state();
        let last = state.grid.bricks[44].rect;
        free_ball(
            &mut state,
            Vec2::new(last.center().x, last.bottom() + 31.0),
            Vec2::new(0.0, -2.0),
            &[44],
        );
        assert_eq!(state.remaining(), 1);

        let events = tick(&mut state, &TickInput::default());
        assert_eq!(
            events,
            vec![
                GameEvent::BrickDestroyed { index: 44 },
                GameEvent::RoundCleared,
                GameEvent::RoundReset,
            ]
        );
        assert_eq!(state.phase, GamePhase::Serve);
        assert_eq!(state.ball.state, BallState::Attached);
        assert_eq!(state.remaining(), 50);
    }

    #[test]
    fn test_last_brick_autoplay_keeps_flying() {
        let mut state = new_state();
        state.autoplay = true;
        let last = state.grid.bricks[44].rect;
        free_ball(
            &mut state,
            Vec2::new(last.center().x, last.bottom() + 31.0),
            Vec2::new(0.0, -2.0),
            &[44],
        );

        let events = tick(&mut state, &TickInput::default());
        assert_eq!(
            events,
            vec![GameEvent::BrickDestroyed { index: 44 }, GameEvent::RoundCleared]
        );
        assert_eq!(state.phase, GamePhase::Cleared);
        assert_eq!(state.remaining(), 0);
        assert_eq!(state.ball.state, BallState::Free);

        // Falling past the bottom bounces instead of resetting
        state.ball.pos = Vec2::new(700.0, 640.0);
        state.ball.vel = Vec2::new(1.0, 4.0);
        let events = tick(&mut state, &TickInput::default());
        assert!(events.is_empty());
        assert_eq!(state.phase, GamePhase::Cleared);
        assert_eq!(state.ball.vel, Vec2::new(1.0, -4.0));

        // A launch request starts the next round
        let launch = TickInput {
            launch: true,
            ..Default::default()
        };
        let events = tick(&mut state, &launch);
        assert_eq!(events, vec![GameEvent::RoundReset]);
        assert_eq!(state.phase, GamePhase::Serve);
        assert_eq!(state.remaining(), 50);
    }

    #[test]
    fn test_autoplay_steers_paddle_to_landing() {
        let mut state = new_state();
        let input = TickInput {
            toggle_autoplay: true,
            ..Default::default()
        };
        let events = tick(&mut state, &input);
        assert_eq!(events, vec![GameEvent::AutoplayToggled { enabled: true }]);

        free_ball(&mut state, Vec2::new(150.0, 300.0), Vec2::new(0.0, 6.0), &[49]);
        for _ in 0..30 {
            tick(&mut state, &TickInput::default());
        }
        // Landing x 150 -> paddle left edge 96
        assert!((state.paddle.x - 96.0).abs() < 1.0, "x {}", state.paddle.x);
    }

    #[test]
    fn test_paddle_hit_event() {
        let mut state = new_state();
        let [left, _] = state.paddle.legs();
        free_ball(
            &mut state,
            Vec2::new(left.center().x, left.top() - 35.0),
            Vec2::new(0.0, 4.0),
            &[7],
        );
        let events = tick(&mut state, &TickInput::default());
        assert!(matches!(events.as_slice(), [GameEvent::PaddleHit { .. }]));
        assert_eq!(state.ball.vel, Vec2::new(0.0, -4.0));
    }

    #[test]
    fn test_same_inputs_same_outcome() {
        let mut a = GameState::new(Settings::default(), 99);
        let mut b = GameState::new(Settings::default(), 99);
        let inputs = [
            TickInput {
                pointer_x: Some(300.0),
                ..Default::default()
            },
            TickInput {
                launch: true,
                ..Default::default()
            },
            TickInput {
                pointer_x: Some(500.0),
                boost: true,
                ..Default::default()
            },
            TickInput::default(),
        ];
        for _ in 0..50 {
            for input in &inputs {
                assert_eq!(tick(&mut a, input), tick(&mut b, input));
            }
        }
        assert_eq!(a.ball.pos, b.ball.pos);
        assert_eq!(a.paddle.x, b.paddle.x);
        assert_eq!(a.remaining(), b.remaining());
    }

    #[test]
    fn test_destroyed_bricks_do_not_block() {
        let mut state = new_state();
        let brick = state.grid.bricks[0].rect;
        free_ball(
            &mut state,
            Vec2::new(brick.center().x, brick.bottom() + 31.0),
            Vec2::new(0.0, -2.0),
            &[49],
        );
        let events = tick(&mut state, &TickInput::default());
        assert!(events.is_empty());
        assert_eq!(state.ball.vel, Vec2::new(0.0, -2.0));
    }
}
