//! Game state and core simulation types
//!
//! Everything the frame step reads or mutates lives in [`GameState`]; the host
//! owns it and passes it to [`super::tick`] once per frame.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Body;
use super::geometry::{Circle, Rect};
use super::predict::PredictParams;
use crate::Settings;
use crate::consts::{PADDLE_LEG_THICKNESS_RATIO, PADDLE_MIN_LEG_THICKNESS};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball attached to paddle, waiting for launch input
    Serve,
    /// Active gameplay
    Playing,
    /// Every brick destroyed while autoplay kept the ball in flight
    Cleared,
}

/// Ball state - attached to paddle or free-moving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallState {
    Attached,
    Free,
}

/// The ball
#[derive(Debug, Clone)]
pub struct Ball {
    /// Center position
    pub pos: Vec2,
    /// Velocity in pixels per frame
    pub vel: Vec2,
    /// Base radius
    pub radius: f32,
    /// Temporary radius multiplier (1.0 when no power-up is active)
    pub scale: f32,
    /// Timestamp (ms) at which `scale` reverts to 1.0
    pub scale_deadline_ms: Option<u64>,
    pub state: BallState,
}

impl Ball {
    pub fn new(radius: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius,
            scale: 1.0,
            scale_deadline_ms: None,
            state: BallState::Attached,
        }
    }

    /// Radius used for collisions, including any power-up scale
    #[inline]
    pub fn effective_radius(&self) -> f32 {
        self.radius * self.scale
    }

    /// Bounding box of the ball
    pub fn bounds(&self) -> Rect {
        Rect::around_circle(self.pos, self.effective_radius())
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Copy of the kinematic state for collision resolution
    pub fn body(&self) -> Body {
        Body {
            pos: self.pos,
            vel: self.vel,
            radius: self.effective_radius(),
        }
    }

    /// Write back position and velocity from a resolved body
    pub fn apply_body(&mut self, body: &Body) {
        self.pos = body.pos;
        self.vel = body.vel;
    }

    /// Rest the ball on top of the paddle, centered
    pub fn attach_to(&mut self, paddle: &Paddle) {
        self.state = BallState::Attached;
        self.pos = Vec2::new(paddle.center_x(), paddle.y - self.radius);
        self.vel = Vec2::ZERO;
    }

    /// Enlarge the ball until `now_ms + duration_ms`
    ///
    /// Non-positive scales are rejected so the collision radius stays positive.
    pub fn apply_temporary_scale(&mut self, scale: f32, duration_ms: u64, now_ms: u64) -> bool {
        if !(scale > 0.0 && scale.is_finite()) {
            log::warn!("Ignoring ball scale {scale}");
            return false;
        }
        self.scale = scale;
        self.scale_deadline_ms = Some(now_ms.saturating_add(duration_ms));
        true
    }

    /// Revert an expired power-up; returns true if one expired this call
    pub fn update_powerups(&mut self, now_ms: u64) -> bool {
        match self.scale_deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.scale = 1.0;
                self.scale_deadline_ms = None;
                true
            }
            _ => false,
        }
    }
}

/// The horseshoe paddle: two legs joined by a bowl circle, open end facing up
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Rendered (smoothed) left edge
    pub x: f32,
    /// Top edge of the legs
    pub y: f32,
    /// Outer width (bowl diameter)
    pub width: f32,
    /// Height of the legs above the bowl
    pub leg_height: f32,
}

impl Paddle {
    pub fn new(x: f32, y: f32, width: f32, leg_height: f32) -> Self {
        Self {
            x,
            y,
            width,
            leg_height,
        }
    }

    /// Paddle centered horizontally in a field
    pub fn from_settings(settings: &Settings) -> Self {
        let width = settings.paddle_width();
        let x = ((settings.window_width - width) / 2.0).floor();
        Self::new(x, settings.paddle_y(), width, settings.leg_height())
    }

    #[inline]
    pub fn outer_radius(&self) -> f32 {
        self.width / 2.0
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Leg thickness: 18% of the width, at least 8px
    pub fn leg_thickness(&self) -> f32 {
        (self.width * PADDLE_LEG_THICKNESS_RATIO)
            .floor()
            .max(PADDLE_MIN_LEG_THICKNESS)
    }

    /// Left and right leg rectangles, from the top edge down to the bowl center
    pub fn legs(&self) -> [Rect; 2] {
        let thickness = self.leg_thickness();
        let height = self.leg_height + self.outer_radius();
        [
            Rect::new(self.x, self.y, thickness, height),
            Rect::new(self.x + self.width - thickness, self.y, thickness, height),
        ]
    }

    /// Bowl circle joining the legs
    pub fn bowl(&self) -> Circle {
        Circle::new(
            Vec2::new(self.center_x(), self.y + self.leg_height + self.outer_radius()),
            self.outer_radius(),
        )
    }

    /// Move the rendered position toward `target_x`
    ///
    /// Far targets are approached at `max_step` per frame; within that
    /// distance the gap closes by `lerp` of itself. Both the target and the
    /// result stay inside `[0, field_width - width]`.
    pub fn move_toward(&mut self, target_x: f32, max_step: f32, lerp: f32, field_width: f32) {
        let max_x = (field_width - self.width).max(0.0);
        let target = target_x.clamp(0.0, max_x);

        let delta = target - self.x;
        if delta.abs() > max_step {
            self.x += max_step.copysign(delta);
        } else {
            self.x += delta * lerp;
        }

        self.x = self.x.clamp(0.0, max_x);
    }
}

/// A brick in the wall
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub rect: Rect,
    pub destroyed: bool,
    /// Special bricks clear their neighbours and enlarge the ball
    pub special: bool,
}

impl Brick {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            destroyed: false,
            special: false,
        }
    }
}

/// Outcome of destroying one brick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrickBreak {
    pub index: usize,
    pub special: bool,
    /// Neighbours destroyed by a special brick (excludes `index`)
    pub cleared: Vec<usize>,
}

/// Fixed rows x cols brick wall, stored row-major
#[derive(Debug, Clone)]
pub struct BrickGrid {
    pub rows: usize,
    pub cols: usize,
    pub bricks: Vec<Brick>,
}

impl BrickGrid {
    /// Lay out a wall centered horizontally, starting at `brick_top`
    pub fn from_settings(settings: &Settings) -> Self {
        let cols = settings.cols;
        let total_width =
            cols as f32 * settings.brick_width + (cols as f32 - 1.0) * settings.brick_gap;
        let x_offset = ((settings.window_width - total_width) / 2.0).floor();

        let mut bricks = Vec::with_capacity(settings.rows * cols);
        for row in 0..settings.rows {
            for col in 0..cols {
                let x = x_offset + col as f32 * (settings.brick_width + settings.brick_gap);
                let y =
                    settings.brick_top + row as f32 * (settings.brick_height + settings.brick_gap);
                bricks.push(Brick::new(Rect::new(
                    x,
                    y,
                    settings.brick_width,
                    settings.brick_height,
                )));
            }
        }

        Self {
            rows: settings.rows,
            cols,
            bricks,
        }
    }

    pub fn remaining(&self) -> usize {
        self.bricks.iter().filter(|b| !b.destroyed).count()
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    #[inline]
    pub fn row_col(&self, index: usize) -> (usize, usize) {
        (index / self.cols, index % self.cols)
    }

    /// Indices of the 3x3 block around `index`, clipped to the grid
    pub fn neighborhood(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        let (row, col) = self.row_col(index);
        let rows = row.saturating_sub(1)..=(row + 1).min(self.rows - 1);
        rows.flat_map(move |r| {
            (col.saturating_sub(1)..=(col + 1).min(self.cols - 1)).map(move |c| self.index(r, c))
        })
    }

    /// Destroy the brick at `index`
    ///
    /// A special brick also destroys every intact brick in its neighbourhood.
    /// Returns `None` when the brick was already destroyed.
    pub fn destroy(&mut self, index: usize) -> Option<BrickBreak> {
        let brick = self.bricks.get_mut(index)?;
        if brick.destroyed {
            return None;
        }
        brick.destroyed = true;
        let special = brick.special;

        let mut cleared = Vec::new();
        if special {
            let neighbours: Vec<usize> = self.neighborhood(index).collect();
            for n in neighbours {
                let brick = &mut self.bricks[n];
                if !brick.destroyed {
                    brick.destroyed = true;
                    cleared.push(n);
                }
            }
        }

        Some(BrickBreak {
            index,
            special,
            cleared,
        })
    }

    /// Restore every brick and re-roll which ones are special
    pub fn reset(&mut self, rng: &mut Pcg32, special_count: usize) {
        for brick in &mut self.bricks {
            brick.destroyed = false;
        }
        self.assign_specials(rng, special_count);
    }

    /// Mark `count` random intact bricks as special (clearing previous marks)
    pub fn assign_specials(&mut self, rng: &mut Pcg32, count: usize) {
        for brick in &mut self.bricks {
            brick.special = false;
        }

        let available: Vec<usize> = self
            .bricks
            .iter()
            .enumerate()
            .filter(|(_, b)| !b.destroyed)
            .map(|(i, _)| i)
            .collect();
        let count = count.min(available.len());
        if count == 0 {
            return;
        }

        let chosen = rand::seq::index::sample(rng, available.len(), count);
        for i in chosen.iter() {
            self.bricks[available[i]].special = true;
        }

        log::debug!(
            "Special bricks: {:?}",
            chosen.iter().map(|i| available[i]).collect::<Vec<_>>()
        );
    }
}

/// Discrete notifications produced by a frame step
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    BallLaunched,
    WallHit,
    PaddleHit { pos: Vec2 },
    BrickDestroyed { index: usize },
    SpecialBrickDestroyed { index: usize, cleared: Vec<usize> },
    PowerUpExpired,
    /// Ball fell past the bottom edge in manual mode
    BallLost,
    /// Last brick destroyed
    RoundCleared,
    /// Bricks restored and ball re-attached
    RoundReset,
    AutoplayToggled { enabled: bool },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    /// Seed the RNG was created from
    pub seed: u64,
    rng: Pcg32,
    pub phase: GamePhase,
    pub ball: Ball,
    pub paddle: Paddle,
    pub grid: BrickGrid,
    /// Paddle left-edge target from the last pointer input
    pub pointer_target_x: f32,
    /// Autoplay steers the paddle from the landing prediction
    pub autoplay: bool,
    /// Boost multiplier currently applied to the ball velocity
    pub boost_active: bool,
    /// Rounds started (1-based)
    pub round: u32,
    /// Frame counter
    pub frame: u64,
}

impl GameState {
    /// Create a new game with the given settings and seed
    pub fn new(settings: Settings, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let paddle = Paddle::from_settings(&settings);
        let mut grid = BrickGrid::from_settings(&settings);
        grid.assign_specials(&mut rng, settings.special_brick_count);

        let mut ball = Ball::new(settings.ball_radius);
        ball.attach_to(&paddle);

        Self {
            pointer_target_x: paddle.x,
            settings,
            seed,
            rng,
            phase: GamePhase::Serve,
            ball,
            paddle,
            grid,
            autoplay: false,
            boost_active: false,
            round: 1,
            frame: 0,
        }
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub fn remaining(&self) -> usize {
        self.grid.remaining()
    }

    /// Restore the wall, re-roll specials and re-attach the ball
    pub fn reset_round(&mut self) {
        self.grid
            .reset(&mut self.rng, self.settings.special_brick_count);
        self.ball.attach_to(&self.paddle);
        self.boost_active = false;
        self.phase = GamePhase::Serve;
        self.round += 1;
        log::info!("Round {} ready ({} bricks)", self.round, self.grid.bricks.len());
    }

    /// Simulation limits for the autoplay landing prediction
    pub fn landing_params(&self) -> PredictParams {
        PredictParams {
            stride: self.settings.predict_stride,
            max_iterations: self.settings.landing_max_iterations,
            max_bounces: self.settings.landing_max_bounces,
        }
    }

    /// Simulation limits for the visual trail
    pub fn trail_params(&self) -> PredictParams {
        PredictParams {
            stride: self.settings.predict_stride,
            max_iterations: self.settings.trail_max_iterations,
            max_bounces: self.settings.trail_max_bounces,
        }
    }
}
