//! Horseshoe Breakout - brick-breaker simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, collisions, prediction, frame step)
//! - `settings`: Flat key-value game configuration
//! - `audio`: Sound cues derived from simulation events
//! - `snapshot`: Read-only frame view for renderers

pub mod audio;
pub mod settings;
pub mod sim;
pub mod snapshot;

pub use settings::{Settings, SettingsError};
pub use snapshot::FrameSnapshot;

/// Game configuration constants
pub mod consts {
    /// Target frame rate; velocities are expressed in pixels per frame
    pub const FPS: u32 = 60;

    /// Window dimensions
    pub const WINDOW_WIDTH: f32 = 800.0;
    pub const WINDOW_HEIGHT: f32 = 600.0;

    /// Brick wall layout
    pub const ROWS: usize = 5;
    pub const COLS: usize = 10;
    pub const BRICK_WIDTH: f32 = 60.0;
    pub const BRICK_HEIGHT: f32 = 24.0;
    pub const BRICK_GAP: f32 = 4.0;
    pub const BRICK_TOP: f32 = 60.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH_MULTIPLIER: f32 = 1.8;
    pub const PADDLE_Y_OFFSET: f32 = 48.0;
    /// Legs are 18% of the paddle width, never thinner than 8px
    pub const PADDLE_LEG_THICKNESS_RATIO: f32 = 0.18;
    pub const PADDLE_MIN_LEG_THICKNESS: f32 = 8.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 32.0;
    pub const BALL_BOOST_MULTIPLIER: f32 = 5.0;
    /// Launch speed per axis (px/frame)
    pub const LAUNCH_SPEED: f32 = 5.0;

    /// Paddle smoothing
    pub const PADDLE_MAX_STEP: f32 = 18.0;
    pub const PADDLE_LERP: f32 = 0.28;

    /// Special bricks
    pub const SPECIAL_BRICK_COUNT: usize = 5;
    pub const SPECIAL_SCALE: f32 = 2.0;
    pub const SPECIAL_DURATION_MS: u64 = 1000;

    /// Forward simulation
    pub const PREDICT_STRIDE: f32 = 6.0;
    pub const LANDING_MAX_ITERATIONS: u32 = 3000;
    pub const LANDING_MAX_BOUNCES: u32 = 12;
    pub const TRAIL_MAX_ITERATIONS: u32 = 2000;
    pub const TRAIL_MAX_BOUNCES: u32 = 8;
    pub const TRAIL_DELAY_SECS: f32 = 0.5;
}
