//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed per-frame step only
//! - Seeded RNG only
//! - Stable iteration order (row-major bricks)
//! - Timestamps supplied by the host
//! - No rendering or platform dependencies

pub mod autoplay;
pub mod collision;
pub mod geometry;
pub mod predict;
pub mod state;
pub mod tick;

pub use autoplay::{aim_ball_at_brick, paddle_target_x};
pub use collision::{Arena, Body, CollisionResult, Contacts, resolve_contacts};
pub use geometry::{Circle, Rect, reflect};
pub use predict::{PredictParams, predict_landing_x, predict_trajectory};
pub use state::{
    Ball, BallState, Brick, BrickBreak, BrickGrid, GameEvent, GamePhase, GameState, Paddle,
};
pub use tick::{TickInput, tick};
