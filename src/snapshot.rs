//! Read-only view of one frame for renderers
//!
//! Captured after [`crate::sim::tick`]; serializes to JSON so hosts in any
//! language can draw it.

use glam::Vec2;
use serde::Serialize;

use crate::sim::{BallState, Circle, GamePhase, GameState, Paddle, Rect, predict_trajectory};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BallView {
    pub x: f32,
    pub y: f32,
    /// Drawn radius, including any power-up scale
    pub radius: f32,
    pub scale: f32,
    pub attached: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrickView {
    pub index: usize,
    pub rect: Rect,
    pub destroyed: bool,
    pub special: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaddleView {
    #[serde(flatten)]
    pub paddle: Paddle,
    pub legs: [Rect; 2],
    pub bowl: Circle,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub round: u32,
    pub phase: GamePhase,
    pub autoplay: bool,
    pub ball: BallView,
    /// Every brick, row-major
    pub bricks: Vec<BrickView>,
    pub paddle: PaddleView,
    /// Predicted path ahead of a free ball (empty while attached)
    pub trajectory: Vec<Vec2>,
    pub remaining: usize,
}

impl FrameSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let ball = &state.ball;
        let trajectory = if ball.state == BallState::Free {
            predict_trajectory(
                &ball.body(),
                &state.grid.bricks,
                &state.paddle,
                state.settings.window_width,
                state.settings.window_height,
                state.trail_params(),
                state.settings.trail_delay_secs,
            )
        } else {
            Vec::new()
        };

        let bricks = state
            .grid
            .bricks
            .iter()
            .enumerate()
            .map(|(index, b)| BrickView {
                index,
                rect: b.rect,
                destroyed: b.destroyed,
                special: b.special,
            })
            .collect();

        Self {
            frame: state.frame,
            round: state.round,
            phase: state.phase,
            autoplay: state.autoplay,
            ball: BallView {
                x: ball.pos.x,
                y: ball.pos.y,
                radius: ball.effective_radius(),
                scale: ball.scale,
                attached: ball.state == BallState::Attached,
            },
            bricks,
            paddle: PaddleView {
                paddle: state.paddle,
                legs: state.paddle.legs(),
                bowl: state.paddle.bowl(),
            },
            trajectory,
            remaining: state.remaining(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
