//! Game configuration
//!
//! Flat key-value settings loaded once at startup. Every key is optional in
//! the JSON file; missing keys take the built-in defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Settings loading/validation error
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Settings file could not be read
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings file is not valid JSON for this schema
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is outside its allowed range
    #[error("invalid setting `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Window ===
    pub window_width: f32,
    pub window_height: f32,

    // === Brick wall ===
    pub rows: usize,
    pub cols: usize,
    pub brick_width: f32,
    pub brick_height: f32,
    pub brick_gap: f32,
    /// Y of the first brick row
    pub brick_top: f32,

    // === Paddle ===
    /// Paddle width as a multiple of the brick width
    pub paddle_width_multiplier: f32,
    /// Distance from the window bottom to the paddle top
    pub paddle_y_offset: f32,
    /// Leg height; derived from the paddle width when absent
    pub paddle_leg_height: Option<f32>,
    /// Max rendered-x movement per frame while far from the target
    pub paddle_max_step: f32,
    /// Interpolation factor once within `paddle_max_step` of the target
    pub paddle_lerp: f32,

    // === Ball ===
    pub ball_radius: f32,
    pub boost_multiplier: f32,
    pub launch_speed: f32,

    // === Special bricks ===
    pub special_brick_count: usize,
    pub special_scale: f32,
    pub special_duration_ms: u64,

    // === Prediction ===
    /// Sub-step stride in pixels
    pub predict_stride: f32,
    pub landing_max_iterations: u32,
    pub landing_max_bounces: u32,
    pub trail_max_iterations: u32,
    pub trail_max_bounces: u32,
    pub trail_delay_secs: f32,

    // === Audio cues ===
    pub bell_volume: f32,
    pub explosion_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,

            rows: ROWS,
            cols: COLS,
            brick_width: BRICK_WIDTH,
            brick_height: BRICK_HEIGHT,
            brick_gap: BRICK_GAP,
            brick_top: BRICK_TOP,

            paddle_width_multiplier: PADDLE_WIDTH_MULTIPLIER,
            paddle_y_offset: PADDLE_Y_OFFSET,
            paddle_leg_height: None,
            paddle_max_step: PADDLE_MAX_STEP,
            paddle_lerp: PADDLE_LERP,

            ball_radius: BALL_RADIUS,
            boost_multiplier: BALL_BOOST_MULTIPLIER,
            launch_speed: LAUNCH_SPEED,

            special_brick_count: SPECIAL_BRICK_COUNT,
            special_scale: SPECIAL_SCALE,
            special_duration_ms: SPECIAL_DURATION_MS,

            predict_stride: PREDICT_STRIDE,
            landing_max_iterations: LANDING_MAX_ITERATIONS,
            landing_max_bounces: LANDING_MAX_BOUNCES,
            trail_max_iterations: TRAIL_MAX_ITERATIONS,
            trail_max_bounces: TRAIL_MAX_BOUNCES,
            trail_delay_secs: TRAIL_DELAY_SECS,

            bell_volume: 0.6,
            explosion_volume: 0.7,
        }
    }
}

impl Settings {
    /// Paddle width in pixels (whole pixels, like the brick grid)
    pub fn paddle_width(&self) -> f32 {
        (self.brick_width * self.paddle_width_multiplier).floor()
    }

    /// Paddle leg height, defaulting to a quarter of the width (min 8px)
    pub fn leg_height(&self) -> f32 {
        self.paddle_leg_height
            .unwrap_or_else(|| (self.paddle_width() / 4.0).floor().max(8.0))
    }

    /// Y of the paddle top edge
    pub fn paddle_y(&self) -> f32 {
        self.window_height - self.paddle_y_offset
    }

    /// Parse settings from a JSON string and validate them
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings if a path is given, falling back to defaults on any error
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };

        match Self::load(path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("{err}; using default settings");
                Self::default()
            }
        }
    }

    /// Check every value the simulation relies on
    pub fn validate(&self) -> Result<(), SettingsError> {
        fn positive(key: &'static str, value: f32) -> Result<(), SettingsError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(SettingsError::Invalid {
                    key,
                    reason: format!("must be a positive number, got {value}"),
                })
            }
        }

        positive("window_width", self.window_width)?;
        positive("window_height", self.window_height)?;
        positive("brick_width", self.brick_width)?;
        positive("brick_height", self.brick_height)?;
        positive("paddle_width_multiplier", self.paddle_width_multiplier)?;
        positive("ball_radius", self.ball_radius)?;
        positive("boost_multiplier", self.boost_multiplier)?;
        positive("launch_speed", self.launch_speed)?;
        positive("special_scale", self.special_scale)?;
        positive("predict_stride", self.predict_stride)?;
        positive("paddle_max_step", self.paddle_max_step)?;

        if self.rows == 0 || self.cols == 0 {
            return Err(SettingsError::Invalid {
                key: "rows/cols",
                reason: "brick grid needs at least one row and one column".into(),
            });
        }
        if self.brick_gap < 0.0 {
            return Err(SettingsError::Invalid {
                key: "brick_gap",
                reason: format!("must not be negative, got {}", self.brick_gap),
            });
        }
        if !(self.paddle_lerp > 0.0 && self.paddle_lerp <= 1.0) {
            return Err(SettingsError::Invalid {
                key: "paddle_lerp",
                reason: format!("must be in (0, 1], got {}", self.paddle_lerp),
            });
        }
        if self.paddle_width() >= self.window_width {
            return Err(SettingsError::Invalid {
                key: "paddle_width_multiplier",
                reason: format!(
                    "paddle width {} does not fit in window width {}",
                    self.paddle_width(),
                    self.window_width
                ),
            });
        }
        if let Some(leg) = self.paddle_leg_height
            && leg < 0.0
        {
            return Err(SettingsError::Invalid {
                key: "paddle_leg_height",
                reason: format!("must not be negative, got {leg}"),
            });
        }
        if self.trail_delay_secs < 0.0 {
            return Err(SettingsError::Invalid {
                key: "trail_delay_secs",
                reason: format!("must not be negative, got {}", self.trail_delay_secs),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.paddle_width(), 108.0);
        assert_eq!(settings.leg_height(), 27.0);
        assert_eq!(settings.paddle_y(), 552.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json_str(r#"{ "rows": 3, "ball_radius": 12 }"#).unwrap();
        assert_eq!(settings.rows, 3);
        assert_eq!(settings.ball_radius, 12.0);
        assert_eq!(settings.cols, COLS);
        assert_eq!(settings.window_width, WINDOW_WIDTH);
    }

    #[test]
    fn test_explicit_leg_height() {
        let settings = Settings::from_json_str(r#"{ "paddle_leg_height": 40 }"#).unwrap();
        assert_eq!(settings.leg_height(), 40.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Settings::from_json_str(r#"{ "ball_radius": 0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { key: "ball_radius", .. }));

        let err = Settings::from_json_str(r#"{ "paddle_lerp": 1.5 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { key: "paddle_lerp", .. }));

        let err = Settings::from_json_str(r#"{ "cols": 0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { .. }));
    }

    #[test]
    fn test_parse_error() {
        let err = Settings::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let path = Path::new("/definitely/not/here/settings.json");
        assert!(matches!(
            Settings::load(path),
            Err(SettingsError::Io { .. })
        ));
        assert_eq!(Settings::load_or_default(Some(path)), Settings::default());
    }
}
