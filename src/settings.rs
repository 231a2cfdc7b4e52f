//! Game settings
//!
//! Field geometry and tuning, loadable from a JSON file. Any field missing
//! from the file keeps its default.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;

/// How per-ball wall hits are folded into the running score each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ScoreMode {
    /// Every ball's hits are added to the score
    #[default]
    Accumulate,
    /// Score becomes the tick-start score plus the last updated ball's hits
    LastBallWins,
}

impl ScoreMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreMode::Accumulate => "Accumulate",
            ScoreMode::LastBallWins => "LastBallWins",
        }
    }
}

impl FromStr for ScoreMode {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "accumulate" | "sum" => Ok(ScoreMode::Accumulate),
            "lastballwins" | "last" | "overwrite" => Ok(ScoreMode::LastBallWins),
            _ => Err(SettingsError::Invalid(format!("unknown score mode {:?}", s))),
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,
    /// Thickness of the left, top and bottom borders
    pub border: f32,

    // === Ball ===
    pub ball_radius: f32,
    pub ball_start_speed: f32,

    // === Paddle ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Gap between the paddle's right side and the right edge of the field
    pub paddle_margin: f32,

    // === Blocks ===
    pub block_rows: u32,
    pub block_columns: u32,
    pub block_width: f32,
    pub block_height: f32,
    pub block_gap: f32,
    /// X of the left side of the first block column
    pub block_left: f32,

    // === Rules ===
    pub score_mode: ScoreMode,
    /// Seed for the run's RNG
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            border: BORDER,

            ball_radius: BALL_RADIUS,
            ball_start_speed: BALL_START_SPEED,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_margin: PADDLE_MARGIN,

            block_rows: BLOCK_ROWS,
            block_columns: BLOCK_COLUMNS,
            block_width: BLOCK_WIDTH,
            block_height: BLOCK_HEIGHT,
            block_gap: BLOCK_GAP,
            block_left: BLOCK_LEFT,

            score_mode: ScoreMode::Accumulate,
            seed: 42,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON document and validate them
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Total height of the block grid, gaps included
    pub fn block_grid_height(&self) -> f32 {
        if self.block_rows == 0 {
            return 0.0;
        }
        self.block_rows as f32 * self.block_height + (self.block_rows - 1) as f32 * self.block_gap
    }

    /// Total width of the block grid, gaps included
    pub fn block_grid_width(&self) -> f32 {
        if self.block_columns == 0 {
            return 0.0;
        }
        self.block_columns as f32 * self.block_width
            + (self.block_columns - 1) as f32 * self.block_gap
    }

    /// Reject fields the simulation cannot run on.
    ///
    /// In particular the paddle must fit between the top and bottom borders,
    /// otherwise its clamp range is empty.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = [
            ("field_width", self.field_width),
            ("field_height", self.field_height),
            ("ball_radius", self.ball_radius),
            ("ball_start_speed", self.ball_start_speed),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("block_width", self.block_width),
            ("block_height", self.block_height),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SettingsError::Invalid(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        let non_negative = [
            ("border", self.border),
            ("paddle_margin", self.paddle_margin),
            ("block_gap", self.block_gap),
            ("block_left", self.block_left),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SettingsError::Invalid(format!(
                    "{} must not be negative, got {}",
                    name, value
                )));
            }
        }

        if self.paddle_height + 2.0 * self.border > self.field_height {
            return Err(SettingsError::Invalid(format!(
                "paddle height {} does not fit a field of height {} with border {}",
                self.paddle_height, self.field_height, self.border
            )));
        }

        if self.paddle_width + self.paddle_margin > self.field_width {
            return Err(SettingsError::Invalid(format!(
                "paddle width {} plus margin {} exceeds field width {}",
                self.paddle_width, self.paddle_margin, self.field_width
            )));
        }

        if self.block_grid_height() > self.field_height - 2.0 * self.border {
            return Err(SettingsError::Invalid(format!(
                "block grid height {} does not fit between the borders",
                self.block_grid_height()
            )));
        }

        if self.block_left + self.block_grid_width() > self.field_width {
            return Err(SettingsError::Invalid(format!(
                "block grid ends at {} beyond field width {}",
                self.block_left + self.block_grid_width(),
                self.field_width
            )));
        }

        Ok(())
    }
}
