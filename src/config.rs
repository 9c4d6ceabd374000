// Game tuning knobs. Every key is optional in the JSON file; missing keys keep
// the defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::types::Rgba;

/// Largest brush radius a config may ask for.
pub const MAX_BRUSH_RADIUS: u32 = 4096;

/// What happens when a customer's timer runs out.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeoutPolicy {
    /// The game ends on the spot.
    #[default]
    EndGame,
    /// Half a mismatch penalty, then the next customer walks in.
    NextCustomer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct GameConfig {
    pub max_paint_budget: f32,
    pub paint_drain_per_second: f32,
    pub round_duration_seconds: f32,
    pub mismatch_penalty: f32,
    pub match_reward: f32,
    pub color_match_threshold: f32,
    pub brush_radius_range: (u32, u32),

    pub score_per_match: u32,
    pub match_time_bonus: f32,
    pub timer_resets_per_customer: bool,
    pub budget_depletion_ends_round: bool,
    pub budget_overflow_ends_round: bool,
    pub timeout_policy: TimeoutPolicy,

    pub canvas_width: usize,
    pub canvas_height: usize,
    pub initial_brush_radius: f32,
    pub background_color: Rgba,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_paint_budget: 100.0,
            paint_drain_per_second: 1.0,
            round_duration_seconds: 60.0,
            mismatch_penalty: 10.0,
            match_reward: 15.0,
            color_match_threshold: 0.2,
            brush_radius_range: (1, 100),

            score_per_match: 100,
            match_time_bonus: 0.0,
            timer_resets_per_customer: true,
            budget_depletion_ends_round: true,
            budget_overflow_ends_round: false,
            timeout_policy: TimeoutPolicy::EndGame,

            canvas_width: 512,
            canvas_height: 512,
            initial_brush_radius: 10.0,
            background_color: Rgba::WHITE,
        }
    }
}

impl GameConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| Error::ConfigRead { path: path.to_path_buf(), source })?;
        let config = Self::from_json_str(&text)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self, Error> {
        let config: GameConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let positive = [
            ("maxPaintBudget", self.max_paint_budget),
            ("roundDurationSeconds", self.round_duration_seconds),
            ("colorMatchThreshold", self.color_match_threshold),
        ];
        for (name, v) in positive {
            if !(v.is_finite() && v > 0.0) {
                return Err(Error::InvalidConfig(format!("{name} must be > 0, got {v}")));
            }
        }

        let non_negative = [
            ("paintDrainPerSecond", self.paint_drain_per_second),
            ("mismatchPenalty", self.mismatch_penalty),
            ("matchReward", self.match_reward),
            ("matchTimeBonus", self.match_time_bonus),
            ("initialBrushRadius", self.initial_brush_radius),
        ];
        for (name, v) in non_negative {
            if !(v.is_finite() && v >= 0.0) {
                return Err(Error::InvalidConfig(format!("{name} must be >= 0, got {v}")));
            }
        }

        let (min, max) = self.brush_radius_range;
        if min == 0 || min > max || max > MAX_BRUSH_RADIUS {
            return Err(Error::InvalidConfig(format!(
                "brushRadiusRange must satisfy 1 <= min <= max <= {MAX_BRUSH_RADIUS}, got [{min}, {max}]"
            )));
        }
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(Error::InvalidConfig(format!(
                "canvas must be at least 1x1, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if !self.background_color.is_finite() {
            return Err(Error::InvalidConfig("backgroundColor must be finite".into()));
        }
        Ok(())
    }
}
