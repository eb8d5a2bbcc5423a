//! Data-driven game balance
//!
//! Every number the simulation reads lives here so a run can be retuned from a
//! JSON file without recompiling. All sections use `#[serde(default)]`, so a
//! file only needs the values it overrides.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Inclusive numeric range used for random draws
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }

    /// Uniform draw from `[min, max]`; an inverted span yields `min`
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.min < self.max {
            rng.random_range(self.min..=self.max)
        } else {
            self.min
        }
    }
}

/// Screen and cleanup geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    pub width: f32,
    pub height: f32,
    pub player_x: f32,
    /// Player y never goes above this
    pub top_margin: f32,
    pub cleanup_x: f32,
    /// Sets spawn this far past the right screen edge
    pub spawn_ahead: f32,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
            player_x: PLAYER_X,
            top_margin: 16.0,
            cleanup_x: CLEANUP_X,
            spawn_ahead: 10.0,
        }
    }
}

/// Scroll speed targets and smoothing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedTuning {
    pub baseline: f32,
    pub max: f32,
    /// Added to the time bonus every `bonus_interval` seconds
    pub bonus_step: f32,
    pub bonus_interval: f32,
    /// Extra px/s of target speed per point of score
    pub score_bonus_per_point: f32,
    /// Lerp factor per 60 Hz frame
    pub convergence: f32,
    /// Intro launch speed is `max(intro_min_speed, baseline * intro_start_ratio)`
    pub intro_min_speed: f32,
    pub intro_start_ratio: f32,
    /// Target while the intro banner is on screen
    pub intro_boost_speed: f32,
}

impl Default for SpeedTuning {
    fn default() -> Self {
        Self {
            baseline: 170.0,
            max: 330.0,
            bonus_step: 18.0,
            bonus_interval: 10.0,
            score_bonus_per_point: 0.2,
            convergence: 0.08,
            intro_min_speed: 60.0,
            intro_start_ratio: 0.4,
            intro_boost_speed: 500.0,
        }
    }
}

/// Flight model ("wings")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WingsTuning {
    pub gravity_y: f32,
    pub fast_fall_mult: f32,
    pub tap_boost_vy: f32,
    pub thrust_min: f32,
    pub thrust_max: f32,
    /// Seconds of holding to reach full ramp
    pub ramp_time: f32,
    /// Ramp decays this many times faster than it builds
    pub ramp_decay_mult: f32,
    pub release_damp: f32,
    /// Upward speed cap at zero ramp
    pub soft_cap_up: f32,
    pub max_vy_up: f32,
    pub max_vy_down: f32,
}

impl Default for WingsTuning {
    fn default() -> Self {
        Self {
            gravity_y: 1800.0,
            fast_fall_mult: 1.15,
            tap_boost_vy: -320.0,
            thrust_min: -540.0,
            thrust_max: -1800.0,
            ramp_time: 0.25,
            ramp_decay_mult: 3.0,
            release_damp: 0.6,
            soft_cap_up: -220.0,
            max_vy_up: -450.0,
            max_vy_down: 200.0,
        }
    }
}

/// Relative odds of each set archetype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchetypeWeights {
    pub stairs_up: f32,
    pub two_layer: f32,
    pub stairs_down: f32,
    pub pillar_gate: f32,
}

impl Default for ArchetypeWeights {
    fn default() -> Self {
        Self {
            stairs_up: 1.0,
            two_layer: 1.0,
            stairs_down: 1.0,
            pillar_gate: 0.8,
        }
    }
}

/// Obstacle formation geometry and scheduling distances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetTuning {
    /// Scrolled distance between sets (before tail pad)
    pub set_distance: Span,
    pub weights: ArchetypeWeights,
    pub platform_size: Vec2,
    pub pillar_width: f32,

    pub stair_step_x: f32,
    pub stair_step_y: Span,
    pub stair_coins: u32,
    pub stair_coin_spacing: f32,
    /// Coin arc baseline sits this far above the platform top
    pub stair_coin_rise: f32,
    pub stair_coin_amp: f32,

    pub two_layer_gap: Span,
    pub two_layer_jitter: f32,
    pub two_layer_center_offset: Span,
    pub two_layer_tail_pad: f32,
    /// Extra pad when two-layer follows two-layer
    pub two_layer_chain_tail_pad: f32,
    pub grid_cols: u32,
    pub grid_rows: u32,
    pub grid_spacing: f32,
    pub grid_y_pad: f32,

    /// Passage center stays this far from the floor and ceiling
    pub pillar_passage_margin: f32,
    pub pillar_gap_base: f32,
    pub pillar_gap_jitter: Span,
    pub pillar_offset_x: Span,

    /// Gap coins spawn this much further ahead than sets
    pub gap_coin_ahead: f32,
    pub gap_coin_y_jitter: f32,
}

impl Default for SetTuning {
    fn default() -> Self {
        Self {
            set_distance: Span::new(800.0, 1000.0),
            weights: ArchetypeWeights::default(),
            // 48x8 texture at 2.8x
            platform_size: Vec2::new(134.4, 22.4),
            // 16px texture at 4x
            pillar_width: 64.0,

            stair_step_x: 210.0,
            stair_step_y: Span::new(40.0, 70.0),
            stair_coins: 6,
            stair_coin_spacing: 34.0,
            stair_coin_rise: 38.0,
            stair_coin_amp: 14.0,

            two_layer_gap: Span::new(250.0, 290.0),
            two_layer_jitter: 6.0,
            two_layer_center_offset: Span::new(450.0, 550.0),
            two_layer_tail_pad: 400.0,
            two_layer_chain_tail_pad: 200.0,
            grid_cols: 10,
            grid_rows: 5,
            grid_spacing: 28.0,
            grid_y_pad: 40.0,

            pillar_passage_margin: 140.0,
            pillar_gap_base: 150.0,
            pillar_gap_jitter: Span::new(-10.0, 20.0),
            pillar_offset_x: Span::new(50.0, 80.0),

            gap_coin_ahead: 200.0,
            gap_coin_y_jitter: 80.0,
        }
    }
}

/// Coin sprite scales
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoinTuning {
    /// Unscaled coin sprite edge
    pub texture_size: f32,
    pub pattern_scale: f32,
    pub arc_scale: f32,
    pub grid_scale: f32,
}

impl Default for CoinTuning {
    fn default() -> Self {
        Self {
            texture_size: 16.0,
            pattern_scale: 0.8,
            arc_scale: 0.85,
            grid_scale: 0.9,
        }
    }
}

/// Fast hazard timing and launch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardTuning {
    pub period: f32,
    /// Retry delay while the intro is still running
    pub intro_retry: f32,
    /// No hazard this soon after a set spawn
    pub safe_window: f32,
    pub double_prob: f32,
    pub double_delay: f32,
    pub speed_ratio: f32,
    pub diagonal_prob: f32,
    pub max_dy: f32,
    /// Diagonal |vy| is at least `max_dy * min_dy_frac`
    pub min_dy_frac: f32,
    pub spawn_offset_x: f32,
    pub y_margin: f32,
    pub lifetime: f32,
    pub size: f32,
    /// Extra clearance around the forbidden band for trajectory checks
    pub band_safety_pad: f32,
}

impl Default for HazardTuning {
    fn default() -> Self {
        Self {
            period: 7.0,
            intro_retry: 1.0,
            safe_window: 0.8,
            double_prob: 0.22,
            double_delay: 0.22,
            speed_ratio: 1.85,
            diagonal_prob: 0.3,
            max_dy: 170.0,
            min_dy_frac: 0.4,
            spawn_offset_x: 50.0,
            y_margin: 40.0,
            lifetime: 8.0,
            // 16px texture at 1.2x
            size: 19.2,
            band_safety_pad: 8.0,
        }
    }
}

/// Forbidden band padding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandTuning {
    pub pad: f32,
    pub min_height: f32,
    pub collapse_half_width: f32,
}

impl Default for BandTuning {
    fn default() -> Self {
        Self {
            pad: 12.0,
            min_height: 40.0,
            collapse_half_width: 12.0,
        }
    }
}

/// Visible-rect shrink factors and rewards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionTuning {
    pub player_size: f32,
    pub player_shrink: f32,
    pub obstacle_shrink: f32,
    pub hazard_shrink: f32,
    pub coin_shrink: f32,
    pub coin_score: u64,
}

impl Default for CollisionTuning {
    fn default() -> Self {
        Self {
            // 16px texture at 1.4x
            player_size: 22.4,
            player_shrink: 0.85,
            obstacle_shrink: 0.85,
            hazard_shrink: 0.85,
            coin_shrink: 0.75,
            coin_score: 5,
        }
    }
}

/// Intro banner spelled in coins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroTuning {
    pub text: String,
    /// Banner starts this far right of the screen edge
    pub start_offset_x: f32,
    /// Banner top as a fraction of screen height
    pub y_frac: f32,
    /// Banner has passed once its right edge is left of this x
    pub pass_x: f32,
    /// Speed used for the pass estimate is clamped to this range
    pub speed_clamp: Span,
    pub cell: f32,
    pub kern: f32,
    pub coin_scale: f32,
}

impl Default for IntroTuning {
    fn default() -> Self {
        Self {
            text: "GET READY".into(),
            start_offset_x: 140.0,
            y_frac: 0.38,
            pass_x: -50.0,
            speed_clamp: Span::new(60.0, 800.0),
            cell: 14.0,
            kern: 6.0,
            coin_scale: 0.7,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub world: WorldTuning,
    pub speed: SpeedTuning,
    pub wings: WingsTuning,
    pub sets: SetTuning,
    pub coins: CoinTuning,
    pub hazards: HazardTuning,
    pub band: BandTuning,
    pub collision: CollisionTuning,
    pub intro: IntroTuning,
}

impl Tuning {
    /// Parse a tuning file; missing fields take their defaults
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).with_context(|| format!("read tuning {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parse tuning {}", path.display()))
    }

    /// Load a tuning file, falling back to defaults (error text returned for logging)
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(path) {
            Ok(tuning) => (tuning, None),
            Err(e) => (Self::default(), Some(format!("{e:#}"))),
        }
    }

    /// Non-fatal warnings for values that will produce odd play
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();

        fn check_span(w: &mut Vec<String>, label: &str, s: &Span) {
            if !s.is_ordered() {
                w.push(format!("{label}: min {} > max {}", s.min, s.max));
            }
        }
        fn check_positive(w: &mut Vec<String>, label: &str, v: f32) {
            if !(v > 0.0) {
                w.push(format!("{label} must be > 0 (got {v})"));
            }
        }
        fn check_unit(w: &mut Vec<String>, label: &str, v: f32) {
            if !(0.0..=1.0).contains(&v) {
                w.push(format!("{label} must be within [0, 1] (got {v})"));
            }
        }

        check_positive(&mut w, "world.width", self.world.width);
        check_positive(&mut w, "world.height", self.world.height);
        if self.world.top_margin >= self.world.height {
            w.push("world.top_margin is below the world floor".into());
        }

        check_positive(&mut w, "speed.baseline", self.speed.baseline);
        if self.speed.max < self.speed.baseline {
            w.push(format!(
                "speed.max {} < speed.baseline {}; speed will stay at baseline",
                self.speed.max, self.speed.baseline
            ));
        }
        check_positive(&mut w, "speed.bonus_interval", self.speed.bonus_interval);
        check_unit(&mut w, "speed.convergence", self.speed.convergence);

        check_positive(&mut w, "wings.ramp_time", self.wings.ramp_time);
        check_unit(&mut w, "wings.release_damp", self.wings.release_damp);
        if self.wings.max_vy_up > 0.0 {
            w.push("wings.max_vy_up should be negative (upward)".into());
        }
        if self.wings.max_vy_up > self.wings.max_vy_down {
            w.push("wings.max_vy_up > wings.max_vy_down".into());
        }

        check_span(&mut w, "sets.set_distance", &self.sets.set_distance);
        check_span(&mut w, "sets.stair_step_y", &self.sets.stair_step_y);
        check_span(&mut w, "sets.two_layer_gap", &self.sets.two_layer_gap);
        check_span(&mut w, "sets.two_layer_center_offset", &self.sets.two_layer_center_offset);
        check_span(&mut w, "sets.pillar_gap_jitter", &self.sets.pillar_gap_jitter);
        check_span(&mut w, "sets.pillar_offset_x", &self.sets.pillar_offset_x);
        let weights = &self.sets.weights;
        let total = weights.stairs_up + weights.two_layer + weights.stairs_down + weights.pillar_gate;
        if !(total > 0.0) {
            w.push("sets.weights sum to zero; archetypes will be drawn uniformly".into());
        }
        if self.sets.pillar_passage_margin * 2.0 > self.world.height {
            w.push("sets.pillar_passage_margin leaves no room for the passage".into());
        }

        check_positive(&mut w, "hazards.period", self.hazards.period);
        check_positive(&mut w, "hazards.lifetime", self.hazards.lifetime);
        check_unit(&mut w, "hazards.double_prob", self.hazards.double_prob);
        check_unit(&mut w, "hazards.diagonal_prob", self.hazards.diagonal_prob);
        check_unit(&mut w, "hazards.min_dy_frac", self.hazards.min_dy_frac);

        if self.band.pad < 0.0 {
            w.push("band.pad is negative".into());
        }
        check_positive(&mut w, "band.collapse_half_width", self.band.collapse_half_width);

        for (label, v) in [
            ("collision.player_shrink", self.collision.player_shrink),
            ("collision.obstacle_shrink", self.collision.obstacle_shrink),
            ("collision.hazard_shrink", self.collision.hazard_shrink),
            ("collision.coin_shrink", self.collision.coin_shrink),
        ] {
            check_unit(&mut w, label, v);
        }

        check_span(&mut w, "intro.speed_clamp", &self.intro.speed_clamp);
        if self.intro.text.trim().is_empty() {
            w.push("intro.text is empty; the intro ends immediately".into());
        }

        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().expect("temp file");
        f.write_all(contents.as_bytes()).expect("write temp");
        f
    }

    #[test]
    fn test_defaults_validate_clean() {
        let warnings = Tuning::default().validate();
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let f = write_temp(r#"{ "speed": { "baseline": 200.0 }, "intro": { "text": "GO" } }"#);
        let tuning = Tuning::load_from_file(f.path()).expect("load");
        assert_eq!(tuning.speed.baseline, 200.0);
        assert_eq!(tuning.speed.max, SpeedTuning::default().max);
        assert_eq!(tuning.intro.text, "GO");
        assert_eq!(tuning.wings, WingsTuning::default());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let (tuning, err) = Tuning::load_or_default("/definitely/not/here.json");
        assert_eq!(tuning, Tuning::default());
        assert!(err.expect("error text").contains("read tuning"));
    }

    #[test]
    fn test_load_or_default_bad_json() {
        let f = write_temp("{ not json");
        let (tuning, err) = Tuning::load_or_default(f.path());
        assert_eq!(tuning, Tuning::default());
        assert!(err.expect("error text").contains("parse tuning"));
    }

    #[test]
    fn test_validate_flags_bad_values() {
        let mut bad = Tuning::default();
        bad.sets.set_distance = Span::new(1000.0, 800.0);
        bad.speed.max = 10.0;
        bad.wings.release_damp = 1.5;
        bad.collision.coin_shrink = -0.1;
        bad.sets.weights = ArchetypeWeights {
            stairs_up: 0.0,
            two_layer: 0.0,
            stairs_down: 0.0,
            pillar_gate: 0.0,
        };
        let warnings = bad.validate();
        let joined = warnings.join(" | ");
        for needle in [
            "sets.set_distance",
            "speed.max",
            "wings.release_damp",
            "collision.coin_shrink",
            "sets.weights",
        ] {
            assert!(joined.contains(needle), "missing {needle} in {joined}");
        }
    }
}
