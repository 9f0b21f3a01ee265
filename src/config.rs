//! Swarm configuration.
//!
//! [`SwarmConfig`] collects every tunable in one serializable tree. All
//! fields have defaults, so a JSON file only needs the values it changes:
//!
//! ```json
//! {
//!   "formation": { "particle_count": 2000, "arm_count": 5 },
//!   "gesture": { "closed_threshold": 0.14 },
//!   "seed": 7
//! }
//! ```
//!
//! In code, use the `with_*` builder methods:
//!
//! ```ignore
//! let config = SwarmConfig::default()
//!     .with_particle_count(100)
//!     .with_arm_count(4)
//!     .with_seed(42);
//! ```

use crate::emitter::EmitterConfig;
use crate::error::ConfigError;
use crate::formation::FormationParams;
use crate::gesture::GestureConfig;
use crate::integrator::{SpringConfig, SpringProfile};
use crate::palette::Palette;
use crate::scenery::SceneryConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete swarm configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmConfig {
    pub formation: FormationParams,
    pub palette: Palette,
    pub springs: SpringConfig,
    pub gesture: GestureConfig,
    /// Seconds spent in Explode before returning to Idle.
    pub explode_dwell: f32,
    pub emitters: EmitterConfig,
    pub scenery: SceneryConfig,
    /// Share of particles recolored on each theme change.
    pub theme_recolor_share: f32,
    /// Fixed simulation steps per second.
    pub step_rate: f32,
    /// Upper bound on steps run for one `tick`.
    pub max_steps_per_tick: u32,
    /// RNG seed; `None` seeds from the clock.
    pub seed: Option<u64>,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            formation: FormationParams::default(),
            palette: Palette::default(),
            springs: SpringConfig::default(),
            gesture: GestureConfig::default(),
            explode_dwell: 2.2,
            emitters: EmitterConfig::default(),
            scenery: SceneryConfig::default(),
            theme_recolor_share: 0.7,
            step_rate: 60.0,
            max_steps_per_tick: 8,
            seed: None,
        }
    }
}

impl SwarmConfig {
    // =========================================================================
    // Builder
    // =========================================================================

    /// Set the number of formation particles.
    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.formation.particle_count = count;
        self
    }

    /// Set the number of spiral arms.
    pub fn with_arm_count(mut self, arms: u32) -> Self {
        self.formation.arm_count = arms;
        self
    }

    /// Set the formation height range (base, apex).
    pub fn with_height_range(mut self, min: f32, max: f32) -> Self {
        self.formation.height_min = min;
        self.formation.height_max = max;
        self
    }

    /// Set the angular jitter half-width. `0.0` gives perfectly crisp arms.
    pub fn with_jitter(mut self, jitter: f32) -> Self {
        self.formation.jitter = jitter;
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_idle_spring(mut self, gain: f32, damping: f32) -> Self {
        self.springs.idle = SpringProfile::new(gain, damping);
        self
    }

    pub fn with_gather_spring(mut self, gain: f32, damping: f32) -> Self {
        self.springs.gather = SpringProfile::new(gain, damping);
        self
    }

    pub fn with_explode_spring(mut self, gain: f32, damping: f32) -> Self {
        self.springs.explode = SpringProfile::new(gain, damping);
        self
    }

    pub fn with_impulse_magnitude(mut self, magnitude: f32) -> Self {
        self.springs.impulse_magnitude = magnitude;
        self
    }

    pub fn with_closed_threshold(mut self, threshold: f32) -> Self {
        self.gesture.closed_threshold = threshold;
        self
    }

    pub fn with_explode_dwell(mut self, seconds: f32) -> Self {
        self.explode_dwell = seconds;
        self
    }

    /// Set the per-step chance of spawning a firework burst.
    pub fn with_spawn_probability(mut self, p: f32) -> Self {
        self.emitters.spawn_probability = p;
        self
    }

    pub fn with_burst_count(mut self, count: usize) -> Self {
        self.emitters.burst_count = count;
        self
    }

    pub fn with_step_rate(mut self, hz: f32) -> Self {
        self.step_rate = hz;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Check every value against its accepted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = &self.formation;
        if f.particle_count == 0 {
            return Err(ConfigError::invalid("formation.particle_count", "must be at least 1"));
        }
        if f.arm_count == 0 {
            return Err(ConfigError::invalid("formation.arm_count", "must be at least 1"));
        }
        if !(f.height_min.is_finite() && f.height_max.is_finite() && f.height_min < f.height_max) {
            return Err(ConfigError::invalid(
                "formation.height_min",
                format!("range {}..{} is empty", f.height_min, f.height_max),
            ));
        }
        non_negative("formation.taper", f.taper)?;
        non_negative("formation.jitter", f.jitter)?;
        non_negative("formation.scatter_extent", f.scatter_extent)?;
        non_negative("formation.size_min", f.size_min)?;
        if f.size_max < f.size_min {
            return Err(ConfigError::invalid("formation.size_max", "must not be below size_min"));
        }
        unit_interval("formation.secondary_mix", f.secondary_mix)?;

        spring("springs.idle", self.springs.idle)?;
        spring("springs.gather", self.springs.gather)?;
        spring("springs.explode", self.springs.explode)?;
        non_negative("springs.impulse_magnitude", self.springs.impulse_magnitude)?;

        unit_interval("gesture.closed_threshold", self.gesture.closed_threshold)?;
        unit_interval("gesture.swipe_threshold", self.gesture.swipe_threshold)?;
        non_negative("explode_dwell", self.explode_dwell)?;

        let e = &self.emitters;
        unit_interval("emitters.spawn_probability", e.spawn_probability)?;
        if !(e.decay_rate.is_finite() && e.decay_rate > 0.0) {
            return Err(ConfigError::invalid("emitters.decay_rate", "must be positive"));
        }
        non_negative("emitters.speed_min", e.speed_min)?;
        if e.speed_max < e.speed_min {
            return Err(ConfigError::invalid("emitters.speed_max", "must not be below speed_min"));
        }
        non_negative("emitters.gravity", e.gravity)?;
        if !e.spawn_min.cmple(e.spawn_max).all() {
            return Err(ConfigError::invalid("emitters.spawn_min", "must not exceed spawn_max"));
        }

        non_negative("scenery.snow_extent", self.scenery.snow_extent)?;
        unit_interval("theme_recolor_share", self.theme_recolor_share)?;

        if !(self.step_rate.is_finite() && self.step_rate > 0.0) {
            return Err(ConfigError::invalid("step_rate", "must be positive"));
        }
        if self.max_steps_per_tick == 0 {
            return Err(ConfigError::invalid("max_steps_per_tick", "must be at least 1"));
        }
        Ok(())
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be a finite value >= 0, got {}", value)))
    }
}

fn unit_interval(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be within [0, 1], got {}", value)))
    }
}

fn spring(field: &'static str, profile: SpringProfile) -> Result<(), ConfigError> {
    if !(profile.gain.is_finite() && profile.gain >= 0.0) {
        return Err(ConfigError::invalid(field, "gain must be >= 0"));
    }
    if !(profile.damping > 0.0 && profile.damping < 1.0) {
        return Err(ConfigError::invalid(field, "damping must be strictly between 0 and 1"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SwarmConfig::default().validate().is_ok());
    }

    #[test]
    fn test_builder_sets_fields() {
        let c = SwarmConfig::default()
            .with_particle_count(100)
            .with_arm_count(3)
            .with_jitter(0.0)
            .with_seed(9);
        assert_eq!(c.formation.particle_count, 100);
        assert_eq!(c.formation.arm_count, 3);
        assert_eq!(c.formation.jitter, 0.0);
        assert_eq!(c.seed, Some(9));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let c = SwarmConfig::from_json_str(
            r#"{ "formation": { "particle_count": 250 }, "seed": 3 }"#,
        )
        .unwrap();
        assert_eq!(c.formation.particle_count, 250);
        assert_eq!(c.formation.arm_count, FormationParams::default().arm_count);
        assert_eq!(c.seed, Some(3));
        assert_eq!(c.palette, Palette::festive());
    }

    #[test]
    fn test_json_round_trip_preserves_config() {
        let c = SwarmConfig::default().with_seed(1).with_palette(Palette::neon());
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(SwarmConfig::from_json_str(&json).unwrap(), c);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            SwarmConfig::from_json_str("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_rejects_bad_values() {
        let cases = [
            (SwarmConfig::default().with_particle_count(0), "formation.particle_count"),
            (SwarmConfig::default().with_arm_count(0), "formation.arm_count"),
            (SwarmConfig::default().with_height_range(2.0, 2.0), "formation.height_min"),
            (SwarmConfig::default().with_idle_spring(0.03, 1.0), "springs.idle"),
            (SwarmConfig::default().with_gather_spring(-0.1, 0.8), "springs.gather"),
            (SwarmConfig::default().with_closed_threshold(1.5), "gesture.closed_threshold"),
            (SwarmConfig::default().with_spawn_probability(-0.1), "emitters.spawn_probability"),
            (SwarmConfig::default().with_step_rate(0.0), "step_rate"),
        ];
        for (config, expected) in cases {
            match config.validate() {
                Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected {} to be rejected, got {:?}", expected, other),
            }
        }
    }

    #[test]
    fn test_save_and_load() {
        let name = format!("swarmkit-config-{}.json", std::process::id());
        let path = std::env::temp_dir().join(name);
        let c = SwarmConfig::default().with_particle_count(42).with_seed(5);
        c.save(&path).unwrap();
        let loaded = SwarmConfig::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, c);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            SwarmConfig::load("/definitely/not/here/swarm.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
