//! Decorative motion around the formation.
//!
//! None of this feeds back into the swarm. The renderer applies it as
//! transforms: the formation spins about the Y axis, a star at the apex
//! pulses in scale, and a field of snowflakes drifts down and wraps.

use crate::spawn::Sampler;
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneryConfig {
    /// Formation spin in radians per step.
    pub spin_rate: f32,
    /// Star pulse angular frequency in radians per simulated second.
    pub star_pulse_frequency: f32,
    /// Star scale swings between `1 - amplitude` and `1 + amplitude`.
    pub star_pulse_amplitude: f32,
    /// Star height above the formation apex.
    pub star_lift: f32,
    /// Number of snowflakes.
    pub snow_count: usize,
    /// Snow fills the cube `[-extent, extent]` and wraps vertically at its faces.
    pub snow_extent: f32,
    /// Downward drift per step.
    pub snow_fall_speed: f32,
}

impl Default for SceneryConfig {
    fn default() -> Self {
        Self {
            spin_rate: 0.005,
            star_pulse_frequency: 3.0,
            star_pulse_amplitude: 0.1,
            star_lift: 0.2,
            snow_count: 1000,
            snow_extent: 10.0,
            snow_fall_speed: 0.02,
        }
    }
}

/// Star, snow and spin state.
#[derive(Debug, Clone)]
pub struct Scenery {
    config: SceneryConfig,
    spin: f32,
    star_position: Vec3,
    star_scale: f32,
    snow: Vec<Vec3>,
    snow_offset: f32,
}

impl Scenery {
    /// Scatter the snow and park the star above `apex`.
    pub fn new(config: SceneryConfig, apex: Vec3, sampler: &mut Sampler) -> Self {
        let snow = (0..config.snow_count)
            .map(|_| sampler.in_cube(config.snow_extent))
            .collect();

        Self {
            star_position: apex + Vec3::Y * config.star_lift,
            config,
            spin: 0.0,
            star_scale: 1.0,
            snow,
            snow_offset: 0.0,
        }
    }

    /// Advance one fixed step; `elapsed` is simulated time after the step.
    pub fn step(&mut self, elapsed: f32) {
        self.spin = (self.spin + self.config.spin_rate).rem_euclid(TAU);
        let phase = self.config.star_pulse_frequency * elapsed;
        self.star_scale = 1.0 + self.config.star_pulse_amplitude * phase.sin();

        self.snow_offset -= self.config.snow_fall_speed;
        if self.snow_offset < -self.config.snow_extent {
            self.snow_offset = self.config.snow_extent;
        }
    }

    /// Back to the start pose. Flake positions are kept.
    pub fn reset(&mut self) {
        self.spin = 0.0;
        self.star_scale = 1.0;
        self.snow_offset = 0.0;
    }

    /// Move the star after the formation was regenerated.
    pub fn set_apex(&mut self, apex: Vec3) {
        self.star_position = apex + Vec3::Y * self.config.star_lift;
    }

    /// Formation rotation about Y, in `[0, TAU)`.
    pub fn spin(&self) -> f32 {
        self.spin
    }

    /// Model matrix that spins the formation about Y.
    pub fn formation_transform(&self) -> Mat4 {
        Mat4::from_rotation_y(self.spin)
    }

    pub fn star_position(&self) -> Vec3 {
        self.star_position
    }

    pub fn star_scale(&self) -> f32 {
        self.star_scale
    }

    /// Flake positions before the shared vertical offset.
    pub fn snow(&self) -> &[Vec3] {
        &self.snow
    }

    /// Vertical offset applied to every flake.
    pub fn snow_offset(&self) -> f32 {
        self.snow_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenery(config: SceneryConfig) -> Scenery {
        Scenery::new(config, Vec3::new(0.0, 4.0, 0.0), &mut Sampler::new(Some(8)))
    }

    #[test]
    fn test_star_sits_above_apex() {
        let s = scenery(SceneryConfig::default());
        assert!(s.star_position().distance(Vec3::new(0.0, 4.2, 0.0)) < 1e-6);
        assert_eq!(s.star_scale(), 1.0);
    }

    #[test]
    fn test_star_pulse_range() {
        let mut s = scenery(SceneryConfig::default());
        for i in 1..600 {
            s.step(i as f32 / 60.0);
            assert!(s.star_scale() >= 0.9 - 1e-6 && s.star_scale() <= 1.1 + 1e-6);
        }
    }

    #[test]
    fn test_snow_wraps() {
        let mut s = scenery(SceneryConfig {
            snow_extent: 1.0,
            snow_fall_speed: 0.3,
            snow_count: 10,
            ..Default::default()
        });
        assert_eq!(s.snow().len(), 10);
        for _ in 0..3 {
            s.step(0.0);
        }
        assert!((s.snow_offset() + 0.9).abs() < 1e-5);
        s.step(0.0);
        assert_eq!(s.snow_offset(), 1.0);
    }

    #[test]
    fn test_spin_accumulates_and_wraps() {
        let mut s = scenery(SceneryConfig {
            spin_rate: 1.0,
            ..Default::default()
        });
        for _ in 0..7 {
            s.step(0.0);
        }
        assert!((s.spin() - (7.0 - TAU)).abs() < 1e-4);
    }

    #[test]
    fn test_formation_transform_rotates_about_y() {
        let mut s = scenery(SceneryConfig {
            spin_rate: std::f32::consts::FRAC_PI_2,
            ..Default::default()
        });
        s.step(0.0);
        let p = s.formation_transform().transform_point3(Vec3::new(1.0, 2.0, 0.0));
        assert!(p.distance(Vec3::new(0.0, 2.0, -1.0)) < 1e-5);
    }

    #[test]
    fn test_reset_restores_start_pose() {
        let mut s = scenery(SceneryConfig::default());
        for i in 1..50 {
            s.step(i as f32 / 60.0);
        }
        let flakes = s.snow().to_vec();
        s.reset();
        assert_eq!(s.spin(), 0.0);
        assert_eq!(s.star_scale(), 1.0);
        assert_eq!(s.snow_offset(), 0.0);
        assert_eq!(s.snow(), flakes.as_slice());
        assert_eq!(s.formation_transform(), Mat4::IDENTITY);
    }
}
