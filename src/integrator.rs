//! Damped spring integrator for the main swarm.
//!
//! One call to [`SpringIntegrator::advance`] is one fixed simulation step.
//! Every particle is pulled toward its attraction point with explicit Euler:
//!
//! ```text
//! velocity += (attraction - position) * gain
//! velocity *= damping
//! position += velocity
//! ```
//!
//! With `0 < damping < 1` and small gains the step is contractive: speeds stay
//! bounded and particles settle.
//!
//! The attraction point depends on the mode: Idle and Explode use each
//! particle's own formation target, Gather uses one shared collapse point.

use crate::buffer::ParticleBuffer;
use crate::mode::Mode;
use crate::spawn::Sampler;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Gain and damping for one mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringProfile {
    /// Fraction of the displacement added to velocity each step.
    pub gain: f32,
    /// Velocity multiplier each step, in `(0, 1)`.
    pub damping: f32,
}

impl SpringProfile {
    pub const fn new(gain: f32, damping: f32) -> Self {
        Self { gain, damping }
    }
}

/// Per-mode spring settings and the explode kick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    /// Gentle settling with inertial drift.
    pub idle: SpringProfile,
    /// Fast collapse toward the gather point.
    pub gather: SpringProfile,
    /// Recovery after an explode impulse.
    pub explode: SpringProfile,
    /// Each velocity component of the explode kick is uniform in `[-m, m)`.
    pub impulse_magnitude: f32,
    /// Collapse point for Gather. `None` uses the formation centroid.
    pub gather_point: Option<Vec3>,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            idle: SpringProfile::new(0.03, 0.95),
            gather: SpringProfile::new(0.08, 0.82),
            explode: SpringProfile::new(0.03, 0.95),
            impulse_magnitude: 0.8,
            gather_point: None,
        }
    }
}

/// Advances a [`ParticleBuffer`] toward its targets.
#[derive(Debug, Clone)]
pub struct SpringIntegrator {
    config: SpringConfig,
    collapse_point: Vec3,
}

impl SpringIntegrator {
    /// `centroid` is used as the collapse point unless the config pins one.
    pub fn new(config: SpringConfig, centroid: Vec3) -> Self {
        let collapse_point = config.gather_point.unwrap_or(centroid);
        Self {
            config,
            collapse_point,
        }
    }

    /// Spring settings in effect for `mode`.
    pub fn profile(&self, mode: Mode) -> SpringProfile {
        match mode {
            Mode::Idle => self.config.idle,
            Mode::Gather => self.config.gather,
            Mode::Explode => self.config.explode,
        }
    }

    /// Shared point particles collapse onto while gathering.
    pub fn collapse_point(&self) -> Vec3 {
        self.collapse_point
    }

    /// Re-aim Gather after the formation was regenerated.
    pub fn set_centroid(&mut self, centroid: Vec3) {
        self.collapse_point = self.config.gather_point.unwrap_or(centroid);
    }

    /// Where a particle with formation target `target` is pulled in `mode`.
    #[inline]
    pub fn attraction_point(&self, mode: Mode, target: Vec3) -> Vec3 {
        match mode {
            Mode::Idle | Mode::Explode => target,
            Mode::Gather => self.collapse_point,
        }
    }

    /// Run one fixed step over every particle.
    pub fn advance(&self, buffer: &mut ParticleBuffer, mode: Mode) {
        let SpringProfile { gain, damping } = self.profile(mode);
        let (positions, velocities, targets) = buffer.kinematics_mut();

        for ((position, velocity), target) in positions
            .iter_mut()
            .zip(velocities.iter_mut())
            .zip(targets.iter())
        {
            let attraction = self.attraction_point(mode, *target);
            *velocity += (attraction - *position) * gain;
            *velocity *= damping;
            *position += *velocity;
        }
    }

    /// Replace every velocity with a random outward kick.
    pub fn apply_impulse(&self, buffer: &mut ParticleBuffer, sampler: &mut Sampler) {
        let magnitude = self.config.impulse_magnitude;
        for velocity in buffer.velocities_mut() {
            *velocity = sampler.symmetric_vector(magnitude);
        }
    }
}
