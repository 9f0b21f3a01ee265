//! Main particle buffer.
//!
//! Particle state lives in parallel arrays (structure of arrays): index `i`
//! names the same particle in every array, and all arrays always have the
//! same length N. Only the integrator and the mode entry effects write to
//! the buffer; the renderer reads it between ticks through the slice views
//! or an interleaved [`PointVertex`] stream.

use crate::formation::Formation;
use crate::palette::Palette;
use crate::spawn::Sampler;
use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Interleaved vertex for point-sprite renderers.
///
/// 32 bytes, tightly packed, safe to upload directly with `bytemuck::cast_slice`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PointVertex {
    pub position: [f32; 3],
    pub size: f32,
    pub color: [f32; 3],
    pub alpha: f32,
}

impl PointVertex {
    pub fn new(position: Vec3, size: f32, color: Vec3, alpha: f32) -> Self {
        Self {
            position: position.to_array(),
            size,
            color: color.to_array(),
            alpha,
        }
    }
}

/// Fixed-size particle storage for the formation swarm.
#[derive(Debug, Clone, Default)]
pub struct ParticleBuffer {
    positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
    targets: Vec<Vec3>,
    colors: Vec<Vec3>,
    sizes: Vec<f32>,
}

impl ParticleBuffer {
    /// Take ownership of a generated formation. Particles start at the
    /// scattered layout with zero velocity.
    pub fn from_formation(formation: Formation) -> Self {
        let Formation {
            initial_positions,
            target_positions,
            colors,
            sizes,
            ..
        } = formation;

        let n = target_positions.len();
        debug_assert_eq!(initial_positions.len(), n);
        debug_assert_eq!(colors.len(), n);
        debug_assert_eq!(sizes.len(), n);

        Self {
            positions: initial_positions,
            velocities: vec![Vec3::ZERO; n],
            targets: target_positions,
            colors,
            sizes,
        }
    }

    /// Number of particles N.
    #[inline]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    // ========== Read-only views ==========

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    pub fn targets(&self) -> &[Vec3] {
        &self.targets
    }

    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    /// Positions as a flat `[x0, y0, z0, x1, ...]` slice of length 3N.
    pub fn positions_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Colors as a flat `[r0, g0, b0, r1, ...]` slice of length 3N.
    pub fn colors_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Fill `out` with one interleaved vertex per particle.
    pub fn write_vertices(&self, out: &mut Vec<PointVertex>) {
        out.clear();
        out.extend(
            self.positions
                .iter()
                .zip(&self.sizes)
                .zip(&self.colors)
                .map(|((p, s), c)| PointVertex::new(*p, *s, *c, 1.0)),
        );
    }

    /// Largest particle speed, used by status readouts and tests.
    pub fn max_speed(&self) -> f32 {
        self.velocities
            .iter()
            .map(|v| v.length())
            .fold(0.0, f32::max)
    }

    // ========== Mutation ==========

    /// Split borrow for a simulation step: `(positions, velocities, targets)`.
    ///
    /// All three slices have length N.
    pub(crate) fn kinematics_mut(&mut self) -> (&mut [Vec3], &mut [Vec3], &[Vec3]) {
        (
            self.positions.as_mut_slice(),
            self.velocities.as_mut_slice(),
            self.targets.as_slice(),
        )
    }

    /// Overwrite every velocity.
    pub(crate) fn velocities_mut(&mut self) -> &mut [Vec3] {
        &mut self.velocities
    }

    /// Reassign every color cyclically from `palette`.
    pub fn apply_palette(&mut self, palette: &Palette) {
        for (i, c) in self.colors.iter_mut().enumerate() {
            *c = palette.cyclic(i);
        }
    }

    /// Recolor each particle to `color` with probability `share`.
    ///
    /// Returns how many particles changed.
    pub fn recolor_share(&mut self, color: Vec3, share: f32, sampler: &mut Sampler) -> usize {
        let mut changed = 0;
        for c in &mut self.colors {
            if sampler.chance(share) {
                *c = color;
                changed += 1;
            }
        }
        changed
    }
}
