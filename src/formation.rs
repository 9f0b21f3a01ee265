//! Procedural spiral-cone formation.
//!
//! Particles are dealt round-robin onto `arm_count` spiral arms. Each one gets
//! a random height `h` in the configured range and sits at
//!
//! ```text
//! angle  = h * wind_rate + k * (TAU / arm_count) + jitter
//! radius = (height_max - h) * taper
//! ```
//!
//! where `k = i mod arm_count`. Arms are evenly phase-offset and the radius
//! shrinks linearly toward the top, which gives the cone silhouette.
//!
//! Besides the resting targets the generator also returns a scattered start
//! layout, so a freshly built swarm visibly assembles itself.

use crate::palette::Palette;
use crate::spawn::Sampler;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Shape parameters for the formation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormationParams {
    /// Number of particles N.
    pub particle_count: usize,
    /// Number of spiral arms.
    pub arm_count: u32,
    /// Lowest target height (cone base).
    pub height_min: f32,
    /// Highest target height (cone apex).
    pub height_max: f32,
    /// Radians of twist per unit of height.
    pub wind_rate: f32,
    /// Radius gained per unit of distance below the apex.
    pub taper: f32,
    /// Half-width of the uniform angular jitter, in radians.
    pub jitter: f32,
    /// Half-size of the cube the start layout is scattered in.
    pub scatter_extent: f32,
    /// Per-particle point size range.
    pub size_min: f32,
    pub size_max: f32,
    /// Optional color blended into the palette color.
    pub secondary_color: Option<Vec3>,
    /// Upper bound of the random per-particle blend weight toward `secondary_color`.
    pub secondary_mix: f32,
}

impl Default for FormationParams {
    fn default() -> Self {
        Self {
            particle_count: 6000,
            arm_count: 4,
            height_min: -4.0,
            height_max: 4.0,
            wind_rate: 1.6,
            taper: 0.45,
            jitter: 0.15,
            scatter_extent: 12.0,
            size_min: 0.03,
            size_max: 0.08,
            secondary_color: Some(Vec3::new(1.0, 1.0, 1.0)),
            secondary_mix: 0.35,
        }
    }
}

impl FormationParams {
    /// Cone radius at height `h` before jitter.
    #[inline]
    pub fn radius_at(&self, h: f32) -> f32 {
        (self.height_max - h) * self.taper
    }

    /// The tip of the cone, where the star sits.
    pub fn apex(&self) -> Vec3 {
        Vec3::new(0.0, self.height_max, 0.0)
    }
}

/// Output of [`generate`]: parallel arrays of length N.
#[derive(Debug, Clone)]
pub struct Formation {
    /// Scattered start layout.
    pub initial_positions: Vec<Vec3>,
    /// Resting formation.
    pub target_positions: Vec<Vec3>,
    pub colors: Vec<Vec3>,
    pub sizes: Vec<f32>,
    /// Mean of all target positions.
    pub centroid: Vec3,
}

impl Formation {
    /// Number of particles.
    pub fn len(&self) -> usize {
        self.target_positions.len()
    }

    /// `true` when the formation has no particles.
    pub fn is_empty(&self) -> bool {
        self.target_positions.is_empty()
    }
}

/// Build the formation for `params`, coloring from `palette`.
pub fn generate(params: &FormationParams, palette: &Palette, sampler: &mut Sampler) -> Formation {
    let n = params.particle_count;
    let arms = params.arm_count.max(1);
    let arm_phase = TAU / arms as f32;

    let mut initial_positions = Vec::with_capacity(n);
    let mut target_positions = Vec::with_capacity(n);
    let mut colors = Vec::with_capacity(n);
    let mut sizes = Vec::with_capacity(n);

    for i in 0..n {
        let k = (i % arms as usize) as f32;
        let h = sampler.range(params.height_min, params.height_max);
        let jitter = if params.jitter > 0.0 {
            sampler.range(-params.jitter, params.jitter)
        } else {
            0.0
        };
        let angle = h * params.wind_rate + k * arm_phase + jitter;
        let radius = params.radius_at(h);

        target_positions.push(Vec3::new(angle.cos() * radius, h, angle.sin() * radius));
        initial_positions.push(sampler.in_cube(params.scatter_extent));

        let base = palette.cyclic(i);
        let color = match params.secondary_color {
            Some(secondary) if params.secondary_mix > 0.0 => {
                let weight = sampler.range(0.0, params.secondary_mix);
                base.lerp(secondary, weight)
            }
            _ => base,
        };
        colors.push(color);
        sizes.push(sampler.range(params.size_min, params.size_max));
    }

    let centroid = if n > 0 {
        target_positions.iter().copied().sum::<Vec3>() / n as f32
    } else {
        Vec3::ZERO
    };

    Formation {
        initial_positions,
        target_positions,
        colors,
        sizes,
        centroid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crisp(n: usize, arms: u32) -> FormationParams {
        FormationParams {
            particle_count: n,
            arm_count: arms,
            jitter: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_lengths_match() {
        let f = generate(&crisp(257, 5), &Palette::festive(), &mut Sampler::new(Some(1)));
        assert_eq!(f.initial_positions.len(), 257);
        assert_eq!(f.target_positions.len(), 257);
        assert_eq!(f.colors.len(), 257);
        assert_eq!(f.sizes.len(), 257);
    }

    #[test]
    fn test_heights_within_range() {
        let params = crisp(500, 4);
        let f = generate(&params, &Palette::festive(), &mut Sampler::new(Some(2)));
        for t in &f.target_positions {
            assert!(t.y >= params.height_min && t.y <= params.height_max);
        }
    }

    #[test]
    fn test_arm_phase_offsets() {
        // With no jitter, the angle minus the height twist identifies the arm.
        let params = crisp(40, 4);
        let f = generate(&params, &Palette::festive(), &mut Sampler::new(Some(3)));
        for (i, t) in f.target_positions.iter().enumerate() {
            let angle = t.z.atan2(t.x);
            let expected = t.y * params.wind_rate + (i % 4) as f32 * TAU / 4.0;
            let diff = (angle - expected).rem_euclid(TAU);
            assert!(diff < 1e-3 || diff > TAU - 1e-3, "particle {} off its arm", i);
        }
    }

    #[test]
    fn test_scatter_within_extent() {
        let params = crisp(300, 3);
        let f = generate(&params, &Palette::festive(), &mut Sampler::new(Some(4)));
        for p in &f.initial_positions {
            assert!(p.abs().max_element() <= params.scatter_extent);
        }
    }

    #[test]
    fn test_colors_cycle_palette_without_secondary() {
        let params = FormationParams {
            particle_count: 12,
            secondary_color: None,
            ..Default::default()
        };
        let palette = Palette::festive();
        let f = generate(&params, &palette, &mut Sampler::new(Some(5)));
        for (i, c) in f.colors.iter().enumerate() {
            assert_eq!(*c, palette.cyclic(i));
        }
    }

    #[test]
    fn test_sizes_within_range() {
        let params = crisp(100, 4);
        let f = generate(&params, &Palette::festive(), &mut Sampler::new(Some(6)));
        assert!(f
            .sizes
            .iter()
            .all(|s| *s >= params.size_min && *s <= params.size_max));
    }

    #[test]
    fn test_empty_formation() {
        let f = generate(&crisp(0, 4), &Palette::festive(), &mut Sampler::new(Some(7)));
        assert!(f.is_empty());
        assert_eq!(f.centroid, Vec3::ZERO);
    }
}
