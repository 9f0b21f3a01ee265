//! Seeded random sampling for particle initialization.
//!
//! Every random decision in the engine (scatter layout, arm jitter, explode
//! impulses, emitter spawning) goes through one [`Sampler`], so a swarm built
//! with a fixed seed replays identically.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::{PI, TAU};

/// Random source with helpers for common spawn patterns.
///
/// ```ignore
/// let mut sampler = Sampler::new(Some(7));
/// let p = sampler.in_box(Vec3::splat(-1.0), Vec3::splat(1.0));
/// let v = sampler.on_sphere(0.2);
/// ```
#[derive(Debug, Clone)]
pub struct Sampler {
    rng: SmallRng,
}

impl Sampler {
    /// Create a sampler. `None` seeds from the wall clock, so each run differs.
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(42)
        });

        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    // ========== Random primitives ==========

    /// Random f32 between 0.0 and 1.0.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in `[min, max)`. A degenerate range yields `min`.
    #[inline]
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        if max > min {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }

    /// `true` with probability `p` (clamped to `[0, 1]`).
    #[inline]
    pub fn chance(&mut self, p: f32) -> bool {
        self.random() < p.clamp(0.0, 1.0)
    }

    // ========== Position helpers ==========

    /// Uniform point inside the axis-aligned box `[min, max]`.
    pub fn in_box(&mut self, min: Vec3, max: Vec3) -> Vec3 {
        Vec3::new(
            self.range(min.x, max.x),
            self.range(min.y, max.y),
            self.range(min.z, max.z),
        )
    }

    /// Uniform point inside a cube of given half-size, centered at origin.
    pub fn in_cube(&mut self, half_size: f32) -> Vec3 {
        self.in_box(Vec3::splat(-half_size), Vec3::splat(half_size))
    }

    // ========== Direction/velocity helpers ==========

    /// Point on a sphere of given radius from spherical coordinates.
    ///
    /// Theta and phi are both uniform, so directions cluster toward the poles.
    pub fn on_sphere(&mut self, radius: f32) -> Vec3 {
        let theta = self.rng.gen_range(0.0..TAU);
        let phi = self.rng.gen_range(0.0..PI);

        Vec3::new(
            radius * phi.sin() * theta.cos(),
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
        )
    }

    /// Vector with each component uniform in `[-magnitude, magnitude)`.
    pub fn symmetric_vector(&mut self, magnitude: f32) -> Vec3 {
        self.in_cube(magnitude)
    }

    // ========== Color helpers ==========

    /// Random color with given saturation and value (HSV model).
    pub fn random_hue(&mut self, saturation: f32, value: f32) -> Vec3 {
        let hue = self.random();
        hsv_to_rgb(hue, saturation, value)
    }
}

/// Convert HSV to RGB.
pub(crate) fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Vec3 {
    let c = v * s;
    let x = c * (1.0 - ((h * 6.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match (h * 6.0) as u32 % 6 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Vec3::new(r + m, g + m, b + m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = Sampler::new(Some(99));
        let mut b = Sampler::new(Some(99));
        for _ in 0..32 {
            assert_eq!(a.random(), b.random());
        }
    }

    #[test]
    fn test_in_box_bounds() {
        let mut s = Sampler::new(Some(1));
        let min = Vec3::new(-2.0, 0.0, 1.0);
        let max = Vec3::new(2.0, 3.0, 1.5);
        for _ in 0..200 {
            let p = s.in_box(min, max);
            assert!(p.cmpge(min).all() && p.cmple(max).all());
        }
    }

    #[test]
    fn test_degenerate_range_returns_min() {
        let mut s = Sampler::new(Some(1));
        assert_eq!(s.range(0.5, 0.5), 0.5);
        assert_eq!(s.range(1.0, 0.0), 1.0);
    }

    #[test]
    fn test_on_sphere_radius() {
        let mut s = Sampler::new(Some(3));
        for _ in 0..100 {
            assert!((s.on_sphere(0.7).length() - 0.7).abs() < 1e-4);
        }
    }

    #[test]
    fn test_chance_extremes() {
        let mut s = Sampler::new(Some(5));
        assert!((0..100).all(|_| !s.chance(0.0)));
        assert!((0..100).all(|_| s.chance(1.0)));
    }

    #[test]
    fn test_hsv_to_rgb() {
        // Red
        let red = hsv_to_rgb(0.0, 1.0, 1.0);
        assert!((red.x - 1.0).abs() < 0.001);
        assert!(red.y < 0.001);
        assert!(red.z < 0.001);
    }
}
