//! Color palettes for the swarm.
//!
//! A [`Palette`] is an ordered list of RGB colors. Formation particles take
//! colors cyclically (`i mod len`), and the active theme color advances one
//! entry at a time when the user swipes.
//!
//! ```ignore
//! let palette = Palette::from_hex(&[0xff4d6d, 0xffd700, 0x00d2ff]);
//! assert_eq!(palette.len(), 3);
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Ordered set of RGB colors (each channel 0.0-1.0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Vec3>", into = "Vec<Vec3>")]
pub struct Palette {
    colors: Vec<Vec3>,
}

impl Palette {
    /// Build a palette from RGB colors. An empty list becomes a single white entry.
    pub fn new(colors: Vec<Vec3>) -> Self {
        if colors.is_empty() {
            return Self { colors: vec![Vec3::ONE] };
        }
        Self { colors }
    }

    /// Build a palette from `0xRRGGBB` values.
    pub fn from_hex(hex: &[u32]) -> Self {
        Self::new(hex.iter().copied().map(hex_to_rgb).collect())
    }

    /// Warm holiday lights: rose, blush, gold, mint, sky, lavender.
    pub fn festive() -> Self {
        Self::from_hex(&[0xff4d6d, 0xffcfdf, 0xffd700, 0x00ff88, 0x00d2ff, 0xbd93f9])
    }

    /// Vibrant cyberpunk colors (pink, cyan, purple).
    pub fn neon() -> Self {
        Self::new(vec![
            Vec3::new(1.0, 0.0, 0.5), // Pink
            Vec3::new(0.5, 0.0, 1.0), // Purple
            Vec3::new(0.0, 0.5, 1.0), // Blue
            Vec3::new(0.0, 1.0, 1.0), // Cyan
            Vec3::new(0.5, 1.0, 0.5), // Green
        ])
    }

    /// White through light blue to deep blue.
    pub fn ice() -> Self {
        Self::new(vec![
            Vec3::new(1.0, 1.0, 1.0), // White
            Vec3::new(0.8, 0.9, 1.0), // Light blue
            Vec3::new(0.4, 0.7, 1.0), // Blue
            Vec3::new(0.1, 0.4, 0.8), // Medium blue
            Vec3::new(0.0, 0.1, 0.4), // Dark blue
        ])
    }

    /// Number of colors (always at least 1).
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at `index`, wrapping around.
    #[inline]
    pub fn cyclic(&self, index: usize) -> Vec3 {
        self.colors[index % self.colors.len()]
    }

    /// All colors in order.
    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::festive()
    }
}

impl From<Vec<Vec3>> for Palette {
    fn from(colors: Vec<Vec3>) -> Self {
        Self::new(colors)
    }
}

impl From<Palette> for Vec<Vec3> {
    fn from(palette: Palette) -> Self {
        palette.colors
    }
}

/// Convert `0xRRGGBB` to RGB floats in `[0, 1]`.
pub fn hex_to_rgb(hex: u32) -> Vec3 {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    Vec3::new(r, g, b)
}
