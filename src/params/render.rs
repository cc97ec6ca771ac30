//! Rendering configuration.

use serde::{Deserialize, Serialize};

/// Rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Pulse frame intensity with 0.2*sin(2t) + 0.8
    pub shimmer: bool,

    /// Overlay the standing-wave ripple ("resonance feedback")
    pub ripple: bool,

    /// Ripple amplitude relative to the field range
    pub ripple_weight: f64,

    /// Spectral trail decay per frame (0 = no memory, 1 = frozen)
    pub trail_decay: f64,

    /// Cycle palettes per frame; otherwise color by prana band
    pub cycle_palettes: bool,

    /// Pixels per field cell in rasterized frames
    pub cell_scale: u32,

    /// Mandala canvas side (pixels)
    pub mandala_size: u32,

    /// Rotational copies of the spectrum petal in the mandala
    pub mandala_symmetry: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            shimmer: true,
            ripple: true,
            ripple_weight: 0.1,
            trail_decay: 0.9,
            cycle_palettes: true,
            cell_scale: 8,
            mandala_size: 512,
            mandala_symmetry: 6,
        }
    }
}
