//! Field evolution parameters.

use serde::{Deserialize, Serialize};

/// Axis along which a field is cyclically shifted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollAxis {
    /// Shift moves whole rows (numpy axis 0)
    Rows,
    /// Shift moves whole columns (numpy axis 1)
    Columns,
}

/// Field size and evolution parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Grid resolution (cells per side, 64 or 128 in practice)
    pub size: usize,

    /// Gaussian diffusion noise standard deviation per tick
    pub noise_std: f64,

    /// Uniform range of a "surprise" perturbation increment
    pub perturb_range: (f64, f64),

    /// RNG seed (None = OS entropy)
    pub seed: Option<u64>,

    /// Flow mode: multiplicative decay per tick
    pub scroll_decay: f64,

    /// Flow mode: weight of fresh uniform noise per tick
    pub scroll_noise_weight: f64,

    /// Echo layer: peak shift in cells, scaled by sin(phase)
    pub echo_amplitude: f64,

    /// Echo layer: axis the delayed view is shifted along
    pub echo_axis: ScrollAxis,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            size: 64,
            noise_std: 0.005,
            perturb_range: (0.1, 1.0),
            seed: None,
            scroll_decay: 0.97,
            scroll_noise_weight: 0.03,
            echo_amplitude: 5.0,
            echo_axis: ScrollAxis::Columns,
        }
    }
}

impl FieldConfig {
    /// Field shape as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.size, self.size)
    }
}
