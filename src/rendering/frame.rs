//! Frame preparation: shimmer, standing-wave ripple and clipping.

use std::f64::consts::TAU;

use ndarray::{Array1, Array2, ArrayView2};

use super::colormap::ColormapId;
use crate::params::{ModulationParameters, RenderConfig};

/// A displayable frame: values in [0, 1] plus the colormap to show them with
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub data: Array2<f64>,
    pub colormap: ColormapId,
    pub frame_index: usize,
    /// Layer opacity when composited over another frame
    pub opacity: f64,
}

/// Shimmer intensity at time `t`: oscillates in [0.6, 1.0]
pub fn shimmer_factor(time_s: f64) -> f64 {
    0.2 * (2.0 * time_s).sin() + 0.8
}

/// Outer product of two phase-shifted sinusoids spanning the grid.
///
/// `a[i] = sin(2π·zoom·i/rows + t)`, `b[j] = cos(2π·zoom·j/cols − t)`
pub fn ripple_pattern(shape: (usize, usize), zoom: f64, time_s: f64) -> Array2<f64> {
    let (rows, cols) = shape;
    let a = Array1::from_shape_fn(rows, |i| (TAU * zoom * i as f64 / rows as f64 + time_s).sin());
    let b = Array1::from_shape_fn(cols, |j| (TAU * zoom * j as f64 / cols as f64 - time_s).cos());
    Array2::from_shape_fn(shape, |(i, j)| a[i] * b[j])
}

/// Compute the displayable array for a field; the input is not modified
pub fn prepare_frame(
    field: ArrayView2<'_, f64>,
    modulation: &ModulationParameters,
    time_s: f64,
    config: &RenderConfig,
) -> Array2<f64> {
    let shimmer = if config.shimmer {
        shimmer_factor(time_s)
    } else {
        1.0
    };
    let mut frame = field.mapv(|v| v * shimmer);

    if config.ripple {
        let ripple = ripple_pattern(frame.dim(), modulation.zoom, time_s);
        let weight = config.ripple_weight;
        frame.zip_mut_with(&ripple, |value, r| *value += weight * r);
    }

    frame.mapv_inplace(|v| v.clamp(0.0, 1.0));
    frame
}
