//! Exponentially decayed spectral trail for mandala-style displays.

use super::colormap::ColormapId;

/// Opacity of the trail layer (drawn first)
pub const TRAIL_ALPHA: f32 = 0.35;

/// Opacity of the instantaneous spectrum (drawn on top)
pub const SPECTRUM_ALPHA: f32 = 0.9;

/// Layered spectral plot: trail underneath, instantaneous spectrum on top
#[derive(Debug, Clone, PartialEq)]
pub struct MandalaPlot {
    pub trail: Vec<f64>,
    pub spectrum: Vec<f64>,
    pub colormap: ColormapId,
    pub trail_alpha: f32,
    pub spectrum_alpha: f32,
}

/// Accumulator `trail = decay * trail_prev + (1 - decay) * spectrum`
#[derive(Debug, Clone, Default)]
pub struct SpectralTrail {
    buffer: Option<Vec<f64>>,
}

impl SpectralTrail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current trail, if any spectrum has been folded in yet
    pub fn buffer(&self) -> Option<&[f64]> {
        self.buffer.as_deref()
    }

    /// Fold a spectrum into the trail and return the updated trail.
    ///
    /// The previous trail starts at zeros and restarts from zeros whenever
    /// the spectrum length changes.
    pub fn update(&mut self, spectrum: &[f64], decay: f64) -> Vec<f64> {
        let buffer = match self.buffer.take() {
            Some(previous) if previous.len() == spectrum.len() => previous,
            _ => vec![0.0; spectrum.len()],
        };

        let trail: Vec<f64> = buffer
            .iter()
            .zip(spectrum)
            .map(|(prev, value)| decay * prev + (1.0 - decay) * value)
            .collect();

        self.buffer = Some(trail.clone());
        trail
    }
}
