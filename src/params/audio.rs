//! Tone synthesis configuration.

use serde::{Deserialize, Serialize};

/// Tone synthesis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneConfig {
    /// Base tone frequency (Hz)
    pub base_frequency_hz: f64,

    /// Harmonic tone frequencies (Hz), each scaled by the prana factor
    pub harmonics_hz: Vec<f64>,

    /// Audio sample rate (Hz)
    pub sample_rate_hz: u32,

    /// Length of a generated tone (seconds)
    pub duration_s: f64,

    /// Peak amplitude after normalization
    pub volume: f64,

    /// Resonance display: Hz added per unit of mean field intensity
    pub resonance_scale_hz: f64,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            base_frequency_hz: 136.1, // "Om" tone
            harmonics_hz: vec![272.2, 408.3],
            sample_rate_hz: 44100,
            duration_s: 1.0,
            volume: 0.4,
            resonance_scale_hz: 10.0,
        }
    }
}
