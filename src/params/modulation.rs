//! User-facing modulation sliders.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Declared slider ranges (inclusive)
pub mod ranges {
    use std::ops::RangeInclusive;

    pub const ZOOM: RangeInclusive<f64> = 0.5..=2.0;
    pub const HARMONY: RangeInclusive<f64> = 0.0..=2.0;
    pub const PRANA: RangeInclusive<f64> = 0.0..=1.0;
    pub const RESILIENCE: RangeInclusive<f64> = 0.0..=2.0;
    pub const DRISHTI: RangeInclusive<f64> = 0.0..=1.0;
    pub const KLESHA: RangeInclusive<f64> = 0.0..=0.01;
}

/// Modulation parameters shaping both rendering and tone synthesis.
///
/// These are plain configuration values. Range enforcement belongs to
/// whoever collects them (see [`ModulationParameters::clamped`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModulationParameters {
    /// Spatial zoom; also bends the base tone by ±20% per unit away from 1.0
    pub zoom: f64,

    /// Primary tone factor, neutral at 0.5
    pub harmony: f64,

    /// Harmonic factor and color scheme band, neutral at 0.5
    pub prana: f64,

    /// Carried for the host; not read by the field, tone or renderer
    pub resilience: f64,

    /// Opacity of the harmonic echo layer in flow mode
    pub drishti: f64,

    /// Diffusion noise std-dev override (0 keeps the configured value)
    pub klesha: f64,
}

impl Default for ModulationParameters {
    fn default() -> Self {
        Self {
            zoom: 1.0228,
            harmony: 0.5,
            prana: 0.5,
            resilience: 1.0,
            drishti: 0.5,
            klesha: 0.0,
        }
    }
}

impl ModulationParameters {
    /// Neutral parameters: every tone factor equals 1.0
    pub fn neutral() -> Self {
        Self {
            zoom: 1.0,
            ..Self::default()
        }
    }

    /// Clamp every slider into its declared range (NaN falls to the range start)
    pub fn clamped(&self) -> Self {
        Self {
            zoom: clamp_to(self.zoom, ranges::ZOOM),
            harmony: clamp_to(self.harmony, ranges::HARMONY),
            prana: clamp_to(self.prana, ranges::PRANA),
            resilience: clamp_to(self.resilience, ranges::RESILIENCE),
            drishti: clamp_to(self.drishti, ranges::DRISHTI),
            klesha: clamp_to(self.klesha, ranges::KLESHA),
        }
    }
}

fn clamp_to(value: f64, range: RangeInclusive<f64>) -> f64 {
    if value.is_nan() {
        return *range.start();
    }
    value.clamp(*range.start(), *range.end())
}
