//! Field renderer: frame preparation, palette cycling and spectral trail.

use ndarray::{Array2, ArrayView2};

use super::colormap::{ColorScheme, ColormapId, Palette};
use super::frame::{prepare_frame, Frame};
use super::trail::{MandalaPlot, SpectralTrail, SPECTRUM_ALPHA, TRAIL_ALPHA};
use crate::field::FieldSnapshot;
use crate::params::{ModulationParameters, RenderConfig};

/// Uninitialized until the first update; ready from then on
#[derive(Debug, Clone)]
enum RendererState {
    Uninitialized,
    Ready(Frame),
}

/// Maps field snapshots to displayable frames and mandala plots
pub struct FieldRenderer {
    config: RenderConfig,
    state: RendererState,
    frame_index: usize,
    trail: SpectralTrail,
    modulation: ModulationParameters,
}

impl FieldRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            state: RendererState::Uninitialized,
            frame_index: 0,
            trail: SpectralTrail::new(),
            modulation: ModulationParameters::default(),
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Toggle the standing-wave ripple ("resonance feedback")
    pub fn set_ripple(&mut self, enabled: bool) {
        self.config.ripple = enabled;
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, RendererState::Ready(_))
    }

    /// Index the next rendered frame will get
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Displayable array for `field` at time `time_s` (pure)
    pub fn prepare_frame(
        &self,
        field: ArrayView2<'_, f64>,
        modulation: &ModulationParameters,
        time_s: f64,
    ) -> Array2<f64> {
        prepare_frame(field, modulation, time_s, &self.config)
    }

    pub fn select_palette(&self, frame_index: usize) -> Palette {
        Palette::for_frame(frame_index)
    }

    pub fn select_color_scheme(&self, prana: f64) -> ColorScheme {
        ColorScheme::for_prana(prana)
    }

    fn frame_colormap(&self, frame_index: usize, prana: f64) -> ColormapId {
        if self.config.cycle_palettes {
            ColormapId::Palette(self.select_palette(frame_index))
        } else {
            ColormapId::Scheme(self.select_color_scheme(prana))
        }
    }

    /// Prepare and keep a frame for `snapshot`; the renderer becomes ready
    pub fn update(&mut self, snapshot: &FieldSnapshot, time_s: f64) -> Frame {
        let modulation = snapshot.modulation;
        let frame = Frame {
            data: self.prepare_frame(snapshot.field.view(), &modulation, time_s),
            colormap: self.frame_colormap(self.frame_index, modulation.prana),
            frame_index: self.frame_index,
            opacity: 1.0,
        };

        if !self.is_ready() {
            log::debug!("Renderer ready");
        }
        self.modulation = modulation;
        self.frame_index += 1;
        self.state = RendererState::Ready(frame.clone());
        frame
    }

    /// Frame for a secondary echo layer, sharing the last frame's colormap
    pub fn render_echo(&self, echo: ArrayView2<'_, f64>, time_s: f64, opacity: f64) -> Frame {
        let frame_index = self.frame_index.saturating_sub(1);
        Frame {
            data: self.prepare_frame(echo, &self.modulation, time_s),
            colormap: self.frame_colormap(frame_index, self.modulation.prana),
            frame_index,
            opacity: opacity.clamp(0.0, 1.0),
        }
    }

    /// Last prepared frame; `None` (a no-op draw) while uninitialized
    pub fn draw(&self) -> Option<&Frame> {
        match &self.state {
            RendererState::Ready(frame) => Some(frame),
            RendererState::Uninitialized => {
                log::warn!("Renderer inactive: no field data yet");
                None
            }
        }
    }

    /// Fold `spectrum` into the trail and describe the layered plot
    pub fn render_trail(&mut self, spectrum: &[f64], decay: f64) -> MandalaPlot {
        let trail = self.trail.update(spectrum, decay);
        MandalaPlot {
            trail,
            spectrum: spectrum.to_vec(),
            colormap: ColormapId::Scheme(self.select_color_scheme(self.modulation.prana)),
            trail_alpha: TRAIL_ALPHA,
            spectrum_alpha: SPECTRUM_ALPHA,
        }
    }
}
