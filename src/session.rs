//! Session: owns all per-user state and runs the per-tick update loop.
//!
//! Each tick applies the interactions collected since the last tick,
//! advances the field, then derives the frame, echo layer, mandala and tone.
//! Sessions share nothing; two sessions never see each other's field.

use std::path::PathBuf;

use crate::audio::{AudioClip, AudioSink, NullSink, ToneState, ToneSynthesizer};
use crate::field::{FieldState, Perturbation};
use crate::params::{HelixDefaults, ModulationParameters, ScrollAxis};
use crate::rendering::{field_spectrum, FieldRenderer, Frame, MandalaPlot};

/// How the field advances each tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EvolutionMode {
    /// Gaussian diffusion with clipping
    Diffuse,
    /// Scroll-and-decay flow plus a harmonic echo layer
    Flow { axis: ScrollAxis, shift: isize },
}

/// User input collected between ticks
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    /// "Surprise me": perturb a random cell
    Surprise,
    /// Perturb a specific cell by a fixed increment
    SurpriseAt { row: usize, col: usize, increment: f64 },
    /// Zero the field
    Reset,
    SetModulation(ModulationParameters),
    /// Toggle the ripple overlay ("resonance feedback")
    SetRipple(bool),
    /// Enable or disable tone dispatch
    SetAudio(bool),
    /// Advisory stop of the current tone
    StopAudio,
    Save(PathBuf),
    Load(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// User-visible message produced while applying interactions
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Everything one tick produced for the display and audio collaborators
#[derive(Debug, Clone)]
pub struct TickOutput {
    pub tick: u64,
    pub frame: Frame,
    /// Harmonic echo layer (flow mode only)
    pub echo: Option<Frame>,
    pub mandala: MandalaPlot,
    pub tone: ToneState,
    /// Tone dispatched this tick, if audio is enabled
    pub clip: Option<AudioClip>,
    pub perturbations: Vec<Perturbation>,
    pub notices: Vec<Notice>,
}

/// Per-session context: field, synthesizer, renderer and audio sink
pub struct Session {
    field: FieldState,
    tone: ToneSynthesizer,
    renderer: FieldRenderer,
    modulation: ModulationParameters,
    mode: EvolutionMode,
    sink: Box<dyn AudioSink>,
    audio_enabled: bool,

    // Diffusion std-dev used when klesha is zero
    base_noise_std: f64,

    // Time tracking
    clock_s: f64,
    tick: u64,
}

impl Session {
    /// Create a session in diffuse mode with audio disabled
    pub fn new(defaults: HelixDefaults) -> Self {
        let base_noise_std = defaults.field.noise_std;
        Self {
            field: FieldState::new(defaults.field),
            tone: ToneSynthesizer::new(defaults.tone),
            renderer: FieldRenderer::new(defaults.render),
            modulation: defaults.modulation,
            mode: EvolutionMode::Diffuse,
            sink: Box::new(NullSink),
            audio_enabled: false,
            base_noise_std,
            clock_s: 0.0,
            tick: 0,
        }
    }

    pub fn with_mode(mut self, mode: EvolutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Route tones to `sink` and enable audio dispatch
    pub fn with_sink(mut self, sink: Box<dyn AudioSink>) -> Self {
        self.sink = sink;
        self.audio_enabled = true;
        self
    }

    pub fn field(&self) -> &FieldState {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut FieldState {
        &mut self.field
    }

    pub fn renderer(&self) -> &FieldRenderer {
        &self.renderer
    }

    pub fn tone(&self) -> &ToneSynthesizer {
        &self.tone
    }

    pub fn modulation(&self) -> &ModulationParameters {
        &self.modulation
    }

    pub fn mode(&self) -> EvolutionMode {
        self.mode
    }

    pub fn audio_enabled(&self) -> bool {
        self.audio_enabled
    }

    /// Seconds of animation time elapsed
    pub fn clock(&self) -> f64 {
        self.clock_s
    }

    /// Run one tick: apply interactions, evolve, derive outputs
    pub fn tick(&mut self, dt_s: f64, interactions: &[Interaction]) -> TickOutput {
        let mut notices = Vec::new();
        let mut perturbations = Vec::new();

        for interaction in interactions {
            match interaction {
                Interaction::Surprise => perturbations.extend(self.field.perturb()),
                Interaction::SurpriseAt {
                    row,
                    col,
                    increment,
                } => perturbations.extend(self.field.perturb_at(*row, *col, *increment)),
                Interaction::Reset => self.field.reset(),
                Interaction::SetModulation(modulation) => self.modulation = *modulation,
                Interaction::SetRipple(enabled) => self.renderer.set_ripple(*enabled),
                Interaction::SetAudio(enabled) => self.audio_enabled = *enabled,
                Interaction::StopAudio => {
                    self.tone.stop();
                    self.sink.stop();
                }
                Interaction::Save(path) => match self.field.save_archive(path) {
                    Ok(()) => {
                        notices.push(Notice::info(format!("Saved field to {}", path.display())))
                    }
                    Err(e) => notices.push(Notice::error(format!("Save failed: {}", e))),
                },
                Interaction::Load(path) => match self.field.load_archive(path) {
                    Ok(()) => {
                        notices.push(Notice::info(format!("Loaded field from {}", path.display())))
                    }
                    Err(e) if e.is_informational() => notices.push(Notice::info(e.to_string())),
                    Err(e) => {
                        log::warn!("Load failed: {}", e);
                        notices.push(Notice::error(format!("Load failed: {}", e)));
                    }
                },
            }
        }

        // Advance the field
        let noise_std = if self.modulation.klesha > 0.0 {
            self.modulation.klesha
        } else {
            self.base_noise_std
        };
        self.field.set_noise_std(noise_std);
        match self.mode {
            EvolutionMode::Diffuse => self.field.evolve(),
            EvolutionMode::Flow { axis, shift } => self.field.flow(axis, shift),
        }

        if dt_s.is_finite() && dt_s > 0.0 {
            self.clock_s += dt_s;
        }
        let time_s = self.clock_s;

        // Tone parameters from modulation, resonance from field statistics
        let m = self.modulation;
        self.tone.set_modulation(m.zoom, m.harmony, m.prana);
        let tone = self.tone.state(self.field.mean());

        // Frames
        let frame = self.renderer.update(&self.field.snapshot(m), time_s);
        let echo = match self.mode {
            EvolutionMode::Flow { .. } => {
                let delayed = self.field.derive_delayed_view(time_s);
                Some(self.renderer.render_echo(delayed.view(), time_s, m.drishti))
            }
            EvolutionMode::Diffuse => None,
        };

        let spectrum = field_spectrum(self.field.field().view());
        let decay = self.renderer.config().trail_decay;
        let mandala = self.renderer.render_trail(&spectrum, decay);

        // Audio hand-off: one-way, never waited on. A stop silences this tick only.
        let clip = if self.tone.is_stopped() {
            self.tone.resume();
            None
        } else if self.audio_enabled {
            let duration_s = self.tone.config().duration_s;
            match self.tone.play(duration_s) {
                Ok(clip) => {
                    self.sink.dispatch(clip.clone());
                    Some(clip)
                }
                Err(e) => {
                    notices.push(Notice::error(format!("Tone encoding failed: {}", e)));
                    None
                }
            }
        } else {
            None
        };

        log::debug!(
            "Tick {}: mean {:.4}, resonance {:.2} Hz",
            self.tick,
            self.field.mean(),
            tone.resonance.frequency_hz
        );

        let output = TickOutput {
            tick: self.tick,
            frame,
            echo,
            mandala,
            tone,
            clip,
            perturbations,
            notices,
        };
        self.tick += 1;
        output
    }
}
