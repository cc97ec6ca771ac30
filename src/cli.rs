//! Command-line argument parsing.

use std::fs;
use std::path::PathBuf;

use clap::Parser;

use crate::error::Result;
use crate::params::{HelixDefaults, ScrollAxis};
use crate::session::{EvolutionMode, Interaction};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "psi-helix")]
#[command(about = "Evolving ψ-field rendered to false-color frames and tones", long_about = None)]
pub struct Args {
    /// Number of ticks to run
    #[arg(long, default_value_t = 60)]
    pub ticks: u64,

    /// Animation time advanced per tick (seconds)
    #[arg(long, value_name = "SECONDS", default_value_t = 0.1)]
    pub dt: f64,

    /// JSON defaults file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Field size (cells per side), overrides the defaults file
    #[arg(long)]
    pub size: Option<usize>,

    /// RNG seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Evolution mode: diffuse (default), flow
    #[arg(long, value_name = "MODE", default_value = "diffuse")]
    pub mode: String,

    /// Cells shifted per tick in flow mode
    #[arg(long, value_name = "CELLS", default_value_t = 1, allow_hyphen_values = true)]
    pub flow_shift: isize,

    /// Perturb a random cell every N ticks
    #[arg(long, value_name = "N")]
    pub surprise_every: Option<u64>,

    /// Zero the field at this tick
    #[arg(long, value_name = "TICK")]
    pub reset_at: Option<u64>,

    #[arg(long)]
    pub zoom: Option<f64>,
    #[arg(long)]
    pub harmony: Option<f64>,
    #[arg(long)]
    pub prana: Option<f64>,
    #[arg(long)]
    pub resilience: Option<f64>,
    #[arg(long)]
    pub drishti: Option<f64>,
    #[arg(long)]
    pub klesha: Option<f64>,

    /// Disable the standing-wave ripple overlay
    #[arg(long)]
    pub no_ripple: bool,

    /// Disable the shimmer pulse
    #[arg(long)]
    pub no_shimmer: bool,

    /// Audio output: off (default), wav, live
    #[arg(long, value_name = "MODE", default_value = "off")]
    pub audio: String,

    /// Length of each tone (seconds)
    #[arg(long, value_name = "SECONDS")]
    pub tone_duration: Option<f64>,

    /// Write images every N ticks
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub frame_every: u64,

    /// Output directory for frames and tones
    #[arg(long, value_name = "DIR", default_value = "helix_output")]
    pub output: PathBuf,

    /// Load a saved field before the first tick
    #[arg(long, value_name = "FILE")]
    pub load: Option<PathBuf>,

    /// Save the field after the last tick
    #[arg(long, value_name = "FILE")]
    pub save: Option<PathBuf>,
}

/// Where audio goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioMode {
    Off,
    Wav,
    Live,
}

impl Args {
    /// Defaults file (if any) with command-line overrides applied.
    ///
    /// Modulation values are clamped into their declared ranges here,
    /// since this is where they enter the system.
    pub fn build_defaults(&self) -> Result<HelixDefaults> {
        let mut defaults = match &self.config {
            Some(path) => HelixDefaults::load(path)?,
            None => HelixDefaults::default(),
        };

        if let Some(size) = self.size {
            defaults.field.size = size;
        }
        if self.seed.is_some() {
            defaults.field.seed = self.seed;
        }
        if let Some(duration) = self.tone_duration {
            defaults.tone.duration_s = duration;
        }
        if self.no_ripple {
            defaults.render.ripple = false;
        }
        if self.no_shimmer {
            defaults.render.shimmer = false;
        }

        let m = &mut defaults.modulation;
        for (slot, value) in [
            (&mut m.zoom, self.zoom),
            (&mut m.harmony, self.harmony),
            (&mut m.prana, self.prana),
            (&mut m.resilience, self.resilience),
            (&mut m.drishti, self.drishti),
            (&mut m.klesha, self.klesha),
        ] {
            if let Some(value) = value {
                *slot = value;
            }
        }
        defaults.modulation = defaults.modulation.clamped();

        Ok(defaults)
    }

    /// Parse evolution mode from command-line arguments
    pub fn parse_mode(&self) -> EvolutionMode {
        match self.mode.to_lowercase().as_str() {
            "diffuse" => {
                println!("Mode: Diffuse (Gaussian noise)");
                EvolutionMode::Diffuse
            }
            "flow" => {
                println!("Mode: Flow (shift {} per tick, harmonic echo)", self.flow_shift);
                EvolutionMode::Flow {
                    axis: ScrollAxis::Columns,
                    shift: self.flow_shift,
                }
            }
            other => {
                eprintln!("Warning: Unknown mode '{}', using diffuse", other);
                EvolutionMode::Diffuse
            }
        }
    }

    /// Parse audio output mode from command-line arguments
    pub fn parse_audio(&self) -> AudioMode {
        match self.audio.to_lowercase().as_str() {
            "off" => AudioMode::Off,
            "wav" => AudioMode::Wav,
            "live" => AudioMode::Live,
            other => {
                eprintln!("Warning: Unknown audio mode '{}', audio off", other);
                AudioMode::Off
            }
        }
    }

    /// Scripted interactions for a tick (the headless stand-in for buttons)
    pub fn interactions_for(&self, tick: u64) -> Vec<Interaction> {
        let mut interactions = Vec::new();

        if tick == 0 {
            if let Some(path) = &self.load {
                interactions.push(Interaction::Load(path.clone()));
            }
        }
        if self.reset_at == Some(tick) {
            interactions.push(Interaction::Reset);
        }
        if let Some(every) = self.surprise_every.filter(|&n| n > 0) {
            if tick > 0 && tick % every == 0 {
                interactions.push(Interaction::Surprise);
            }
        }
        interactions
    }

    /// Whether images should be written for this tick
    pub fn writes_frame(&self, tick: u64) -> bool {
        tick % self.frame_every.max(1) == 0
    }

    /// Frame directory path
    pub fn frames_dir(&self) -> PathBuf {
        self.output.join("frames")
    }

    /// Tone directory path
    pub fn tones_dir(&self) -> PathBuf {
        self.output.join("tones")
    }

    /// Create output directories
    pub fn create_output_dirs(&self) -> Result<()> {
        fs::create_dir_all(self.frames_dir())?;
        if self.parse_audio() == AudioMode::Wav {
            fs::create_dir_all(self.tones_dir())?;
        }
        Ok(())
    }
}
