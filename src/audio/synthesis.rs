//! Tone synthesis: base tone plus harmonics, shaped by modulation sliders.

use std::f64::consts::PI;

use super::wav::encode_wav;
use crate::error::Result;
use crate::params::ToneConfig;

/// The three sliders the synthesizer listens to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneModulation {
    pub zoom: f64,
    pub harmony: f64,
    pub prana: f64,
}

impl Default for ToneModulation {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            harmony: 0.5,
            prana: 0.5,
        }
    }
}

/// Status-display values derived from the field alone (no audio emitted)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resonance {
    /// base_frequency + mean(field) * resonance_scale
    pub frequency_hz: f64,

    /// first harmonic / base_frequency (None without harmonics)
    pub harmonic_ratio: Option<f64>,
}

/// Snapshot of everything that determines the next tone
#[derive(Debug, Clone, PartialEq)]
pub struct ToneState {
    pub base_frequency_hz: f64,
    pub harmonics_hz: Vec<f64>,
    pub sample_rate_hz: u32,
    pub duration_s: f64,
    pub volume: f64,
    pub last_modulation: ToneModulation,
    pub resonance: Resonance,
}

/// A rendered tone ready for an audio sink
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub sample_rate_hz: u32,
    pub samples: Vec<f32>,
    /// Same samples as a mono 32-bit float WAV file
    pub wav: Vec<u8>,
}

impl AudioClip {
    pub fn duration_s(&self) -> f64 {
        if self.sample_rate_hz == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate_hz as f64
    }
}

/// Derives waveforms from modulation parameters
pub struct ToneSynthesizer {
    config: ToneConfig,
    modulation: ToneModulation,
    stopped: bool,
}

impl ToneSynthesizer {
    pub fn new(config: ToneConfig) -> Self {
        Self {
            config,
            modulation: ToneModulation::default(),
            stopped: false,
        }
    }

    pub fn config(&self) -> &ToneConfig {
        &self.config
    }

    /// Store the modulation sliders (no validation)
    pub fn set_modulation(&mut self, zoom: f64, harmony: f64, prana: f64) {
        self.modulation = ToneModulation {
            zoom,
            harmony,
            prana,
        };
    }

    pub fn modulation(&self) -> ToneModulation {
        self.modulation
    }

    /// Base frequency bent by zoom: ±20% per unit away from 1.0
    pub fn base_frequency(&self) -> f64 {
        self.config.base_frequency_hz * (1.0 + 0.2 * (self.modulation.zoom - 1.0))
    }

    pub fn harmony_factor(&self) -> f64 {
        1.0 + (self.modulation.harmony - 0.5)
    }

    pub fn prana_factor(&self) -> f64 {
        1.0 + 0.3 * (self.modulation.prana - 0.5)
    }

    /// Frequency of the primary tone (Hz)
    pub fn primary_frequency(&self) -> f64 {
        self.base_frequency() * self.harmony_factor()
    }

    /// Frequencies of the harmonic tones (Hz)
    pub fn harmonic_frequencies(&self) -> Vec<f64> {
        let factor = self.prana_factor();
        self.config
            .harmonics_hz
            .iter()
            .map(|h| h * factor)
            .collect()
    }

    /// Number of samples in a tone of `duration_s` seconds
    pub fn sample_count(&self, duration_s: f64) -> usize {
        if !(duration_s.is_finite() && duration_s > 0.0) {
            return 0;
        }
        (self.config.sample_rate_hz as f64 * duration_s).floor() as usize
    }

    /// Sum of primary and harmonic sinusoids, normalized to `volume` peak.
    ///
    /// A waveform with zero peak or any non-finite sample comes back as
    /// silence of the same length.
    pub fn generate_wave(&self, duration_s: f64) -> Vec<f64> {
        let len = self.sample_count(duration_s);
        let sample_rate = self.config.sample_rate_hz as f64;

        let mut tones = Vec::with_capacity(1 + self.config.harmonics_hz.len());
        tones.push(self.primary_frequency());
        tones.extend(self.harmonic_frequencies());

        let mut wave: Vec<f64> = (0..len)
            .map(|i| {
                let t = i as f64 / sample_rate;
                tones.iter().map(|f| (2.0 * PI * f * t).sin()).sum()
            })
            .collect();

        let finite = wave.iter().all(|s| s.is_finite());
        let peak = wave.iter().fold(0.0_f64, |acc, s| acc.max(s.abs()));
        if !finite || peak == 0.0 {
            if len > 0 {
                log::debug!("Degenerate waveform ({} samples), substituting silence", len);
            }
            return vec![0.0; len];
        }

        let scale = self.config.volume;
        for sample in &mut wave {
            *sample = *sample / peak * scale;
        }
        wave
    }

    /// Render a tone and encode it as WAV for an audio sink.
    ///
    /// Does not play anything itself; clears a previous `stop()`.
    pub fn play(&mut self, duration_s: f64) -> Result<AudioClip> {
        self.stopped = false;

        let samples: Vec<f32> = self
            .generate_wave(duration_s)
            .into_iter()
            .map(|s| s as f32)
            .collect();
        let wav = encode_wav(&samples, self.config.sample_rate_hz)?;

        log::debug!(
            "Tone {:.2} Hz + {} harmonics, {} samples",
            self.primary_frequency(),
            self.config.harmonics_hz.len(),
            samples.len()
        );

        Ok(AudioClip {
            sample_rate_hz: self.config.sample_rate_hz,
            samples,
            wav,
        })
    }

    /// Advisory: request that playback halts
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Clear a pending stop without rendering a tone
    pub fn resume(&mut self) {
        self.stopped = false;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Resonance display values for a field with the given mean intensity
    pub fn resonance(&self, field_mean: f64) -> Resonance {
        let base = self.config.base_frequency_hz;
        let harmonic_ratio = self
            .config
            .harmonics_hz
            .first()
            .filter(|_| base != 0.0)
            .map(|h| h / base);

        Resonance {
            frequency_hz: base + field_mean * self.config.resonance_scale_hz,
            harmonic_ratio,
        }
    }

    pub fn state(&self, field_mean: f64) -> ToneState {
        ToneState {
            base_frequency_hz: self.config.base_frequency_hz,
            harmonics_hz: self.config.harmonics_hz.clone(),
            sample_rate_hz: self.config.sample_rate_hz,
            duration_s: self.config.duration_s,
            volume: self.config.volume,
            last_modulation: self.modulation,
            resonance: self.resonance(field_mean),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(wave: &[f64]) -> f64 {
        wave.iter().fold(0.0_f64, |acc, s| acc.max(s.abs()))
    }

    #[test]
    fn test_neutral_primary_is_base_frequency() {
        let mut synth = ToneSynthesizer::new(ToneConfig::default());
        synth.set_modulation(1.0, 0.5, 0.5);

        assert_eq!(synth.harmony_factor(), 1.0);
        assert_eq!(synth.prana_factor(), 1.0);
        assert_eq!(synth.primary_frequency(), 136.1);
        assert_eq!(synth.harmonic_frequencies(), vec![272.2, 408.3]);
    }

    #[test]
    fn test_modulation_bends_frequencies() {
        let mut synth = ToneSynthesizer::new(ToneConfig::default());
        synth.set_modulation(2.0, 1.0, 1.0);

        // base = 136.1 * 1.2, harmony factor 1.5, prana factor 1.15
        assert!((synth.primary_frequency() - 136.1 * 1.2 * 1.5).abs() < 1e-9);
        assert!((synth.harmonic_frequencies()[0] - 272.2 * 1.15).abs() < 1e-9);
    }

    #[test]
    fn test_wave_length_and_normalization() {
        let mut synth = ToneSynthesizer::new(ToneConfig::default());
        synth.set_modulation(1.3, 0.8, 0.2);

        let wave = synth.generate_wave(0.5);
        assert_eq!(wave.len(), 22050);
        assert!((peak(&wave) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_zero_duration_is_empty() {
        let synth = ToneSynthesizer::new(ToneConfig::default());
        assert!(synth.generate_wave(0.0).is_empty());
        assert!(synth.generate_wave(-1.0).is_empty());
        assert!(synth.generate_wave(f64::NAN).is_empty());
        // Shorter than one sample period
        assert!(synth.generate_wave(1e-6).is_empty());
    }

    #[test]
    fn test_cancelling_tones_are_silent() {
        // harmony 0.5 / zoom 1 gives 100 Hz; a -100 Hz harmonic cancels it
        let config = ToneConfig {
            base_frequency_hz: 100.0,
            harmonics_hz: vec![-100.0],
            ..ToneConfig::default()
        };
        let mut synth = ToneSynthesizer::new(config);
        synth.set_modulation(1.0, 0.5, 0.5);

        let wave = synth.generate_wave(0.1);
        assert_eq!(wave.len(), 4410);
        assert!(wave.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_non_finite_parameters_are_silent() {
        let mut synth = ToneSynthesizer::new(ToneConfig::default());
        synth.set_modulation(f64::NAN, 0.5, 0.5);

        let wave = synth.generate_wave(0.01);
        assert!(!wave.is_empty());
        assert!(wave.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_play_produces_wav_and_clears_stop() {
        let mut synth = ToneSynthesizer::new(ToneConfig::default());
        synth.stop();
        assert!(synth.is_stopped());

        let clip = synth.play(0.25).unwrap();
        assert!(!synth.is_stopped());
        assert_eq!(clip.samples.len(), 11025);
        assert_eq!(&clip.wav[..4], b"RIFF");
        assert!((clip.duration_s() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_resonance_display() {
        let synth = ToneSynthesizer::new(ToneConfig::default());
        let resonance = synth.resonance(0.5);

        assert!((resonance.frequency_hz - 141.1).abs() < 1e-9);
        assert!((resonance.harmonic_ratio.unwrap() - 2.0).abs() < 1e-12);

        let bare = ToneSynthesizer::new(ToneConfig {
            harmonics_hz: vec![],
            ..ToneConfig::default()
        });
        assert_eq!(bare.resonance(0.0).harmonic_ratio, None);
    }
}
