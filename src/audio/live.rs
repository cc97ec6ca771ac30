//! Live playback on the default output device.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use super::sink::AudioSink;
use super::synthesis::AudioClip;
use crate::error::HelixError;

/// Plays each clip on a detached thread; `stop()` silences it early
#[derive(Default)]
pub struct CpalSink {
    stop_flag: Arc<AtomicBool>,
}

impl CpalSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioSink for CpalSink {
    fn dispatch(&mut self, clip: AudioClip) {
        // Fresh flag per clip so stopping one clip cannot mute the next
        self.stop_flag = Arc::new(AtomicBool::new(false));
        let stop = Arc::clone(&self.stop_flag);

        thread::spawn(move || {
            if let Err(e) = play_clip(clip, stop) {
                log::warn!("Playback failed: {}", e);
            }
        });
    }

    fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }
}

/// Play a clip to completion (or until stopped) on the calling thread
fn play_clip(clip: AudioClip, stop: Arc<AtomicBool>) -> Result<(), HelixError> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| HelixError::Audio("No audio output device found".to_string()))?;

    let config = device
        .default_output_config()
        .map_err(|e| HelixError::Audio(format!("Failed to get audio config: {}", e)))?;

    if config.sample_format() != cpal::SampleFormat::F32 {
        return Err(HelixError::Audio(format!(
            "Unsupported output sample format {:?}",
            config.sample_format()
        )));
    }

    log::debug!(
        "Audio: {} @ {}Hz",
        device.name().unwrap_or_else(|_| "Unknown".to_string()),
        config.sample_rate().0
    );

    let channels = config.channels() as usize;
    let step = clip.sample_rate_hz as f64 / config.sample_rate().0 as f64;
    let playback = Duration::from_secs_f64(clip.duration_s());
    let samples = clip.samples;
    let stop_cb = Arc::clone(&stop);
    let mut position = 0.0_f64;

    let stream = device
        .build_output_stream(
            &config.into(),
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let stopped = stop_cb.load(Ordering::Relaxed);
                for frame in data.chunks_mut(channels) {
                    let value = if stopped {
                        0.0
                    } else {
                        samples.get(position as usize).copied().unwrap_or(0.0)
                    };
                    // Safety limiter: hard clip to ±0.5 to prevent ear damage
                    let value = value.clamp(-0.5, 0.5);
                    for out in frame.iter_mut() {
                        *out = value;
                    }
                    position += step;
                }
            },
            |err| log::warn!("Audio stream error: {}", err),
            None,
        )
        .map_err(|e| HelixError::Audio(format!("Failed to build audio stream: {}", e)))?;

    stream
        .play()
        .map_err(|e| HelixError::Audio(format!("Failed to start audio stream: {}", e)))?;

    // Keep the stream alive until the clip ends or a stop arrives
    let started = Instant::now();
    while started.elapsed() < playback && !stop.load(Ordering::Relaxed) {
        thread::sleep(Duration::from_millis(20));
    }
    Ok(())
}
