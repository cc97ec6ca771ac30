//! Audio sinks: one-way destinations for rendered tones.
//!
//! Dispatch is fire-and-forget. A sink never reports completion and the
//! session never waits on it.

use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};

use super::synthesis::AudioClip;

/// Destination for rendered tones
pub trait AudioSink {
    /// Hand a clip over for playback; must not block on playback
    fn dispatch(&mut self, clip: AudioClip);

    /// Advisory stop; already-dispatched audio may keep playing
    fn stop(&mut self) {}
}

/// Discards every clip
#[derive(Debug, Default)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn dispatch(&mut self, _clip: AudioClip) {}
}

/// Message sent by a [`ChannelSink`]
#[derive(Debug, Clone, PartialEq)]
pub enum SinkMessage {
    Play(AudioClip),
    Stop,
}

/// Forwards clips over an mpsc channel to whatever owns the receiver
pub struct ChannelSink {
    tx: Sender<SinkMessage>,
}

impl ChannelSink {
    pub fn new() -> (Self, Receiver<SinkMessage>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }
}

impl AudioSink for ChannelSink {
    fn dispatch(&mut self, clip: AudioClip) {
        if self.tx.send(SinkMessage::Play(clip)).is_err() {
            log::debug!("Audio receiver gone, clip dropped");
        }
    }

    fn stop(&mut self) {
        let _ = self.tx.send(SinkMessage::Stop);
    }
}

/// Writes each clip to `<dir>/tone_NNNNN.wav`
pub struct WavFileSink {
    dir: PathBuf,
    count: usize,
}

impl WavFileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            count: 0,
        }
    }

    /// Path the next clip will be written to
    pub fn next_path(&self) -> PathBuf {
        self.dir.join(format!("tone_{:05}.wav", self.count))
    }
}

impl AudioSink for WavFileSink {
    fn dispatch(&mut self, clip: AudioClip) {
        let path = self.next_path();
        self.count += 1;
        if let Err(e) = fs::write(&path, &clip.wav) {
            log::warn!("Failed to write tone {}: {}", path.display(), e);
        }
    }
}
