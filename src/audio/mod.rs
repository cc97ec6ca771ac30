//! Tone synthesis and audio hand-off.
//!
//! Tones are rendered to sample buffers and WAV bytes here; playing them is
//! the job of an [`AudioSink`], which receives clips as one-way messages.

#[cfg(feature = "live-audio")]
mod live;
mod sink;
mod synthesis;
mod wav;

// Re-export public types
#[cfg(feature = "live-audio")]
pub use live::CpalSink;
pub use sink::{AudioSink, ChannelSink, NullSink, SinkMessage, WavFileSink};
pub use synthesis::{AudioClip, Resonance, ToneModulation, ToneState, ToneSynthesizer};
pub use wav::encode_wav;
