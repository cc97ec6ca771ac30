//! psi-helix library - Evolving ψ-field with false-color frames and field-driven tones

pub mod audio;
pub mod cli;
pub mod error;
pub mod field;
pub mod params;
pub mod rendering;
pub mod session;

pub use error::{HelixError, Result};
pub use session::{EvolutionMode, Interaction, Notice, NoticeLevel, Session, TickOutput};
