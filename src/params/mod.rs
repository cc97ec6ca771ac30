//! Parameter definitions with units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Units (Hz, seconds, cells, pixels)
//! - Documented ranges and meanings
//! - Serde support so a JSON defaults file can override any of them

mod audio;
mod defaults;
mod field;
mod modulation;
mod render;

// Re-export all types
pub use audio::ToneConfig;
pub use defaults::HelixDefaults;
pub use field::{FieldConfig, ScrollAxis};
pub use modulation::{ranges, ModulationParameters};
pub use render::RenderConfig;
