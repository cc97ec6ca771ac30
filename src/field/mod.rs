//! ψ-field state: evolution, perturbation and archiving.

pub mod archive;
mod state;

// Re-export public types
pub use state::{roll, FieldSnapshot, FieldState, Perturbation};
