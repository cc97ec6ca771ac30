//! Field rendering: frames, palettes, spectral trails and rasterization.
//!
//! [`FieldRenderer`] produces abstract outputs ([`Frame`], [`MandalaPlot`]);
//! the `raster` functions turn those into images for display.

mod colormap;
mod frame;
mod raster;
mod renderer;
mod spectrum;
mod trail;

// Re-export public types
pub use colormap::{ColorScheme, Colormap, ColormapId, Palette, PALETTES};
pub use frame::{prepare_frame, ripple_pattern, shimmer_factor, Frame};
pub use raster::{composite_layers, rasterize_frame, rasterize_mandala, save_png};
pub use renderer::FieldRenderer;
pub use spectrum::{field_spectrum, hann_window};
pub use trail::{MandalaPlot, SpectralTrail, SPECTRUM_ALPHA, TRAIL_ALPHA};
