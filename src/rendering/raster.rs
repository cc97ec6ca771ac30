//! Display adapter: rasterize frames and mandala plots to PNG images.

use std::f32::consts::TAU;
use std::path::Path;

use image::{Rgb, RgbImage};

use super::colormap::Colormap;
use super::frame::Frame;
use super::trail::MandalaPlot;
use crate::error::Result;

/// Each field cell becomes a `cell_scale`×`cell_scale` block
pub fn rasterize_frame(frame: &Frame, cell_scale: u32) -> RgbImage {
    let scale = cell_scale.max(1);
    let (rows, cols) = frame.data.dim();
    let cmap = frame.colormap.colormap();
    let opacity = frame.opacity.clamp(0.0, 1.0) as f32;

    RgbImage::from_fn(cols as u32 * scale, rows as u32 * scale, |x, y| {
        let value = frame.data[[(y / scale) as usize, (x / scale) as usize]];
        Rgb(scale_color(cmap.sample(value), opacity))
    })
}

/// Draw `echo` over `base` using the echo's opacity (dual-layer view)
pub fn composite_layers(base: &Frame, echo: &Frame, cell_scale: u32) -> RgbImage {
    let mut image = rasterize_frame(base, cell_scale);
    if base.data.dim() != echo.data.dim() {
        log::warn!(
            "Echo layer {:?} does not match base {:?}, skipped",
            echo.data.dim(),
            base.data.dim()
        );
        return image;
    }

    let scale = cell_scale.max(1);
    let cmap = echo.colormap.colormap();
    let alpha = echo.opacity.clamp(0.0, 1.0) as f32;
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let value = echo.data[[(y / scale) as usize, (x / scale) as usize]];
        blend(pixel, cmap.sample(value), alpha);
    }
    image
}

/// Polar mandala: the spectrum forms one petal, repeated `symmetry` times
/// around the center. Trail is drawn first, instantaneous spectrum on top.
pub fn rasterize_mandala(plot: &MandalaPlot, size: u32, symmetry: u32) -> RgbImage {
    let mut image = RgbImage::new(size, size);
    let cmap = plot.colormap.colormap();

    draw_petals(&mut image, &plot.trail, &cmap, plot.trail_alpha, symmetry);
    draw_petals(&mut image, &plot.spectrum, &cmap, plot.spectrum_alpha, symmetry);
    image
}

pub fn save_png(image: &RgbImage, path: impl AsRef<Path>) -> Result<()> {
    image.save(path)?;
    Ok(())
}

fn draw_petals(image: &mut RgbImage, values: &[f64], cmap: &Colormap, alpha: f32, symmetry: u32) {
    if values.is_empty() || image.width() == 0 {
        return;
    }

    let symmetry = symmetry.max(1);
    let half = image.width() as f32 / 2.0;
    let inner = 0.15 * half;
    let outer = 0.95 * half;
    let len = values.len();

    let mut points = Vec::with_capacity(len * symmetry as usize);
    for fold in 0..symmetry {
        for (k, &value) in values.iter().enumerate() {
            let angle = TAU * (fold as f32 + k as f32 / len as f32) / symmetry as f32;
            let value = if value.is_finite() { value.clamp(0.0, 1.0) } else { 0.0 };
            let radius = inner + value as f32 * (outer - inner);
            let color = cmap.sample(k as f64 / len as f64);
            points.push((half + radius * angle.cos(), half + radius * angle.sin(), color));
        }
    }

    // Closed curve through every petal point
    for i in 0..points.len() {
        let (x0, y0, color) = points[i];
        let (x1, y1, _) = points[(i + 1) % points.len()];
        draw_line(image, (x0, y0), (x1, y1), color, alpha);
    }
}

fn draw_line(image: &mut RgbImage, from: (f32, f32), to: (f32, f32), color: [u8; 3], alpha: f32) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;

    for step in 0..=steps {
        let t = step as f32 / steps as f32;
        let x = (from.0 + dx * t).round();
        let y = (from.1 + dy * t).round();
        if x < 0.0 || y < 0.0 {
            continue;
        }
        let (x, y) = (x as u32, y as u32);
        if x < image.width() && y < image.height() {
            blend(image.get_pixel_mut(x, y), color, alpha);
        }
    }
}

fn blend(pixel: &mut Rgb<u8>, color: [u8; 3], alpha: f32) {
    for (channel, &c) in pixel.0.iter_mut().zip(color.iter()) {
        let mixed = *channel as f32 * (1.0 - alpha) + c as f32 * alpha;
        *channel = mixed.round().clamp(0.0, 255.0) as u8;
    }
}

fn scale_color(color: [u8; 3], factor: f32) -> [u8; 3] {
    color.map(|c| (c as f32 * factor).round() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::colormap::{ColorScheme, ColormapId, Palette};
    use ndarray::array;

    fn frame(data: ndarray::Array2<f64>, opacity: f64) -> Frame {
        Frame {
            data,
            colormap: ColormapId::Palette(Palette::Viridis),
            frame_index: 0,
            opacity,
        }
    }

    #[test]
    fn test_frame_blocks() {
        let image = rasterize_frame(&frame(array![[0.0, 1.0], [1.0, 0.0]], 1.0), 3);

        assert_eq!(image.dimensions(), (6, 6));
        assert_eq!(image.get_pixel(0, 0).0, [0x44, 0x01, 0x54]);
        assert_eq!(image.get_pixel(2, 2).0, [0x44, 0x01, 0x54]);
        assert_eq!(image.get_pixel(3, 0).0, [0xfd, 0xe7, 0x25]);
        assert_eq!(image.get_pixel(5, 5).0, [0x44, 0x01, 0x54]);
    }

    #[test]
    fn test_zero_opacity_echo_leaves_base() {
        let base = frame(array![[0.0, 0.5]], 1.0);
        let echo = frame(array![[1.0, 1.0]], 0.0);

        assert_eq!(composite_layers(&base, &echo, 2), rasterize_frame(&base, 2));
    }

    #[test]
    fn test_mandala_draws_something() {
        let plot = MandalaPlot {
            trail: vec![0.5; 16],
            spectrum: vec![1.0; 16],
            colormap: ColormapId::Scheme(ColorScheme::Aurora),
            trail_alpha: 0.35,
            spectrum_alpha: 0.9,
        };

        let image = rasterize_mandala(&plot, 64, 6);
        assert_eq!(image.dimensions(), (64, 64));
        assert!(image.pixels().any(|p| p.0 != [0, 0, 0]));
        // Center stays inside the inner radius, untouched
        assert_eq!(image.get_pixel(32, 32).0, [0, 0, 0]);
    }

    #[test]
    fn test_empty_mandala_is_blank() {
        let plot = MandalaPlot {
            trail: vec![],
            spectrum: vec![],
            colormap: ColormapId::Scheme(ColorScheme::Lotus),
            trail_alpha: 0.35,
            spectrum_alpha: 0.9,
        };
        let image = rasterize_mandala(&plot, 32, 6);
        assert!(image.pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn test_png_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");

        save_png(&rasterize_frame(&frame(array![[0.25]], 1.0), 4), &path).unwrap();

        let reloaded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(reloaded.dimensions(), (4, 4));
    }
}
