//! Row-wise frequency spectrum of the field, feeding the mandala display.

use std::f64::consts::PI;

use ndarray::ArrayView2;
use rustfft::{num_complex::Complex, FftPlanner};

/// Hann window function for FFT analysis
pub fn hann_window(index: usize, size: usize) -> f64 {
    if size < 2 {
        return 1.0;
    }
    0.5 * (1.0 - ((2.0 * PI * index as f64) / (size as f64 - 1.0)).cos())
}

/// Mean magnitude spectrum of the field's rows.
///
/// Each row is detrended (mean removed) and Hann-windowed before the FFT.
/// Returns bins 1..=cols/2 averaged over rows, normalized to a unit maximum;
/// a flat field yields all zeros.
pub fn field_spectrum(field: ArrayView2<'_, f64>) -> Vec<f64> {
    let (rows, cols) = field.dim();
    let half = cols / 2;
    if rows == 0 || half == 0 {
        return Vec::new();
    }

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(cols);
    let mut buffer = vec![Complex::new(0.0, 0.0); cols];
    let mut sums = vec![0.0; half];

    for row in field.rows() {
        let mean = row.sum() / cols as f64;
        for (i, (slot, &value)) in buffer.iter_mut().zip(row.iter()).enumerate() {
            *slot = Complex::new((value - mean) * hann_window(i, cols), 0.0);
        }

        fft.process(&mut buffer);

        for (k, sum) in sums.iter_mut().enumerate() {
            *sum += buffer[k + 1].norm() / rows as f64;
        }
    }

    let max = sums.iter().cloned().fold(0.0_f64, f64::max);
    if max > 0.0 && max.is_finite() {
        for value in &mut sums {
            *value /= max;
        }
    } else {
        sums.iter_mut().for_each(|v| *v = 0.0);
    }
    sums
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn test_hann_window() {
        let size = 64;

        // Hann window should be 0 at edges, ~1 at center
        assert!(hann_window(0, size).abs() < 1e-12);
        assert!(hann_window(size - 1, size).abs() < 1e-12);
        assert!((hann_window(size / 2, size) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_flat_field_has_empty_spectrum() {
        let spectrum = field_spectrum(Array2::<f64>::zeros((64, 64)).view());
        assert_eq!(spectrum.len(), 32);
        assert!(spectrum.iter().all(|&v| v == 0.0));

        let spectrum = field_spectrum(Array2::from_elem((64, 64), 0.5).view());
        assert!(spectrum.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_stripes_peak_at_their_frequency() {
        let cols = 64;
        let field = Array2::from_shape_fn((8, cols), |(_, j)| {
            0.5 + 0.5 * (2.0 * PI * 4.0 * j as f64 / cols as f64).sin()
        });

        let spectrum = field_spectrum(field.view());
        let peak = spectrum
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(k, _)| k)
            .unwrap();

        // Index 3 holds FFT bin 4
        assert_eq!(peak, 3);
        assert_eq!(spectrum[peak], 1.0);
    }

    #[test]
    fn test_degenerate_shapes() {
        assert!(field_spectrum(Array2::<f64>::zeros((0, 8)).view()).is_empty());
        assert!(field_spectrum(Array2::<f64>::zeros((4, 1)).view()).is_empty());
    }
}
