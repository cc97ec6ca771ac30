//! The ψ-field grid and its evolution rules.

use std::path::Path;

use ndarray::{Array2, ArrayView2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use super::archive;
use crate::error::Result;
use crate::params::{FieldConfig, ModulationParameters, ScrollAxis};

/// A single applied "surprise" perturbation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perturbation {
    pub row: usize,
    pub col: usize,
    pub increment: f64,
}

/// A field together with the modulation it should be rendered with
#[derive(Debug, Clone)]
pub struct FieldSnapshot {
    pub field: Array2<f64>,
    pub modulation: ModulationParameters,
}

/// Owns the N×N field, its RNG and its evolution rules
pub struct FieldState {
    field: Array2<f64>,
    config: FieldConfig,
    rng: ChaCha8Rng,
}

impl FieldState {
    /// Create a field of uniform random values in [0, 1)
    pub fn new(config: FieldConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let field = Array2::from_shape_fn(config.shape(), |_| rng.gen::<f64>());

        log::debug!("Field initialized: {}x{}", config.size, config.size);

        Self { field, config, rng }
    }

    /// Create a field state around existing values (shape taken from `field`)
    pub fn with_field(config: FieldConfig, field: Array2<f64>) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self { field, config, rng }
    }

    pub fn field(&self) -> &Array2<f64> {
        &self.field
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Field shape as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.field.dim()
    }

    /// Mean intensity (0 for an empty field)
    pub fn mean(&self) -> f64 {
        self.field.mean().unwrap_or(0.0)
    }

    /// Override the diffusion noise standard deviation
    pub fn set_noise_std(&mut self, noise_std: f64) {
        self.config.noise_std = noise_std;
    }

    /// Diffuse: add Gaussian noise to every cell, then clip to [0, 1]
    pub fn evolve(&mut self) {
        let std = self.config.noise_std;
        let normal = if std > 0.0 && std.is_finite() {
            Normal::new(0.0, std).ok()
        } else {
            None
        };

        if let Some(normal) = normal {
            self.field.mapv_inplace(|v| v + normal.sample(&mut self.rng));
        }
        self.field.mapv_inplace(|v| v.clamp(0.0, 1.0));
    }

    /// Add a random increment to one random cell.
    ///
    /// The cell is NOT clipped; it may sit above 1.0 until the next
    /// [`evolve`](Self::evolve). Returns `None` only for an empty field.
    pub fn perturb(&mut self) -> Option<Perturbation> {
        let (rows, cols) = self.shape();
        if rows == 0 || cols == 0 {
            return None;
        }

        let row = self.rng.gen_range(0..rows);
        let col = self.rng.gen_range(0..cols);
        let (low, high) = self.config.perturb_range;
        let increment = if low < high {
            self.rng.gen_range(low..=high)
        } else {
            low
        };

        self.perturb_at(row, col, increment)
    }

    /// Add `increment` to cell (`row`, `col`) without clipping
    pub fn perturb_at(&mut self, row: usize, col: usize, increment: f64) -> Option<Perturbation> {
        let Some(cell) = self.field.get_mut((row, col)) else {
            log::warn!(
                "Perturbation at ({}, {}) outside {:?} field, ignored",
                row,
                col,
                self.field.dim()
            );
            return None;
        };
        *cell += increment;

        log::debug!("Perturbed ({}, {}) by {:.3}", row, col, increment);
        Some(Perturbation {
            row,
            col,
            increment,
        })
    }

    /// Replace the field with zeros of the same shape
    pub fn reset(&mut self) {
        self.field = Array2::zeros(self.field.raw_dim());
        log::info!("Field reset");
    }

    /// Flow: cyclic shift along `axis`, decay, then add weighted uniform noise
    pub fn scroll_and_decay(
        &mut self,
        axis: ScrollAxis,
        shift: isize,
        decay: f64,
        noise_weight: f64,
    ) {
        let rolled = roll(self.field.view(), axis, shift);
        let rng = &mut self.rng;
        self.field = rolled.mapv(|v| v * decay + noise_weight * rng.gen::<f64>());
    }

    /// Flow step using the configured decay and noise weight
    pub fn flow(&mut self, axis: ScrollAxis, shift: isize) {
        let decay = self.config.scroll_decay;
        let noise_weight = self.config.scroll_noise_weight;
        self.scroll_and_decay(axis, shift, decay, noise_weight);
    }

    /// Harmonic echo: the field shifted by round(echo_amplitude * sin(phase))
    pub fn derive_delayed_view(&self, phase: f64) -> Array2<f64> {
        let shift = (self.config.echo_amplitude * phase.sin()).round() as isize;
        roll(self.field.view(), self.config.echo_axis, shift)
    }

    /// Copy the field together with the modulation to render it with
    pub fn snapshot(&self, modulation: ModulationParameters) -> FieldSnapshot {
        FieldSnapshot {
            field: self.field.clone(),
            modulation,
        }
    }

    /// Write the field verbatim to an archive
    pub fn save_archive(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        archive::write_npy(path, self.field.view())?;
        log::info!("Saved field to {}", path.display());
        Ok(())
    }

    /// Replace the field with an archive of the same shape.
    ///
    /// On any error the current field is left untouched.
    pub fn load_archive(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let loaded = archive::read_npy(path)?.into_array2(self.shape())?;
        self.field = loaded;
        log::info!("Loaded field from {}", path.display());
        Ok(())
    }
}

/// Cyclic shift with numpy `roll` semantics: `out[i] = in[(i - shift) mod n]`
pub fn roll(field: ArrayView2<'_, f64>, axis: ScrollAxis, shift: isize) -> Array2<f64> {
    let (rows, cols) = field.dim();
    let wrap = |index: usize, len: usize| {
        let shift = shift.rem_euclid(len as isize) as usize;
        (index + len - shift) % len
    };

    Array2::from_shape_fn((rows, cols), |(r, c)| match axis {
        ScrollAxis::Rows => field[[wrap(r, rows), c]],
        ScrollAxis::Columns => field[[r, wrap(c, cols)]],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn seeded(size: usize) -> FieldConfig {
        FieldConfig {
            size,
            seed: Some(42),
            ..FieldConfig::default()
        }
    }

    #[test]
    fn test_initial_field_is_uniform_unit_interval() {
        let state = FieldState::new(seeded(64));
        assert_eq!(state.shape(), (64, 64));
        assert!(state.field().iter().all(|&v| (0.0..1.0).contains(&v)));
    }

    #[test]
    fn test_seeded_fields_are_reproducible() {
        let mut a = FieldState::new(seeded(16));
        let mut b = FieldState::new(seeded(16));
        a.evolve();
        b.evolve();
        assert_eq!(a.field(), b.field());
    }

    #[test]
    fn test_evolve_stays_in_unit_interval() {
        let mut config = seeded(32);
        config.noise_std = 0.2; // Exaggerated so clipping actually triggers
        let mut state = FieldState::new(config);
        for _ in 0..50 {
            state.evolve();
            assert!(state.field().iter().all(|&v| (0.0..=1.0).contains(&v)));
        }
    }

    #[test]
    fn test_evolve_clips_hot_spot() {
        let mut state = FieldState::with_field(seeded(2), Array2::zeros((2, 2)));
        state.perturb_at(0, 0, 0.9);
        state.perturb_at(0, 0, 0.9);
        assert!(state.field()[[0, 0]] > 1.0);

        state.evolve();
        assert!(state.field()[[0, 0]] <= 1.0);
    }

    #[test]
    fn test_perturb_changes_exactly_one_cell() {
        let mut state = FieldState::new(seeded(64));
        let before = state.field().clone();

        let hit = state.perturb().unwrap();

        let changed: Vec<_> = before
            .indexed_iter()
            .filter(|(idx, v)| state.field()[*idx].to_bits() != v.to_bits())
            .map(|(idx, _)| idx)
            .collect();
        assert_eq!(changed, vec![(hit.row, hit.col)]);
        assert!((0.1..=1.0).contains(&hit.increment));
    }

    #[test]
    fn test_perturb_is_not_clipped() {
        let mut state = FieldState::with_field(seeded(4), Array2::from_elem((4, 4), 0.95));
        let hit = state.perturb().unwrap();
        assert!(state.field()[[hit.row, hit.col]] > 1.0);
    }

    #[test]
    fn test_forced_perturbation_on_zero_field() {
        let mut state = FieldState::with_field(seeded(64), Array2::zeros((64, 64)));
        state.perturb_at(3, 3, 0.5);

        assert_eq!(state.field()[[3, 3]], 0.5);
        let others = state
            .field()
            .indexed_iter()
            .filter(|(idx, _)| *idx != (3, 3))
            .all(|(_, &v)| v == 0.0);
        assert!(others);
    }

    #[test]
    fn test_perturb_out_of_bounds_is_ignored() {
        let mut state = FieldState::with_field(seeded(4), Array2::zeros((4, 4)));
        assert!(state.perturb_at(4, 0, 0.5).is_none());
        assert!(state.field().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_reset_zeros_with_same_shape() {
        let mut state = FieldState::new(seeded(128));
        state.reset();
        assert_eq!(state.shape(), (128, 128));
        assert!(state.field().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_roll_matches_numpy() {
        let field = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];

        assert_eq!(
            roll(field.view(), ScrollAxis::Columns, 1),
            array![[3.0, 1.0, 2.0], [6.0, 4.0, 5.0]]
        );
        assert_eq!(
            roll(field.view(), ScrollAxis::Columns, -1),
            array![[2.0, 3.0, 1.0], [5.0, 6.0, 4.0]]
        );
        assert_eq!(
            roll(field.view(), ScrollAxis::Rows, 3),
            array![[4.0, 5.0, 6.0], [1.0, 2.0, 3.0]]
        );
    }

    #[test]
    fn test_roll_extreme_shifts_wrap() {
        let field = array![[1.0, 2.0, 3.0, 4.0], [5.0, 6.0, 7.0, 8.0]];

        // isize::MIN ≡ 0 (mod 4), isize::MAX ≡ 3 (mod 4)
        assert_eq!(roll(field.view(), ScrollAxis::Columns, isize::MIN), field);
        assert_eq!(
            roll(field.view(), ScrollAxis::Columns, isize::MAX),
            roll(field.view(), ScrollAxis::Columns, -1)
        );
        assert_eq!(
            roll(field.view(), ScrollAxis::Rows, isize::MIN),
            roll(field.view(), ScrollAxis::Rows, 0)
        );
        assert_eq!(
            roll(field.view(), ScrollAxis::Rows, isize::MAX),
            roll(field.view(), ScrollAxis::Rows, 1)
        );
    }

    #[test]
    fn test_flow_accepts_any_shift() {
        let mut state = FieldState::new(seeded(4));
        state.flow(ScrollAxis::Rows, isize::MIN);
        state.flow(ScrollAxis::Columns, isize::MAX);
        assert_eq!(state.shape(), (4, 4));
    }

    #[test]
    fn test_scroll_and_decay_without_noise() {
        let field = array![[1.0, 0.0], [0.5, 0.25]];
        let mut state = FieldState::with_field(seeded(2), field);

        state.scroll_and_decay(ScrollAxis::Rows, 1, 0.5, 0.0);
        assert_eq!(state.field(), &array![[0.25, 0.125], [0.5, 0.0]]);
    }

    #[test]
    fn test_scroll_and_decay_noise_is_bounded() {
        let mut state = FieldState::with_field(seeded(8), Array2::zeros((8, 8)));
        state.scroll_and_decay(ScrollAxis::Columns, 2, 0.97, 0.03);
        assert!(state.field().iter().all(|&v| (0.0..0.03).contains(&v)));
    }

    #[test]
    fn test_delayed_view_does_not_mutate() {
        let state = FieldState::new(seeded(16));
        let before = state.field().clone();

        // 5 * sin(pi/2) = 5 columns
        let echo = state.derive_delayed_view(std::f64::consts::FRAC_PI_2);

        assert_eq!(state.field(), &before);
        assert_eq!(echo, roll(before.view(), ScrollAxis::Columns, 5));
        assert_eq!(state.derive_delayed_view(0.0), before);
    }
}
