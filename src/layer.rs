//! A single fully connected layer.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::linalg;
use crate::{Activation, Error, Result};

/// A dense layer: weights, biases and an activation function.
///
/// Weights are stored as a flat row-major matrix with shape
/// `(out_dim, in_dim)`.
#[derive(Debug, Clone)]
pub struct Layer {
    in_dim: usize,
    out_dim: usize,
    weights: Vec<f64>,
    biases: Vec<f64>,
    activation: Activation,
}

impl Layer {
    /// Create a layer with `N(0,1)/sqrt(in_dim)` weights and `N(0,1)` biases.
    ///
    /// The `1/sqrt(in_dim)` scaling keeps wide layers out of activation
    /// saturation at the start of training.
    pub fn new_with_rng<R: Rng + ?Sized>(
        in_dim: usize,
        out_dim: usize,
        activation: Activation,
        rng: &mut R,
    ) -> Result<Self> {
        if in_dim == 0 || out_dim == 0 {
            return Err(Error::ShapeMismatch(format!(
                "layer dims must be > 0, got in_dim={in_dim} out_dim={out_dim}"
            )));
        }

        let mut weights = linalg::random_matrix(out_dim, in_dim, rng);
        linalg::scale(&mut weights, 1.0 / (in_dim as f64).sqrt());
        let biases = linalg::random_vector(out_dim, rng);

        Ok(Self {
            in_dim,
            out_dim,
            weights,
            biases,
            activation,
        })
    }

    /// Create a layer using a deterministic seed.
    #[inline]
    pub fn new_with_seed(
        in_dim: usize,
        out_dim: usize,
        activation: Activation,
        seed: u64,
    ) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::new_with_rng(in_dim, out_dim, activation, &mut rng)
    }

    #[inline]
    pub fn in_dim(&self) -> usize {
        self.in_dim
    }

    #[inline]
    pub fn out_dim(&self) -> usize {
        self.out_dim
    }

    /// `(weight rows, weight cols, bias len)`, i.e. `(out_dim, in_dim, out_dim)`.
    #[inline]
    pub fn shapes(&self) -> (usize, usize, usize) {
        (self.out_dim, self.in_dim, self.out_dim)
    }

    #[inline]
    pub fn activation(&self) -> Activation {
        self.activation
    }

    /// Row-major `(out_dim, in_dim)` weight matrix.
    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    #[inline]
    pub fn biases(&self) -> &[f64] {
        &self.biases
    }

    #[inline]
    #[cfg(test)]
    pub(crate) fn weights_mut(&mut self) -> &mut [f64] {
        &mut self.weights
    }

    #[inline]
    #[cfg(test)]
    pub(crate) fn biases_mut(&mut self) -> &mut [f64] {
        &mut self.biases
    }

    /// Replace the layer's parameters. `weights` is given as rows.
    ///
    /// Fails with `ShapeMismatch` unless the shapes match the existing ones.
    pub fn set_weights(&mut self, weights: &[Vec<f64>], biases: &[f64]) -> Result<()> {
        if weights.len() != self.out_dim {
            return Err(Error::ShapeMismatch(format!(
                "weights have {} rows, layer expects {}",
                weights.len(),
                self.out_dim
            )));
        }
        for (r, row) in weights.iter().enumerate() {
            if row.len() != self.in_dim {
                return Err(Error::ShapeMismatch(format!(
                    "weights row {r} has len {}, layer expects {}",
                    row.len(),
                    self.in_dim
                )));
            }
        }
        if biases.len() != self.out_dim {
            return Err(Error::ShapeMismatch(format!(
                "biases have len {}, layer expects {}",
                biases.len(),
                self.out_dim
            )));
        }

        for (r, row) in weights.iter().enumerate() {
            self.weights[r * self.in_dim..(r + 1) * self.in_dim].copy_from_slice(row);
        }
        self.biases.copy_from_slice(biases);
        Ok(())
    }

    /// Forward accumulation: `potentials = W * input + b`.
    ///
    /// Shape contract:
    /// - `input.len() == self.in_dim`
    /// - `potentials.len() == self.out_dim`
    #[inline]
    pub fn forward(&self, potentials: &mut [f64], input: &[f64]) {
        assert_eq!(
            input.len(),
            self.in_dim,
            "input len {} does not match layer in_dim {}",
            input.len(),
            self.in_dim
        );
        assert_eq!(
            potentials.len(),
            self.out_dim,
            "potentials len {} does not match layer out_dim {}",
            potentials.len(),
            self.out_dim
        );

        for (o, z) in potentials.iter_mut().enumerate() {
            let row = o * self.in_dim;
            let mut sum = self.biases[o];
            for (i, &x) in input.iter().enumerate() {
                sum = self.weights[row + i].mul_add(x, sum);
            }
            *z = sum;
        }
    }

    /// Backward propagation through the weights: `dst = W^T * delta`.
    ///
    /// Shape contract:
    /// - `delta.len() == self.out_dim`
    /// - `dst.len() == self.in_dim`
    #[inline]
    pub fn backward(&self, dst: &mut [f64], delta: &[f64]) {
        assert_eq!(
            delta.len(),
            self.out_dim,
            "delta len {} does not match layer out_dim {}",
            delta.len(),
            self.out_dim
        );
        assert_eq!(
            dst.len(),
            self.in_dim,
            "dst len {} does not match layer in_dim {}",
            dst.len(),
            self.in_dim
        );

        dst.fill(0.0);
        for (o, &d) in delta.iter().enumerate() {
            let row = o * self.in_dim;
            for (i, slot) in dst.iter_mut().enumerate() {
                *slot = self.weights[row + i].mul_add(d, *slot);
            }
        }
    }

    /// In-place parameter update: `W <- decay*W + dw`, `b <- b + db`.
    ///
    /// `dw` is flat row-major like the weight matrix and is expected to
    /// already carry the `-lr/batch` scaling. A decay of exactly 1.0 skips
    /// the multiplication; biases are never decayed.
    #[inline]
    pub fn update_weights(&mut self, dw: &[f64], db: &[f64], decay: f64) {
        assert_eq!(
            dw.len(),
            self.weights.len(),
            "dw len {} does not match weights len {}",
            dw.len(),
            self.weights.len()
        );
        assert_eq!(
            db.len(),
            self.biases.len(),
            "db len {} does not match biases len {}",
            db.len(),
            self.biases.len()
        );

        if decay != 1.0 {
            linalg::scale(&mut self.weights, decay);
        }
        linalg::sum_into(&mut self.weights, dw);
        linalg::sum_into(&mut self.biases, db);
    }
}
