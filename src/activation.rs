//! Activation functions.
//!
//! A layer computes a vector of potentials `z = W x + b` and then applies an
//! activation over the whole vector: `a = f(z)`. Both the activation and its
//! derivative write into a preallocated destination so the per-sample hot
//! path never allocates.
//!
//! Softmax is defined over the vector as a whole, not per element, and does
//! not expose a derivative: it is meant for the output layer paired with the
//! log-likelihood cost, which produces the output error signal without it.

#[derive(Debug, Clone, Copy, PartialEq)]
/// Activation function applied to a vector of potentials.
pub enum Activation {
    /// `slope * x`; a slope of 1 is the identity.
    Linear { slope: f64 },
    /// `1 / (1 + exp(-x))`.
    Sigmoid,
    /// `1` for `x >= 0`, else `0`.
    Step,
    /// `exp(x_i) / sum_j exp(x_j)`; responses sum to 1.
    Softmax,
    /// `tanh(x)`.
    Tanh,
}

impl Activation {
    /// The identity activation.
    #[inline]
    pub fn identity() -> Self {
        Activation::Linear { slope: 1.0 }
    }

    /// Apply the activation to `potentials`, writing into `dst`.
    ///
    /// Shape contract: `dst.len() == potentials.len()`.
    pub fn activation(self, dst: &mut [f64], potentials: &[f64]) {
        assert_eq!(
            dst.len(),
            potentials.len(),
            "dst len {} does not match potentials len {}",
            dst.len(),
            potentials.len()
        );

        match self {
            Activation::Linear { slope } => {
                for (d, &z) in dst.iter_mut().zip(potentials) {
                    *d = slope * z;
                }
            }
            Activation::Sigmoid => {
                for (d, &z) in dst.iter_mut().zip(potentials) {
                    *d = 1.0 / (1.0 + (-z).exp());
                }
            }
            Activation::Step => {
                for (d, &z) in dst.iter_mut().zip(potentials) {
                    *d = if z >= 0.0 { 1.0 } else { 0.0 };
                }
            }
            Activation::Softmax => {
                let mut sum = 0.0;
                for (d, &z) in dst.iter_mut().zip(potentials) {
                    *d = z.exp();
                    sum += *d;
                }
                for d in dst.iter_mut() {
                    *d /= sum;
                }
            }
            Activation::Tanh => {
                for (d, &z) in dst.iter_mut().zip(potentials) {
                    *d = z.tanh();
                }
            }
        }
    }

    /// Apply the activation's derivative to `potentials`, writing into `dst`.
    ///
    /// The step derivative is deliberately `1` rather than the mathematical
    /// `0`: it lets gradients flow through discrete units during training.
    ///
    /// Shape contract: `dst.len() == potentials.len()`.
    ///
    /// # Panics
    ///
    /// Softmax has no usable derivative here; requesting it is a programming
    /// error and panics.
    pub fn derivative(self, dst: &mut [f64], potentials: &[f64]) {
        assert_eq!(
            dst.len(),
            potentials.len(),
            "dst len {} does not match potentials len {}",
            dst.len(),
            potentials.len()
        );

        match self {
            Activation::Linear { slope } => {
                dst.fill(slope);
            }
            Activation::Sigmoid => {
                for (d, &z) in dst.iter_mut().zip(potentials) {
                    let a = 1.0 / (1.0 + (-z).exp());
                    *d = a * (1.0 - a);
                }
            }
            Activation::Step => {
                dst.fill(1.0);
            }
            Activation::Softmax => {
                panic!("softmax does not expose a derivative; pair it with the log-likelihood cost")
            }
            Activation::Tanh => {
                for (d, &z) in dst.iter_mut().zip(potentials) {
                    *d = (1.0 + (z / 2.0).tanh()) / 2.0;
                }
            }
        }
    }
}
