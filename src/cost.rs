//! Cost functions.
//!
//! A cost exposes two operations: the scalar cost of a single example, and
//! the error signal `dC/dz` at the output layer, which seeds backpropagation.
//!
//! The error signal is owned by the cost rather than composed from an
//! activation derivative because the costs are tied to output regimes:
//! quadratic consumes the output activation's derivative, while cross-entropy
//! and log-likelihood are paired with sigmoid/softmax outputs so the
//! derivative cancels and `a - y` is the whole signal. This is what lets a
//! softmax output train without a softmax derivative ever existing.

use crate::linalg::argmax;
use crate::Activation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Supported cost functions.
pub enum Cost {
    /// `0.5 * sum((y - a)^2)`.
    Quadratic,
    /// `-sum(y*ln(a) + (1-y)*ln(1-a))`; intended for sigmoid outputs.
    CrossEntropy,
    /// `-ln(a[argmax(y)])`; intended for softmax outputs with one-hot targets.
    LogLikelihood,
}

impl Cost {
    /// Cost of a single example.
    ///
    /// Normalization over the dataset is the caller's concern.
    ///
    /// Shape contract: `output.len() == target.len()`.
    pub fn cost(self, output: &[f64], target: &[f64]) -> f64 {
        assert_eq!(
            output.len(),
            target.len(),
            "output len {} does not match target len {}",
            output.len(),
            target.len()
        );

        match self {
            Cost::Quadratic => {
                let mut sum = 0.0;
                for (&a, &y) in output.iter().zip(target) {
                    let diff = y - a;
                    sum = diff.mul_add(diff, sum);
                }
                0.5 * sum
            }
            Cost::CrossEntropy => {
                let mut sum = 0.0;
                for (&a, &y) in output.iter().zip(target) {
                    sum -= y * a.ln() + (1.0 - y) * (1.0 - a).ln();
                }
                sum
            }
            Cost::LogLikelihood => -output[argmax(target)].ln(),
        }
    }

    /// Error signal `dC/dz` at the output layer, written into `dst`.
    ///
    /// `potentials` are the output layer's pre-activation values and
    /// `activation` is its activation function; only the quadratic cost uses
    /// them.
    ///
    /// Shape contract: all four slices have the output layer's width.
    pub fn output_error(
        self,
        dst: &mut [f64],
        output: &[f64],
        target: &[f64],
        potentials: &[f64],
        activation: Activation,
    ) {
        assert_eq!(
            output.len(),
            target.len(),
            "output len {} does not match target len {}",
            output.len(),
            target.len()
        );
        assert_eq!(
            dst.len(),
            output.len(),
            "dst len {} does not match output len {}",
            dst.len(),
            output.len()
        );

        match self {
            Cost::Quadratic => {
                // dst = activation'(z), then scaled by the residual in place.
                activation.derivative(dst, potentials);
                for (i, d) in dst.iter_mut().enumerate() {
                    *d *= output[i] - target[i];
                }
            }
            Cost::CrossEntropy | Cost::LogLikelihood => {
                for (i, d) in dst.iter_mut().enumerate() {
                    *d = output[i] - target[i];
                }
            }
        }
    }
}
