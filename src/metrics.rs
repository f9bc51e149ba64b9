//! Evaluation helpers.
//!
//! These do not participate in backprop; they run the forward pass over a
//! sample set and summarize how the network is doing.

use crate::linalg::argmax;
use crate::{Cost, Network, TrainingSample};

/// Summary of a network's performance over a sample set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// Mean per-sample cost.
    pub avg_cost: f64,
    /// Fraction of samples where `argmax(output) != argmax(target)`.
    pub error_rate: f64,
}

/// Evaluate `network` over `samples`: average cost and argmax error fraction.
///
/// An empty sample set yields zeros.
pub fn correctness(network: &Network, cost: Cost, samples: &[TrainingSample]) -> Evaluation {
    if samples.is_empty() {
        return Evaluation {
            avg_cost: 0.0,
            error_rate: 0.0,
        };
    }

    let mut total_cost = 0.0;
    let mut errors = 0usize;
    for sample in samples {
        let output = network.evaluate(&sample.input);
        total_cost += cost.cost(&output, &sample.target);
        if argmax(&output) != argmax(&sample.target) {
            errors += 1;
        }
    }

    Evaluation {
        avg_cost: total_cost / samples.len() as f64,
        error_rate: errors as f64 / samples.len() as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Activation;

    #[test]
    fn correctness_counts_argmax_disagreements() {
        // Identity network: output equals W*x with W = I.
        let mut nn = Network::seeded(
            &[2, 2],
            &[Activation::identity()],
            0,
        )
        .unwrap();
        nn.layer_mut(0)
            .set_weights(&[vec![1.0, 0.0], vec![0.0, 1.0]], &[0.0, 0.0])
            .unwrap();

        let samples = vec![
            TrainingSample::new(vec![0.9, 0.1], vec![1.0, 0.0]),
            TrainingSample::new(vec![0.2, 0.8], vec![1.0, 0.0]),
        ];

        let eval = correctness(&nn, Cost::Quadratic, &samples);
        assert!((eval.error_rate - 0.5).abs() < 1e-12);
        assert!(eval.avg_cost > 0.0);
    }

    #[test]
    fn perfect_predictions_have_zero_cost_and_errors() {
        let mut nn = Network::seeded(&[1, 1], &[Activation::identity()], 0).unwrap();
        nn.layer_mut(0).set_weights(&[vec![1.0]], &[0.0]).unwrap();

        let samples = vec![TrainingSample::new(vec![0.5], vec![0.5])];
        let eval = correctness(&nn, Cost::Quadratic, &samples);
        assert_eq!(eval.avg_cost, 0.0);
        assert_eq!(eval.error_rate, 0.0);
    }

    #[test]
    fn empty_sample_set_yields_zeros() {
        let nn = Network::seeded(&[1, 1], &[Activation::Sigmoid], 0).unwrap();
        let eval = correctness(&nn, Cost::Quadratic, &[]);
        assert_eq!(eval.avg_cost, 0.0);
        assert_eq!(eval.error_rate, 0.0);
    }
}
