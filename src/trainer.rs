//! Per-sample backpropagation.
//!
//! A `Backprop` instance is the scratch state of one worker. It is set up
//! once per training run and reused for every sample the worker processes,
//! so `process` performs no allocations.

use crate::linalg;
use crate::{Cost, Network, TrainingSample};

/// Per-layer parameter gradients, shaped like a network.
///
/// Weight gradients are flat row-major like `Layer::weights`. During the
/// backward sweep the bias-gradient buffer of each layer doubles as that
/// layer's delta, so the training loop can scale and apply both buffers
/// without further transformation.
#[derive(Debug, Clone)]
pub struct WeightUpdates {
    pub(crate) biases: Vec<Vec<f64>>,
    pub(crate) weights: Vec<Vec<f64>>,
}

impl WeightUpdates {
    /// Allocate gradient buffers shaped after `network`.
    pub fn new(network: &Network) -> Self {
        let layers = network.layers();
        let mut biases = Vec::with_capacity(layers.len());
        let mut weights = Vec::with_capacity(layers.len());

        for layer in layers {
            let (rows, cols, bias_len) = layer.shapes();
            biases.push(vec![0.0; bias_len]);
            weights.push(vec![0.0; rows * cols]);
        }

        Self { biases, weights }
    }

    /// Set every entry to zero.
    pub fn zero(&mut self) {
        for b in &mut self.biases {
            b.fill(0.0);
        }
        for w in &mut self.weights {
            w.fill(0.0);
        }
    }

    /// Number of layers covered.
    #[inline]
    pub fn layer_count(&self) -> usize {
        self.biases.len()
    }

    /// Bias gradient for a layer.
    #[inline]
    pub fn biases(&self, layer: usize) -> &[f64] {
        &self.biases[layer]
    }

    /// Flat row-major weight gradient for a layer.
    #[inline]
    pub fn weights(&self, layer: usize) -> &[f64] {
        &self.weights[layer]
    }
}

/// One worker's backpropagation state: the bound cost plus scratch buffers
/// mirroring the network's layer shapes.
#[derive(Debug, Clone)]
pub struct Backprop {
    cost: Cost,
    /// `activations[0]` holds the sample input; `activations[l + 1]` holds
    /// layer `l`'s post-activation output.
    activations: Vec<Vec<f64>>,
    potentials: Vec<Vec<f64>>,
    /// Activation-derivative scratch, one per layer.
    sp: Vec<Vec<f64>>,
    /// Transposed-propagation scratch. `backward[l]` receives the delta
    /// pushed down from layer `l + 1`, so it is sized to layer `l`'s output
    /// width (which is layer `l + 1`'s input width).
    backward: Vec<Vec<f64>>,
}

impl Backprop {
    /// Allocate scratch for one worker bound to `cost` and shaped after
    /// `network`.
    pub fn new(network: &Network, cost: Cost) -> Self {
        let layers = network.layers();

        let mut activations = Vec::with_capacity(layers.len() + 1);
        activations.push(vec![0.0; network.input_dim()]);

        let mut potentials = Vec::with_capacity(layers.len());
        let mut sp = Vec::with_capacity(layers.len());
        let mut backward = Vec::with_capacity(layers.len());

        for layer in layers {
            activations.push(vec![0.0; layer.out_dim()]);
            potentials.push(vec![0.0; layer.out_dim()]);
            sp.push(vec![0.0; layer.out_dim()]);
            backward.push(vec![0.0; layer.out_dim()]);
        }

        Self {
            cost,
            activations,
            potentials,
            sp,
            backward,
        }
    }

    /// Compute the gradient of the cost for one sample into `wu`.
    ///
    /// `network` must have the shapes this trainer was set up with, and the
    /// sample's input/target widths must match the network's ends. The whole
    /// pass reuses the preallocated scratch; nothing is allocated.
    pub fn process(&mut self, network: &Network, sample: &TrainingSample, wu: &mut WeightUpdates) {
        let layers = network.layers();
        let last = layers.len() - 1;

        debug_assert_eq!(self.potentials.len(), layers.len());
        debug_assert_eq!(wu.layer_count(), layers.len());

        // Forward sweep, recording potentials and activations per layer.
        self.activations[0].copy_from_slice(&sample.input);
        for (l, layer) in layers.iter().enumerate() {
            let (head, tail) = self.activations.split_at_mut(l + 1);
            layer.forward(&mut self.potentials[l], &head[l]);
            layer
                .activation()
                .activation(&mut tail[0], &self.potentials[l]);
        }

        // The cost seeds the output layer's delta straight into the bias
        // gradient buffer.
        self.cost.output_error(
            &mut wu.biases[last],
            &self.activations[last + 1],
            &sample.target,
            &self.potentials[last],
            layers[last].activation(),
        );
        linalg::outer_product_into(&mut wu.weights[last], &wu.biases[last], &self.activations[last]);

        // Backward sweep. wu.biases[l + 1] is the delta flowing into layer
        // l + 1's weights; wu.biases[l] becomes the next delta.
        for l in (0..last).rev() {
            layers[l]
                .activation()
                .derivative(&mut self.sp[l], &self.potentials[l]);

            let (lower, upper) = wu.biases.split_at_mut(l + 1);
            layers[l + 1].backward(&mut self.backward[l], &upper[0]);
            linalg::mul_elementwise_into(&mut lower[l], &self.backward[l], &self.sp[l]);
            linalg::outer_product_into(&mut wu.weights[l], &lower[l], &self.activations[l]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Activation, Network};

    fn cost_of(network: &Network, cost: Cost, sample: &TrainingSample) -> f64 {
        cost.cost(&network.evaluate(&sample.input), &sample.target)
    }

    fn assert_close(analytic: f64, numeric: f64, abs_tol: f64, rel_tol: f64) {
        let diff = (analytic - numeric).abs();
        let scale = analytic.abs().max(numeric.abs()).max(1.0);
        assert!(
            diff <= abs_tol || diff / scale <= rel_tol,
            "analytic={analytic} numeric={numeric} diff={diff}"
        );
    }

    fn check_against_numeric_gradients(mut network: Network, cost: Cost, target: Vec<f64>) {
        let sample = TrainingSample::new(vec![0.3, -0.7], target);

        let mut trainer = Backprop::new(&network, cost);
        let mut wu = WeightUpdates::new(&network);
        trainer.process(&network, &sample, &mut wu);

        let eps = 1e-6;
        let abs_tol = 1e-6;
        let rel_tol = 1e-4;

        for l in 0..network.layers().len() {
            for p in 0..network.layers()[l].weights().len() {
                let orig = network.layers()[l].weights()[p];

                network.layer_mut(l).weights_mut()[p] = orig + eps;
                let plus = cost_of(&network, cost, &sample);
                network.layer_mut(l).weights_mut()[p] = orig - eps;
                let minus = cost_of(&network, cost, &sample);
                network.layer_mut(l).weights_mut()[p] = orig;

                let numeric = (plus - minus) / (2.0 * eps);
                assert_close(wu.weights(l)[p], numeric, abs_tol, rel_tol);
            }

            for p in 0..network.layers()[l].biases().len() {
                let orig = network.layers()[l].biases()[p];

                network.layer_mut(l).biases_mut()[p] = orig + eps;
                let plus = cost_of(&network, cost, &sample);
                network.layer_mut(l).biases_mut()[p] = orig - eps;
                let minus = cost_of(&network, cost, &sample);
                network.layer_mut(l).biases_mut()[p] = orig;

                let numeric = (plus - minus) / (2.0 * eps);
                assert_close(wu.biases(l)[p], numeric, abs_tol, rel_tol);
            }
        }
    }

    #[test]
    fn quadratic_gradients_match_numeric_differences() {
        let network = Network::seeded(
            &[2, 3, 2],
            &[Activation::Sigmoid, Activation::Sigmoid],
            0,
        )
        .unwrap();
        check_against_numeric_gradients(network, Cost::Quadratic, vec![0.8, 0.2]);
    }

    #[test]
    fn cross_entropy_gradients_match_numeric_differences() {
        // Sigmoid layers throughout: the check relies on the implemented
        // derivatives being the mathematical ones, which rules out step and
        // the half-angle tanh form here.
        let network = Network::seeded(
            &[2, 3, 2],
            &[Activation::Sigmoid, Activation::Sigmoid],
            1,
        )
        .unwrap();
        check_against_numeric_gradients(network, Cost::CrossEntropy, vec![0.8, 0.2]);
    }

    #[test]
    fn log_likelihood_gradients_match_numeric_differences() {
        // Softmax output: the cost supplies the delta, the softmax
        // derivative is never requested. The a - y identity requires a
        // one-hot target.
        let network = Network::seeded(
            &[2, 3, 2],
            &[Activation::Sigmoid, Activation::Softmax],
            2,
        )
        .unwrap();
        check_against_numeric_gradients(network, Cost::LogLikelihood, vec![1.0, 0.0]);
    }

    #[test]
    fn weight_updates_zero_clears_all_buffers() {
        let network = Network::seeded(&[2, 2], &[Activation::Sigmoid], 0).unwrap();
        let mut wu = WeightUpdates::new(&network);
        let mut trainer = Backprop::new(&network, Cost::Quadratic);
        trainer.process(
            &network,
            &TrainingSample::new(vec![1.0, 0.0], vec![1.0, 0.0]),
            &mut wu,
        );

        assert!(wu.biases(0).iter().any(|&v| v != 0.0));
        wu.zero();
        assert!(wu.biases(0).iter().all(|&v| v == 0.0));
        assert!(wu.weights(0).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn buffers_mirror_network_shapes() {
        let network = Network::seeded(
            &[4, 7, 3],
            &[Activation::Sigmoid, Activation::Sigmoid],
            0,
        )
        .unwrap();
        let trainer = Backprop::new(&network, Cost::Quadratic);

        assert_eq!(trainer.activations.len(), 3);
        assert_eq!(trainer.activations[0].len(), 4);
        assert_eq!(trainer.activations[1].len(), 7);
        assert_eq!(trainer.activations[2].len(), 3);
        assert_eq!(trainer.potentials[1].len(), 3);
        assert_eq!(trainer.sp[0].len(), 7);
        // backward[l] holds the delta arriving from layer l + 1, so it has
        // layer l's output width.
        assert_eq!(trainer.backward[0].len(), 7);
        assert_eq!(trainer.backward[1].len(), 3);
    }
}
