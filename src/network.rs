//! A feed-forward network as an ordered stack of layers.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{Activation, Error, Layer, Result};

/// An ordered sequence of fully connected layers.
///
/// The network owns its layers and their topology; parameters are mutated
/// only through the training loop and `load`.
#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<Layer>,
}

impl Network {
    /// Build a network from a neuron-count sequence and one activation per
    /// layer.
    ///
    /// `neurons = [k0, k1, ..., kL]` produces `L` layers where layer `i`
    /// consumes `k_i` inputs and emits `k_{i+1}` outputs. Fails with
    /// `ShapeMismatch` when `activations.len() != neurons.len() - 1`.
    pub fn with_rng<R: Rng + ?Sized>(
        neurons: &[usize],
        activations: &[Activation],
        rng: &mut R,
    ) -> Result<Self> {
        if neurons.len() < 2 {
            return Err(Error::ShapeMismatch(format!(
                "neuron counts must include input and output widths, got {} entries",
                neurons.len()
            )));
        }
        if activations.len() != neurons.len() - 1 {
            return Err(Error::ShapeMismatch(format!(
                "{} activations do not match {} layers",
                activations.len(),
                neurons.len() - 1
            )));
        }

        let mut layers = Vec::with_capacity(activations.len());
        for (dims, &activation) in neurons.windows(2).zip(activations) {
            layers.push(Layer::new_with_rng(dims[0], dims[1], activation, rng)?);
        }

        Ok(Self { layers })
    }

    /// Build a network using a deterministic seed.
    #[inline]
    pub fn seeded(neurons: &[usize], activations: &[Activation], seed: u64) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::with_rng(neurons, activations, &mut rng)
    }

    /// Returns the expected input width.
    #[inline]
    pub fn input_dim(&self) -> usize {
        self.layers
            .first()
            .expect("network must have at least one layer")
            .in_dim()
    }

    /// Returns the produced output width.
    #[inline]
    pub fn output_dim(&self) -> usize {
        self.layers
            .last()
            .expect("network must have at least one layer")
            .out_dim()
    }

    /// Ordered read access to the layers.
    #[inline]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Mutable access to one layer's parameters (for `set_weights` and the
    /// update step). The topology itself stays fixed.
    #[inline]
    pub fn layer_mut(&mut self, idx: usize) -> &mut Layer {
        &mut self.layers[idx]
    }

    /// Forward evaluation: threads `input` through every layer's forward
    /// pass and activation. Pure in the parameters; returns a newly
    /// allocated output of length `output_dim()`.
    pub fn evaluate(&self, input: &[f64]) -> Vec<f64> {
        assert_eq!(
            input.len(),
            self.input_dim(),
            "input len {} does not match network input_dim {}",
            input.len(),
            self.input_dim()
        );

        let mut output = input.to_vec();
        for layer in &self.layers {
            let mut potentials = vec![0.0; layer.out_dim()];
            layer.forward(&mut potentials, &output);

            let mut activated = vec![0.0; layer.out_dim()];
            layer.activation().activation(&mut activated, &potentials);
            output = activated;
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn identity_forward_matches_hand_computed_values() {
        let mut nn = Network::seeded(&[2, 3], &[Activation::identity()], 0).unwrap();
        nn.layer_mut(0)
            .set_weights(
                &[vec![0.1, 2.0], vec![0.2, 3.0], vec![0.3, 4.0]],
                &[10.0, 20.0, 30.0],
            )
            .unwrap();

        let output = nn.evaluate(&[1.0, 1.0]);

        assert_eq!(output.len(), 3);
        for (o, expected) in output.iter().zip([12.1, 23.2, 34.3]) {
            assert!((o - expected).abs() < 1e-12, "got {o}, expected {expected}");
        }
    }

    #[test]
    fn construction_rejects_disagreeing_counts() {
        let acts = [Activation::Sigmoid];
        assert!(Network::seeded(&[2, 3, 1], &acts, 0).is_err());
        assert!(Network::seeded(&[2], &acts, 0).is_err());
        assert!(Network::seeded(&[], &[], 0).is_err());
    }

    #[test]
    fn layer_shapes_chain() {
        let nn = Network::seeded(
            &[4, 7, 3],
            &[Activation::Sigmoid, Activation::Sigmoid],
            1,
        )
        .unwrap();

        assert_eq!(nn.input_dim(), 4);
        assert_eq!(nn.output_dim(), 3);
        assert_eq!(nn.layers().len(), 2);
        assert_eq!(nn.layers()[0].shapes(), (7, 4, 7));
        assert_eq!(nn.layers()[1].shapes(), (3, 7, 3));
    }

    #[test]
    fn evaluate_output_length_matches_last_layer() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        for &out in &[1, 2, 9] {
            let nn = Network::with_rng(
                &[5, 4, out],
                &[Activation::Tanh, Activation::Sigmoid],
                &mut rng,
            )
            .unwrap();
            assert_eq!(nn.evaluate(&vec![0.5; 5]).len(), out);
        }
    }
}
