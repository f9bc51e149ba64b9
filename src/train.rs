//! Mini-batch stochastic gradient descent.
//!
//! Each epoch shuffles the samples, partitions them into contiguous
//! mini-batches, computes per-sample gradients on parallel workers, reduces
//! the results and applies a single update per batch. Workers read the
//! network's parameters under the batch barrier; only this loop writes them,
//! strictly between batches.

use std::time::{Duration, Instant};

use log::{debug, trace};
use rand::seq::SliceRandom;
use rand::Rng;
use rayon::prelude::*;

use crate::linalg;
use crate::trainer::{Backprop, WeightUpdates};
use crate::{Cost, Error, Network, Result, TrainingSample};

/// Called after every epoch with the 1-based epoch number and its duration.
pub type EpochHook = Box<dyn FnMut(usize, Duration)>;

/// Configuration for [`train`].
pub struct TrainOptions {
    pub epochs: usize,
    pub mini_batch_size: usize,
    pub learning_rate: f64,
    /// L2 regularization coefficient; 0 disables weight decay.
    pub l2: f64,
    /// Momentum coefficient in `[0, 1)`; 0 disables the velocity term.
    pub momentum: f64,
    pub cost: Cost,
    pub epoch_hook: Option<EpochHook>,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            epochs: 10,
            mini_batch_size: 16,
            learning_rate: 1e-2,
            l2: 0.0,
            momentum: 0.0,
            cost: Cost::Quadratic,
            epoch_hook: None,
        }
    }
}

impl TrainOptions {
    fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(Error::InvalidConfig("epochs must be > 0".to_owned()));
        }
        if self.mini_batch_size == 0 {
            return Err(Error::InvalidConfig(
                "mini_batch_size must be > 0".to_owned(),
            ));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::InvalidConfig(
                "learning_rate must be finite and > 0".to_owned(),
            ));
        }
        if !(self.l2.is_finite() && self.l2 >= 0.0) {
            return Err(Error::InvalidConfig(
                "l2 must be finite and >= 0".to_owned(),
            ));
        }
        if !(self.momentum.is_finite() && (0.0..1.0).contains(&self.momentum)) {
            return Err(Error::InvalidConfig(
                "momentum must be in [0, 1)".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Train `network` on `samples` with mini-batch SGD and backpropagation.
///
/// Samples are shuffled in place every epoch. Per batch, up to
/// `mini_batch_size` workers each compute one sample's gradient into their
/// own buffers; the fan-out joins before the reduced, `-lr/batch`-scaled
/// update is applied with the weight-decay factor `1 - lr*l2/N`. A failed
/// worker fails the whole call (the fan-out propagates panics).
pub fn train<R: Rng + ?Sized>(
    network: &mut Network,
    samples: &mut [TrainingSample],
    mut options: TrainOptions,
    rng: &mut R,
) -> Result<()> {
    options.validate()?;

    if samples.is_empty() {
        return Err(Error::InvalidConfig("samples must not be empty".to_owned()));
    }
    let (n_in, n_out) = (network.input_dim(), network.output_dim());
    for (i, sample) in samples.iter().enumerate() {
        if sample.input.len() != n_in {
            return Err(Error::ShapeMismatch(format!(
                "sample {i} input len {} does not match network input_dim {n_in}",
                sample.input.len()
            )));
        }
        if sample.target.len() != n_out {
            return Err(Error::ShapeMismatch(format!(
                "sample {i} target len {} does not match network output_dim {n_out}",
                sample.target.len()
            )));
        }
    }

    let mut trainers: Vec<Backprop> = (0..options.mini_batch_size)
        .map(|_| Backprop::new(network, options.cost))
        .collect();
    let mut updates: Vec<WeightUpdates> = (0..options.mini_batch_size)
        .map(|_| WeightUpdates::new(network))
        .collect();
    let mut reducer = WeightUpdates::new(network);
    let mut velocity = if options.momentum > 0.0 {
        Some(WeightUpdates::new(network))
    } else {
        None
    };

    let decay = if options.l2 == 0.0 {
        1.0
    } else {
        1.0 - options.learning_rate * options.l2 / samples.len() as f64
    };

    let layer_count = network.layers().len();
    let batches = samples.len().div_ceil(options.mini_batch_size);

    for epoch in 1..=options.epochs {
        let started = Instant::now();
        samples.shuffle(rng);

        for (b, batch) in samples.chunks(options.mini_batch_size).enumerate() {
            let net: &Network = network;
            trainers[..batch.len()]
                .par_iter_mut()
                .zip(updates[..batch.len()].par_iter_mut())
                .zip(batch.par_iter())
                .for_each(|((trainer, wu), sample)| trainer.process(net, sample, wu));

            // Fold the workers' gradients in index order; the sum is
            // commutative, the order just keeps runs reproducible.
            reducer.zero();
            for wu in &updates[..batch.len()] {
                for l in 0..layer_count {
                    linalg::sum_into(&mut reducer.biases[l], &wu.biases[l]);
                    linalg::sum_into(&mut reducer.weights[l], &wu.weights[l]);
                }
            }

            let rate = -options.learning_rate / batch.len() as f64;
            for l in 0..layer_count {
                linalg::scale(&mut reducer.biases[l], rate);
                linalg::scale(&mut reducer.weights[l], rate);
            }

            let step = match velocity.as_mut() {
                Some(v) => {
                    for l in 0..layer_count {
                        linalg::scale(&mut v.biases[l], options.momentum);
                        linalg::scale(&mut v.weights[l], options.momentum);
                        linalg::sum_into(&mut v.biases[l], &reducer.biases[l]);
                        linalg::sum_into(&mut v.weights[l], &reducer.weights[l]);
                    }
                    &*v
                }
                None => &reducer,
            };

            for l in 0..layer_count {
                network
                    .layer_mut(l)
                    .update_weights(&step.weights[l], &step.biases[l], decay);
            }

            trace!("epoch {epoch}/{}: batch {b}/{batches}", options.epochs);
        }

        let elapsed = started.elapsed();
        debug!("epoch {epoch}/{} finished in {elapsed:?}", options.epochs);
        if let Some(hook) = options.epoch_hook.as_mut() {
            hook(epoch, elapsed);
        }
    }

    Ok(())
}
