//! Saving and loading network parameters.
//!
//! The on-wire layout is, per layer in forward order: the biases as a
//! length-prefixed array of `f64`, then the weights as a length-prefixed
//! array of rows (outer length `out_dim`, inner length `in_dim`). Layers are
//! concatenated with no outer framing, so a stream can only be loaded into a
//! network that already has the right shape; the length prefixes let `load`
//! verify that before touching any parameters.

use std::io::{Read, Write};

use crate::{Error, Network, Result};

/// Serialize every layer's parameters into `writer`.
pub fn save<W: Write>(network: &Network, mut writer: W) -> Result<()> {
    for layer in network.layers() {
        bincode::serialize_into(&mut writer, layer.biases())?;

        let rows: Vec<&[f64]> = layer.weights().chunks(layer.in_dim()).collect();
        bincode::serialize_into(&mut writer, &rows)?;
    }
    Ok(())
}

/// Restore previously saved parameters from `reader` into `network`.
///
/// The network must already have the saved shape; a disagreement fails with
/// `ShapeMismatch` and leaves the remaining layers untouched.
pub fn load<R: Read>(network: &mut Network, mut reader: R) -> Result<()> {
    for idx in 0..network.layers().len() {
        let biases: Vec<f64> = bincode::deserialize_from(&mut reader)?;
        let weights: Vec<Vec<f64>> = bincode::deserialize_from(&mut reader)?;

        network
            .layer_mut(idx)
            .set_weights(&weights, &biases)
            .map_err(|err| match err {
                Error::ShapeMismatch(msg) => Error::ShapeMismatch(format!("layer {idx}: {msg}")),
                other => other,
            })?;
    }
    Ok(())
}
