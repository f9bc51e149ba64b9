//! Training samples.

/// One supervised example: an input vector and the desired output vector.
///
/// Samples are owned by the caller; `train` only reorders them in place when
/// shuffling and reads them from worker tasks.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSample {
    pub input: Vec<f64>,
    pub target: Vec<f64>,
}

impl TrainingSample {
    #[inline]
    pub fn new(input: Vec<f64>, target: Vec<f64>) -> Self {
        Self { input, target }
    }
}

/// Build samples from parallel rows of inputs and targets.
///
/// Panics if the two slices differ in length.
pub fn samples_from_rows(inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> Vec<TrainingSample> {
    assert_eq!(
        inputs.len(),
        targets.len(),
        "inputs len {} does not match targets len {}",
        inputs.len(),
        targets.len()
    );

    inputs
        .iter()
        .zip(targets)
        .map(|(x, y)| TrainingSample::new(x.clone(), y.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_from_rows_pairs_up() {
        let samples = samples_from_rows(
            &[vec![0.0, 1.0], vec![1.0, 0.0]],
            &[vec![1.0], vec![0.0]],
        );
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].input, [0.0, 1.0]);
        assert_eq!(samples[1].target, [0.0]);
    }
}
