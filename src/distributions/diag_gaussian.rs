//! Diagonal Gaussian Distribution
//!
//! Independent normal per action dimension; the logits are `[mean, log_std]`
//! concatenated along the feature axis.

use std::f64::consts::PI;

use burn::prelude::*;
use burn::tensor::Distribution;

use super::ActionDistribution;

/// Bounds applied to `log_std`
pub const LOG_STD_MIN: f64 = -20.0;
pub const LOG_STD_MAX: f64 = 2.0;

#[derive(Debug, Clone)]
pub struct DiagGaussian<B: Backend> {
    /// `[batch, k]`
    mean: Tensor<B, 2>,
    /// `[batch, k]`
    log_std: Tensor<B, 2>,
}

impl<B: Backend> DiagGaussian<B> {
    /// Split `[batch, 2k]` logits into mean and log std.
    ///
    /// The caller checks that the width is even.
    pub fn from_logits(logits: Tensor<B, 2>) -> Self {
        let half = logits.dims()[1] / 2;
        let mean = logits.clone().narrow(1, 0, half);
        let log_std = logits.narrow(1, half, half);
        Self::new(mean, log_std)
    }

    pub fn new(mean: Tensor<B, 2>, log_std: Tensor<B, 2>) -> Self {
        Self {
            mean,
            log_std: log_std.clamp(LOG_STD_MIN, LOG_STD_MAX),
        }
    }

    pub fn mean(&self) -> &Tensor<B, 2> {
        &self.mean
    }

    pub fn std(&self) -> Tensor<B, 2> {
        self.log_std.clone().exp()
    }
}

impl<B: Backend> ActionDistribution<B> for DiagGaussian<B> {
    /// `[batch, k]`
    type Action = Tensor<B, 2>;

    fn sample(&self) -> Self::Action {
        let noise = self.mean.random_like(Distribution::Normal(0.0, 1.0));
        self.mean.clone() + noise * self.std()
    }

    fn deterministic_sample(&self) -> Self::Action {
        self.mean.clone()
    }

    fn logp(&self, action: Self::Action) -> Tensor<B, 1> {
        let z = (action - self.mean.clone()) / self.std();
        let per_dim = z
            .powf_scalar(2.0)
            .mul_scalar(-0.5)
            .sub(self.log_std.clone())
            .sub_scalar(0.5 * (2.0 * PI).ln());
        per_dim.sum_dim(1).squeeze::<1>(1)
    }

    fn entropy(&self) -> Tensor<B, 1> {
        self.log_std
            .clone()
            .add_scalar(0.5 + 0.5 * (2.0 * PI).ln())
            .sum_dim(1)
            .squeeze::<1>(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_split_logits() {
        let device = Default::default();
        let logits = Tensor::<TestBackend, 2>::from_floats([[1.0, 2.0, 0.0, 0.0]], &device);
        let dist = DiagGaussian::from_logits(logits);

        let mean: Vec<f32> = dist.deterministic_sample().into_data().to_vec().unwrap();
        assert_eq!(mean, vec![1.0, 2.0]);
        let std: Vec<f32> = dist.std().into_data().to_vec().unwrap();
        assert_eq!(std, vec![1.0, 1.0]);
    }

    #[test]
    fn test_standard_normal_logp_and_entropy() {
        let device = Default::default();
        let dist = DiagGaussian::from_logits(Tensor::<TestBackend, 2>::zeros([1, 2], &device));

        let logp: Vec<f32> = dist
            .logp(Tensor::zeros([1, 1], &device))
            .into_data()
            .to_vec()
            .unwrap();
        let expected = -0.5 * (2.0 * std::f32::consts::PI).ln();
        assert!((logp[0] - expected).abs() < 1e-5);

        let entropy: Vec<f32> = dist.entropy().into_data().to_vec().unwrap();
        let expected = 0.5 + 0.5 * (2.0 * std::f32::consts::PI).ln();
        assert!((entropy[0] - expected).abs() < 1e-5);
    }

    #[test]
    fn test_sample_shape() {
        let device = Default::default();
        let dist = DiagGaussian::from_logits(Tensor::<TestBackend, 2>::zeros([5, 6], &device));
        assert_eq!(dist.sample().dims(), [5, 3]);
    }
}
