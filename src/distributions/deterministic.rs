//! Deterministic Distribution
//!
//! Degenerate distribution whose every sample is the logits themselves.

use burn::prelude::*;

use super::ActionDistribution;

#[derive(Debug, Clone)]
pub struct Deterministic<B: Backend> {
    /// `[batch, k]`
    loc: Tensor<B, 2>,
}

impl<B: Backend> Deterministic<B> {
    pub fn new(loc: Tensor<B, 2>) -> Self {
        Self { loc }
    }
}

impl<B: Backend> ActionDistribution<B> for Deterministic<B> {
    type Action = Tensor<B, 2>;

    fn sample(&self) -> Self::Action {
        self.loc.clone()
    }

    fn deterministic_sample(&self) -> Self::Action {
        self.loc.clone()
    }

    /// Zero for every action
    fn logp(&self, action: Self::Action) -> Tensor<B, 1> {
        let [batch, _] = action.dims();
        Tensor::zeros([batch], &action.device())
    }

    fn entropy(&self) -> Tensor<B, 1> {
        Tensor::zeros([self.loc.dims()[0]], &self.loc.device())
    }
}
