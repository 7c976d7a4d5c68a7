//! Categorical Distribution
//!
//! Distribution over `n` discrete actions parameterised by unnormalised logits.

use burn::prelude::*;
use burn::tensor::activation::{log_softmax, softmax};
use burn::tensor::Distribution;

use super::ActionDistribution;

#[derive(Debug, Clone)]
pub struct Categorical<B: Backend> {
    /// `[batch, n]`
    logits: Tensor<B, 2>,
}

impl<B: Backend> Categorical<B> {
    pub fn new(logits: Tensor<B, 2>) -> Self {
        Self { logits }
    }

    pub fn logits(&self) -> &Tensor<B, 2> {
        &self.logits
    }

    /// `[batch, n]` action probabilities
    pub fn probs(&self) -> Tensor<B, 2> {
        softmax(self.logits.clone(), 1)
    }
}

impl<B: Backend> ActionDistribution<B> for Categorical<B> {
    /// `[batch]` action indices
    type Action = Tensor<B, 1, Int>;

    /// Gumbel-max sampling
    fn sample(&self) -> Self::Action {
        let uniform = self
            .logits
            .random_like(Distribution::Uniform(1e-6, 1.0))
            .clamp(1e-6, 1.0 - 1e-6);
        let gumbel = uniform.log().neg().log().neg();
        (self.logits.clone() + gumbel).argmax(1).squeeze::<1>(1)
    }

    fn deterministic_sample(&self) -> Self::Action {
        self.logits.clone().argmax(1).squeeze::<1>(1)
    }

    fn logp(&self, action: Self::Action) -> Tensor<B, 1> {
        log_softmax(self.logits.clone(), 1)
            .gather(1, action.unsqueeze_dim::<2>(1))
            .squeeze::<1>(1)
    }

    fn entropy(&self) -> Tensor<B, 1> {
        let log_probs = log_softmax(self.logits.clone(), 1);
        (log_probs.clone().exp() * log_probs)
            .sum_dim(1)
            .neg()
            .squeeze::<1>(1)
    }
}
