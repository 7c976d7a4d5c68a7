//! Activation Functions
//!
//! Activation tags as they appear in model configurations, applied to burn tensors.

use burn::prelude::*;
use burn::tensor::activation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Linear,
    Relu,
    #[default]
    Tanh,
    Sigmoid,
    #[serde(alias = "silu")]
    Swish,
    Gelu,
}

impl Activation {
    pub fn apply<B: Backend, const D: usize>(&self, x: Tensor<B, D>) -> Tensor<B, D> {
        match self {
            Self::Linear => x,
            Self::Relu => activation::relu(x),
            Self::Tanh => activation::tanh(x),
            Self::Sigmoid => activation::sigmoid(x),
            Self::Swish => activation::silu(x),
            Self::Gelu => activation::gelu(x),
        }
    }
}
