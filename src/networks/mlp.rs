//! MLP Encoder
//!
//! Fully connected stack: input -> hidden layers -> output.

use burn::module::Ignored;
use burn::nn::{Linear, LinearConfig};
use burn::prelude::*;

use super::Activation;
use crate::error::{self, CatalogError};

/// MLP encoder configuration
#[derive(Config, Debug, PartialEq)]
pub struct MlpEncoderConfig {
    /// Flat input width
    pub input_dim: usize,
    /// Widths of the hidden layers, in order; may be empty
    pub hidden_layer_dims: Vec<usize>,
    #[config(default = "Activation::Tanh")]
    pub hidden_layer_activation: Activation,
    pub output_dim: usize,
    #[config(default = "Activation::Tanh")]
    pub output_activation: Activation,
}

#[derive(Module, Debug)]
pub struct MlpEncoder<B: Backend> {
    hidden: Vec<Linear<B>>,
    output: Linear<B>,
    hidden_activation: Ignored<Activation>,
    output_activation: Ignored<Activation>,
}

impl MlpEncoderConfig {
    pub fn validate(&self) -> error::Result<()> {
        if self.input_dim == 0 || self.output_dim == 0 {
            return Err(CatalogError::invalid(format!(
                "MLP input_dim and output_dim must be positive, got {} and {}",
                self.input_dim, self.output_dim
            )));
        }
        if self.hidden_layer_dims.contains(&0) {
            return Err(CatalogError::invalid(format!(
                "MLP hidden widths must be positive, got {:?}",
                self.hidden_layer_dims
            )));
        }
        Ok(())
    }

    /// Initialize the encoder network
    pub fn init<B: Backend>(&self, device: &B::Device) -> MlpEncoder<B> {
        let mut hidden = Vec::with_capacity(self.hidden_layer_dims.len());
        let mut d_in = self.input_dim;
        for &width in &self.hidden_layer_dims {
            hidden.push(LinearConfig::new(d_in, width).init(device));
            d_in = width;
        }

        MlpEncoder {
            hidden,
            output: LinearConfig::new(d_in, self.output_dim).init(device),
            hidden_activation: Ignored(self.hidden_layer_activation),
            output_activation: Ignored(self.output_activation),
        }
    }
}

impl<B: Backend> MlpEncoder<B> {
    /// `[batch, input_dim]` -> `[batch, output_dim]`
    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self
            .hidden
            .iter()
            .fold(x, |x, layer| self.hidden_activation.apply(layer.forward(x)));
        self.output_activation.apply(self.output.forward(x))
    }

    pub fn output_dim(&self) -> usize {
        self.output.weight.dims()[1]
    }
}
