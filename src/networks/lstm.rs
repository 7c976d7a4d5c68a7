//! LSTM Encoder
//!
//! Tokenizes every timestep with a stateless encoder, then runs the token
//! sequence through stacked LSTM layers.

use burn::module::Ignored;
use burn::nn::{Linear, LinearConfig, Lstm, LstmConfig, LstmState};
use burn::prelude::*;

use super::{Activation, Tokenizer, TokenizerConfig};
use crate::error::{self, CatalogError};
use crate::models::ViewRequirements;
use crate::spaces::Space;

/// LSTM encoder configuration
#[derive(Config, Debug, PartialEq)]
pub struct LstmEncoderConfig {
    /// Per-timestep encoder
    pub tokenizer: TokenizerConfig,
    /// LSTM cell size
    pub hidden_dim: usize,
    /// Inputs are `[batch, time, ...]`; otherwise `[time, batch, ...]`
    #[config(default = true)]
    pub batch_first: bool,
    #[config(default = 1)]
    pub num_layers: usize,
    pub output_dim: usize,
    /// Applied after the projection only; the LSTM output is already bounded
    /// and passes through untouched when `output_dim == hidden_dim`
    #[config(default = "Activation::Tanh")]
    pub output_activation: Activation,
    pub action_space: Option<Space>,
    pub view_requirements: Option<ViewRequirements>,
}

/// Recurrent state, one entry per layer
pub type LstmEncoderState<B> = Vec<LstmState<B, 2>>;

#[derive(Module, Debug)]
pub struct LstmEncoder<B: Backend> {
    tokenizer: Tokenizer<B>,
    layers: Vec<Lstm<B>>,
    /// Present only when `output_dim` differs from the cell size
    projection: Option<Linear<B>>,
    output_activation: Ignored<Activation>,
    hidden_dim: usize,
    batch_first: bool,
}

impl LstmEncoderConfig {
    pub fn validate(&self) -> error::Result<()> {
        if self.hidden_dim == 0 || self.num_layers == 0 || self.output_dim == 0 {
            return Err(CatalogError::invalid(format!(
                "LSTM hidden_dim, num_layers and output_dim must be positive, got {}, {}, {}",
                self.hidden_dim, self.num_layers, self.output_dim
            )));
        }
        self.tokenizer.validate()
    }

    /// Initialize the encoder network
    pub fn init<B: Backend>(&self, device: &B::Device) -> error::Result<LstmEncoder<B>> {
        self.validate()?;
        let tokenizer = self.tokenizer.init(device)?;

        let mut layers = Vec::with_capacity(self.num_layers);
        let mut d_in = self.tokenizer.output_dim();
        for _ in 0..self.num_layers {
            layers.push(LstmConfig::new(d_in, self.hidden_dim, true).init(device));
            d_in = self.hidden_dim;
        }

        let projection = (self.output_dim != self.hidden_dim)
            .then(|| LinearConfig::new(self.hidden_dim, self.output_dim).init(device));

        Ok(LstmEncoder {
            tokenizer,
            layers,
            projection,
            output_activation: Ignored(self.output_activation),
            hidden_dim: self.hidden_dim,
            batch_first: self.batch_first,
        })
    }
}

impl<B: Backend> LstmEncoder<B> {
    /// Zero state for a batch
    pub fn initial_state(&self, batch_size: usize, device: &B::Device) -> LstmEncoderState<B> {
        self.layers
            .iter()
            .map(|_| {
                LstmState::new(
                    Tensor::zeros([batch_size, self.hidden_dim], device),
                    Tensor::zeros([batch_size, self.hidden_dim], device),
                )
            })
            .collect()
    }

    /// Encode a sequence of flat observations.
    ///
    /// `inputs` is `[batch, time, features]` (or `[time, batch, features]` when
    /// not batch-first); the output keeps the same layout with `output_dim`
    /// features. A state with the wrong number of layers is ignored.
    pub fn forward(
        &self,
        inputs: Tensor<B, 3>,
        state: Option<LstmEncoderState<B>>,
    ) -> (Tensor<B, 3>, LstmEncoderState<B>) {
        let inputs = if self.batch_first {
            inputs
        } else {
            inputs.swap_dims(0, 1)
        };
        let [batch, time, features] = inputs.dims();

        let tokens = self.tokenizer.forward(inputs.reshape([batch * time, features]));
        let token_dim = tokens.dims()[1];
        let mut x = tokens.reshape([batch, time, token_dim]);

        let mut states: Vec<Option<LstmState<B, 2>>> = match state {
            Some(states) if states.len() == self.layers.len() => {
                states.into_iter().map(Some).collect()
            }
            _ => self.layers.iter().map(|_| None).collect(),
        };

        let mut next_states = Vec::with_capacity(self.layers.len());
        for (layer, state) in self.layers.iter().zip(states.iter_mut()) {
            let (output, next) = layer.forward(x, state.take());
            x = output;
            next_states.push(next);
        }

        if let Some(projection) = &self.projection {
            x = self.output_activation.apply(projection.forward(x));
        }

        let x = if self.batch_first { x } else { x.swap_dims(0, 1) };
        (x, next_states)
    }

    pub fn output_dim(&self) -> usize {
        match &self.projection {
            Some(projection) => projection.weight.dims()[1],
            None => self.hidden_dim,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::networks::MlpEncoderConfig;
    use burn::backend::NdArray;

    type TestBackend = NdArray<f32>;

    fn tokenizer() -> TokenizerConfig {
        TokenizerConfig::Mlp(MlpEncoderConfig::new(6, vec![16], 8))
    }

    #[test]
    fn test_lstm_forward_batch_first() {
        let device = Default::default();
        let config = LstmEncoderConfig::new(tokenizer(), 12, 12);
        let encoder = config.init::<TestBackend>(&device).unwrap();

        let inputs = Tensor::<TestBackend, 3>::zeros([2, 5, 6], &device);
        let (outputs, state) = encoder.forward(inputs, None);

        assert_eq!(outputs.dims(), [2, 5, 12]);
        assert_eq!(state.len(), 1);
        assert_eq!(state[0].hidden.dims(), [2, 12]);
    }

    #[test]
    fn test_lstm_time_major_and_projection() {
        let device = Default::default();
        let config = LstmEncoderConfig::new(tokenizer(), 12, 4)
            .with_batch_first(false)
            .with_num_layers(2);
        let encoder = config.init::<TestBackend>(&device).unwrap();
        assert_eq!(encoder.output_dim(), 4);

        let state = encoder.initial_state(3, &device);
        let inputs = Tensor::<TestBackend, 3>::zeros([7, 3, 6], &device);
        let (outputs, state) = encoder.forward(inputs, Some(state));

        assert_eq!(outputs.dims(), [7, 3, 4]);
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn test_activation_skipped_without_projection() {
        let device = Default::default();
        let config = LstmEncoderConfig::new(tokenizer(), 8, 8)
            .with_output_activation(Activation::Relu);
        let encoder = config.init::<TestBackend>(&device).unwrap();
        assert!(encoder.projection.is_none());

        let inputs = Tensor::<TestBackend, 3>::random(
            [2, 3, 6],
            burn::tensor::Distribution::Normal(0.0, 1.0),
            &device,
        );
        let (outputs, _) = encoder.forward(inputs.clone(), None);

        let tokens = encoder.tokenizer.forward(inputs.reshape([6, 6])).reshape([2, 3, 8]);
        let (raw, _) = encoder.layers[0].forward(tokens, None);
        outputs.into_data().assert_eq(&raw.into_data(), true);
    }

    #[test]
    fn test_zero_layers_rejected() {
        let config = LstmEncoderConfig::new(tokenizer(), 12, 12).with_num_layers(0);
        assert!(matches!(
            config.validate(),
            Err(CatalogError::InvalidConfiguration(_))
        ));
    }
}
