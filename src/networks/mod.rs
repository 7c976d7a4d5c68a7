//! Encoder Networks
//!
//! Encoder configurations produced by resolution, and the burn modules they build.

pub mod activation;
pub mod cnn;
pub mod lstm;
pub mod mlp;

pub use activation::Activation;
pub use cnn::{CnnEncoder, CnnEncoderConfig, ConvGeometry};
pub use lstm::{LstmEncoder, LstmEncoderConfig, LstmEncoderState};
pub use mlp::{MlpEncoder, MlpEncoderConfig};

use burn::prelude::*;
use serde::{Deserialize, Serialize};

use crate::backend::{BackendTag, InferenceBackend, TrainingBackend};
use crate::error::{CatalogError, Result};

/// Resolved encoder configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EncoderConfig {
    Mlp(MlpEncoderConfig),
    Cnn(CnnEncoderConfig),
    Lstm(LstmEncoderConfig),
}

impl EncoderConfig {
    /// Short variant name
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Mlp(_) => "mlp",
            Self::Cnn(_) => "cnn",
            Self::Lstm(_) => "lstm",
        }
    }

    /// Width of the latent features the built encoder emits
    pub fn output_dim(&self) -> usize {
        match self {
            Self::Mlp(config) => config.output_dim,
            Self::Cnn(config) => config.output_dim,
            Self::Lstm(config) => config.output_dim,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Mlp(config) => config.validate(),
            Self::Cnn(config) => config.layer_geometry().map(|_| ()),
            Self::Lstm(config) => config.validate(),
        }
    }

    /// Initialize the encoder on a concrete backend
    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<Encoder<B>> {
        Ok(match self {
            Self::Mlp(config) => {
                config.validate()?;
                Encoder::Mlp(config.init(device))
            }
            Self::Cnn(config) => Encoder::Cnn(config.init(device)?),
            Self::Lstm(config) => Encoder::Lstm(config.init(device)?),
        })
    }

    /// Initialize a fresh encoder on the backend named by `backend`
    pub fn build(&self, backend: BackendTag) -> Result<BuiltEncoder> {
        Ok(match backend {
            BackendTag::NdArray => {
                BuiltEncoder::NdArray(self.init::<InferenceBackend>(&Default::default())?)
            }
            BackendTag::Autodiff => {
                BuiltEncoder::Autodiff(self.init::<TrainingBackend>(&Default::default())?)
            }
        })
    }
}

/// Stateless per-timestep encoder configuration; never recurrent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TokenizerConfig {
    Mlp(MlpEncoderConfig),
    Cnn(CnnEncoderConfig),
}

impl TokenizerConfig {
    pub fn output_dim(&self) -> usize {
        match self {
            Self::Mlp(config) => config.output_dim,
            Self::Cnn(config) => config.output_dim,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Mlp(config) => config.validate(),
            Self::Cnn(config) => config.layer_geometry().map(|_| ()),
        }
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<Tokenizer<B>> {
        Ok(match self {
            Self::Mlp(config) => {
                config.validate()?;
                Tokenizer::Mlp(config.init(device))
            }
            Self::Cnn(config) => Tokenizer::Cnn(config.init(device)?),
        })
    }
}

impl TryFrom<EncoderConfig> for TokenizerConfig {
    type Error = CatalogError;

    fn try_from(config: EncoderConfig) -> Result<Self> {
        match config {
            EncoderConfig::Mlp(config) => Ok(Self::Mlp(config)),
            EncoderConfig::Cnn(config) => Ok(Self::Cnn(config)),
            EncoderConfig::Lstm(_) => Err(CatalogError::invalid(
                "an LSTM encoder cannot be used as a tokenizer",
            )),
        }
    }
}

impl From<TokenizerConfig> for EncoderConfig {
    fn from(config: TokenizerConfig) -> Self {
        match config {
            TokenizerConfig::Mlp(config) => Self::Mlp(config),
            TokenizerConfig::Cnn(config) => Self::Cnn(config),
        }
    }
}

/// Encoder built from an [`EncoderConfig`]
#[derive(Module, Debug)]
pub enum Encoder<B: Backend> {
    Mlp(MlpEncoder<B>),
    Cnn(CnnEncoder<B>),
    Lstm(LstmEncoder<B>),
}

impl<B: Backend> Encoder<B> {
    pub fn output_dim(&self) -> usize {
        match self {
            Self::Mlp(encoder) => encoder.output_dim(),
            Self::Cnn(encoder) => encoder.output_dim(),
            Self::Lstm(encoder) => encoder.output_dim(),
        }
    }

    /// Encode a batch of flat observations with a stateless encoder.
    ///
    /// Returns `None` for the LSTM encoder, which needs a time axis.
    pub fn forward_flat(&self, x: Tensor<B, 2>) -> Option<Tensor<B, 2>> {
        match self {
            Self::Mlp(encoder) => Some(encoder.forward(x)),
            Self::Cnn(encoder) => Some(encoder.forward_flat(x)),
            Self::Lstm(_) => None,
        }
    }
}

/// Tokenizer built from a [`TokenizerConfig`]
#[derive(Module, Debug)]
pub enum Tokenizer<B: Backend> {
    Mlp(MlpEncoder<B>),
    Cnn(CnnEncoder<B>),
}

impl<B: Backend> Tokenizer<B> {
    /// `[batch, features]` -> `[batch, output_dim]`; CNN input is flattened channels-last
    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        match self {
            Self::Mlp(encoder) => encoder.forward(x),
            Self::Cnn(encoder) => encoder.forward_flat(x),
        }
    }
}

/// Encoder materialised on a runtime-selected backend
#[derive(Debug)]
pub enum BuiltEncoder {
    NdArray(Encoder<InferenceBackend>),
    Autodiff(Encoder<TrainingBackend>),
}

impl BuiltEncoder {
    pub fn backend(&self) -> BackendTag {
        match self {
            Self::NdArray(_) => BackendTag::NdArray,
            Self::Autodiff(_) => BackendTag::Autodiff,
        }
    }

    pub fn output_dim(&self) -> usize {
        match self {
            Self::NdArray(encoder) => encoder.output_dim(),
            Self::Autodiff(encoder) => encoder.output_dim(),
        }
    }

    pub fn into_ndarray(self) -> Option<Encoder<InferenceBackend>> {
        match self {
            Self::NdArray(encoder) => Some(encoder),
            Self::Autodiff(_) => None,
        }
    }

    pub fn into_autodiff(self) -> Option<Encoder<TrainingBackend>> {
        match self {
            Self::Autodiff(encoder) => Some(encoder),
            Self::NdArray(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FilterSpec;
    use burn::backend::NdArray;

    type TestBackend = NdArray<f32>;

    fn mlp() -> MlpEncoderConfig {
        MlpEncoderConfig::new(8, vec![64], 32)
    }

    #[test]
    fn test_lstm_is_not_a_tokenizer() {
        let lstm = EncoderConfig::Lstm(LstmEncoderConfig::new(
            TokenizerConfig::Mlp(mlp()),
            16,
            16,
        ));
        let err = TokenizerConfig::try_from(lstm).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidConfiguration(_)));

        let tokenizer = TokenizerConfig::try_from(EncoderConfig::Mlp(mlp())).unwrap();
        assert_eq!(tokenizer.output_dim(), 32);
    }

    #[test]
    fn test_build_on_both_backends() {
        let config = EncoderConfig::Mlp(mlp());
        for tag in BackendTag::ALL {
            let built = config.build(tag).unwrap();
            assert_eq!(built.backend(), tag);
            assert_eq!(built.output_dim(), config.output_dim());
        }
    }

    #[test]
    fn test_forward_flat() {
        let device = Default::default();
        let encoder = EncoderConfig::Mlp(mlp()).init::<TestBackend>(&device).unwrap();
        let output = encoder
            .forward_flat(Tensor::zeros([3, 8], &device))
            .unwrap();
        assert_eq!(output.dims(), [3, 32]);
    }

    #[test]
    fn test_invalid_cnn_fails_to_build() {
        let config = EncoderConfig::Cnn(CnnEncoderConfig::new(
            [3, 3, 1],
            vec![FilterSpec::square(4, 7, 1)],
            8,
        ));
        assert!(config.validate().is_err());
        assert!(config.build(BackendTag::NdArray).is_err());
    }

    #[test]
    fn test_encoder_config_serde_tag() {
        let json = serde_json::to_value(EncoderConfig::Mlp(mlp())).unwrap();
        assert_eq!(json["type"], "mlp");
        assert_eq!(json["output_dim"], 32);

        let back: EncoderConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, EncoderConfig::Mlp(mlp()));
    }
}
