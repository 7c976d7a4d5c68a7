//! Model Configuration
//!
//! Typed model options with defaults, and the partial overrides callers supply.

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};
use crate::networks::Activation;

/// Default hidden-layer widths of the feed-forward path
pub const DEFAULT_FCNET_HIDDENS: [usize; 2] = [256, 256];

/// Default LSTM cell size
pub const DEFAULT_LSTM_CELL_SIZE: usize = 256;

/// Kernel or stride extent, written either as one integer or as `[h, w]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Extent {
    Square(usize),
    Rect([usize; 2]),
}

impl From<Extent> for [usize; 2] {
    fn from(extent: Extent) -> Self {
        match extent {
            Extent::Square(n) => [n, n],
            Extent::Rect(hw) => hw,
        }
    }
}

impl From<[usize; 2]> for Extent {
    fn from(hw: [usize; 2]) -> Self {
        if hw[0] == hw[1] {
            Extent::Square(hw[0])
        } else {
            Extent::Rect(hw)
        }
    }
}

/// One convolution layer: `[out_channels, kernel, stride]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(usize, Extent, Extent)", into = "(usize, Extent, Extent)")]
pub struct FilterSpec {
    pub out_channels: usize,
    pub kernel: [usize; 2],
    pub stride: [usize; 2],
}

impl FilterSpec {
    pub fn new(out_channels: usize, kernel: [usize; 2], stride: [usize; 2]) -> Self {
        Self {
            out_channels,
            kernel,
            stride,
        }
    }

    /// Square kernel and stride
    pub fn square(out_channels: usize, kernel: usize, stride: usize) -> Self {
        Self::new(out_channels, [kernel, kernel], [stride, stride])
    }
}

impl From<(usize, Extent, Extent)> for FilterSpec {
    fn from((out_channels, kernel, stride): (usize, Extent, Extent)) -> Self {
        Self::new(out_channels, kernel.into(), stride.into())
    }
}

impl From<FilterSpec> for (usize, Extent, Extent) {
    fn from(spec: FilterSpec) -> Self {
        (spec.out_channels, spec.kernel.into(), spec.stride.into())
    }
}

/// Fully resolved model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Hidden-layer widths of the feed-forward path
    pub fcnet_hiddens: Vec<usize>,
    /// Activation for hidden and output layers
    pub fcnet_activation: Activation,
    /// Encoder output width; falls back to the last `fcnet_hiddens` entry
    pub encoder_latent_dim: Option<usize>,
    pub use_lstm: bool,
    /// Reserved; resolution fails when set
    pub use_attention: bool,
    pub lstm_cell_size: usize,
    /// Sequence inputs are `[time, batch, ...]` instead of `[batch, time, ...]`
    #[serde(rename = "_time_major")]
    pub time_major: bool,
    /// Convolution stack; derived from the observation shape when unset
    pub conv_filters: Option<Vec<FilterSpec>>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            fcnet_hiddens: DEFAULT_FCNET_HIDDENS.to_vec(),
            fcnet_activation: Activation::Tanh,
            encoder_latent_dim: None,
            use_lstm: false,
            use_attention: false,
            lstm_cell_size: DEFAULT_LSTM_CELL_SIZE,
            time_major: false,
            conv_filters: None,
        }
    }
}

impl ModelConfig {
    /// Defaults overlaid with `overrides`, validated
    pub fn from_overrides(overrides: &ModelConfigOverrides) -> Result<Self> {
        let config = Self::default().merged(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Overlay `overrides` on this config; set fields win
    pub fn merged(&self, overrides: &ModelConfigOverrides) -> Self {
        let mut merged = self.clone();
        if let Some(hiddens) = &overrides.fcnet_hiddens {
            merged.fcnet_hiddens = hiddens.clone();
        }
        if let Some(activation) = overrides.fcnet_activation {
            merged.fcnet_activation = activation;
        }
        if let Some(latent_dim) = overrides.encoder_latent_dim {
            merged.encoder_latent_dim = Some(latent_dim);
        }
        if let Some(use_lstm) = overrides.use_lstm {
            merged.use_lstm = use_lstm;
        }
        if let Some(use_attention) = overrides.use_attention {
            merged.use_attention = use_attention;
        }
        if let Some(cell_size) = overrides.lstm_cell_size {
            merged.lstm_cell_size = cell_size;
        }
        if let Some(time_major) = overrides.time_major {
            merged.time_major = time_major;
        }
        // An empty filter list means "derive from the observation shape"
        if let Some(filters) = &overrides.conv_filters {
            merged.conv_filters = (!filters.is_empty()).then(|| filters.clone());
        }
        merged
    }

    /// Encoder output width: `encoder_latent_dim`, else the last hidden width
    pub fn latent_dim(&self) -> Result<usize> {
        self.encoder_latent_dim
            .or_else(|| self.fcnet_hiddens.last().copied())
            .ok_or_else(|| {
                CatalogError::invalid(
                    "fcnet_hiddens must not be empty when encoder_latent_dim is unset",
                )
            })
    }

    /// Reject zero widths and degenerate filters
    pub fn validate(&self) -> Result<()> {
        if let Some(i) = self.fcnet_hiddens.iter().position(|&w| w == 0) {
            return Err(CatalogError::invalid(format!(
                "fcnet_hiddens[{i}] must be positive"
            )));
        }
        if self.encoder_latent_dim == Some(0) {
            return Err(CatalogError::invalid("encoder_latent_dim must be positive"));
        }
        if self.lstm_cell_size == 0 {
            return Err(CatalogError::invalid("lstm_cell_size must be positive"));
        }
        if let Some(filters) = &self.conv_filters {
            for (i, spec) in filters.iter().enumerate() {
                let degenerate = spec.out_channels == 0
                    || spec.kernel.contains(&0)
                    || spec.stride.contains(&0);
                if degenerate {
                    return Err(CatalogError::invalid(format!(
                        "conv_filters[{i}] has a zero channel, kernel or stride: {spec:?}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Caller-supplied model options; unset fields keep their defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfigOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fcnet_hiddens: Option<Vec<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fcnet_activation: Option<Activation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoder_latent_dim: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_lstm: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_attention: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lstm_cell_size: Option<usize>,
    #[serde(
        default,
        rename = "_time_major",
        skip_serializing_if = "Option::is_none"
    )]
    pub time_major: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conv_filters: Option<Vec<FilterSpec>>,
}

impl ModelConfigOverrides {
    /// Parse overrides from a JSON object; unknown keys are rejected
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_fcnet_hiddens(mut self, hiddens: impl Into<Vec<usize>>) -> Self {
        self.fcnet_hiddens = Some(hiddens.into());
        self
    }

    pub fn with_fcnet_activation(mut self, activation: Activation) -> Self {
        self.fcnet_activation = Some(activation);
        self
    }

    pub fn with_encoder_latent_dim(mut self, latent_dim: usize) -> Self {
        self.encoder_latent_dim = Some(latent_dim);
        self
    }

    pub fn with_use_lstm(mut self, use_lstm: bool) -> Self {
        self.use_lstm = Some(use_lstm);
        self
    }

    pub fn with_use_attention(mut self, use_attention: bool) -> Self {
        self.use_attention = Some(use_attention);
        self
    }

    pub fn with_lstm_cell_size(mut self, cell_size: usize) -> Self {
        self.lstm_cell_size = Some(cell_size);
        self
    }

    pub fn with_time_major(mut self, time_major: bool) -> Self {
        self.time_major = Some(time_major);
        self
    }

    pub fn with_conv_filters(mut self, filters: impl Into<Vec<FilterSpec>>) -> Self {
        self.conv_filters = Some(filters.into());
        self
    }
}
