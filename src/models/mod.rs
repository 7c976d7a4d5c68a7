//! Model Configuration
//!
//! Model options, default convolution filters and view requirements.

pub mod config;
pub mod filters;
pub mod view_requirements;

pub use config::{
    Extent, FilterSpec, ModelConfig, ModelConfigOverrides, DEFAULT_FCNET_HIDDENS,
    DEFAULT_LSTM_CELL_SIZE,
};
pub use filters::default_filter_config;
pub use view_requirements::{ViewRequirement, ViewRequirements};
