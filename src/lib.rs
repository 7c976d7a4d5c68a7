//! RL model catalog
//!
//! Given an environment's observation and action spaces and a model
//! configuration, resolves which encoder to build and which action
//! distribution to use, for every supported numerical backend.

pub mod backend;
pub mod catalog;
pub mod config;
pub mod distributions;
pub mod error;
pub mod logging;
pub mod models;
pub mod networks;
pub mod spaces;

pub use backend::{BackendTag, InferenceBackend, TaggedBackend, TrainingBackend};
pub use catalog::{
    resolve_action_dist_classes, resolve_encoder_config, resolve_tokenizer_config, Catalog,
    Resolution, Resolvers,
};
pub use config::{CatalogSettings, LoggingConfig};
pub use distributions::{ActionDist, ActionDistClass, ActionDistClasses, DistributionFamily};
pub use error::{CatalogError, Result};
pub use models::{FilterSpec, ModelConfig, ModelConfigOverrides, ViewRequirement, ViewRequirements};
pub use networks::{Activation, BuiltEncoder, Encoder, EncoderConfig, TokenizerConfig};
pub use spaces::{DType, Space};
