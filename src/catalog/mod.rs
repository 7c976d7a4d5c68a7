//! Catalog
//!
//! Resolves, once and eagerly, the encoder configuration and action
//! distribution classes for a pair of spaces and a model configuration, and
//! hands out built encoders and distribution constructors afterwards.
//!
//! # Example
//!
//! ```no_run
//! use rl_catalog::{BackendTag, Catalog, ModelConfigOverrides, Space};
//!
//! # fn main() -> rl_catalog::Result<()> {
//! let catalog = Catalog::new(
//!     Space::box_f32([8]),
//!     Space::discrete(4),
//!     &ModelConfigOverrides::default().with_fcnet_hiddens([64, 32]),
//!     None,
//! )?;
//! let encoder = catalog.build_encoder(BackendTag::NdArray)?;
//! let dist_cls = catalog.get_action_dist_cls(BackendTag::NdArray)?;
//! assert_eq!(encoder.output_dim(), catalog.latent_dim());
//! println!("{}", dist_cls.family);
//! # Ok(())
//! # }
//! ```

pub mod action_dist;
pub mod encoder;
pub mod resolver;
pub mod tokenizer;

pub use action_dist::{resolve_action_dist_classes, DefaultActionDistResolver};
pub use encoder::{resolve_encoder_config, DefaultEncoderResolver};
pub use resolver::{
    ActionDistResolver, EncoderResolver, Resolution, Resolvers, TokenizerResolver,
};
pub use tokenizer::{resolve_tokenizer_config, DefaultTokenizerResolver};

use burn::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::backend::BackendTag;
use crate::distributions::{ActionDistClass, ActionDistClasses};
use crate::error::Result;
use crate::models::{ModelConfig, ModelConfigOverrides, ViewRequirements};
use crate::networks::{BuiltEncoder, Encoder, EncoderConfig};
use crate::spaces::Space;

/// Resolved model components for one observation/action space pair
#[derive(Debug, Clone)]
pub struct Catalog {
    observation_space: Space,
    action_space: Space,
    model_config: ModelConfig,
    view_requirements: Option<ViewRequirements>,
    encoder_config: EncoderConfig,
    action_dist_cls_dict: ActionDistClasses,
    latent_dim: usize,
    resolvers: Resolvers,
}

/// Serializable view of a catalog's resolved state
#[derive(Debug, Serialize)]
pub struct CatalogSummary<'a> {
    pub observation_space: &'a Space,
    pub action_space: &'a Space,
    pub model_config: &'a ModelConfig,
    pub encoder_config: &'a EncoderConfig,
    pub action_dist_cls_dict: &'a ActionDistClasses,
    pub latent_dim: usize,
}

impl Catalog {
    /// Resolve with the default strategies
    pub fn new(
        observation_space: Space,
        action_space: Space,
        overrides: &ModelConfigOverrides,
        view_requirements: Option<ViewRequirements>,
    ) -> Result<Self> {
        Self::with_resolvers(
            observation_space,
            action_space,
            overrides,
            view_requirements,
            Resolvers::default(),
        )
    }

    /// Resolve with caller-supplied strategies
    pub fn with_resolvers(
        observation_space: Space,
        action_space: Space,
        overrides: &ModelConfigOverrides,
        view_requirements: Option<ViewRequirements>,
        resolvers: Resolvers,
    ) -> Result<Self> {
        let merged = ModelConfig::from_overrides(overrides)?;

        let Resolution {
            config: encoder_config,
            model_config,
        } = resolvers.resolve_encoder(
            &observation_space,
            &merged,
            Some(&action_space),
            view_requirements.as_ref(),
        )?;

        let action_dist_cls_dict = resolvers.resolve_action_dist(&action_space, false)?;
        let latent_dim = encoder_config.output_dim();

        info!(
            "Catalog resolved: observation={}, action={}, encoder={}, latent_dim={}, backends={}",
            observation_space,
            action_space,
            encoder_config.kind(),
            latent_dim,
            action_dist_cls_dict.len()
        );

        Ok(Self {
            observation_space,
            action_space,
            model_config,
            view_requirements,
            encoder_config,
            action_dist_cls_dict,
            latent_dim,
            resolvers,
        })
    }

    pub fn observation_space(&self) -> &Space {
        &self.observation_space
    }

    pub fn action_space(&self) -> &Space {
        &self.action_space
    }

    /// Merged model config, including anything derived during resolution
    pub fn model_config(&self) -> &ModelConfig {
        &self.model_config
    }

    pub fn view_requirements(&self) -> Option<&ViewRequirements> {
        self.view_requirements.as_ref()
    }

    pub fn encoder_config(&self) -> &EncoderConfig {
        &self.encoder_config
    }

    pub fn action_dist_cls_dict(&self) -> &ActionDistClasses {
        &self.action_dist_cls_dict
    }

    /// Width of the encoder output fed to the heads
    pub fn latent_dim(&self) -> usize {
        self.latent_dim
    }

    pub fn resolvers(&self) -> &Resolvers {
        &self.resolvers
    }

    /// Build a fresh encoder on `backend`
    pub fn build_encoder(&self, backend: BackendTag) -> Result<BuiltEncoder> {
        self.encoder_config.build(backend)
    }

    /// Build a fresh encoder on a statically chosen backend
    pub fn build_encoder_on<B: Backend>(&self, device: &B::Device) -> Result<Encoder<B>> {
        self.encoder_config.init(device)
    }

    /// Action distribution constructor for `backend`
    pub fn get_action_dist_cls(&self, backend: BackendTag) -> Result<ActionDistClass> {
        self.action_dist_cls_dict.get(backend)
    }

    /// Encoder config for arbitrary spaces, resolved with this catalog's strategies
    pub fn get_encoder_config(
        &self,
        observation_space: &Space,
        model_config: &ModelConfig,
        action_space: Option<&Space>,
        view_requirements: Option<&ViewRequirements>,
    ) -> Result<Resolution> {
        self.resolvers.resolve_encoder(
            observation_space,
            model_config,
            action_space,
            view_requirements,
        )
    }

    /// Tokenizer config for `space`, resolved with this catalog's strategies
    pub fn get_tokenizer_config(
        &self,
        space: &Space,
        model_config: &ModelConfig,
    ) -> Result<Resolution> {
        self.resolvers.resolve_tokenizer(space, model_config)
    }

    /// Distribution classes for `action_space`, resolved with this catalog's strategies
    pub fn get_action_dist_cls_dict(
        &self,
        action_space: &Space,
        deterministic: bool,
    ) -> Result<ActionDistClasses> {
        self.resolvers.resolve_action_dist(action_space, deterministic)
    }

    pub fn summary(&self) -> CatalogSummary<'_> {
        CatalogSummary {
            observation_space: &self.observation_space,
            action_space: &self.action_space,
            model_config: &self.model_config,
            encoder_config: &self.encoder_config,
            action_dist_cls_dict: &self.action_dist_cls_dict,
            latent_dim: self.latent_dim,
        }
    }

    /// Resolved state as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.summary())?)
    }
}
