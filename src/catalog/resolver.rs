//! Resolution Strategies
//!
//! Each resolution step sits behind a trait so callers can swap one step and
//! keep the others. Steps receive the whole [`Resolvers`] bundle, which lets a
//! replaced step be picked up by the steps that delegate to it.

use std::fmt;
use std::sync::Arc;

use crate::distributions::ActionDistClasses;
use crate::error::Result;
use crate::models::{ModelConfig, ViewRequirements};
use crate::networks::EncoderConfig;
use crate::spaces::Space;

use super::action_dist::DefaultActionDistResolver;
use super::encoder::DefaultEncoderResolver;
use super::tokenizer::DefaultTokenizerResolver;

/// Encoder config resolved for a space, with the model config it was resolved
/// against (including anything derived along the way, such as conv filters)
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub config: EncoderConfig,
    pub model_config: ModelConfig,
}

pub trait EncoderResolver: Send + Sync {
    fn resolve(
        &self,
        resolvers: &Resolvers,
        observation_space: &Space,
        model_config: &ModelConfig,
        action_space: Option<&Space>,
        view_requirements: Option<&ViewRequirements>,
    ) -> Result<Resolution>;
}

#[cfg_attr(test, mockall::automock)]
pub trait TokenizerResolver: Send + Sync {
    fn resolve(
        &self,
        resolvers: &Resolvers,
        space: &Space,
        model_config: &ModelConfig,
    ) -> Result<Resolution>;
}

#[cfg_attr(test, mockall::automock)]
pub trait ActionDistResolver: Send + Sync {
    fn resolve(&self, action_space: &Space, deterministic: bool) -> Result<ActionDistClasses>;
}

/// One strategy per resolution step
#[derive(Clone)]
pub struct Resolvers {
    pub encoder: Arc<dyn EncoderResolver>,
    pub tokenizer: Arc<dyn TokenizerResolver>,
    pub action_dist: Arc<dyn ActionDistResolver>,
}

impl Default for Resolvers {
    fn default() -> Self {
        Self {
            encoder: Arc::new(DefaultEncoderResolver),
            tokenizer: Arc::new(DefaultTokenizerResolver),
            action_dist: Arc::new(DefaultActionDistResolver),
        }
    }
}

impl fmt::Debug for Resolvers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolvers").finish_non_exhaustive()
    }
}

impl Resolvers {
    pub fn with_encoder(mut self, encoder: impl EncoderResolver + 'static) -> Self {
        self.encoder = Arc::new(encoder);
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: impl TokenizerResolver + 'static) -> Self {
        self.tokenizer = Arc::new(tokenizer);
        self
    }

    pub fn with_action_dist(mut self, action_dist: impl ActionDistResolver + 'static) -> Self {
        self.action_dist = Arc::new(action_dist);
        self
    }

    pub fn resolve_encoder(
        &self,
        observation_space: &Space,
        model_config: &ModelConfig,
        action_space: Option<&Space>,
        view_requirements: Option<&ViewRequirements>,
    ) -> Result<Resolution> {
        self.encoder.resolve(
            self,
            observation_space,
            model_config,
            action_space,
            view_requirements,
        )
    }

    pub fn resolve_tokenizer(
        &self,
        space: &Space,
        model_config: &ModelConfig,
    ) -> Result<Resolution> {
        self.tokenizer.resolve(self, space, model_config)
    }

    pub fn resolve_action_dist(
        &self,
        action_space: &Space,
        deterministic: bool,
    ) -> Result<ActionDistClasses> {
        self.action_dist.resolve(action_space, deterministic)
    }
}
