//! Tokenizer Config Resolution
//!
//! Tokenizers encode one timestep for a recurrent encoder. They are ordinary
//! encoders resolved with the recurrent and attention flags cleared.

use tracing::debug;

use super::resolver::{Resolution, Resolvers, TokenizerResolver};
use crate::error::Result;
use crate::models::ModelConfig;
use crate::spaces::Space;

/// Resolve a tokenizer config with the default strategies
pub fn resolve_tokenizer_config(space: &Space, model_config: &ModelConfig) -> Result<Resolution> {
    Resolvers::default().resolve_tokenizer(space, model_config)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTokenizerResolver;

impl TokenizerResolver for DefaultTokenizerResolver {
    fn resolve(
        &self,
        resolvers: &Resolvers,
        space: &Space,
        model_config: &ModelConfig,
    ) -> Result<Resolution> {
        let mut stateless = model_config.clone();
        stateless.use_lstm = false;
        stateless.use_attention = false;

        debug!("Resolving tokenizer for {}", space);
        resolvers.resolve_encoder(space, &stateless, None, None)
    }
}
