//! Encoder Config Resolution
//!
//! Picks the encoder family for an observation space and sizes it from the
//! model configuration. First match wins: LSTM, then attention, then the
//! observation space's rank.

use tracing::debug;

use super::resolver::{EncoderResolver, Resolution, Resolvers};
use crate::error::{CatalogError, Result};
use crate::models::{default_filter_config, ModelConfig, ViewRequirements};
use crate::networks::{
    CnnEncoderConfig, EncoderConfig, LstmEncoderConfig, MlpEncoderConfig, TokenizerConfig,
};
use crate::spaces::Space;

/// Resolve an encoder config with the default strategies
pub fn resolve_encoder_config(
    observation_space: &Space,
    model_config: &ModelConfig,
    action_space: Option<&Space>,
    view_requirements: Option<&ViewRequirements>,
) -> Result<Resolution> {
    Resolvers::default().resolve_encoder(
        observation_space,
        model_config,
        action_space,
        view_requirements,
    )
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEncoderResolver;

impl EncoderResolver for DefaultEncoderResolver {
    fn resolve(
        &self,
        resolvers: &Resolvers,
        observation_space: &Space,
        model_config: &ModelConfig,
        action_space: Option<&Space>,
        view_requirements: Option<&ViewRequirements>,
    ) -> Result<Resolution> {
        if model_config.use_lstm {
            return resolve_lstm(
                resolvers,
                observation_space,
                model_config,
                action_space,
                view_requirements,
            );
        }

        if model_config.use_attention {
            return Err(CatalogError::not_implemented(
                "attention encoders are not supported",
            ));
        }

        match observation_space {
            Space::Box { shape, .. } if shape.len() == 1 => resolve_mlp(shape[0], model_config),
            Space::Box { shape, .. } if shape.len() == 3 => {
                resolve_cnn([shape[0], shape[1], shape[2]], model_config)
            }
            other => Err(CatalogError::not_implemented(format!(
                "No default encoder config for observation space {other}"
            ))),
        }
    }
}

fn resolve_lstm(
    resolvers: &Resolvers,
    observation_space: &Space,
    model_config: &ModelConfig,
    action_space: Option<&Space>,
    view_requirements: Option<&ViewRequirements>,
) -> Result<Resolution> {
    let tokenizer = resolvers.resolve_tokenizer(observation_space, model_config)?;
    let tokenizer_config = TokenizerConfig::try_from(tokenizer.config)?;

    let mut resolved = model_config.clone();
    resolved.conv_filters = tokenizer.model_config.conv_filters;

    let config = LstmEncoderConfig::new(
        tokenizer_config,
        model_config.lstm_cell_size,
        model_config.lstm_cell_size,
    )
    .with_batch_first(!model_config.time_major)
    .with_num_layers(1)
    .with_output_activation(model_config.fcnet_activation)
    .with_action_space(action_space.cloned())
    .with_view_requirements(view_requirements.cloned());
    config.validate()?;

    debug!(
        "Resolved LSTM encoder: cell_size={}, batch_first={}, tokenizer_dim={}",
        config.hidden_dim,
        config.batch_first,
        config.tokenizer.output_dim()
    );

    Ok(Resolution {
        config: EncoderConfig::Lstm(config),
        model_config: resolved,
    })
}

fn resolve_mlp(input_dim: usize, model_config: &ModelConfig) -> Result<Resolution> {
    // Without an explicit latent dim the last hidden width becomes the output
    let (hidden_layer_dims, output_dim) = match model_config.encoder_latent_dim {
        Some(latent_dim) => (model_config.fcnet_hiddens.clone(), latent_dim),
        None => match model_config.fcnet_hiddens.split_last() {
            Some((&last, rest)) => (rest.to_vec(), last),
            None => {
                return Err(CatalogError::invalid(
                    "fcnet_hiddens must not be empty when encoder_latent_dim is unset",
                ))
            }
        },
    };

    let config = MlpEncoderConfig::new(input_dim, hidden_layer_dims, output_dim)
        .with_hidden_layer_activation(model_config.fcnet_activation)
        .with_output_activation(model_config.fcnet_activation);
    config.validate()?;

    debug!(
        "Resolved MLP encoder: {} -> {:?} -> {}",
        config.input_dim, config.hidden_layer_dims, config.output_dim
    );

    Ok(Resolution {
        config: EncoderConfig::Mlp(config),
        model_config: model_config.clone(),
    })
}

fn resolve_cnn(input_dims: [usize; 3], model_config: &ModelConfig) -> Result<Resolution> {
    let mut resolved = model_config.clone();
    let filters = match &model_config.conv_filters {
        Some(filters) if !filters.is_empty() => filters.clone(),
        _ => {
            let filters = default_filter_config(&input_dims)?;
            debug!("Derived default conv filters for {:?}", input_dims);
            resolved.conv_filters = Some(filters.clone());
            filters
        }
    };

    let config = CnnEncoderConfig::new(input_dims, filters, model_config.latent_dim()?)
        .with_filter_layer_activation(model_config.fcnet_activation)
        .with_output_activation(model_config.fcnet_activation);
    config.layer_geometry()?;

    debug!(
        "Resolved CNN encoder: input={:?}, filters={}, output_dim={}",
        config.input_dims,
        config.filter_specifiers.len(),
        config.output_dim
    );

    Ok(Resolution {
        config: EncoderConfig::Cnn(config),
        model_config: resolved,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FilterSpec, ModelConfigOverrides};
    use crate::networks::Activation;

    fn config(overrides: ModelConfigOverrides) -> ModelConfig {
        ModelConfig::from_overrides(&overrides).unwrap()
    }

    #[test]
    fn test_mlp_drops_last_hidden_without_latent_dim() {
        let model_config = config(ModelConfigOverrides::default().with_fcnet_hiddens([64, 32]));
        let resolution =
            resolve_encoder_config(&Space::box_f32([8]), &model_config, None, None).unwrap();

        let EncoderConfig::Mlp(mlp) = resolution.config else {
            panic!("expected an MLP config");
        };
        assert_eq!(mlp.input_dim, 8);
        assert_eq!(mlp.hidden_layer_dims, vec![64]);
        assert_eq!(mlp.output_dim, 32);
        assert_eq!(mlp.hidden_layer_activation, Activation::Tanh);
    }

    #[test]
    fn test_mlp_keeps_hiddens_with_latent_dim() {
        let model_config = config(
            ModelConfigOverrides::default()
                .with_fcnet_hiddens([64, 32])
                .with_encoder_latent_dim(16),
        );
        let resolution =
            resolve_encoder_config(&Space::box_f32([8]), &model_config, None, None).unwrap();

        let EncoderConfig::Mlp(mlp) = resolution.config else {
            panic!("expected an MLP config");
        };
        assert_eq!(mlp.hidden_layer_dims, vec![64, 32]);
        assert_eq!(mlp.output_dim, 16);
    }

    #[test]
    fn test_empty_hiddens_need_latent_dim() {
        let model_config = config(ModelConfigOverrides::default().with_fcnet_hiddens(Vec::new()));
        let err = resolve_encoder_config(&Space::box_f32([8]), &model_config, None, None)
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_cnn_derives_filters() {
        let model_config = ModelConfig::default();
        let resolution =
            resolve_encoder_config(&Space::box_f32([84, 84, 4]), &model_config, None, None)
                .unwrap();

        let expected = default_filter_config(&[84, 84, 4]).unwrap();
        let EncoderConfig::Cnn(cnn) = &resolution.config else {
            panic!("expected a CNN config");
        };
        assert_eq!(cnn.filter_specifiers, expected);
        assert_eq!(cnn.output_dim, 256);
        assert_eq!(resolution.model_config.conv_filters, Some(expected));
        assert_eq!(model_config.conv_filters, None);
    }

    #[test]
    fn test_cnn_derives_filters_for_empty_list() {
        let mut model_config = ModelConfig::default();
        model_config.conv_filters = Some(Vec::new());

        let resolution =
            resolve_encoder_config(&Space::box_f32([42, 42, 3]), &model_config, None, None)
                .unwrap();

        let expected = default_filter_config(&[42, 42, 3]).unwrap();
        assert!(matches!(
            &resolution.config,
            EncoderConfig::Cnn(cnn) if cnn.filter_specifiers == expected
        ));
        assert_eq!(resolution.model_config.conv_filters, Some(expected));
    }

    #[test]
    fn test_cnn_keeps_explicit_filters() {
        let filters = vec![FilterSpec::square(8, 3, 2), FilterSpec::square(16, 3, 1)];
        let model_config =
            config(ModelConfigOverrides::default().with_conv_filters(filters.clone()));
        let resolution =
            resolve_encoder_config(&Space::box_f32([9, 9, 1]), &model_config, None, None)
                .unwrap();

        let EncoderConfig::Cnn(cnn) = resolution.config else {
            panic!("expected a CNN config");
        };
        assert_eq!(cnn.filter_specifiers, filters);
    }

    #[test]
    fn test_cnn_without_default_filters_fails() {
        let err = resolve_encoder_config(
            &Space::box_f32([64, 64, 3]),
            &ModelConfig::default(),
            None,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_lstm_wraps_tokenizer() {
        let model_config = config(
            ModelConfigOverrides::default()
                .with_use_lstm(true)
                .with_lstm_cell_size(64)
                .with_time_major(true),
        );
        let action_space = Space::discrete(3);
        let resolution = resolve_encoder_config(
            &Space::box_f32([4]),
            &model_config,
            Some(&action_space),
            None,
        )
        .unwrap();

        let EncoderConfig::Lstm(lstm) = resolution.config else {
            panic!("expected an LSTM config");
        };
        assert_eq!(lstm.hidden_dim, 64);
        assert_eq!(lstm.output_dim, 64);
        assert_eq!(lstm.num_layers, 1);
        assert!(!lstm.batch_first);
        assert_eq!(lstm.action_space, Some(action_space));
        assert!(matches!(lstm.tokenizer, TokenizerConfig::Mlp(_)));
    }

    #[test]
    fn test_lstm_copies_tokenizer_filters() {
        let model_config = config(ModelConfigOverrides::default().with_use_lstm(true));
        let resolution =
            resolve_encoder_config(&Space::box_f32([42, 42, 3]), &model_config, None, None)
                .unwrap();

        assert!(matches!(
            resolution.config,
            EncoderConfig::Lstm(LstmEncoderConfig {
                tokenizer: TokenizerConfig::Cnn(_),
                ..
            })
        ));
        assert_eq!(
            resolution.model_config.conv_filters,
            Some(default_filter_config(&[42, 42, 3]).unwrap())
        );
    }

    #[test]
    fn test_attention_not_implemented() {
        let model_config = config(ModelConfigOverrides::default().with_use_attention(true));
        let err = resolve_encoder_config(&Space::box_f32([4]), &model_config, None, None)
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotImplemented(_)));
    }

    #[test]
    fn test_nested_observation_not_implemented() {
        let space = Space::tuple([Space::discrete(2), Space::box_f32([3])]);
        let err = resolve_encoder_config(&space, &ModelConfig::default(), None, None).unwrap_err();
        assert!(matches!(err, CatalogError::NotImplemented(_)));

        let matrix = Space::box_f32([4, 4]);
        let err = resolve_encoder_config(&matrix, &ModelConfig::default(), None, None).unwrap_err();
        assert!(matches!(err, CatalogError::NotImplemented(_)));
    }
}
