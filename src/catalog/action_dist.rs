//! Action Distribution Resolution
//!
//! Maps an action space to one distribution constructor per backend.

use tracing::debug;

use super::resolver::{ActionDistResolver, Resolvers};
use crate::distributions::{ActionDistClasses, DistributionFamily};
use crate::error::{CatalogError, Result};
use crate::spaces::Space;

/// Resolve distribution classes with the default strategies
pub fn resolve_action_dist_classes(
    action_space: &Space,
    deterministic: bool,
) -> Result<ActionDistClasses> {
    Resolvers::default().resolve_action_dist(action_space, deterministic)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultActionDistResolver;

impl ActionDistResolver for DefaultActionDistResolver {
    fn resolve(&self, action_space: &Space, deterministic: bool) -> Result<ActionDistClasses> {
        let family = match action_space {
            Space::Box { shape, dtype } => {
                if dtype.is_integer() {
                    return Err(CatalogError::invalid(format!(
                        "Box action spaces with integer dtype {dtype:?} are not supported; \
                         use MultiDiscrete or a float Box"
                    )));
                }
                if shape.len() > 1 {
                    return Err(CatalogError::UnsupportedSpace(format!(
                        "Action space has multiple dimensions {shape:?}. Consider reshaping \
                         this into a single dimension, using a custom action distribution, \
                         using a Tuple action space, or the multi-agent API."
                    )));
                }
                if deterministic {
                    DistributionFamily::Deterministic
                } else {
                    DistributionFamily::DiagGaussian
                }
            }
            Space::Discrete { .. } => DistributionFamily::Categorical,
            Space::Tuple { .. } | Space::Dict { .. } => {
                return Err(CatalogError::not_implemented(
                    "Tuple/Dict action spaces are not supported",
                ))
            }
            Space::Simplex { .. } => {
                return Err(CatalogError::not_implemented(
                    "Simplex action spaces are not supported",
                ))
            }
            Space::MultiDiscrete { .. } => {
                return Err(CatalogError::not_implemented(
                    "MultiDiscrete action spaces are not supported",
                ))
            }
        };

        debug!("Resolved {} action distribution for {}", family, action_space);
        Ok(family.classes())
    }
}
