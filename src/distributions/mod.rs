//! Action Distributions
//!
//! Distribution families, the per-backend constructor references resolution
//! hands out, and the tensor-level distributions they build.

pub mod categorical;
pub mod deterministic;
pub mod diag_gaussian;

pub use categorical::Categorical;
pub use deterministic::Deterministic;
pub use diag_gaussian::DiagGaussian;

use std::collections::BTreeMap;
use std::fmt;

use burn::prelude::*;
use serde::{Deserialize, Serialize};

use crate::backend::{BackendTag, TaggedBackend};
use crate::error::{CatalogError, Result};
use crate::models::ModelConfig;
use crate::spaces::Space;

/// Common interface of action distributions
pub trait ActionDistribution<B: Backend> {
    type Action;

    fn sample(&self) -> Self::Action;

    fn deterministic_sample(&self) -> Self::Action;

    /// Log-likelihood of `action`, one value per batch row
    fn logp(&self, action: Self::Action) -> Tensor<B, 1>;

    /// Entropy, one value per batch row
    fn entropy(&self) -> Tensor<B, 1>;
}

/// Distribution family, independent of backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionFamily {
    Deterministic,
    DiagGaussian,
    Categorical,
}

impl DistributionFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deterministic => "deterministic",
            Self::DiagGaussian => "diag_gaussian",
            Self::Categorical => "categorical",
        }
    }

    /// Width of the logits this family needs for `action_space`
    pub fn required_input_dim(
        &self,
        action_space: &Space,
        _model_config: &ModelConfig,
    ) -> Result<usize> {
        let overflow = || {
            CatalogError::invalid(format!(
                "{self} input width for action space {action_space} overflows usize"
            ))
        };
        match (self, action_space) {
            (Self::Categorical, Space::Discrete { n }) => Ok(*n),
            (Self::DiagGaussian, Space::Box { shape, .. }) => checked_size(shape)
                .and_then(|size| size.checked_mul(2))
                .ok_or_else(overflow),
            (Self::Deterministic, Space::Box { shape, .. }) => {
                checked_size(shape).ok_or_else(overflow)
            }
            (family, space) => Err(CatalogError::invalid(format!(
                "{family} distribution cannot parameterise action space {space}"
            ))),
        }
    }

    /// One constructor reference per supported backend
    pub fn classes(self) -> ActionDistClasses {
        BackendTag::ALL
            .into_iter()
            .map(|backend| ActionDistClass::new(self, backend))
            .collect()
    }
}

fn checked_size(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
}

impl fmt::Display for DistributionFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Constructor reference: a distribution family bound to a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionDistClass {
    pub family: DistributionFamily,
    pub backend: BackendTag,
}

impl ActionDistClass {
    pub fn new(family: DistributionFamily, backend: BackendTag) -> Self {
        Self { family, backend }
    }

    pub fn required_input_dim(
        &self,
        action_space: &Space,
        model_config: &ModelConfig,
    ) -> Result<usize> {
        self.family.required_input_dim(action_space, model_config)
    }

    /// Build a distribution from `[batch, width]` logits on backend `B`
    pub fn from_logits<B: TaggedBackend>(&self, logits: Tensor<B, 2>) -> Result<ActionDist<B>> {
        if B::TAG != self.backend {
            return Err(CatalogError::LookupFailure {
                what: "action distribution",
                backend: B::TAG.to_string(),
            });
        }

        let width = logits.dims()[1];
        if width == 0 {
            return Err(CatalogError::invalid("logits must have at least one column"));
        }

        Ok(match self.family {
            DistributionFamily::Categorical => ActionDist::Categorical(Categorical::new(logits)),
            DistributionFamily::Deterministic => {
                ActionDist::Deterministic(Deterministic::new(logits))
            }
            DistributionFamily::DiagGaussian => {
                if width % 2 != 0 {
                    return Err(CatalogError::invalid(format!(
                        "diagonal Gaussian logits need an even width, got {width}"
                    )));
                }
                ActionDist::DiagGaussian(DiagGaussian::from_logits(logits))
            }
        })
    }
}

impl fmt::Display for ActionDistClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.family, self.backend)
    }
}

/// Backend tag to constructor reference
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDistClasses(BTreeMap<BackendTag, ActionDistClass>);

impl ActionDistClasses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, class: ActionDistClass) -> Option<ActionDistClass> {
        self.0.insert(class.backend, class)
    }

    pub fn get(&self, backend: BackendTag) -> Result<ActionDistClass> {
        self.0
            .get(&backend)
            .copied()
            .ok_or_else(|| CatalogError::LookupFailure {
                what: "action distribution",
                backend: backend.to_string(),
            })
    }

    pub fn backends(&self) -> impl Iterator<Item = BackendTag> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionDistClass> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<ActionDistClass> for ActionDistClasses {
    fn from_iter<I: IntoIterator<Item = ActionDistClass>>(iter: I) -> Self {
        let mut classes = Self::new();
        for class in iter {
            classes.insert(class);
        }
        classes
    }
}

/// Sampled or evaluated action
#[derive(Debug, Clone)]
pub enum Action<B: Backend> {
    /// `[batch]` indices
    Discrete(Tensor<B, 1, Int>),
    /// `[batch, k]` values
    Continuous(Tensor<B, 2>),
}

/// Distribution built by [`ActionDistClass::from_logits`]
#[derive(Debug, Clone)]
pub enum ActionDist<B: Backend> {
    Categorical(Categorical<B>),
    DiagGaussian(DiagGaussian<B>),
    Deterministic(Deterministic<B>),
}

impl<B: Backend> ActionDist<B> {
    pub fn family(&self) -> DistributionFamily {
        match self {
            Self::Categorical(_) => DistributionFamily::Categorical,
            Self::DiagGaussian(_) => DistributionFamily::DiagGaussian,
            Self::Deterministic(_) => DistributionFamily::Deterministic,
        }
    }

    pub fn sample(&self) -> Action<B> {
        match self {
            Self::Categorical(dist) => Action::Discrete(dist.sample()),
            Self::DiagGaussian(dist) => Action::Continuous(dist.sample()),
            Self::Deterministic(dist) => Action::Continuous(dist.sample()),
        }
    }

    pub fn deterministic_sample(&self) -> Action<B> {
        match self {
            Self::Categorical(dist) => Action::Discrete(dist.deterministic_sample()),
            Self::DiagGaussian(dist) => Action::Continuous(dist.deterministic_sample()),
            Self::Deterministic(dist) => Action::Continuous(dist.deterministic_sample()),
        }
    }

    /// Fails when the action kind does not match the family
    pub fn logp(&self, action: Action<B>) -> Result<Tensor<B, 1>> {
        match (self, action) {
            (Self::Categorical(dist), Action::Discrete(action)) => Ok(dist.logp(action)),
            (Self::DiagGaussian(dist), Action::Continuous(action)) => Ok(dist.logp(action)),
            (Self::Deterministic(dist), Action::Continuous(action)) => Ok(dist.logp(action)),
            (dist, _) => Err(CatalogError::invalid(format!(
                "action kind does not match the {} distribution",
                dist.family()
            ))),
        }
    }

    pub fn entropy(&self) -> Tensor<B, 1> {
        match self {
            Self::Categorical(dist) => dist.entropy(),
            Self::DiagGaussian(dist) => dist.entropy(),
            Self::Deterministic(dist) => dist.entropy(),
        }
    }
}
