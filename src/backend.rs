//! Backend Tags
//!
//! The closed set of numerical backends that encoders and action
//! distributions can be materialised on.

use std::fmt;
use std::str::FromStr;

use burn::backend::{Autodiff, NdArray};
use burn::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Backend used for inference (no gradient tracking)
pub type InferenceBackend = NdArray;

/// Backend used for training (gradient tracking on top of ndarray)
pub type TrainingBackend = Autodiff<NdArray>;

/// Identifier of a supported numerical backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendTag {
    /// Plain CPU ndarray backend
    NdArray,
    /// Autodiff decorator over the ndarray backend
    Autodiff,
}

impl BackendTag {
    /// Every supported backend, in a stable order
    pub const ALL: [BackendTag; 2] = [BackendTag::NdArray, BackendTag::Autodiff];

    /// Canonical string name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NdArray => "ndarray",
            Self::Autodiff => "autodiff",
        }
    }
}

impl fmt::Display for BackendTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendTag {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ndarray" => Ok(Self::NdArray),
            "autodiff" => Ok(Self::Autodiff),
            other => Err(CatalogError::LookupFailure {
                what: "backend",
                backend: other.to_string(),
            }),
        }
    }
}

/// A burn backend that maps onto a [`BackendTag`]
pub trait TaggedBackend: Backend {
    const TAG: BackendTag;
}

impl TaggedBackend for InferenceBackend {
    const TAG: BackendTag = BackendTag::NdArray;
}

impl TaggedBackend for TrainingBackend {
    const TAG: BackendTag = BackendTag::Autodiff;
}
