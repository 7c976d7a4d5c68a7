//! Spaces
//!
//! Declarative descriptions of observation and action spaces.
//!
//! The taxonomy is closed: resolvers match on [`Space`] exhaustively, so a new
//! variant fails to compile until every resolver decides what to do with it.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Element type of a box space
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DType {
    #[default]
    Float32,
    Float64,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
}

impl DType {
    /// Whether values of this type are integers
    pub fn is_integer(&self) -> bool {
        !matches!(self, Self::Float32 | Self::Float64)
    }
}

/// Shape and kind of the values an environment emits or accepts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Space {
    /// Fixed-shape tensor of numbers
    Box {
        shape: Vec<usize>,
        #[serde(default)]
        dtype: DType,
    },
    /// One choice out of `n`
    Discrete { n: usize },
    /// One choice per entry, entry `i` out of `nvec[i]`
    MultiDiscrete { nvec: Vec<usize> },
    /// Ordered product of sub-spaces
    Tuple { spaces: Vec<Space> },
    /// Named product of sub-spaces
    Dict { spaces: BTreeMap<String, Space> },
    /// Points on a probability simplex
    Simplex { shape: Vec<usize> },
}

impl Space {
    /// Float32 box of the given shape
    pub fn box_f32(shape: impl Into<Vec<usize>>) -> Self {
        Self::Box {
            shape: shape.into(),
            dtype: DType::Float32,
        }
    }

    /// Box with an explicit element type
    pub fn box_of(shape: impl Into<Vec<usize>>, dtype: DType) -> Self {
        Self::Box {
            shape: shape.into(),
            dtype,
        }
    }

    pub fn discrete(n: usize) -> Self {
        Self::Discrete { n }
    }

    pub fn multi_discrete(nvec: impl Into<Vec<usize>>) -> Self {
        Self::MultiDiscrete { nvec: nvec.into() }
    }

    pub fn tuple(spaces: impl Into<Vec<Space>>) -> Self {
        Self::Tuple {
            spaces: spaces.into(),
        }
    }

    pub fn dict<K: Into<String>>(spaces: impl IntoIterator<Item = (K, Space)>) -> Self {
        Self::Dict {
            spaces: spaces.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn simplex(shape: impl Into<Vec<usize>>) -> Self {
        Self::Simplex {
            shape: shape.into(),
        }
    }

    /// Shape of a single sample; empty for scalar and composite spaces
    pub fn shape(&self) -> Vec<usize> {
        match self {
            Self::Box { shape, .. } | Self::Simplex { shape } => shape.clone(),
            Self::MultiDiscrete { nvec } => vec![nvec.len()],
            Self::Discrete { .. } | Self::Tuple { .. } | Self::Dict { .. } => Vec::new(),
        }
    }

    /// Number of shape dimensions
    pub fn rank(&self) -> usize {
        match self {
            Self::Box { shape, .. } | Self::Simplex { shape } => shape.len(),
            Self::MultiDiscrete { .. } => 1,
            Self::Discrete { .. } | Self::Tuple { .. } | Self::Dict { .. } => 0,
        }
    }

    /// Number of scalar values in a flattened sample
    pub fn flat_dim(&self) -> usize {
        match self {
            Self::Box { shape, .. } | Self::Simplex { shape } => shape.iter().product(),
            Self::Discrete { .. } => 1,
            Self::MultiDiscrete { nvec } => nvec.len(),
            Self::Tuple { spaces } => spaces.iter().map(Space::flat_dim).sum(),
            Self::Dict { spaces } => spaces.values().map(Space::flat_dim).sum(),
        }
    }

    /// Whether this space nests other spaces
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Tuple { .. } | Self::Dict { .. })
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Box { shape, dtype } => write!(f, "Box({shape:?}, {dtype:?})"),
            Self::Discrete { n } => write!(f, "Discrete({n})"),
            Self::MultiDiscrete { nvec } => write!(f, "MultiDiscrete({nvec:?})"),
            Self::Tuple { spaces } => {
                write!(f, "Tuple(")?;
                for (i, space) in spaces.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{space}")?;
                }
                write!(f, ")")
            }
            Self::Dict { spaces } => {
                write!(f, "Dict(")?;
                for (i, (key, space)) in spaces.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {space}")?;
                }
                write!(f, ")")
            }
            Self::Simplex { shape } => write!(f, "Simplex({shape:?})"),
        }
    }
}
