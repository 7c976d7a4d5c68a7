//! View Requirements
//!
//! Which data columns (and at which time offsets) a model wants to see.
//! Resolution never inspects these; they travel with temporal encoder configs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::spaces::Space;

/// Column name to requirement
pub type ViewRequirements = BTreeMap<String, ViewRequirement>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewRequirement {
    /// Source column; defaults to the requirement's own key
    #[serde(default)]
    pub data_col: Option<String>,
    /// Time offset relative to the current step (e.g. -1 for the previous step)
    #[serde(default)]
    pub shift: i64,
    #[serde(default)]
    pub space: Option<Space>,
    #[serde(default = "default_used_for_training")]
    pub used_for_training: bool,
}

fn default_used_for_training() -> bool {
    true
}

impl Default for ViewRequirement {
    fn default() -> Self {
        Self {
            data_col: None,
            shift: 0,
            space: None,
            used_for_training: true,
        }
    }
}

impl ViewRequirement {
    /// Requirement on `data_col` shifted by `shift` steps
    pub fn shifted(data_col: impl Into<String>, shift: i64) -> Self {
        Self {
            data_col: Some(data_col.into()),
            shift,
            ..Self::default()
        }
    }
}
