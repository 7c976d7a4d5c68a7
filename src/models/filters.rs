//! Default Convolution Filters
//!
//! Filter stacks for common image sizes, used when a model configuration does
//! not set `conv_filters` for an image-shaped observation.

use crate::error::{CatalogError, Result};
use crate::models::config::FilterSpec;

/// Filter stack for an observation shape of `[h, w]` or `[h, w, c]`
/// (a channels-first `[c, h, w]` shape is matched on its trailing dims).
pub fn default_filter_config(shape: &[usize]) -> Result<Vec<FilterSpec>> {
    let matches = |h: usize, w: usize| {
        matches!(shape.len(), 2 | 3)
            && (shape[..2] == [h, w] || (shape.len() == 3 && shape[1..] == [h, w]))
    };

    let filters = if matches(480, 640) {
        // Vizdoom, large
        vec![
            FilterSpec::new(16, [24, 32], [14, 18]),
            FilterSpec::square(32, 6, 4),
            FilterSpec::square(256, 9, 1),
        ]
    } else if matches(240, 320) {
        // Vizdoom, small
        vec![
            FilterSpec::new(16, [12, 16], [7, 9]),
            FilterSpec::square(32, 6, 4),
            FilterSpec::square(256, 9, 1),
        ]
    } else if matches(96, 96) {
        vec![
            FilterSpec::square(16, 8, 4),
            FilterSpec::square(32, 4, 2),
            FilterSpec::square(256, 11, 2),
        ]
    } else if matches(84, 84) {
        // Atari
        vec![
            FilterSpec::square(16, 8, 4),
            FilterSpec::square(32, 4, 2),
            FilterSpec::square(256, 11, 1),
        ]
    } else if matches(42, 42) {
        vec![
            FilterSpec::square(16, 4, 2),
            FilterSpec::square(32, 4, 2),
            FilterSpec::square(256, 11, 1),
        ]
    } else if matches(10, 10) {
        vec![FilterSpec::square(16, 5, 2), FilterSpec::square(32, 5, 2)]
    } else {
        return Err(CatalogError::invalid(format!(
            "No default filter configuration for observation shape {shape:?}; \
             set `conv_filters` explicitly. Defaults exist for [42, 42, K], [84, 84, K], \
             [96, 96, K], [10, 10, K], [240, 320, K] and [480, 640, K]."
        )));
    };

    Ok(filters)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atari_filters() {
        let filters = default_filter_config(&[84, 84, 4]).unwrap();
        assert_eq!(
            filters,
            vec![
                FilterSpec::square(16, 8, 4),
                FilterSpec::square(32, 4, 2),
                FilterSpec::square(256, 11, 1),
            ]
        );
    }

    #[test]
    fn test_channels_first_shape() {
        let filters = default_filter_config(&[3, 42, 42]).unwrap();
        assert_eq!(filters[0], FilterSpec::square(16, 4, 2));
    }

    #[test]
    fn test_unknown_shape_rejected() {
        let err = default_filter_config(&[64, 64, 3]).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidConfiguration(_)));
        assert!(err.to_string().contains("conv_filters"));
    }
}
