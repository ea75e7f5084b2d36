//! Masonry configuration.
//!
//! Every field is optional in the JSON form; missing ones take the defaults
//! below.

use std::path::Path;

use masonry_api::Strategy;
use masonry_layout::{Constraints, LayoutError};
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MasonryConfig {
    /// Number of columns. Must be at least 1.
    pub columns: usize,
    /// Gutter as a percentage of the parent width.
    pub spacing: f32,
    /// Placement strategy.
    pub priority: Strategy,
    /// Keep each column ordered by arrival index.
    pub sorted: bool,
    /// Handed to the renderer's list; the kernel does not interpret it.
    pub end_reached_threshold: f32,
    /// Re-place from known dimensions instead of resolving again after an
    /// invalidating change.
    pub reuse_resolved: bool,
}

impl Default for MasonryConfig {
    fn default() -> Self {
        Self {
            columns: 2,
            spacing: 1.0,
            priority: Strategy::Order,
            sorted: false,
            end_reached_threshold: 25.0,
            reuse_resolved: true,
        }
    }
}

impl MasonryConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Constraints for a parent of the given size.
    pub fn constraints(&self, width: f32, height: f32) -> Constraints {
        Constraints::new(self.columns, self.priority)
            .size(width, height)
            .spacing(self.spacing)
    }

    pub fn validate(&self) -> std::result::Result<(), LayoutError> {
        self.constraints(0.0, 0.0).validate()?;
        if !self.end_reached_threshold.is_finite() || self.end_reached_threshold < 0.0 {
            return Err(LayoutError::InvalidConfiguration(format!(
                "end_reached_threshold must be a finite number >= 0, got {}",
                self.end_reached_threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MasonryError;

    #[test]
    fn test_defaults() {
        let config = MasonryConfig::default();
        assert_eq!(config.columns, 2);
        assert_eq!(config.spacing, 1.0);
        assert_eq!(config.priority, Strategy::Order);
        assert!(!config.sorted);
        assert_eq!(config.end_reached_threshold, 25.0);
        assert!(config.reuse_resolved);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config =
            MasonryConfig::from_json_str(r#"{"columns": 3, "priority": "balance"}"#).unwrap();
        assert_eq!(config.columns, 3);
        assert_eq!(config.priority, Strategy::Balance);
        assert_eq!(config.spacing, 1.0);
    }

    #[test]
    fn test_zero_columns_rejected() {
        let err = MasonryConfig::from_json_str(r#"{"columns": 0}"#).unwrap_err();
        assert!(matches!(
            err,
            MasonryError::Layout(LayoutError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let config = MasonryConfig {
            end_reached_threshold: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        let err = MasonryConfig::from_json_str("{columns").unwrap_err();
        assert!(matches!(err, MasonryError::Json(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"sorted": true, "spacing": 2.5}"#).unwrap();

        let config = MasonryConfig::load(&path).unwrap();
        assert!(config.sorted);
        assert_eq!(config.spacing, 2.5);
    }

    #[test]
    fn test_constraints_from_config() {
        let config = MasonryConfig::default();
        let c = config.constraints(300.0, 500.0);
        assert_eq!(c.column_width().unwrap(), 148.5);
        assert_eq!(c.total_height, 500.0);
    }
}
