//! Bricks - the items a masonry grid arranges into columns.

use serde::{Deserialize, Serialize};

/// Natural pixel size of an image.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
}

impl Dimensions {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Height per unit of width. Only meaningful when `width > 0`.
    pub fn aspect_ratio(&self) -> f32 {
        self.height / self.width
    }

    /// Whether these dimensions can be scaled to a column: a positive width
    /// and a non-negative height, both finite.
    pub fn is_valid(&self) -> bool {
        self.width > 0.0
            && self.width.is_finite()
            && self.height >= 0.0
            && self.height.is_finite()
    }
}

/// A user-supplied item: an image locator plus an opaque payload.
///
/// The URI doubles as the identity key. Two bricks with the same URI are the
/// same brick as far as diffing is concerned, whatever their payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub uri: String,
    /// Known dimensions. Bricks carrying these skip the resolver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: serde_json::Value,
}

impl Brick {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            dimensions: None,
            data: serde_json::Value::Null,
        }
    }

    pub fn with_dimensions(mut self, width: f32, height: f32) -> Self {
        self.dimensions = Some(Dimensions::new(width, height));
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }

    /// Identity key used for diffing.
    pub fn key(&self) -> &str {
        &self.uri
    }
}

/// A brick whose dimensions are known and which has been given a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedBrick {
    pub uri: String,
    pub dimensions: Dimensions,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: serde_json::Value,
    /// Column bucket this brick lives in.
    pub column: usize,
    /// Arrival position in the caller's brick list, monotonic across appends.
    pub index: usize,
}

impl PlacedBrick {
    pub fn new(brick: Brick, dimensions: Dimensions, column: usize, index: usize) -> Self {
        Self {
            uri: brick.uri,
            dimensions,
            data: brick.data,
            column,
            index,
        }
    }
}

/// How bricks are distributed across columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Round-robin on arrival index.
    #[default]
    Order,
    /// Greedy: each brick goes to the currently shortest column.
    Balance,
}

impl std::str::FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "order" => Ok(Strategy::Order),
            "balance" => Ok(Strategy::Balance),
            other => Err(format!("unknown strategy: {other}")),
        }
    }
}

/// Stable rendering key for a brick: its column and position within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BrickKey {
    pub column: usize,
    pub position: usize,
}

impl std::fmt::Display for BrickKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.column, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brick_deserializes_without_optional_fields() {
        let brick: Brick = serde_json::from_str(r#"{"uri":"a.png"}"#).unwrap();
        assert_eq!(brick.uri, "a.png");
        assert!(brick.dimensions.is_none());
        assert!(brick.data.is_null());
    }

    #[test]
    fn test_brick_with_dimensions_and_data() {
        let brick = Brick::new("b.png")
            .with_dimensions(200.0, 100.0)
            .with_data(serde_json::json!({"caption": "hi"}));
        assert_eq!(brick.dimensions, Some(Dimensions::new(200.0, 100.0)));
        assert_eq!(brick.data["caption"], "hi");
        assert_eq!(brick.key(), "b.png");
    }

    #[test]
    fn test_dimensions_validity() {
        assert!(Dimensions::new(10.0, 5.0).is_valid());
        assert!(!Dimensions::new(0.0, 5.0).is_valid());
        assert!(!Dimensions::new(-1.0, 5.0).is_valid());
        assert!(!Dimensions::new(100.0, -500.0).is_valid());
        assert!(!Dimensions::new(100.0, f32::INFINITY).is_valid());
        assert_eq!(Dimensions::new(200.0, 100.0).aspect_ratio(), 0.5);
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("order".parse::<Strategy>(), Ok(Strategy::Order));
        assert_eq!("Balance".parse::<Strategy>(), Ok(Strategy::Balance));
        assert!("height".parse::<Strategy>().is_err());
        assert_eq!(serde_json::to_string(&Strategy::Balance).unwrap(), "\"balance\"");
    }

    #[test]
    fn test_brick_key_display() {
        let key = BrickKey { column: 2, position: 5 };
        assert_eq!(key.to_string(), "2-5");
    }
}
