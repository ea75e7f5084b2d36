//! StaticResolver - dimensions known ahead of time.

use std::collections::HashMap;

use async_trait::async_trait;
use masonry_api::{Brick, Dimensions};

use crate::{ImageResolver, ResolveError, Result};

/// Serves dimensions from an in-memory table keyed by URI.
///
/// Useful when the host already has image metadata (e.g. from an API
/// response) and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    sizes: HashMap<String, Dimensions>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the dimensions for `uri`.
    pub fn insert(&mut self, uri: impl Into<String>, width: f32, height: f32) {
        self.sizes.insert(uri.into(), Dimensions::new(width, height));
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, uri: impl Into<String>, width: f32, height: f32) -> Self {
        self.insert(uri, width, height);
        self
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Dimensions)> for StaticResolver {
    fn from_iter<I: IntoIterator<Item = (S, Dimensions)>>(iter: I) -> Self {
        Self {
            sizes: iter.into_iter().map(|(uri, dims)| (uri.into(), dims)).collect(),
        }
    }
}

#[async_trait]
impl ImageResolver for StaticResolver {
    async fn resolve(&self, brick: &Brick) -> Result<Dimensions> {
        self.sizes
            .get(&brick.uri)
            .copied()
            .ok_or_else(|| ResolveError::NotFound(brick.uri.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_known_uri_resolves() {
        let resolver = StaticResolver::new().with("a.png", 200.0, 100.0);
        let dims = resolver.resolve(&Brick::new("a.png")).await.unwrap();
        assert_eq!(dims, Dimensions::new(200.0, 100.0));
    }

    #[tokio::test]
    async fn test_unknown_uri_is_not_found() {
        let resolver = StaticResolver::new();
        let err = resolver.resolve(&Brick::new("b.png")).await.unwrap_err();
        assert!(matches!(err, ResolveError::NotFound(uri) if uri == "b.png"));
    }

    #[test]
    fn test_collect_from_pairs() {
        let resolver: StaticResolver = [
            ("a", Dimensions::new(1.0, 2.0)),
            ("b", Dimensions::new(3.0, 4.0)),
        ]
        .into_iter()
        .collect();
        assert_eq!(resolver.len(), 2);
        assert!(!resolver.is_empty());
    }
}
