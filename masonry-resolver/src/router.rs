//! Scheme router - picks a resolver by URI scheme.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use masonry_api::{Brick, Dimensions};

use crate::{FileImageResolver, ImageResolver, ResolveError, Result};

/// Routes each brick to the resolver registered for its URI scheme.
///
/// URIs without a scheme go to the fallback, if any.
#[derive(Default)]
pub struct SchemeRouter {
    routes: HashMap<String, Arc<dyn ImageResolver>>,
    fallback: Option<Arc<dyn ImageResolver>>,
}

impl SchemeRouter {
    /// Create an empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a router with the built-in resolvers: local files for plain
    /// paths and `file://`, plus `http(s)://` when built with `http`.
    pub fn with_builtins() -> Self {
        let files: Arc<dyn ImageResolver> = Arc::new(FileImageResolver::new());
        let router = Self::new().route("file", files.clone()).fallback(files);

        #[cfg(feature = "http")]
        let router = {
            let http: Arc<dyn ImageResolver> = Arc::new(crate::HttpImageResolver::new());
            router.route("http", http.clone()).route("https", http)
        };

        router
    }

    /// Register a resolver for `scheme`.
    pub fn route(mut self, scheme: &str, resolver: Arc<dyn ImageResolver>) -> Self {
        self.routes.insert(scheme.to_ascii_lowercase(), resolver);
        self
    }

    /// Resolver for URIs without a scheme.
    pub fn fallback(mut self, resolver: Arc<dyn ImageResolver>) -> Self {
        self.fallback = Some(resolver);
        self
    }

    /// Find the resolver for a URI.
    pub fn find(&self, uri: &str) -> Option<&Arc<dyn ImageResolver>> {
        match crate::scheme(uri) {
            Some(scheme) => self.routes.get(&scheme),
            None => self.fallback.as_ref(),
        }
    }
}

#[async_trait]
impl ImageResolver for SchemeRouter {
    async fn resolve(&self, brick: &Brick) -> Result<Dimensions> {
        match self.find(&brick.uri) {
            Some(resolver) => resolver.resolve(brick).await,
            None => Err(ResolveError::UnsupportedUri(brick.uri.clone())),
        }
    }
}
