//! Masonry Resolver - turns brick URIs into natural image dimensions.
//!
//! Resolvers are the asynchronous collaborator of the layout kernel. Each call
//! resolves one brick and may finish in any order relative to other calls.

use async_trait::async_trait;
use masonry_api::{Brick, Dimensions};
use thiserror::Error;

mod file;
mod fixed;
#[cfg(feature = "http")]
mod http;
mod router;

pub use file::FileImageResolver;
pub use fixed::StaticResolver;
#[cfg(feature = "http")]
pub use http::HttpImageResolver;
pub use router::SchemeRouter;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("unsupported uri: {0}")]
    UnsupportedUri(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("resolver task failed: {0}")]
    Task(String),

    #[cfg(feature = "http")]
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ResolveError>;

#[async_trait]
pub trait ImageResolver: Send + Sync {
    /// Resolve the natural pixel size of `brick`.
    async fn resolve(&self, brick: &Brick) -> Result<Dimensions>;
}

/// Split `scheme://rest` into its lowercase scheme, if there is one.
pub(crate) fn scheme(uri: &str) -> Option<String> {
    let (scheme, _) = uri.split_once("://")?;
    let valid = |c: char| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.');
    if scheme.is_empty() || !scheme.chars().all(valid) {
        return None;
    }
    Some(scheme.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_detection() {
        assert_eq!(scheme("https://x/y.png").as_deref(), Some("https"));
        assert_eq!(scheme("FILE:///tmp/a.png").as_deref(), Some("file"));
        assert_eq!(scheme("/tmp/a.png"), None);
        assert_eq!(scheme("photos/a b.png"), None);
        assert_eq!(scheme("://nothing"), None);
    }

    #[test]
    fn test_error_messages() {
        let err = ResolveError::NotFound("a.png".to_string());
        assert_eq!(err.to_string(), "not found: a.png");
        let err = ResolveError::UnsupportedUri("ftp://a".to_string());
        assert_eq!(err.to_string(), "unsupported uri: ftp://a");
    }
}
