//! FileImageResolver - reads dimensions of images on the local filesystem.
//!
//! Accepts plain paths and `file://` URIs. Only the image header is decoded,
//! on tokio's blocking pool.

use async_trait::async_trait;
use masonry_api::{Brick, Dimensions};
use std::path::{Path, PathBuf};

use crate::{ImageResolver, ResolveError, Result};

/// Resolver for local image files.
#[derive(Debug, Clone, Default)]
pub struct FileImageResolver {
    /// Base directory for relative paths. Relative to the process cwd if unset.
    root: Option<PathBuf>,
}

impl FileImageResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative paths against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// Map a brick URI to a filesystem path.
    pub fn path_for(&self, uri: &str) -> Result<PathBuf> {
        let path = match crate::scheme(uri).as_deref() {
            Some("file") => {
                let rest = uri.split_once("://").map_or(uri, |(_, rest)| rest);
                // file://localhost/path and file:///path
                let rest = rest.strip_prefix("localhost").unwrap_or(rest);
                let decoded = urlencoding::decode(rest)
                    .map_err(|_| ResolveError::UnsupportedUri(uri.to_string()))?;
                PathBuf::from(decoded.into_owned())
            }
            Some(_) => return Err(ResolveError::UnsupportedUri(uri.to_string())),
            None => PathBuf::from(uri),
        };

        Ok(match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path,
        })
    }
}

fn read_dimensions(path: &Path) -> Result<Dimensions> {
    if !path.exists() {
        return Err(ResolveError::NotFound(path.display().to_string()));
    }
    let (width, height) = image::image_dimensions(path)?;
    Ok(Dimensions::new(width as f32, height as f32))
}

#[async_trait]
impl ImageResolver for FileImageResolver {
    async fn resolve(&self, brick: &Brick) -> Result<Dimensions> {
        let path = self.path_for(&brick.uri)?;
        tracing::debug!("reading image header: {}", path.display());

        tokio::task::spawn_blocking(move || read_dimensions(&path))
            .await
            .map_err(|e| ResolveError::Task(e.to_string()))?
    }
}
