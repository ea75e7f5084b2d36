//! HttpImageResolver - downloads remote images and reads their dimensions.

use std::io::Cursor;

use async_trait::async_trait;
use masonry_api::{Brick, Dimensions};

use crate::{ImageResolver, ResolveError, Result};

/// Resolver for `http://` and `https://` URIs.
#[derive(Debug, Clone, Default)]
pub struct HttpImageResolver {
    client: reqwest::Client,
}

impl HttpImageResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client (timeouts, headers, proxies).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageResolver for HttpImageResolver {
    async fn resolve(&self, brick: &Brick) -> Result<Dimensions> {
        tracing::debug!("fetching image: {}", brick.uri);
        let response = self.client.get(&brick.uri).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ResolveError::NotFound(brick.uri.clone()));
        }
        let bytes = response.error_for_status()?.bytes().await?;

        // Header only, the pixels are never decoded.
        let (width, height) = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()?
            .into_dimensions()?;
        Ok(Dimensions::new(width as f32, height as f32))
    }
}
