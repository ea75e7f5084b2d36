//! Image rendering capability.
//!
//! The layout engine does not draw. It hands each sized brick to an
//! [`ImageRenderer`], which turns it into the props a host's image widget
//! takes. Hosts that want a different image component supply their own
//! renderer when the kernel is built; otherwise [`DefaultImageRenderer`] is
//! used.

use serde::Serialize;

use crate::view::SizedBrick;

/// How the host should resample the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeMethod {
    #[default]
    Auto,
    Resize,
    Scale,
}

/// Caller-supplied styling passed through to every image.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImageStyle {
    /// Merged under the computed width/height/margin.
    pub container: serde_json::Map<String, serde_json::Value>,
    /// Extra props for a custom image component.
    pub custom_props: Option<serde_json::Value>,
}

/// Props for one image widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageProps {
    pub key: String,
    pub source: String,
    pub resize_method: ResizeMethod,
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    #[serde(skip_serializing_if = "serde_json::Map::is_empty")]
    pub container_style: serde_json::Map<String, serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_props: Option<serde_json::Value>,
}

/// Turns a sized brick into image widget props.
pub trait ImageRenderer: Send + Sync {
    fn render(&self, brick: &SizedBrick, style: &ImageStyle) -> ImageProps;
}

/// Plain image: keyed by URI, sized to the column.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultImageRenderer;

impl ImageRenderer for DefaultImageRenderer {
    fn render(&self, brick: &SizedBrick, style: &ImageStyle) -> ImageProps {
        ImageProps {
            key: brick.uri.clone(),
            source: brick.uri.clone(),
            resize_method: ResizeMethod::Auto,
            width: brick.width,
            height: brick.height,
            margin_top: brick.margin_top,
            container_style: style.container.clone(),
            custom_props: style.custom_props.clone(),
        }
    }
}
