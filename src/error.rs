use thiserror::Error;

use crate::models::HandleId;

/// Caller contract violations detected in a [`CustomIconConfig`](crate::CustomIconConfig).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("iconSize must be a positive finite number, got {0}")]
    InvalidIconSize(f32),

    #[error("gradient handle at index {index} must be `{expected}`, found `{found}`")]
    HandleOrder {
        index: usize,
        expected: HandleId,
        found: HandleId,
    },

    #[error("gradient handle `{id}` lies outside the unit square: ({x}, {y})")]
    HandleOutOfRange { id: HandleId, x: f32, y: f32 },

    #[error("{field} is not a #RRGGBB color: {value:?}")]
    InvalidColor { field: &'static str, value: String },

    #[error("border width must be positive when the border is enabled, got {0}")]
    InvalidBorderWidth(f32),

    #[error("shape size must be in (0, 1], got {0}")]
    InvalidShapeSize(f32),

    #[error("shape rotation must be in [0, 360), got {0}")]
    InvalidShapeRotation(f32),

    #[error("shape stroke width must be positive, got {0}")]
    InvalidShapeStrokeWidth(f32),

    #[error("font size must be positive when text is present, got {0}")]
    InvalidFontSize(f32),
}

/// Failures of a single render call. The input configuration is never touched.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("target size must be at least 1px")]
    InvalidTargetSize,

    #[error("failed to allocate a {0}x{0} drawing surface")]
    SurfaceAllocation(u32),

    #[error("failed to build the {0} path")]
    Path(&'static str),

    #[error("failed to build the gradient shader")]
    Shader,

    #[error("no installed font matches {family:?} at weight {weight}")]
    FontUnavailable { family: String, weight: u16 },

    #[error("font data for {family:?} could not be read")]
    FontData { family: String },
}

/// Failures while turning a rendered icon into file bytes.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("export size must be between {min} and {max}px, got {size}")]
    InvalidSize { size: u32, min: u32, max: u32 },

    #[error("failed to encode PNG: {0}")]
    PngEncode(#[from] png::EncodingError),

    #[error("failed to parse SVG: {0}")]
    SvgParse(#[from] resvg::usvg::Error),

    #[error("failed to allocate a {width}x{height} pixmap for SVG rasterization")]
    SvgSurface { width: u32, height: u32 },

    #[error("render worker for {0}px panicked")]
    Worker(u32),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failures of the one-shot asset load gate.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to decode image: {0}")]
    Decode(#[from] png::DecodingError),

    #[error("image did not finish loading within {0:?}")]
    Timeout(std::time::Duration),

    #[error("image loader stopped before delivering a result")]
    Disconnected,

    #[error("failed to allocate a {0}x{0} pixmap")]
    Surface(u32),
}
