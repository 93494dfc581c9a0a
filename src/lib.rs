//! Deterministic icon rendering: a gradient rounded square with optional
//! shape, text and border, exported as PNG or SVG at any pixel size.
pub mod asset;
pub mod color_utils;
pub mod converter;
pub mod error;
pub mod font_utils;
pub mod math_utils;
pub mod models;
pub mod pointer;
pub mod rect_utils;
pub mod renderer;
pub mod renderer_skia;
pub mod shape_utils;
pub mod stroke_utils;
pub mod text_utils;
pub mod utils;

pub use asset::{generate_previews, resize_icon, AssetGate};
pub use converter::rasterize_svg;
pub use error::{AssetError, ConfigError, ExportError, RenderError};
pub use font_utils::FontBook;
pub use models::{
    BorderConfig, CustomIconConfig, GradientHandle, HandleId, ShapeConfig, ShapeType, TextConfig,
};
pub use pointer::{map_pointer_to_relative, ContainerBounds, RelativePoint};
pub use renderer::render_to_vector_document;
pub use renderer_skia::{render_to_surface, IconRenderer, RenderOptions};
pub use utils::{
    encode_png_with_quality, export_file_name, render_bundle, ExportFormat, ExportedIcon,
    PREVIEW_SIZES,
};
