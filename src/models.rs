use serde::{Deserialize, Serialize};
use std::fmt;

use crate::color_utils::parse_hex_color;
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleId {
    Start,
    End,
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandleId::Start => f.write_str("start"),
            HandleId::End => f.write_str("end"),
        }
    }
}

/// One endpoint of the gradient axis, in coordinates relative to the icon box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientHandle {
    pub id: HandleId,
    pub x: f32,
    pub y: f32,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorderConfig {
    pub enabled: bool,
    pub color: String,
    pub width: f32,
}

impl Default for BorderConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            color: "#000000".to_string(),
            width: 4.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    #[default]
    Rectangle,
    Triangle,
    Circle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeConfig {
    pub enabled: bool,
    #[serde(rename = "type")]
    pub shape_type: ShapeType,
    pub color: String,
    pub stroke_width: f32,
    /// Fraction of the canvas side, in (0, 1].
    pub size: f32,
    /// Degrees, in [0, 360).
    pub rotation: f32,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            shape_type: ShapeType::Rectangle,
            color: "#FFFFFF".to_string(),
            stroke_width: 8.0,
            size: 0.5,
            rotation: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextConfig {
    /// Newline separated lines. Empty means no text layer.
    pub content: String,
    pub font_size: f32,
    /// CSS style family list, e.g. `"Noto Sans JP", sans-serif`.
    pub font_family: String,
    pub font_weight: u16,
    pub color: String,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            content: String::new(),
            font_size: 48.0,
            font_family: "system-ui, sans-serif".to_string(),
            font_weight: 400,
            color: "#FFFFFF".to_string(),
        }
    }
}

/// The whole icon description. Treated as immutable: the `with_*` helpers
/// return a new value instead of editing in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomIconConfig {
    pub icon_size: f32,
    pub gradient_handles: [GradientHandle; 2],
    #[serde(default)]
    pub border: BorderConfig,
    #[serde(default)]
    pub shape: ShapeConfig,
    #[serde(default)]
    pub text: TextConfig,
}

impl Default for CustomIconConfig {
    fn default() -> Self {
        Self {
            icon_size: 512.0,
            gradient_handles: [
                GradientHandle {
                    id: HandleId::Start,
                    x: 0.2,
                    y: 0.2,
                    color: "#8B5CF6".to_string(),
                },
                GradientHandle {
                    id: HandleId::End,
                    x: 0.8,
                    y: 0.8,
                    color: "#EC4899".to_string(),
                },
            ],
            border: BorderConfig::default(),
            shape: ShapeConfig::default(),
            text: TextConfig::default(),
        }
    }
}

impl CustomIconConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn handle(&self, id: HandleId) -> &GradientHandle {
        match id {
            HandleId::Start => &self.gradient_handles[0],
            HandleId::End => &self.gradient_handles[1],
        }
    }

    /// Ratio between a render size and the reference `icon_size`.
    pub fn scale_for(&self, size: u32) -> f32 {
        size as f32 / self.icon_size
    }

    pub fn with_handle_position(&self, id: HandleId, x: f32, y: f32) -> Self {
        let mut next = self.clone();
        for handle in next.gradient_handles.iter_mut().filter(|h| h.id == id) {
            handle.x = x;
            handle.y = y;
        }
        next
    }

    pub fn with_handle_color(&self, id: HandleId, color: impl Into<String>) -> Self {
        let color = color.into();
        let mut next = self.clone();
        for handle in next.gradient_handles.iter_mut().filter(|h| h.id == id) {
            handle.color = color.clone();
        }
        next
    }

    pub fn with_text_content(&self, content: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.text.content = content.into();
        next
    }

    pub fn with_text(&self, text: TextConfig) -> Self {
        Self {
            text,
            ..self.clone()
        }
    }

    pub fn with_border(&self, border: BorderConfig) -> Self {
        Self {
            border,
            ..self.clone()
        }
    }

    pub fn with_shape(&self, shape: ShapeConfig) -> Self {
        Self {
            shape,
            ..self.clone()
        }
    }

    /// Rejects configurations that break the data model invariants.
    ///
    /// Nothing is clamped here; the editing layer owns sanitizing input.
    /// Inert fields (a disabled border's width, a disabled shape's geometry)
    /// are still required to carry valid colors but are otherwise unchecked.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.icon_size.is_finite() || self.icon_size <= 0.0 {
            return Err(ConfigError::InvalidIconSize(self.icon_size));
        }

        for (index, expected) in [HandleId::Start, HandleId::End].into_iter().enumerate() {
            let handle = &self.gradient_handles[index];
            if handle.id != expected {
                return Err(ConfigError::HandleOrder {
                    index,
                    expected,
                    found: handle.id,
                });
            }
            if !in_unit_range(handle.x) || !in_unit_range(handle.y) {
                return Err(ConfigError::HandleOutOfRange {
                    id: handle.id,
                    x: handle.x,
                    y: handle.y,
                });
            }
            let field = match handle.id {
                HandleId::Start => "gradientHandles[start].color",
                HandleId::End => "gradientHandles[end].color",
            };
            check_color(field, &handle.color)?;
        }

        check_color("border.color", &self.border.color)?;
        if self.border.enabled && !(self.border.width.is_finite() && self.border.width > 0.0) {
            return Err(ConfigError::InvalidBorderWidth(self.border.width));
        }

        check_color("shape.color", &self.shape.color)?;
        if self.shape.enabled {
            let shape = &self.shape;
            if !(shape.size.is_finite() && shape.size > 0.0 && shape.size <= 1.0) {
                return Err(ConfigError::InvalidShapeSize(shape.size));
            }
            if !(shape.rotation.is_finite() && (0.0..360.0).contains(&shape.rotation)) {
                return Err(ConfigError::InvalidShapeRotation(shape.rotation));
            }
            if !(shape.stroke_width.is_finite() && shape.stroke_width > 0.0) {
                return Err(ConfigError::InvalidShapeStrokeWidth(shape.stroke_width));
            }
        }

        check_color("text.color", &self.text.color)?;
        if !self.text.content.is_empty()
            && !(self.text.font_size.is_finite() && self.text.font_size > 0.0)
        {
            return Err(ConfigError::InvalidFontSize(self.text.font_size));
        }

        Ok(())
    }
}

fn in_unit_range(v: f32) -> bool {
    v.is_finite() && (0.0..=1.0).contains(&v)
}

fn check_color(field: &'static str, value: &str) -> Result<(), ConfigError> {
    parse_hex_color(value)
        .map(|_| ())
        .map_err(|_| ConfigError::InvalidColor {
            field,
            value: value.to_string(),
        })
}
