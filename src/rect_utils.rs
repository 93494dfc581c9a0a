//! Rounded-square contour shared by the clip mask and the border layer.
//!
//! The contour is produced once as a list of segments; the raster renderer
//! replays it into a tiny-skia path and the SVG exporter serializes it to
//! path data, so both outputs trace the exact same control points.
use euclid::default::Point2D;
use std::fmt::Write;

/// Corner radius as a fraction of the side length.
pub const CORNER_RADIUS_RATIO: f32 = 0.2237;

pub type Point = Point2D<f32>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    QuadTo(Point, Point),
    Close,
}

pub fn corner_radius(size: f32) -> f32 {
    size * CORNER_RADIUS_RATIO
}

/// A square of side `size` at (`origin`, `origin`) with quadratic corners of radius `radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundedSquare {
    pub origin: f32,
    pub size: f32,
    pub radius: f32,
}

impl RoundedSquare {
    /// The icon outline for a canvas of side `size`.
    pub fn outline(size: f32) -> Self {
        Self {
            origin: 0.0,
            size,
            radius: corner_radius(size),
        }
    }

    /// The outline shrunk by half a stroke width on every side, so that a
    /// stroke of `stroke_width` has its outer edge on the icon boundary.
    pub fn inset_for_stroke(size: f32, stroke_width: f32) -> Self {
        let offset = stroke_width / 2.0;
        Self {
            origin: offset,
            size: size - offset * 2.0,
            radius: (corner_radius(size) - offset).max(0.0),
        }
    }

    /// Move, four edges alternating with four single-control-point corners, close.
    pub fn segments(&self) -> [PathSegment; 10] {
        let o = self.origin;
        let s = self.size;
        let r = self.radius;
        let p = |x: f32, y: f32| Point::new(o + x, o + y);
        [
            PathSegment::MoveTo(p(r, 0.0)),
            PathSegment::LineTo(p(s - r, 0.0)),
            PathSegment::QuadTo(p(s, 0.0), p(s, r)),
            PathSegment::LineTo(p(s, s - r)),
            PathSegment::QuadTo(p(s, s), p(s - r, s)),
            PathSegment::LineTo(p(r, s)),
            PathSegment::QuadTo(p(0.0, s), p(0.0, s - r)),
            PathSegment::LineTo(p(0.0, r)),
            PathSegment::QuadTo(p(0.0, 0.0), p(r, 0.0)),
            PathSegment::Close,
        ]
    }

    pub fn to_svg_path_data(&self) -> String {
        segments_to_svg_path_data(&self.segments())
    }

    pub fn to_skia_path(&self) -> Option<tiny_skia::Path> {
        segments_to_skia_path(&self.segments())
    }
}

pub fn segments_to_svg_path_data(segments: &[PathSegment]) -> String {
    let mut d = String::new();
    for seg in segments {
        if !d.is_empty() {
            d.push(' ');
        }
        // Writing into a String cannot fail.
        let _ = match seg {
            PathSegment::MoveTo(p) => write!(d, "M {} {}", p.x, p.y),
            PathSegment::LineTo(p) => write!(d, "L {} {}", p.x, p.y),
            PathSegment::QuadTo(c, p) => write!(d, "Q {} {} {} {}", c.x, c.y, p.x, p.y),
            PathSegment::Close => write!(d, "Z"),
        };
    }
    d
}

pub fn segments_to_skia_path(segments: &[PathSegment]) -> Option<tiny_skia::Path> {
    let mut pb = tiny_skia::PathBuilder::new();
    for seg in segments {
        match seg {
            PathSegment::MoveTo(p) => pb.move_to(p.x, p.y),
            PathSegment::LineTo(p) => pb.line_to(p.x, p.y),
            PathSegment::QuadTo(c, p) => pb.quad_to(c.x, c.y, p.x, p.y),
            PathSegment::Close => pb.close(),
        }
    }
    pb.finish()
}
