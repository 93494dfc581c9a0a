//! Stroke outlines for the shape layer.
//!
//! Outlines are computed for a canvas of side `canvas_size` around its
//! center. Rotation is not baked into the coordinates: both renderers apply
//! it as a transform about [`ShapeOutline::center`].
use crate::models::ShapeType;
use crate::rect_utils::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeOutline {
    /// Axis aligned square, `origin` is the top-left corner.
    Square { origin: Point, side: f32 },
    /// Equilateral, apex up: `[apex, bottom_right, bottom_left]`.
    Triangle([Point; 3]),
    Circle { center: Point, radius: f32 },
}

impl ShapeOutline {
    pub fn new(shape_type: ShapeType, canvas_size: f32, size_fraction: f32) -> Self {
        let c = canvas_size / 2.0;
        let shape_size = canvas_size * size_fraction;
        let half = shape_size / 2.0;

        match shape_type {
            ShapeType::Rectangle => ShapeOutline::Square {
                origin: Point::new(c - half, c - half),
                side: shape_size,
            },
            ShapeType::Triangle => {
                let circumradius = shape_size / 3.0_f32.sqrt();
                let top = c - circumradius;
                let bottom = c + circumradius / 2.0;
                ShapeOutline::Triangle([
                    Point::new(c, top),
                    Point::new(c + half, bottom),
                    Point::new(c - half, bottom),
                ])
            }
            ShapeType::Circle => ShapeOutline::Circle {
                center: Point::new(c, c),
                radius: half,
            },
        }
    }

    /// Rotation pivot, always the canvas center.
    pub fn center(canvas_size: f32) -> Point {
        Point::new(canvas_size / 2.0, canvas_size / 2.0)
    }

    pub fn to_skia_path(&self) -> Option<tiny_skia::Path> {
        match *self {
            ShapeOutline::Square { origin, side } => {
                let rect = tiny_skia::Rect::from_xywh(origin.x, origin.y, side, side)?;
                Some(tiny_skia::PathBuilder::from_rect(rect))
            }
            ShapeOutline::Triangle([a, b, c]) => {
                let mut pb = tiny_skia::PathBuilder::new();
                pb.move_to(a.x, a.y);
                pb.line_to(b.x, b.y);
                pb.line_to(c.x, c.y);
                pb.close();
                pb.finish()
            }
            ShapeOutline::Circle { center, radius } => {
                tiny_skia::PathBuilder::from_circle(center.x, center.y, radius)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn square_is_centered() {
        match ShapeOutline::new(ShapeType::Rectangle, 512.0, 0.5) {
            ShapeOutline::Square { origin, side } => {
                assert!(close(origin.x, 128.0));
                assert!(close(origin.y, 128.0));
                assert!(close(side, 256.0));
            }
            other => panic!("unexpected outline {other:?}"),
        }
    }

    #[test]
    fn triangle_is_equilateral_apex_up() {
        let ShapeOutline::Triangle([apex, br, bl]) = ShapeOutline::new(ShapeType::Triangle, 512.0, 0.5)
        else {
            panic!("expected a triangle");
        };
        let r = 256.0 / 3.0_f32.sqrt();
        assert!(close(apex.x, 256.0));
        assert!(close(apex.y, 256.0 - r));
        assert!(close(br.y, 256.0 + r / 2.0));
        assert!(close(bl.y, br.y));
        assert!(close(br.x - bl.x, 256.0));

        let side = |p: Point, q: Point| (p - q).length();
        assert!(close(side(apex, br), side(br, bl)));
        assert!(close(side(apex, bl), side(br, bl)));
    }

    #[test]
    fn circle_radius_is_half_shape_size() {
        assert_eq!(
            ShapeOutline::new(ShapeType::Circle, 200.0, 1.0),
            ShapeOutline::Circle {
                center: Point::new(100.0, 100.0),
                radius: 100.0
            }
        );
    }
}
