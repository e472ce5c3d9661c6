//! Coordinate strings: the flat textual form of a region's geometry.
//!
//! | kind    | layout              | example            |
//! |---------|---------------------|--------------------|
//! | rect    | `x1,y1,x2,y2`       | `200,110,249,138`  |
//! | circle  | `cx,cy,r`           | `289,203,16`       |
//! | polygon | `x1,y1 x2,y2 ...`   | `10,10 40,10 25,30` |
//!
//! Writing is exact. Reading is best-effort: a field that does not start with a number
//! becomes NaN and the resulting shape is degenerate rather than an error.

use serde::{Deserialize, Serialize};

use crate::geometry::{Circle, PixelPoint, Point, Polygon, Rect, Shape};
use crate::mapper::round_half_up;

/// Shape kind of a region or of the editor's drawing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    #[serde(alias = "rectangle")]
    Rect,
    Circle,
    Polygon,
}

impl ShapeKind {
    pub const ALL: [Self; 3] = [Self::Rect, Self::Circle, Self::Polygon];

    pub fn label(self) -> &'static str {
        match self {
            Self::Rect => "Rectangle",
            Self::Circle => "Circle",
            Self::Polygon => "Polygon",
        }
    }
}

/// `"x1,y1,x2,y2"` with the min corner first, whatever the drag direction.
pub fn rect_string(a: PixelPoint, b: PixelPoint) -> String {
    let x1 = a.x.min(b.x);
    let y1 = a.y.min(b.y);
    let x2 = x1 + (a.x - b.x).abs();
    let y2 = y1 + (a.y - b.y).abs();
    format!("{x1},{y1},{x2},{y2}")
}

/// `"cx,cy,r"`, the radius rounded to the nearest pixel.
pub fn circle_string(center: PixelPoint, radius: f64) -> String {
    format!("{},{},{}", center.x, center.y, round_half_up(radius))
}

/// Space-separated `"x,y"` pairs in the given order.
pub fn polygon_string(points: &[PixelPoint]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits on runs of spaces and commas, dropping empty fields.
pub fn fields(coords: &str) -> impl Iterator<Item = &str> {
    coords
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|f| !f.is_empty())
}

/// Reads the leading decimal integer of a field (`"12px"` is 12); NaN if there is none.
pub fn parse_int_prefix(field: &str) -> f64 {
    let s = field.trim_start();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    match digits.get(..end).and_then(|d| d.parse::<f64>().ok()) {
        Some(v) if negative => -v,
        Some(v) => v,
        None => f64::NAN,
    }
}

fn int_field(values: &[f64], i: usize) -> f64 {
    values.get(i).copied().unwrap_or(f64::NAN)
}

/// Rebuilds a shape from its coordinate string.
///
/// Rectangles are normalized from their two corners, circles are taken as center
/// and radius, polygon pairs are used in order (a trailing unpaired number is dropped).
pub fn parse_shape(kind: ShapeKind, coords: &str) -> Shape {
    match kind {
        ShapeKind::Rect => {
            let v: Vec<f64> = fields(coords).take(4).map(parse_int_prefix).collect();
            let a = Point::new(int_field(&v, 0), int_field(&v, 1));
            let b = Point::new(int_field(&v, 2), int_field(&v, 3));
            Shape::Rect(Rect::from_corners(a, b))
        }
        ShapeKind::Circle => {
            let v: Vec<f64> = fields(coords).take(3).map(parse_int_prefix).collect();
            Shape::Circle(Circle {
                center: Point::new(int_field(&v, 0), int_field(&v, 1)),
                radius: int_field(&v, 2),
            })
        }
        ShapeKind::Polygon => {
            let v: Vec<f64> = fields(coords)
                .map(|f| f.parse::<f64>().unwrap_or(f64::NAN))
                .collect();
            let vertices = v
                .chunks_exact(2)
                .map(|pair| match pair {
                    [x, y] => Point::new(*x, *y),
                    _ => Point::new(f64::NAN, f64::NAN),
                })
                .collect();
            Shape::Polygon(Polygon::new(vertices))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_string_min_corner_first() {
        let a = PixelPoint::new(250, 140);
        let b = PixelPoint::new(200, 100);
        assert_eq!(rect_string(b, a), "200,100,250,140");
        assert_eq!(rect_string(a, b), "200,100,250,140");
        assert_eq!(
            rect_string(PixelPoint::new(250, 100), PixelPoint::new(200, 140)),
            "200,100,250,140"
        );
    }

    #[test]
    fn test_circle_string_rounds_radius() {
        assert_eq!(circle_string(PixelPoint::new(10, 20), 4.5), "10,20,5");
        assert_eq!(circle_string(PixelPoint::new(10, 20), 4.49), "10,20,4");
        assert_eq!(circle_string(PixelPoint::new(0, 0), 0.0), "0,0,0");
    }

    #[test]
    fn test_polygon_string() {
        let pts = [
            PixelPoint::new(1, 2),
            PixelPoint::new(3, 4),
            PixelPoint::new(5, 6),
        ];
        assert_eq!(polygon_string(&pts), "1,2 3,4 5,6");
        assert_eq!(polygon_string(&[]), "");
    }

    #[test]
    fn test_parse_int_prefix() {
        assert_eq!(parse_int_prefix("42"), 42.0);
        assert_eq!(parse_int_prefix("-7"), -7.0);
        assert_eq!(parse_int_prefix("12px"), 12.0);
        assert_eq!(parse_int_prefix("3.9"), 3.0);
        assert!(parse_int_prefix("abc").is_nan());
        assert!(parse_int_prefix("-").is_nan());
    }

    #[test]
    fn test_parse_rect_normalizes() {
        let shape = parse_shape(ShapeKind::Rect, "249,138,200,110");
        assert_eq!(
            shape,
            Shape::Rect(Rect {
                x: 200.0,
                y: 110.0,
                width: 49.0,
                height: 28.0
            })
        );
    }

    #[test]
    fn test_parse_circle() {
        let shape = parse_shape(ShapeKind::Circle, "289, 203, 16");
        assert_eq!(
            shape,
            Shape::Circle(Circle {
                center: Point::new(289.0, 203.0),
                radius: 16.0
            })
        );
    }

    #[test]
    fn test_parse_polygon_pairs() {
        let Shape::Polygon(poly) = parse_shape(ShapeKind::Polygon, "10,10 40,10 25,30 99") else {
            panic!("expected polygon");
        };
        assert_eq!(
            poly.vertices,
            vec![
                Point::new(10.0, 10.0),
                Point::new(40.0, 10.0),
                Point::new(25.0, 30.0)
            ]
        );
    }

    #[test]
    fn test_malformed_rect_is_degenerate() {
        let shape = parse_shape(ShapeKind::Rect, "200,abc");
        assert!(!shape.is_finite());
        assert!(!shape.contains(Point::new(200.0, 0.0)));
    }

    #[test]
    fn test_shape_kind_serde_names() {
        let kind: ShapeKind = serde_json::from_str("\"rect\"").unwrap();
        assert_eq!(kind, ShapeKind::Rect);
        let kind: ShapeKind = serde_json::from_str("\"polygon\"").unwrap();
        assert_eq!(kind, ShapeKind::Polygon);
        assert_eq!(serde_json::to_string(&ShapeKind::Circle).unwrap(), "\"circle\"");
    }
}
