//! Image-space geometry: points, the three region shapes and point containment.
//!
//! All values are in the image's natural pixel space. Coordinates are `f64` so that
//! malformed input can be carried as NaN: a shape with a NaN field contains no point
//! and draws as nothing.

/// A point in image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A whole-pixel point, as produced by pointer mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelPoint {
    pub x: i64,
    pub y: i64,
}

impl PixelPoint {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    pub fn to_point(self) -> Point {
        Point::new(self.x as f64, self.y as f64)
    }
}

/// Axis-aligned rectangle with a non-negative size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Builds the rectangle spanned by two opposite corners, in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    pub fn min(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn max(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height)
    }

    /// Edges count as inside.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    pub fn contains(&self, p: Point) -> bool {
        self.radius >= 0.0 && self.center.distance_to(&p) <= self.radius
    }
}

/// Closed polygon; the last vertex connects back to the first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    pub vertices: Vec<Point>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    /// Even-odd ray casting. Polygons with fewer than three vertices enclose nothing.
    pub fn contains(&self, p: Point) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }

        let mut inside = false;
        let mut prev = n - 1;
        for (i, vi) in self.vertices.iter().enumerate() {
            let Some(vj) = self.vertices.get(prev) else {
                break;
            };
            if (vi.y > p.y) != (vj.y > p.y)
                && p.x < (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x
            {
                inside = !inside;
            }
            prev = i;
        }
        inside
    }
}

/// Geometry of one region overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect(Rect),
    Circle(Circle),
    Polygon(Polygon),
}

impl Shape {
    pub fn contains(&self, p: Point) -> bool {
        match self {
            Self::Rect(r) => r.contains(p),
            Self::Circle(c) => c.contains(p),
            Self::Polygon(poly) => poly.contains(p),
        }
    }

    /// True when every field is a finite number, i.e. the shape can be drawn.
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Rect(r) => [r.x, r.y, r.width, r.height].iter().all(|v| v.is_finite()),
            Self::Circle(c) => [c.center.x, c.center.y, c.radius].iter().all(|v| v.is_finite()),
            Self::Polygon(poly) => poly
                .vertices
                .iter()
                .all(|v| v.x.is_finite() && v.y.is_finite()),
        }
    }
}
