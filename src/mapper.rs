//! Mapping between screen space and the image's natural pixel space.
//!
//! The displayed image is a translated and scaled copy of the natural image, so one
//! transform serves both directions: pointer positions go screen → image, region
//! geometry goes image → screen.

use crate::geometry::{PixelPoint, Point};

/// Rounds half-way values up (`2.5 → 3`, `-2.5 → -2`).
pub fn round_half_up(v: f64) -> i64 {
    (v + 0.5).floor() as i64
}

/// Translation plus per-axis scale of the display surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTransform {
    pub origin: Point,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Default for ScreenTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ScreenTransform {
    pub const IDENTITY: Self = Self {
        origin: Point { x: 0.0, y: 0.0 },
        scale_x: 1.0,
        scale_y: 1.0,
    };

    pub fn new(origin: Point, scale_x: f64, scale_y: f64) -> Self {
        Self {
            origin,
            scale_x,
            scale_y,
        }
    }

    /// Transform that stretches an image of `natural` pixels onto a display rectangle
    /// starting at `origin` and `display` units large.
    pub fn fit(origin: Point, display: [f64; 2], natural: [u32; 2]) -> Self {
        let [w, h] = natural;
        let scale = |display: f64, natural: u32| {
            if natural == 0 {
                0.0
            } else {
                display / f64::from(natural)
            }
        };
        Self::new(origin, scale(display[0], w), scale(display[1], h))
    }

    pub fn from_egui_rect(rect: egui::Rect, natural: [u32; 2]) -> Self {
        Self::fit(
            Point::new(f64::from(rect.min.x), f64::from(rect.min.y)),
            [f64::from(rect.width()), f64::from(rect.height())],
            natural,
        )
    }

    fn inverse_axis(v: f64, origin: f64, scale: f64) -> f64 {
        if scale == 0.0 || !scale.is_finite() {
            0.0
        } else {
            (v - origin) / scale
        }
    }

    /// Exact image-space position of a screen point.
    pub fn to_image(&self, screen: Point) -> Point {
        Point::new(
            Self::inverse_axis(screen.x, self.origin.x, self.scale_x),
            Self::inverse_axis(screen.y, self.origin.y, self.scale_y),
        )
    }

    /// Image pixel under a screen point, rounded to the nearest pixel.
    pub fn to_image_pixel(&self, screen: Point) -> PixelPoint {
        let p = self.to_image(screen);
        PixelPoint::new(round_half_up(p.x), round_half_up(p.y))
    }

    pub fn to_screen(&self, image: Point) -> Point {
        Point::new(
            self.origin.x + image.x * self.scale_x,
            self.origin.y + image.y * self.scale_y,
        )
    }

    /// Scales an image-space length along x, used for circle radii.
    pub fn scale_length(&self, len: f64) -> f64 {
        len * self.scale_x
    }

    pub fn to_image_pixel_pos(&self, pos: egui::Pos2) -> PixelPoint {
        self.to_image_pixel(Point::new(f64::from(pos.x), f64::from(pos.y)))
    }

    pub fn to_image_pos(&self, pos: egui::Pos2) -> Point {
        self.to_image(Point::new(f64::from(pos.x), f64::from(pos.y)))
    }

    pub fn to_screen_pos(&self, image: Point) -> egui::Pos2 {
        let p = self.to_screen(image);
        egui::pos2(p.x as f32, p.y as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(2.49), 2);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.51), -3);
    }

    #[test]
    fn test_to_image_pixel_rounds() {
        let t = ScreenTransform::new(Point::new(10.0, 20.0), 2.0, 2.0);
        assert_eq!(
            t.to_image_pixel(Point::new(411.0, 221.0)),
            PixelPoint::new(201, 101)
        );
        assert_eq!(
            t.to_image_pixel(Point::new(410.9, 220.9)),
            PixelPoint::new(200, 100)
        );
    }

    #[test]
    fn test_non_uniform_scale() {
        let t = ScreenTransform::fit(Point::new(0.0, 0.0), [800.0, 300.0], [400, 300]);
        assert_eq!(t.scale_x, 2.0);
        assert_eq!(t.scale_y, 1.0);
        assert_eq!(
            t.to_image_pixel(Point::new(400.0, 140.0)),
            PixelPoint::new(200, 140)
        );
    }

    #[test]
    fn test_round_trip_image_to_screen() {
        let t = ScreenTransform::new(Point::new(-35.0, 12.5), 0.75, 1.25);
        let image = Point::new(250.0, 140.0);
        let screen = t.to_screen(image);
        assert_eq!(t.to_image_pixel(screen), PixelPoint::new(250, 140));
    }

    #[test]
    fn test_zero_natural_size_maps_to_origin() {
        let t = ScreenTransform::fit(Point::new(5.0, 5.0), [100.0, 100.0], [0, 0]);
        assert_eq!(t.to_image(Point::new(50.0, 50.0)), Point::new(0.0, 0.0));
    }
}
