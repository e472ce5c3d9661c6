//! Shape authoring: the editor's drawing state machine, kept free of any UI so it can
//! be driven by pointer events from egui or from tests.
//!
//! Rectangles and circles are dragged out from an anchor; polygons collect one vertex
//! per click and are serialized on an explicit finish.

use crate::coords::{self, ShapeKind};
use crate::geometry::{Circle, PixelPoint, Point, Polygon, Rect};

/// What the editor is currently doing with the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthoringState {
    #[default]
    Idle,
    Dragging { anchor: PixelPoint },
    CollectingPoints,
}

/// The shape currently on the canvas, in image pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftShape {
    Rect { anchor: PixelPoint, corner: PixelPoint },
    Circle { center: PixelPoint, radius: f64 },
    Polygon { points: Vec<PixelPoint> },
}

impl DraftShape {
    pub fn rect(&self) -> Option<Rect> {
        match self {
            Self::Rect { anchor, corner } => {
                Some(Rect::from_corners(anchor.to_point(), corner.to_point()))
            }
            _ => None,
        }
    }

    pub fn circle(&self) -> Option<Circle> {
        match self {
            Self::Circle { center, radius } => Some(Circle {
                center: center.to_point(),
                radius: *radius,
            }),
            _ => None,
        }
    }

    pub fn polygon(&self) -> Option<Polygon> {
        match self {
            Self::Polygon { points } => Some(Polygon::new(
                points.iter().map(|p| p.to_point()).collect(),
            )),
            _ => None,
        }
    }

    fn serialize(&self) -> String {
        match self {
            Self::Rect { anchor, corner } => coords::rect_string(*anchor, *corner),
            Self::Circle { center, radius } => coords::circle_string(*center, *radius),
            Self::Polygon { points } => coords::polygon_string(points),
        }
    }
}

/// Minimum number of vertices before a polygon can be finished.
pub const MIN_POLYGON_POINTS: usize = 3;

/// Editor state owned by the app and passed to the pointer handlers.
#[derive(Debug, Clone, Default)]
pub struct ShapeAuthor {
    mode: ShapeKind,
    state: AuthoringState,
    shape: Option<DraftShape>,
    polygon_points: Vec<PixelPoint>,
    output: String,
    image_loaded: bool,
}

impl ShapeAuthor {
    pub fn new(mode: ShapeKind) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn mode(&self) -> ShapeKind {
        self.mode
    }

    pub fn state(&self) -> AuthoringState {
        self.state
    }

    pub fn shape(&self) -> Option<&DraftShape> {
        self.shape.as_ref()
    }

    pub fn polygon_points(&self) -> &[PixelPoint] {
        &self.polygon_points
    }

    /// The serialized coordinate string; empty until a shape is emitted.
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn is_image_loaded(&self) -> bool {
        self.image_loaded
    }

    /// Drawing is ignored until an image is set.
    pub fn set_image_loaded(&mut self, loaded: bool) {
        self.image_loaded = loaded;
        if !loaded {
            self.clear();
        }
    }

    pub fn finish_enabled(&self) -> bool {
        self.mode == ShapeKind::Polygon && self.polygon_points.len() >= MIN_POLYGON_POINTS
    }

    /// Switches the drawing mode. Always clears, even when the mode is unchanged.
    pub fn set_mode(&mut self, mode: ShapeKind) {
        log::debug!("shape mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        self.clear();
    }

    /// Drops the current shape, the polygon vertices and the output.
    pub fn clear(&mut self) {
        self.shape = None;
        self.polygon_points.clear();
        self.output.clear();
        self.state = AuthoringState::Idle;
    }

    pub fn pointer_down(&mut self, at: PixelPoint) {
        if !self.image_loaded {
            return;
        }
        self.shape = match self.mode {
            ShapeKind::Rect => Some(DraftShape::Rect {
                anchor: at,
                corner: at,
            }),
            ShapeKind::Circle => Some(DraftShape::Circle {
                center: at,
                radius: 0.0,
            }),
            ShapeKind::Polygon => return,
        };
        self.state = AuthoringState::Dragging { anchor: at };
    }

    pub fn pointer_move(&mut self, at: PixelPoint) {
        let AuthoringState::Dragging { anchor } = self.state else {
            return;
        };
        match &mut self.shape {
            Some(DraftShape::Rect { corner, .. }) => *corner = at,
            Some(DraftShape::Circle { radius, .. }) => {
                *radius = anchor.to_point().distance_to(&at.to_point());
            }
            _ => {}
        }
    }

    /// Ends a drag and emits the shape's coordinate string.
    pub fn pointer_up(&mut self, at: PixelPoint) {
        if !self.image_loaded || !matches!(self.state, AuthoringState::Dragging { .. }) {
            return;
        }
        self.pointer_move(at);
        self.state = AuthoringState::Idle;
        if let Some(shape) = &self.shape {
            self.output = shape.serialize();
            log::debug!("emitted {:?} coordinates {}", self.mode, self.output);
        }
    }

    /// Appends a polygon vertex.
    pub fn click(&mut self, at: PixelPoint) {
        if !self.image_loaded || self.mode != ShapeKind::Polygon {
            return;
        }
        self.polygon_points.push(at);
        self.shape = Some(DraftShape::Polygon {
            points: self.polygon_points.clone(),
        });
        self.state = AuthoringState::CollectingPoints;
    }

    /// Serializes the polygon. Vertices are kept, so more can be added afterwards.
    pub fn finish(&mut self) -> bool {
        if !self.finish_enabled() {
            return false;
        }
        self.output = coords::polygon_string(&self.polygon_points);
        log::debug!("polygon finished with {} points", self.polygon_points.len());
        true
    }

    /// Vertex markers drawn at each collected polygon point.
    pub fn vertex_markers(&self) -> impl Iterator<Item = Point> + '_ {
        self.polygon_points.iter().map(|p| p.to_point())
    }
}
