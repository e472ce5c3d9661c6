//! Named regions over a fixed image: the catalog they come from, their overlays,
//! and the viewer state that hit-tests clicks and tracks the highlighted region.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::coords::{self, ShapeKind};
use crate::error::{AnnotatorError, Result};
use crate::geometry::{Point, Shape};
use crate::jobs::{JobError, JobList};

pub const PLACEHOLDER_TEXT: &str = "Click on a part to see its details.";

/// One named area of interest, in image pixel coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub shape: ShapeKind,
    pub coords: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<String>,
}

/// The fixed configuration a viewer is built from: an image and its regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionCatalog {
    #[serde(default)]
    pub image: Option<String>,
    pub regions: Vec<Region>,
}

pub const DEFAULT_IMAGE_PATH: &str = "assets/coach.png";

fn part(
    id: &str,
    name: &str,
    description: &str,
    shape: ShapeKind,
    coords: &str,
    (hours, price): (f64, f64),
    components: &[&str],
) -> Region {
    Region {
        id: id.to_owned(),
        name: name.to_owned(),
        description: description.to_owned(),
        shape,
        coords: coords.to_owned(),
        hours: Some(hours),
        price: Some(price),
        components: components.iter().map(|c| (*c).to_owned()).collect(),
    }
}

impl Default for RegionCatalog {
    fn default() -> Self {
        const WINDOW: &str = "Standard passenger viewing window, double-paned for insulation.";
        const WINDOW_PARTS: &[&str] = &["Outer pane", "Inner pane", "Rubber seal"];
        Self {
            image: Some(DEFAULT_IMAGE_PATH.to_owned()),
            regions: vec![
                part("part-window-1", "Passenger Window 1", WINDOW, ShapeKind::Rect, "200,110,249,138", (1.5, 120.0), WINDOW_PARTS),
                part("part-window-2", "Passenger Window 2", WINDOW, ShapeKind::Rect, "260,111,308,139", (1.5, 120.0), WINDOW_PARTS),
                part("part-window-3", "Passenger Window 3", WINDOW, ShapeKind::Rect, "320,109,371,140", (1.5, 120.0), WINDOW_PARTS),
                part("part-window-4", "Passenger Window 4", WINDOW, ShapeKind::Rect, "380,110,430,138", (1.5, 120.0), WINDOW_PARTS),
                part(
                    "wheel-1",
                    "Front Wheel",
                    "The front wheel of the train coach, essential for movement.",
                    ShapeKind::Circle,
                    "289,203,16",
                    (4.0, 450.0),
                    &["Wheel rim", "Axle bearing", "Brake shoe"],
                ),
            ],
        }
    }
}

impl RegionCatalog {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.check_unique_ids()?;
        Ok(catalog)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&json)?;
        log::info!(
            "loaded {} regions from {}",
            catalog.regions.len(),
            path.display()
        );
        Ok(catalog)
    }

    fn check_unique_ids(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for r in &self.regions {
            if !seen.insert(r.id.as_str()) {
                return Err(AnnotatorError::DuplicateRegion(r.id.clone()));
            }
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }
}

/// A region's geometry rebuilt from its coordinate string, ready to draw and hit-test.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub region_id: String,
    pub shape: Shape,
}

impl Overlay {
    pub fn from_region(region: &Region) -> Self {
        Self {
            region_id: region.id.clone(),
            shape: coords::parse_shape(region.shape, &region.coords),
        }
    }
}

/// What the detail panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailView {
    #[default]
    Placeholder,
    Region(usize),
}

/// Viewer state: overlays, the single highlighted region and the optional job list.
#[derive(Debug, Clone, Default)]
pub struct RegionViewer {
    catalog: RegionCatalog,
    overlays: Vec<Overlay>,
    natural_size: Option<[u32; 2]>,
    detail: DetailView,
    jobs: Option<JobList>,
    notice: Option<String>,
}

impl RegionViewer {
    pub fn new(catalog: RegionCatalog, job_tracking: bool) -> Self {
        Self {
            catalog,
            jobs: job_tracking.then(JobList::new),
            ..Default::default()
        }
    }

    pub fn catalog(&self) -> &RegionCatalog {
        &self.catalog
    }

    /// Swaps the catalog. Overlays are dropped until the next `initialize`.
    pub fn set_catalog(&mut self, catalog: RegionCatalog) {
        self.catalog = catalog;
        self.overlays.clear();
        self.natural_size = None;
        self.detail = DetailView::Placeholder;
        if let Some(jobs) = &mut self.jobs {
            jobs.clear();
        }
    }

    /// Builds one overlay per region, in catalog order, once the image size is known.
    /// Calling it again rebuilds identical overlays and resets the selection.
    pub fn initialize(&mut self, natural_size: [u32; 2]) {
        self.overlays = self.catalog.regions.iter().map(Overlay::from_region).collect();
        self.natural_size = Some(natural_size);
        self.detail = DetailView::Placeholder;
        log::debug!(
            "viewer initialized: {} overlays over {}x{}",
            self.overlays.len(),
            natural_size[0],
            natural_size[1]
        );
    }

    pub fn is_initialized(&self) -> bool {
        self.natural_size.is_some()
    }

    pub fn natural_size(&self) -> Option<[u32; 2]> {
        self.natural_size
    }

    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    /// Index of the topmost overlay containing `p`. Later overlays draw on top.
    pub fn hit_test(&self, p: Point) -> Option<usize> {
        self.overlays.iter().rposition(|o| o.shape.contains(p))
    }

    /// Handles a click at image position `p`: highlights the hit region or reverts to
    /// the placeholder. Ignored before `initialize`.
    pub fn click(&mut self, p: Point) -> Option<&Region> {
        if !self.is_initialized() {
            return None;
        }
        self.detail = DetailView::Placeholder;
        let index = self.hit_test(p)?;
        self.detail = DetailView::Region(index);
        let region = self.catalog.regions.get(index);
        if let Some(r) = region {
            log::debug!("region hit: {}", r.id);
        }
        region
    }

    pub fn highlighted(&self) -> Option<usize> {
        match self.detail {
            DetailView::Region(i) => Some(i),
            DetailView::Placeholder => None,
        }
    }

    pub fn detail(&self) -> DetailView {
        self.detail
    }

    pub fn selected_region(&self) -> Option<&Region> {
        self.highlighted().and_then(|i| self.catalog.regions.get(i))
    }

    pub fn job_tracking(&self) -> bool {
        self.jobs.is_some()
    }

    /// Turning tracking off discards the current job list.
    pub fn set_job_tracking(&mut self, enabled: bool) {
        if enabled == self.job_tracking() {
            return;
        }
        self.jobs = enabled.then(JobList::new);
    }

    pub fn jobs(&self) -> Option<&JobList> {
        self.jobs.as_ref()
    }

    /// Adds the highlighted region to the job list. A duplicate raises a notice.
    pub fn add_selected_job(&mut self) -> std::result::Result<(), JobError> {
        let Some(index) = self.highlighted() else {
            return Ok(());
        };
        let (Some(jobs), Some(region)) = (&mut self.jobs, self.catalog.regions.get(index)) else {
            return Ok(());
        };
        let result = jobs.add(region);
        if let Err(e) = &result {
            self.notice = Some(e.to_string());
        }
        result
    }

    pub fn cancel_job(&mut self, id: &str) {
        if let Some(jobs) = &mut self.jobs {
            jobs.remove(id);
        }
    }

    /// Pending blocking notice, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}
