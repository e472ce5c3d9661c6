//! Region annotator: draw rectangles, circles and polygons over an image to get their
//! pixel coordinates, and view predefined clickable regions with their details.

#![warn(clippy::all, rust_2018_idioms)]

mod app;
pub mod authoring;
pub mod coords;
pub mod editor;
pub mod error;
pub mod file_picker;
pub mod geometry;
pub mod image_source;
pub mod jobs;
pub mod mapper;
pub mod regions;
pub mod viewer;

pub use app::{RegionApp, Tab};
pub use error::AnnotatorError;

#[cfg(not(target_arch = "wasm32"))]
impl RegionApp {
    /// Run the app natively with the provided options.
    pub fn run(options: eframe::NativeOptions) -> Result<(), eframe::Error> {
        eframe::run_native(
            "Region Annotator",
            options,
            Box::new(|cc| Ok(Box::new(RegionApp::new(cc)))),
        )
    }
}
