use std::path::{Path, PathBuf};

use egui::{Color32, Sense, Stroke, StrokeKind};

use crate::error::AnnotatorError;
use crate::file_picker::FileKind;
use crate::geometry::Shape;
use crate::image_source::{LoadedImage, fit_size};
use crate::jobs::JobList;
use crate::mapper::ScreenTransform;
use crate::regions::{DetailView, PLACEHOLDER_TEXT, Region, RegionCatalog, RegionViewer};

const AREA_STROKE: Color32 = Color32::from_rgb(0, 160, 255);
const AREA_FILL: Color32 = Color32::from_rgba_premultiplied(0, 40, 64, 64);
const HIGHLIGHT_STROKE: Color32 = Color32::from_rgb(255, 200, 0);
const HIGHLIGHT_FILL: Color32 = Color32::from_rgba_premultiplied(96, 75, 0, 96);

/// Viewer panel: a fixed image with clickable regions and a details sidebar.
#[derive(Default)]
pub struct ViewerPanel {
    viewer: RegionViewer,
    image: Option<LoadedImage>,
    catalog_path: Option<String>,
    error: Option<String>,
}

impl ViewerPanel {
    pub fn new(catalog_path: Option<String>, job_tracking: bool) -> Self {
        let mut this = Self {
            viewer: RegionViewer::new(RegionCatalog::default(), job_tracking),
            ..Default::default()
        };
        match catalog_path {
            Some(path) => this.load_catalog_path(Path::new(&path)),
            None => this.load_catalog_image(None),
        }
        this
    }

    pub fn viewer(&self) -> &RegionViewer {
        &self.viewer
    }

    pub fn catalog_path(&self) -> Option<&str> {
        self.catalog_path.as_deref()
    }

    pub fn job_tracking(&self) -> bool {
        self.viewer.job_tracking()
    }

    /// Region overlays are built only here, once the natural size is known.
    pub fn set_image(&mut self, image: LoadedImage) {
        self.viewer.initialize(image.natural_size());
        self.image = Some(image);
        self.error = None;
    }

    fn set_error(&mut self, e: &AnnotatorError) {
        log::warn!("{e}");
        self.error = Some(e.to_string());
    }

    pub fn load_image_path(&mut self, path: &Path) {
        match LoadedImage::from_path(path) {
            Ok(img) => self.set_image(img),
            Err(e) => self.set_error(&e),
        }
    }

    pub fn load_image_bytes(&mut self, bytes: &[u8], name: &str) {
        match LoadedImage::from_bytes(bytes, name) {
            Ok(img) => self.set_image(img),
            Err(e) => self.set_error(&e),
        }
    }

    pub fn set_catalog(&mut self, catalog: RegionCatalog) {
        self.viewer.set_catalog(catalog);
        // Overlays need the new regions; the image itself is unchanged.
        if let Some(img) = &self.image {
            self.viewer.initialize(img.natural_size());
        }
    }

    pub fn load_catalog_path(&mut self, path: &Path) {
        match RegionCatalog::from_path(path) {
            Ok(catalog) => {
                self.catalog_path = Some(path.to_string_lossy().to_string());
                self.set_catalog(catalog);
                self.error = None;
                self.load_catalog_image(path.parent());
            }
            Err(e) => self.set_error(&e),
        }
    }

    pub fn load_catalog_bytes(&mut self, bytes: &[u8], name: &str) {
        let parsed = std::str::from_utf8(bytes)
            .map_err(AnnotatorError::from)
            .and_then(RegionCatalog::from_json_str);
        match parsed {
            Ok(catalog) => {
                log::info!("loaded {} regions from {name}", catalog.regions.len());
                self.set_catalog(catalog);
                self.error = None;
            }
            Err(e) => self.set_error(&e),
        }
    }

    /// Loads the image named by the catalog, relative to `base` when given.
    /// A missing image for the built-in catalog is not an error; the user opens one.
    fn load_catalog_image(&mut self, base: Option<&Path>) {
        let Some(image) = self.viewer.catalog().image.clone() else {
            return;
        };
        if cfg!(target_arch = "wasm32") {
            return;
        }
        let path = match base {
            Some(dir) => dir.join(&image),
            None => PathBuf::from(&image),
        };
        if base.is_none() && !path.exists() {
            log::info!("no image at {}, waiting for one to be opened", path.display());
            return;
        }
        self.load_image_path(&path);
    }

    /// Re-reads the current catalog, or restores the built-in one. Overlays are rebuilt
    /// against the image already shown.
    pub fn reload(&mut self) {
        match self.catalog_path.clone() {
            Some(p) => self.load_catalog_path(Path::new(&p)),
            None => {
                self.set_catalog(RegionCatalog::default());
                self.load_catalog_image(None);
            }
        }
    }

    pub fn ui(&mut self, ctx: &egui::Context) {
        self.notice_ui(ctx);

        egui::SidePanel::right("details_panel")
            .min_width(260.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.details_ui(ui);
                    if self.viewer.job_tracking() {
                        ui.separator();
                        self.jobs_ui(ui);
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Region Viewer");
            ui.separator();
            self.toolbar_ui(ui);
            if let Some(err) = &self.error {
                ui.colored_label(Color32::RED, err);
            }
            ui.separator();
            self.canvas_ui(ui);
        });
    }

    fn toolbar_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Catalog:");
            ui.label(self.catalog_path.as_deref().unwrap_or("(built-in)"));
            if ui.button("Open catalog...").clicked() {
                #[cfg(not(target_arch = "wasm32"))]
                if let Some(path) = crate::file_picker::pick_path(FileKind::Catalog) {
                    self.load_catalog_path(&path);
                }
                #[cfg(target_arch = "wasm32")]
                crate::file_picker::open_picker(FileKind::Catalog);
            }
            if ui.button("Open image...").clicked() {
                #[cfg(not(target_arch = "wasm32"))]
                if let Some(path) = crate::file_picker::pick_path(FileKind::ViewerImage) {
                    self.load_image_path(&path);
                }
                #[cfg(target_arch = "wasm32")]
                crate::file_picker::open_picker(FileKind::ViewerImage);
            }
            if ui.button("Reload").clicked() {
                self.reload();
            }

            ui.separator();
            let mut tracking = self.viewer.job_tracking();
            if ui.checkbox(&mut tracking, "Job tracking").changed() {
                self.viewer.set_job_tracking(tracking);
            }
        });

        if let Some(img) = &self.image {
            ui.label(format!(
                "Image Dimensions: {}px x {}px",
                img.natural_size()[0],
                img.natural_size()[1]
            ));
        }
    }

    fn canvas_ui(&mut self, ui: &mut egui::Ui) {
        let Some(image) = &mut self.image else {
            ui.label("Open an image to show its regions.");
            return;
        };
        let natural = image.natural_size();
        let size = fit_size(natural, ui.available_size() - egui::vec2(20.0, 20.0));
        let (response, painter) = ui.allocate_painter(size, Sense::click());
        let transform = ScreenTransform::from_egui_rect(response.rect, natural);

        let texture = image.texture(ui.ctx());
        painter.image(
            texture.id(),
            response.rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            Color32::WHITE,
        );

        let highlighted = self.viewer.highlighted();
        for (i, overlay) in self.viewer.overlays().iter().enumerate() {
            paint_overlay(&painter, &transform, &overlay.shape, highlighted == Some(i));
        }

        if let Some(pos) = response.hover_pos() {
            if self.viewer.hit_test(transform.to_image_pos(pos)).is_some() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
            }
        }
        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.viewer.click(transform.to_image_pos(pos));
            }
        }
    }

    fn details_ui(&mut self, ui: &mut egui::Ui) {
        let region = match self.viewer.detail() {
            DetailView::Region(_) => self.viewer.selected_region().cloned(),
            DetailView::Placeholder => None,
        };
        let Some(region) = region else {
            ui.label(PLACEHOLDER_TEXT);
            return;
        };

        region_details(ui, &region);
        if self.viewer.job_tracking()
            && ui.button("Add to jobs").clicked()
            && self.viewer.add_selected_job().is_err()
        {
            log::debug!("job add rejected for {}", region.id);
        }
    }

    fn jobs_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading("Jobs");
        let Some(jobs) = self.viewer.jobs() else {
            return;
        };
        if jobs.is_empty() {
            ui.label("No jobs yet.");
            return;
        }

        let mut cancel = None;
        egui::Grid::new("job_list")
            .striped(true)
            .num_columns(5)
            .show(ui, |ui| {
                ui.strong("Part");
                ui.strong("Hours");
                ui.strong("Price");
                ui.strong("Components");
                ui.label("");
                ui.end_row();

                for job in jobs {
                    ui.label(&job.name);
                    ui.label(format_opt(job.hours, ""));
                    ui.label(format_opt(job.price, "$"));
                    ui.label(job.components.join(", "));
                    if ui.small_button("Cancel").clicked() {
                        cancel = Some(job.id.clone());
                    }
                    ui.end_row();
                }
            });
        totals_ui(ui, jobs);

        if let Some(id) = cancel {
            self.viewer.cancel_job(&id);
        }
    }

    fn notice_ui(&mut self, ctx: &egui::Context) {
        let Some(message) = self.viewer.notice().map(str::to_owned) else {
            return;
        };
        let modal = egui::Modal::new(egui::Id::new("job_notice")).show(ctx, |ui| {
            ui.label(message);
            ui.add_space(8.0);
            ui.button("OK").clicked()
        });
        if modal.inner || modal.should_close() {
            self.viewer.dismiss_notice();
        }
    }
}

fn region_details(ui: &mut egui::Ui, region: &Region) {
    ui.heading(&region.name);
    if !region.description.is_empty() {
        ui.label(&region.description);
    }
    if region.hours.is_some() || region.price.is_some() {
        ui.add_space(4.0);
        ui.label(format!("Hours: {}", format_opt(region.hours, "")));
        ui.label(format!("Price: {}", format_opt(region.price, "$")));
    }
    if !region.components.is_empty() {
        ui.add_space(4.0);
        ui.label("Components:");
        for c in &region.components {
            ui.label(format!("• {c}"));
        }
    }
}

fn totals_ui(ui: &mut egui::Ui, jobs: &JobList) {
    ui.separator();
    ui.horizontal(|ui| {
        ui.strong(format!("Total hours: {:.1}", jobs.total_hours()));
        ui.separator();
        ui.strong(format!("Total price: ${:.2}", jobs.total_price()));
    });
}

fn format_opt(value: Option<f64>, prefix: &str) -> String {
    value.map_or_else(|| "-".to_owned(), |v| format!("{prefix}{v:.2}"))
}

fn paint_overlay(
    painter: &egui::Painter,
    transform: &ScreenTransform,
    shape: &Shape,
    highlighted: bool,
) {
    // Malformed coordinate strings leave NaN fields; those shapes draw nothing.
    if !shape.is_finite() {
        return;
    }
    let (fill, stroke) = if highlighted {
        (HIGHLIGHT_FILL, Stroke::new(3.0, HIGHLIGHT_STROKE))
    } else {
        (AREA_FILL, Stroke::new(1.5, AREA_STROKE))
    };
    match shape {
        Shape::Rect(r) => {
            let rect = egui::Rect::from_min_max(
                transform.to_screen_pos(r.min()),
                transform.to_screen_pos(r.max()),
            );
            painter.rect_filled(rect, 0.0, fill);
            painter.rect_stroke(rect, 0.0, stroke, StrokeKind::Middle);
        }
        Shape::Circle(c) => {
            painter.circle(
                transform.to_screen_pos(c.center),
                transform.scale_length(c.radius) as f32,
                fill,
                stroke,
            );
        }
        Shape::Polygon(poly) => {
            let points = poly
                .vertices
                .iter()
                .map(|p| transform.to_screen_pos(*p))
                .collect();
            painter.add(egui::Shape::closed_line(points, stroke));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_opt() {
        assert_eq!(format_opt(Some(120.0), "$"), "$120.00");
        assert_eq!(format_opt(None, "$"), "-");
        assert_eq!(format_opt(Some(1.5), ""), "1.50");
    }

    #[test]
    fn test_catalog_bytes_replace_regions() {
        let mut panel = ViewerPanel::default();
        let json = br#"{"regions": [{"id": "x", "name": "X", "shape": "circle", "coords": "5,5,2"}]}"#;
        panel.load_catalog_bytes(json, "x.json");
        assert_eq!(panel.viewer().catalog().regions.len(), 1);
        assert!(panel.error.is_none());

        panel.load_catalog_bytes(b"{oops", "bad.json");
        assert!(panel.error.as_deref().is_some_and(|e| e.starts_with("Invalid region catalog")));
        assert_eq!(panel.viewer().catalog().regions.len(), 1);

        panel.load_catalog_bytes(&[0xff, 0xfe, 0x00], "binary.json");
        assert!(panel.error.as_deref().is_some_and(|e| e.starts_with("Invalid UTF-8")));
    }

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(w, h, image::Rgba([200, 200, 200, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut out, image::ImageOutputFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_image_load_initializes_overlays() {
        let mut panel = ViewerPanel::new(None, true);
        assert!(!panel.viewer().is_initialized());

        panel.load_image_bytes(&png_bytes(600, 300), "coach.png");
        assert!(panel.error.is_none());
        assert_eq!(panel.viewer().natural_size(), Some([600, 300]));
        assert_eq!(panel.viewer().overlays().len(), 5);
    }

    #[test]
    fn test_catalog_swap_reinitializes_against_shown_image() {
        let mut panel = ViewerPanel::new(None, false);
        panel.load_image_bytes(&png_bytes(100, 100), "door.png");

        let json = br#"{"regions": [
            {"id": "a", "name": "A", "shape": "rect", "coords": "0,0,10,10"},
            {"id": "b", "name": "B", "shape": "circle", "coords": "50,50,5"}
        ]}"#;
        panel.load_catalog_bytes(json, "door.json");
        assert!(panel.viewer().is_initialized());
        assert_eq!(panel.viewer().overlays().len(), 2);
        assert_eq!(panel.viewer().natural_size(), Some([100, 100]));
    }

    #[test]
    fn test_reload_builtin_keeps_overlays() {
        let mut panel = ViewerPanel::new(None, true);
        panel.load_image_bytes(&png_bytes(600, 300), "coach.png");
        let before = panel.viewer().overlays().to_vec();

        panel.reload();
        assert!(panel.image.is_some());
        assert!(panel.viewer().is_initialized());
        assert_eq!(panel.viewer().overlays(), before.as_slice());
        assert_eq!(panel.viewer().overlays().len(), 5);
    }

    #[test]
    fn test_missing_builtin_image_is_not_an_error() {
        let panel = ViewerPanel::new(None, false);
        if !Path::new(crate::regions::DEFAULT_IMAGE_PATH).exists() {
            assert!(panel.error.is_none());
            assert!(panel.image.is_none());
        }
    }
}
