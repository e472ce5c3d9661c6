use std::path::Path;

use egui::{Color32, Sense, Stroke, StrokeKind};

use crate::authoring::{DraftShape, ShapeAuthor};
use crate::coords::ShapeKind;
use crate::file_picker::FileKind;
use crate::image_source::{LoadedImage, fit_size};
use crate::mapper::ScreenTransform;

const SHAPE_STROKE: Color32 = Color32::from_rgb(255, 64, 64);
const SHAPE_FILL: Color32 = Color32::from_rgba_premultiplied(60, 15, 15, 60);
const VERTEX_RADIUS: f64 = 3.0;

/// Editor panel: upload an image, draw a shape over it, read back its coordinates.
#[derive(Default)]
pub struct EditorPanel {
    author: ShapeAuthor,
    image: Option<LoadedImage>,
    error: Option<String>,
}

impl EditorPanel {
    pub fn new(mode: ShapeKind) -> Self {
        Self {
            author: ShapeAuthor::new(mode),
            ..Default::default()
        }
    }

    pub fn mode(&self) -> ShapeKind {
        self.author.mode()
    }

    pub fn set_image(&mut self, image: LoadedImage) {
        self.image = Some(image);
        self.error = None;
        self.author.clear();
        self.author.set_image_loaded(true);
    }

    pub fn load_path(&mut self, path: &Path) {
        match LoadedImage::from_path(path) {
            Ok(img) => self.set_image(img),
            Err(e) => {
                log::warn!("{e}");
                self.error = Some(e.to_string());
            }
        }
    }

    pub fn load_bytes(&mut self, bytes: &[u8], name: &str) {
        match LoadedImage::from_bytes(bytes, name) {
            Ok(img) => self.set_image(img),
            Err(e) => {
                log::warn!("{e}");
                self.error = Some(e.to_string());
            }
        }
    }

    pub fn ui(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("editor_output").show(ctx, |ui| {
            self.output_ui(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Shape Editor");
            ui.separator();

            ui.horizontal(|ui| {
                if ui.button("Upload image...").clicked() {
                    #[cfg(not(target_arch = "wasm32"))]
                    if let Some(path) = crate::file_picker::pick_path(FileKind::EditorImage) {
                        self.load_path(&path);
                    }
                    #[cfg(target_arch = "wasm32")]
                    crate::file_picker::open_picker(FileKind::EditorImage);
                }
                if let Some(img) = &self.image {
                    ui.label(img.name());
                    ui.separator();
                    ui.label(img.dimensions_label());
                }
            });

            ui.horizontal(|ui| {
                ui.label("Shape:");
                for kind in ShapeKind::ALL {
                    let selected = self.author.mode() == kind;
                    if ui.radio(selected, kind.label()).clicked() && !selected {
                        self.author.set_mode(kind);
                    }
                }
            });

            if let Some(err) = &self.error {
                ui.colored_label(Color32::RED, err);
            }

            ui.separator();
            self.canvas_ui(ui);
        });
    }

    fn output_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Coordinates:");
            let mut shown = self.author.output();
            ui.add(egui::TextEdit::singleline(&mut shown).desired_width(360.0));
            if ui.button("Copy").clicked() {
                ui.ctx().copy_text(self.author.output().to_owned());
            }
            let finish = ui.add_enabled(
                self.author.finish_enabled(),
                egui::Button::new("Finish polygon"),
            );
            if finish.clicked() {
                self.author.finish();
            }
            if ui.button("Clear").clicked() {
                self.author.clear();
            }
        });
    }

    fn canvas_ui(&mut self, ui: &mut egui::Ui) {
        let Some(image) = &mut self.image else {
            ui.label("Upload an image to start drawing.");
            return;
        };

        let natural = image.natural_size();
        let size = fit_size(natural, ui.available_size() - egui::vec2(20.0, 20.0));
        let (response, painter) = ui.allocate_painter(size, Sense::click_and_drag());
        let transform = ScreenTransform::from_egui_rect(response.rect, natural);

        let texture = image.texture(ui.ctx());
        painter.image(
            texture.id(),
            response.rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            Color32::WHITE,
        );

        self.handle_pointer(ui, &response, &transform);
        self.paint_shape(&painter, &transform);
    }

    fn handle_pointer(
        &mut self,
        ui: &egui::Ui,
        response: &egui::Response,
        transform: &ScreenTransform,
    ) {
        let (pressed, released, pos) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.interact_pos(),
            )
        });
        let Some(pos) = pos else {
            return;
        };
        let at = transform.to_image_pixel_pos(pos);

        if pressed && response.contains_pointer() {
            self.author.pointer_down(at);
        }
        if ui.input(|i| i.pointer.is_moving()) {
            self.author.pointer_move(at);
        }
        if released {
            self.author.pointer_up(at);
        }
        if response.clicked() {
            self.author.click(at);
        }
    }

    fn paint_shape(&self, painter: &egui::Painter, transform: &ScreenTransform) {
        let stroke = Stroke::new(2.0, SHAPE_STROKE);
        match self.author.shape() {
            Some(shape @ DraftShape::Rect { .. }) => {
                if let Some(r) = shape.rect() {
                    let rect = egui::Rect::from_min_max(
                        transform.to_screen_pos(r.min()),
                        transform.to_screen_pos(r.max()),
                    );
                    painter.rect_filled(rect, 0.0, SHAPE_FILL);
                    painter.rect_stroke(rect, 0.0, stroke, StrokeKind::Middle);
                }
            }
            Some(shape @ DraftShape::Circle { .. }) => {
                if let Some(c) = shape.circle() {
                    painter.circle(
                        transform.to_screen_pos(c.center),
                        transform.scale_length(c.radius) as f32,
                        SHAPE_FILL,
                        stroke,
                    );
                }
            }
            Some(DraftShape::Polygon { .. }) => {
                let points: Vec<egui::Pos2> = self
                    .author
                    .vertex_markers()
                    .map(|p| transform.to_screen_pos(p))
                    .collect();
                if points.len() >= 2 {
                    painter.add(egui::Shape::closed_line(points.clone(), stroke));
                }
                let marker = transform.scale_length(VERTEX_RADIUS) as f32;
                for p in points {
                    painter.circle_filled(p, marker.max(2.0), SHAPE_STROKE);
                }
            }
            None => {}
        }
    }
}
