use crate::coords::ShapeKind;
use crate::editor::EditorPanel;
use crate::viewer::ViewerPanel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
pub enum Tab {
    #[default]
    Editor,
    Viewer,
}

/// We derive Deserialize/Serialize so preferences survive restarts.
/// Authored shapes and jobs are deliberately left out.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct RegionApp {
    tab: Tab,
    shape_mode: ShapeKind,
    job_tracking: bool,
    catalog_path: Option<String>,

    #[serde(skip)]
    editor: EditorPanel,

    #[serde(skip)]
    viewer: ViewerPanel,
}

impl Default for RegionApp {
    fn default() -> Self {
        Self {
            tab: Tab::Editor,
            shape_mode: ShapeKind::Rect,
            job_tracking: true,
            catalog_path: None,
            editor: EditorPanel::default(),
            viewer: ViewerPanel::default(),
        }
    }
}

impl RegionApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Note that you must enable the `persistence` feature for this to work.
        let this: Self = if let Some(storage) = cc.storage {
            eframe::get_value(storage, eframe::APP_KEY).unwrap_or_default()
        } else {
            Default::default()
        };

        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        this.with_panels()
    }

    /// Builds the editor and viewer from the persisted preferences.
    pub fn with_panels(mut self) -> Self {
        self.editor = EditorPanel::new(self.shape_mode);
        self.viewer = ViewerPanel::new(self.catalog_path.clone(), self.job_tracking);
        self
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    fn sync_preferences(&mut self) {
        self.shape_mode = self.editor.mode();
        self.job_tracking = self.viewer.job_tracking();
        self.catalog_path = self.viewer.catalog_path().map(str::to_owned);
    }

    #[cfg(target_arch = "wasm32")]
    fn poll_picked_file(&mut self) {
        use crate::file_picker::{FileKind, take_picked_file};

        let Some(file) = take_picked_file() else {
            return;
        };
        match file.kind {
            FileKind::EditorImage => self.editor.load_bytes(&file.bytes, &file.name),
            FileKind::ViewerImage => self.viewer.load_image_bytes(&file.bytes, &file.name),
            FileKind::Catalog => self.viewer.load_catalog_bytes(&file.bytes, &file.name),
        }
    }
}

impl eframe::App for RegionApp {
    /// Called by the framework to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.sync_preferences();
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        #[cfg(target_arch = "wasm32")]
        {
            self.poll_picked_file();
            // The picker delivers asynchronously; keep polling while idle.
            ctx.request_repaint_after(std::time::Duration::from_millis(250));
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                // NOTE: no File->Quit on web pages!
                let is_web = cfg!(target_arch = "wasm32");
                if !is_web {
                    ui.menu_button("File", |ui| {
                        if ui.button("Quit").clicked() {
                            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                    ui.add_space(16.0);
                }

                ui.selectable_value(&mut self.tab, Tab::Editor, "Editor");
                ui.selectable_value(&mut self.tab, Tab::Viewer, "Viewer");
                ui.add_space(16.0);

                egui::widgets::global_theme_preference_buttons(ui);
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                powered_by_egui_and_eframe(ui);
                egui::warn_if_debug_build(ui);
            });
        });

        match self.tab {
            Tab::Editor => self.editor.ui(ctx),
            Tab::Viewer => self.viewer.ui(ctx),
        }
    }
}

fn powered_by_egui_and_eframe(ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        ui.label("Powered by ");
        ui.hyperlink_to("egui", "https://github.com/emilk/egui");
        ui.label(" and ");
        ui.hyperlink_to(
            "eframe",
            "https://github.com/emilk/egui/tree/master/crates/eframe",
        );
        ui.label(".");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferences_round_trip() {
        let mut app = RegionApp {
            tab: Tab::Viewer,
            shape_mode: ShapeKind::Polygon,
            job_tracking: false,
            ..Default::default()
        }
        .with_panels();
        app.sync_preferences();
        let json = serde_json::to_string(&app).unwrap();
        let restored: RegionApp = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.tab(), Tab::Viewer);
        assert_eq!(restored.shape_mode, ShapeKind::Polygon);
        assert!(!restored.job_tracking);
    }

    #[test]
    fn test_old_state_gets_defaults() {
        let restored: RegionApp = serde_json::from_str(r#"{"tab": "Viewer"}"#).unwrap();
        assert_eq!(restored.tab(), Tab::Viewer);
        assert_eq!(restored.shape_mode, ShapeKind::Rect);
        assert!(restored.job_tracking);
    }
}
