use std::path::Path;

use egui::{ColorImage, TextureOptions};

use crate::error::{AnnotatorError, Result};

/// A decoded raster image and, once uploaded, its texture.
///
/// The natural size is the only property the annotator relies on; it is known as soon
/// as decoding succeeds and never changes afterwards.
pub struct LoadedImage {
    name: String,
    pixels: image::RgbaImage,
    texture: Option<egui::TextureHandle>,
}

impl std::fmt::Debug for LoadedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedImage")
            .field("name", &self.name)
            .field("natural_size", &self.natural_size())
            .finish_non_exhaustive()
    }
}

impl LoadedImage {
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes, &path.to_string_lossy())
    }

    pub fn from_bytes(bytes: &[u8], name: &str) -> Result<Self> {
        let pixels = image::load_from_memory(bytes)
            .map_err(|source| AnnotatorError::ImageDecode {
                name: name.to_owned(),
                source,
            })?
            .to_rgba8();
        let (w, h) = pixels.dimensions();
        log::info!("loaded image '{name}' ({w}x{h})");
        Ok(Self {
            name: name.to_owned(),
            pixels,
            texture: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Natural `[width, height]` in pixels.
    pub fn natural_size(&self) -> [u32; 2] {
        let (w, h) = self.pixels.dimensions();
        [w, h]
    }

    pub fn dimensions_label(&self) -> String {
        let [w, h] = self.natural_size();
        format!("Dimensions: {w}px x {h}px")
    }

    /// Uploads the texture on first use.
    pub fn texture(&mut self, ctx: &egui::Context) -> &egui::TextureHandle {
        let Self {
            name,
            pixels,
            texture,
        } = self;
        texture.get_or_insert_with(|| {
            let size = [pixels.width() as usize, pixels.height() as usize];
            let image = ColorImage::from_rgba_unmultiplied(size, pixels.as_raw());
            ctx.load_texture(name.clone(), image, TextureOptions::LINEAR)
        })
    }
}

/// Fits `natural` into `available` keeping the aspect ratio, never upscaling past 4x.
pub fn fit_size(natural: [u32; 2], available: egui::Vec2) -> egui::Vec2 {
    let w = natural[0].max(1) as f32;
    let h = natural[1].max(1) as f32;
    let max_w = available.x.max(10.0);
    let max_h = available.y.max(10.0);
    let scale = (max_w / w).min(max_h / h).clamp(0.1, 4.0);
    egui::vec2(w * scale, h * scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut out, image::ImageOutputFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_natural_size_from_bytes() {
        let img = LoadedImage::from_bytes(&png_bytes(64, 32), "strip.png").unwrap();
        assert_eq!(img.natural_size(), [64, 32]);
        assert_eq!(img.dimensions_label(), "Dimensions: 64px x 32px");
        assert_eq!(img.name(), "strip.png");
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let err = LoadedImage::from_bytes(b"not an image", "junk.bin").unwrap_err();
        assert!(matches!(err, AnnotatorError::ImageDecode { ref name, .. } if name == "junk.bin"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = LoadedImage::from_path(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, AnnotatorError::Io(_)));
    }

    #[test]
    fn test_fit_size_keeps_aspect() {
        let size = fit_size([600, 300], egui::vec2(300.0, 300.0));
        assert_eq!(size, egui::vec2(300.0, 150.0));
    }
}
