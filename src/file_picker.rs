// Cross-platform file picking. Native builds open an rfd dialog and hand back a path;
// on wasm a hidden <input type=file> reads the bytes, which the app polls once per frame.

/// What the user is picking a file for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Image to annotate in the editor.
    EditorImage,
    /// Image shown behind the viewer's regions.
    ViewerImage,
    /// Region catalog JSON.
    Catalog,
}

impl FileKind {
    pub fn filter(self) -> (&'static str, &'static [&'static str]) {
        match self {
            Self::EditorImage | Self::ViewerImage => ("Image", &["png", "jpg", "jpeg"]),
            Self::Catalog => ("Region catalog", &["json"]),
        }
    }

    /// Value for the web input's `accept` attribute.
    pub fn accept(self) -> &'static str {
        match self {
            Self::EditorImage | Self::ViewerImage => "image/png,image/jpeg",
            Self::Catalog => "application/json,.json",
        }
    }
}

/// File contents delivered by the web picker.
#[derive(Debug, Clone)]
pub struct PickedFile {
    pub kind: FileKind,
    pub name: String,
    pub bytes: Vec<u8>,
}

#[cfg(not(target_arch = "wasm32"))]
pub fn pick_path(kind: FileKind) -> Option<std::path::PathBuf> {
    let (label, extensions) = kind.filter();
    rfd::FileDialog::new()
        .add_filter(label, extensions)
        .pick_file()
}

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{FileKind, PickedFile};
    use js_sys::Uint8Array;
    use once_cell::sync::Lazy;
    use std::sync::Mutex;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::JsValue;
    use wasm_bindgen::closure::Closure;
    use web_sys::{FileReader, HtmlInputElement};

    static PICKED: Lazy<Mutex<Option<PickedFile>>> = Lazy::new(|| Mutex::new(None));

    pub fn open_picker(kind: FileKind) {
        log::debug!("file_picker: open_picker({kind:?})");
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        // Kept off-screen rather than display:none; some browsers block clicks on hidden inputs.
        let Some(input) = document
            .create_element("input")
            .ok()
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        else {
            return;
        };
        input.set_type("file");
        input.set_accept(kind.accept());
        let _ = input.set_attribute(
            "style",
            "position: fixed; left: -9999px; width: 1px; height: 1px; opacity: 0;",
        );
        if let Some(body) = document.body() {
            let _ = body.append_child(&input);
        }

        let onchange = Closure::wrap(Box::new(move |ev: web_sys::Event| {
            let Some(input) = ev
                .target()
                .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
            else {
                return;
            };
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            let Ok(reader) = FileReader::new() else {
                log::warn!("file_picker: FileReader unavailable");
                return;
            };
            let reader2 = reader.clone();
            let name = file.name();
            let onload = Closure::once(Box::new(move |_e: JsValue| {
                let Ok(result) = reader2.result() else {
                    return;
                };
                let bytes = Uint8Array::new(&result).to_vec();
                if let Ok(mut slot) = PICKED.lock() {
                    *slot = Some(PickedFile { kind, name, bytes });
                }
            }) as Box<dyn FnOnce(_)>);
            reader.set_onload(Some(onload.as_ref().unchecked_ref()));
            onload.forget();
            let _ = reader.read_as_array_buffer(&file);
            input.remove();
        }) as Box<dyn FnMut(_)>);

        input.set_onchange(Some(onchange.as_ref().unchecked_ref()));
        onchange.forget();

        input.click();
    }

    pub fn take_picked_file() -> Option<PickedFile> {
        PICKED.lock().ok()?.take()
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::{open_picker, take_picked_file};
