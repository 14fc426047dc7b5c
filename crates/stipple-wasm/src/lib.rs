use stipple_core::{EncodedImage, NoiseParameters, OutputFormat};
use wasm_bindgen::prelude::*;

/// An encoded image handed back to the page for preview or download.
#[wasm_bindgen]
pub struct GeneratedImage {
    inner: EncodedImage,
    file_name: String,
}

#[wasm_bindgen]
impl GeneratedImage {
    /// Encoded bytes (copied into a `Uint8Array`).
    #[wasm_bindgen(getter)]
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.bytes.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    #[wasm_bindgen(getter, js_name = mimeType)]
    pub fn mime_type(&self) -> String {
        self.inner.mime_type().to_string()
    }

    #[wasm_bindgen(getter, js_name = fileName)]
    pub fn file_name(&self) -> String {
        self.file_name.clone()
    }
}

/// Generate an image from a (possibly partial) parameters JSON document.
#[wasm_bindgen]
pub fn generate(params_json: &str) -> Result<GeneratedImage, JsValue> {
    generate_native(params_json).map_err(|e| JsValue::from_str(&e))
}

/// Default parameters with a seed taken from the page clock.
#[wasm_bindgen(js_name = defaultParams)]
pub fn default_params() -> Result<String, JsValue> {
    default_params_json(js_sys::Date::now()).map_err(|e| JsValue::from_str(&e))
}

/// MIME type for a format label ("png", "jpeg", "webp").
#[wasm_bindgen(js_name = mimeType)]
pub fn mime_type(format: &str) -> Result<String, JsValue> {
    format
        .parse::<OutputFormat>()
        .map(|f| f.mime_type().to_string())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn generate_native(params_json: &str) -> Result<GeneratedImage, String> {
    let params = NoiseParameters::from_json(params_json).map_err(|e| e.to_string())?;
    let inner = stipple_core::generate(&params).map_err(|e| e.to_string())?;
    Ok(GeneratedImage { inner, file_name: params.suggested_file_name() })
}

fn seed_from_millis(now_ms: f64) -> u32 {
    if now_ms.is_finite() && now_ms >= 0.0 {
        (now_ms as u64 % 100_000) as u32
    } else {
        0
    }
}

fn default_params_json(now_ms: f64) -> Result<String, String> {
    let params = NoiseParameters { seed: seed_from_millis(now_ms), ..NoiseParameters::default() };
    params.to_json_pretty().map_err(|e| e.to_string())
}
