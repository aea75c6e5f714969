//! WASM bindings for in-page conversion.
//!
//! Every export returns a JSON string so the userscript side can stay
//! schema-free.

use std::time::Duration;

use js_sys::{Function, Reflect};
use serde_json::json;
use wasm_bindgen::prelude::*;

use crate::lang::{LanguageResolver, fence_for};
use crate::markdown::{
    ConvertOptions, FetchError, FetchedImage, GlossaryPair, ImageFetcher, NoFetch,
    append_glossary, assign_labels,
};
use crate::testcase::{combine_unique, segment};

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Image fetcher backed by a synchronous JS callback.
///
/// The callback receives `(url, timeoutMs)` and returns
/// `{ok, dataUrl?, mime?, sizeBytes?, status?, error?}`.
struct JsFetcher {
    callback: Function,
}

fn field(value: &JsValue, name: &str) -> JsValue {
    Reflect::get(value, &JsValue::from_str(name)).unwrap_or(JsValue::UNDEFINED)
}

impl ImageFetcher for JsFetcher {
    fn fetch(&mut self, url: &str, timeout: Duration) -> Result<FetchedImage, FetchError> {
        let reply = self
            .callback
            .call2(
                &JsValue::NULL,
                &JsValue::from_str(url),
                &JsValue::from_f64(timeout.as_millis() as f64),
            )
            .map_err(|e| FetchError::Other(e.as_string().unwrap_or_else(|| format!("{e:?}"))))?;

        if !field(&reply, "ok").as_bool().unwrap_or(false) {
            if let Some(status) = field(&reply, "status").as_f64() {
                return Err(FetchError::Status(status as u16));
            }
            let reason = field(&reply, "error")
                .as_string()
                .unwrap_or_else(|| "fetch failed".to_string());
            return Err(FetchError::Other(reason));
        }

        let data_url = field(&reply, "dataUrl")
            .as_string()
            .ok_or_else(|| FetchError::Malformed("missing dataUrl".to_string()))?;
        let mime = field(&reply, "mime").as_string().unwrap_or_else(|| {
            data_url
                .strip_prefix("data:")
                .and_then(|rest| rest.split([';', ',']).next())
                .unwrap_or_default()
                .to_string()
        });
        let size_bytes = field(&reply, "sizeBytes")
            .as_f64()
            .map_or(data_url.len() as u64, |n| n as u64);

        Ok(FetchedImage {
            data_url,
            mime,
            size_bytes,
        })
    }
}

/// Convert an HTML fragment to Markdown.
///
/// Returns `{markdown, imageStats, imageDetails}` as JSON. When `fetcher`
/// is given, images are inlined through it.
#[wasm_bindgen]
pub fn convert_html(
    html: &str,
    base_url: Option<String>,
    fetcher: Option<Function>,
    timeout_ms: Option<u32>,
) -> Result<String, JsValue> {
    let mut options = ConvertOptions::default().with_inline_images(fetcher.is_some());
    if let Some(base) = base_url.filter(|b| !b.is_empty()) {
        options = options.with_base_url(url::Url::parse(&base).map_err(to_js_error)?);
    }
    if let Some(ms) = timeout_ms {
        options = options.with_image_timeout(Duration::from_millis(ms.into()));
    }

    let result = match fetcher {
        Some(callback) => crate::markdown::convert_html(html, &options, &mut JsFetcher { callback }),
        None => crate::markdown::convert_html(html, &options, &mut NoFetch),
    };
    serde_json::to_string(&result).map_err(to_js_error)
}

/// Link glossary terms in `markdown` and append the glossary section.
///
/// `pairs_json` is an array of `{term, body}` (or `{term, label, markdown}`).
#[wasm_bindgen]
pub fn glossary_markdown(markdown: &str, pairs_json: &str) -> Result<String, JsValue> {
    let mut pairs: Vec<GlossaryPair> = serde_json::from_str(pairs_json).map_err(to_js_error)?;
    assign_labels(&mut pairs);
    Ok(append_glossary(markdown, &pairs))
}

/// Segment a testcase blob. Returns `{cases, usedLeadingCountHeuristic}`.
#[wasm_bindgen]
pub fn segment_blob(blob: &str, names: Vec<String>) -> Result<String, JsValue> {
    serde_json::to_string(&segment(blob, &names)).map_err(to_js_error)
}

/// Unique cases from the default and custom blobs, as a JSON array.
#[wasm_bindgen]
pub fn combine_testcases(
    names: Vec<String>,
    default_blob: &str,
    custom_blob: &str,
) -> Result<String, JsValue> {
    serde_json::to_string(&combine_unique(&names, default_blob, custom_blob)).map_err(to_js_error)
}

/// Resolve an editor language. Returns `{label, fence}`.
#[wasm_bindgen]
pub fn resolve_language(
    editor_id: &str,
    explicit_label: Option<String>,
    snippet_slugs: Vec<String>,
) -> String {
    let resolver = LanguageResolver::with_snippets(snippet_slugs);
    let label = resolver.resolve_label(editor_id, explicit_label.as_deref());
    let fence = fence_for(&label);
    json!({ "label": label, "fence": fence }).to_string()
}
