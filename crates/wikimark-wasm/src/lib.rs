use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use wikimark_core::{Article, HtmlEmitOptions, OutlineEntry};

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderOptions {
    heading_ids: Option<bool>,
    sanitized: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderResult {
    html: String,
    diagnostics: Vec<JsDiagnostic>,
    outline: Vec<OutlineEntry>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsDiagnostic {
    code: String,
    message: String,
    range: JsRange,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsRange {
    start_line: usize,
    start_col: usize,
    end_line: usize,
    end_col: usize,
}

/// Renders markup for the read view: `{ html, diagnostics, outline }`.
#[wasm_bindgen]
pub fn render_html(source: &str, options: JsValue) -> Result<JsValue, JsValue> {
    let options = options_from_js(options)?;
    let parsed = wikimark_core::parse(source);
    let emit_options = HtmlEmitOptions {
        heading_ids: options.heading_ids.unwrap_or(false),
    };
    let html = if options.sanitized.unwrap_or(false) {
        wikimark_core::emit_html_sanitized_with_options(&parsed.document, &emit_options)
    } else {
        wikimark_core::emit_html_with_options(&parsed.document, &emit_options)
    };

    let diagnostics = parsed
        .diagnostics
        .iter()
        .map(|diag| {
            let range = parsed.source_map.range(diag.span);
            JsDiagnostic {
                code: diag.code.to_string(),
                message: diag.message.clone(),
                range: JsRange {
                    start_line: range.start.line,
                    start_col: range.start.character,
                    end_line: range.end.line,
                    end_col: range.end.character,
                },
            }
        })
        .collect();

    let result = RenderResult {
        html,
        diagnostics,
        outline: wikimark_core::outline(&parsed.document),
    };
    serde_wasm_bindgen::to_value(&result).map_err(|err| JsValue::from_str(&err.to_string()))
}

/// Renders an article object for the read view.
#[wasm_bindgen]
pub fn render_article_html(article: JsValue) -> Result<String, JsValue> {
    Ok(article_from_js(article)?.to_html())
}

/// Converts an article object into editor delta ops, title first.
#[wasm_bindgen]
pub fn render_runs(article: JsValue) -> Result<JsValue, JsValue> {
    let runs = article_from_js(article)?.to_runs();
    serde_wasm_bindgen::to_value(&runs).map_err(|err| JsValue::from_str(&err.to_string()))
}

fn article_from_js(value: JsValue) -> Result<Article, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|err| JsValue::from_str(&err.to_string()))
}

fn options_from_js(value: JsValue) -> Result<RenderOptions, JsValue> {
    if value.is_null() || value.is_undefined() {
        return Ok(RenderOptions::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|err| JsValue::from_str(&err.to_string()))
}
