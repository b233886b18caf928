use std::collections::BTreeMap;

use jsoned_core::core_api::{EditorOptions, Engine, Session};
use jsoned_core::{NodePath, WidgetState, WidgetValue};
use jsoned_render::{JsonStyle, render_diagnostics, render_document, render_outline_json};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct WebEditOptions {
    pub editor: EditorOptions,
    /// Field values keyed by node path (`gods[0].power`).
    pub values: BTreeMap<String, WidgetValue>,
    /// List lengths keyed by node path.
    pub lengths: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WebEditResult {
    pub document: String,
    pub diagnostics: Vec<String>,
    /// Refreshed field list as JSON text, in the shape `describe_fields` returns.
    pub fields: String,
}

#[derive(Debug, Clone)]
struct WebError {
    code: &'static str,
    message: String,
}

#[derive(Debug, Clone, Serialize)]
struct WebErrorPayload {
    code: String,
    message: String,
}

impl WebError {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    fn to_js_value(&self) -> JsValue {
        let payload = WebErrorPayload {
            code: self.code.to_string(),
            message: self.message.clone(),
        };
        serde_wasm_bindgen::to_value(&payload).unwrap_or_else(|_| {
            JsValue::from_str(&format!("{}: {}", payload.code, payload.message))
        })
    }
}

/// Describes the editable fields of `document_text` for the front end to draw.
#[wasm_bindgen]
pub fn describe_fields(document_text: &str, options: JsValue) -> Result<String, JsValue> {
    let parsed_options = parse_options(options).map_err(|err| err.to_js_value())?;
    describe_fields_impl(document_text, &parsed_options).map_err(|err| err.to_js_value())
}

/// Applies the widget values and list lengths from `options` and returns the
/// edited document, the per-field diagnostics and the refreshed field list.
#[wasm_bindgen]
pub fn edit_document(document_text: &str, options: JsValue) -> Result<JsValue, JsValue> {
    let parsed_options = parse_options(options).map_err(|err| err.to_js_value())?;
    let result =
        edit_document_impl(document_text, &parsed_options).map_err(|err| err.to_js_value())?;
    serde_wasm_bindgen::to_value(&result).map_err(|err| {
        WebError::new(
            "render_failed",
            format!("failed to convert edit result: {err}"),
        )
        .to_js_value()
    })
}

fn describe_fields_impl(document_text: &str, options: &WebEditOptions) -> Result<String, WebError> {
    let session = open_session(document_text, options)?;
    field_list_text(&session)
}

// Numbers are handed over as JSON text so their exact digits survive the trip
// into JavaScript.
fn field_list_text(session: &Session) -> Result<String, WebError> {
    serde_json::to_string_pretty(&render_outline_json(&session.outline())).map_err(|err| {
        WebError::new(
            "render_failed",
            format!("failed to serialize field list: {err}"),
        )
    })
}

fn edit_document_impl(
    document_text: &str,
    options: &WebEditOptions,
) -> Result<WebEditResult, WebError> {
    let mut session = open_session(document_text, options)?;
    let mut state = widget_state_from_options(options)?;
    let report = session.edit(&mut state).clone();

    let document = render_document(session.edited_value(), JsonStyle::Indented)
        .map_err(|err| WebError::new("render_failed", err.to_string()))?;
    Ok(WebEditResult {
        document,
        diagnostics: render_diagnostics(&report),
        fields: field_list_text(&session)?,
    })
}

fn open_session(
    document_text: &str,
    options: &WebEditOptions,
) -> Result<Session, WebError> {
    if document_text.trim().is_empty() {
        return Err(WebError::new(
            "unsupported_file",
            "The uploaded file is empty. Please provide a JSON document.",
        ));
    }
    Engine::with_options(options.editor)
        .open_bytes(document_text)
        .map_err(|err| WebError::new("parse_failed", err.to_string()))
}

fn widget_state_from_options(options: &WebEditOptions) -> Result<WidgetState, WebError> {
    let mut state = WidgetState::new();
    for (raw_path, value) in &options.values {
        state.set(parse_path(raw_path)?, value.clone());
    }
    for (raw_path, len) in &options.lengths {
        state.set_length(parse_path(raw_path)?, *len);
    }
    Ok(state)
}

fn parse_path(raw_path: &str) -> Result<NodePath, WebError> {
    NodePath::parse(raw_path).map_err(|err| WebError::new("invalid_options", err.message))
}

fn parse_options(options: JsValue) -> Result<WebEditOptions, WebError> {
    if options.is_null() || options.is_undefined() {
        return Ok(WebEditOptions::default());
    }

    serde_wasm_bindgen::from_value(options).map_err(|err| {
        WebError::new(
            "invalid_options",
            format!("Failed to parse web edit options: {err}"),
        )
    })
}
