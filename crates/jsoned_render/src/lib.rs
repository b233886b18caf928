use std::fmt::Write as _;

use jsoned_core::core_api::{CoreError, EditReport, NodeDiagnostic, NodeErrorKind};
use jsoned_core::store::serialize_document;
use jsoned_core::{Binding, LeafBinding, LengthBinding, NodePath};
use serde_json::{Map as JsonMap, Value as JsonValue};

const PREVIEW_WIDTH: usize = 60;
const INDENT: &str = "  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// Persisted form: two-space indentation, literal UTF-8.
    #[default]
    Indented,
    Compact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextRenderOptions {
    /// Show full values instead of a one-line preview.
    pub verbose: bool,
}

pub fn render_document(document: &JsonValue, style: JsonStyle) -> Result<String, CoreError> {
    match style {
        JsonStyle::Indented => serialize_document(document),
        JsonStyle::Compact => Ok(document.to_string()),
    }
}

/// The editable form as text, one binding per line, nested by depth.
///
/// ```text
/// name [text] Zeus
/// tags [list] 2 items
///   tags[0] [text] sky
/// ```
pub fn render_outline_text(bindings: &[Binding], options: TextRenderOptions) -> String {
    let mut out = String::new();
    for binding in bindings {
        let depth = match binding {
            Binding::Leaf(leaf) => container_depth(&leaf.path),
            Binding::Length(length) => container_depth(&length.path),
        };
        for _ in 0..depth {
            out.push_str(INDENT);
        }
        match binding {
            Binding::Leaf(leaf) => {
                let shown = preview(&leaf.display_text(), options.verbose);
                let _ = writeln!(out, "{} [{}] {}", path_text(&leaf.path), leaf.widget, shown);
            }
            Binding::Length(length) => {
                let _ = writeln!(
                    out,
                    "{} [list] {}",
                    path_text(&length.path),
                    item_count(length.current_len)
                );
            }
        }
    }
    out
}

pub fn render_outline_json(bindings: &[Binding]) -> JsonValue {
    JsonValue::Array(bindings.iter().map(binding_to_json).collect())
}

pub fn render_diagnostics(report: &EditReport) -> Vec<String> {
    report.diagnostics.iter().map(render_diagnostic).collect()
}

pub fn render_diagnostic(diagnostic: &NodeDiagnostic) -> String {
    let kind = match diagnostic.kind {
        NodeErrorKind::Parse => "invalid JSON",
        NodeErrorKind::ShapeMismatch => "type mismatch",
    };
    format!(
        "{kind} at {}: {} (kept previous value)",
        path_text(&diagnostic.path),
        diagnostic.message
    )
}

pub fn render_report_summary(report: &EditReport) -> String {
    let mut out = format!(
        "{} field{} changed, {} list{} resized",
        report.leaves_changed,
        plural(report.leaves_changed),
        report.arrays_resized,
        plural(report.arrays_resized),
    );
    if !report.diagnostics.is_empty() {
        let _ = write!(
            out,
            ", {} field{} kept previous value",
            report.diagnostics.len(),
            plural(report.diagnostics.len())
        );
    }
    out
}

fn binding_to_json(binding: &Binding) -> JsonValue {
    let mut m = JsonMap::new();
    match binding {
        Binding::Leaf(leaf) => leaf_to_json(leaf, &mut m),
        Binding::Length(length) => length_to_json(length, &mut m),
    }
    JsonValue::Object(m)
}

fn leaf_to_json(leaf: &LeafBinding, m: &mut JsonMap<String, JsonValue>) {
    m.insert("path".to_string(), JsonValue::String(leaf.path.to_string()));
    m.insert("label".to_string(), JsonValue::String(leaf.label()));
    m.insert(
        "widget".to_string(),
        JsonValue::String(leaf.widget.as_str().to_string()),
    );
    m.insert("multiline".to_string(), JsonValue::Bool(leaf.widget.is_multiline()));
    m.insert("display".to_string(), JsonValue::String(leaf.display_text()));
}

fn length_to_json(length: &LengthBinding, m: &mut JsonMap<String, JsonValue>) {
    m.insert("path".to_string(), JsonValue::String(length.path.to_string()));
    m.insert("label".to_string(), JsonValue::String(length.label()));
    m.insert("widget".to_string(), JsonValue::String("length".to_string()));
    m.insert("length".to_string(), JsonValue::from(length.current_len));
}

fn container_depth(path: &NodePath) -> usize {
    path.segments().len().saturating_sub(1)
}

fn path_text(path: &NodePath) -> String {
    if path.is_root() {
        "(root)".to_string()
    } else {
        path.to_string()
    }
}

fn preview(text: &str, verbose: bool) -> String {
    let escaped = text.replace('\n', "\\n");
    if verbose || escaped.chars().count() <= PREVIEW_WIDTH {
        return escaped;
    }
    let mut cut: String = escaped.chars().take(PREVIEW_WIDTH).collect();
    cut.push_str("...");
    cut
}

fn item_count(n: usize) -> String {
    format!("{n} item{}", plural(n))
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}
