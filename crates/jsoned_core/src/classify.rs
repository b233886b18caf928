use std::fmt;

use serde_json::{Map as JsonMap, Value};

use crate::core_api::EditorOptions;

/// Closed set of node shapes the editor knows how to bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Object,
    Array,
    Boolean,
    Integer,
    Float,
    String,
    Null,
    /// Integers outside the `i64` range, of any size; edited through raw JSON text.
    Unrepresentable,
}

impl NodeKind {
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Object | Self::Array)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Null => "null",
            Self::Unrepresentable => "unrepresentable",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Booleans are checked before numbers and integers before floats, so a
/// value always lands in the narrowest kind that describes it.
pub fn classify(value: &Value) -> NodeKind {
    match value {
        Value::Object(_) => NodeKind::Object,
        Value::Array(_) => NodeKind::Array,
        Value::Bool(_) => NodeKind::Boolean,
        Value::Number(n) if n.is_i64() => NodeKind::Integer,
        Value::Number(n) if n.is_f64() => NodeKind::Float,
        Value::Number(_) => NodeKind::Unrepresentable,
        Value::String(_) => NodeKind::String,
        Value::Null => NodeKind::Null,
    }
}

/// Where a string sits decides how long it may get before it is edited in a
/// multi-line widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringContext {
    ObjectField,
    ArrayItem,
}

impl StringContext {
    fn threshold(&self, options: &EditorOptions) -> usize {
        match self {
            Self::ObjectField => options.object_text_threshold,
            Self::ArrayItem => options.array_text_threshold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Widget {
    Checkbox,
    Integer,
    Float { precision: usize },
    TextLine,
    TextArea,
    RawJson,
}

impl Widget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checkbox => "checkbox",
            Self::Integer => "integer",
            Self::Float { .. } => "float",
            Self::TextLine => "text",
            Self::TextArea => "textarea",
            Self::RawJson => "json",
        }
    }

    pub fn is_multiline(&self) -> bool {
        matches!(self, Self::TextArea | Self::RawJson)
    }
}

impl fmt::Display for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Picks the widget for a leaf. Returns `None` for containers.
pub fn select_widget(
    value: &Value,
    context: StringContext,
    options: &EditorOptions,
) -> Option<Widget> {
    let widget = match classify(value) {
        NodeKind::Object | NodeKind::Array => return None,
        NodeKind::Boolean => Widget::Checkbox,
        NodeKind::Integer => Widget::Integer,
        NodeKind::Float => Widget::Float {
            precision: options.float_precision,
        },
        NodeKind::String => {
            let text = value.as_str().unwrap_or_default();
            if is_long_text(text, context.threshold(options)) {
                Widget::TextArea
            } else {
                Widget::TextLine
            }
        }
        NodeKind::Null | NodeKind::Unrepresentable => Widget::RawJson,
    };
    Some(widget)
}

fn is_long_text(text: &str, threshold: usize) -> bool {
    text.contains('\n') || text.chars().count() > threshold
}

/// Zero value for a new array slot, typed after the array's first element.
/// Mixed arrays still sample index 0, and an empty array yields `""`.
pub fn placeholder_for(sample: Option<&Value>) -> Value {
    let Some(sample) = sample else {
        return Value::String(String::new());
    };
    match classify(sample) {
        NodeKind::Object => Value::Object(JsonMap::new()),
        NodeKind::Array => Value::Array(Vec::new()),
        NodeKind::Boolean => Value::Bool(false),
        NodeKind::Integer | NodeKind::Unrepresentable => Value::from(0),
        NodeKind::Float => Value::from(0.0),
        NodeKind::String | NodeKind::Null => Value::String(String::new()),
    }
}
