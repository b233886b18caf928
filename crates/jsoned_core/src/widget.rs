use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::classify::Widget;
use crate::core_api::NodeErrorKind;
use crate::path::NodePath;

/// What a host widget shows and hands back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WidgetValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl WidgetValue {
    pub fn display_text(&self, widget: Widget) -> String {
        match (self, widget) {
            (Self::Float(v), Widget::Float { precision }) => format!("{v:.precision$}"),
            (Self::Bool(v), _) => v.to_string(),
            (Self::Integer(v), _) => v.to_string(),
            (Self::Float(v), _) => v.to_string(),
            (Self::Text(v), _) => v.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeafBinding {
    pub path: NodePath,
    pub widget: Widget,
    pub current: WidgetValue,
}

impl LeafBinding {
    pub fn label(&self) -> String {
        self.path.label()
    }

    pub fn display_text(&self) -> String {
        self.current.display_text(self.widget)
    }
}

/// The "number of items" control every array gets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthBinding {
    pub path: NodePath,
    pub current_len: usize,
}

impl LengthBinding {
    pub fn label(&self) -> String {
        self.path.label()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Leaf(LeafBinding),
    Length(LengthBinding),
}

impl Binding {
    pub fn path(&self) -> &NodePath {
        match self {
            Self::Leaf(leaf) => &leaf.path,
            Self::Length(length) => &length.path,
        }
    }
}

/// Host side of the editor. Each call carries the unique path of the bound
/// node; returning `None` leaves the node as it is.
pub trait WidgetHost {
    fn bind_leaf(&mut self, binding: &LeafBinding) -> Option<WidgetValue>;

    fn bind_length(&mut self, binding: &LengthBinding) -> Option<usize>;
}

/// Value currently held by a leaf, in the form its widget displays.
pub(crate) fn current_widget_value(value: &Value, widget: Widget) -> WidgetValue {
    match (widget, value) {
        (Widget::Checkbox, Value::Bool(v)) => WidgetValue::Bool(*v),
        (Widget::Integer, Value::Number(n)) => match n.as_i64() {
            Some(v) => WidgetValue::Integer(v),
            None => WidgetValue::Text(n.to_string()),
        },
        (Widget::Float { .. }, Value::Number(n)) => match n.as_f64() {
            Some(v) => WidgetValue::Float(v),
            None => WidgetValue::Text(n.to_string()),
        },
        (Widget::TextLine | Widget::TextArea, Value::String(s)) => WidgetValue::Text(s.clone()),
        (_, other) => WidgetValue::Text(raw_json_text(other)),
    }
}

pub(crate) fn raw_json_text(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Converts what a widget handed back into a JSON value of the widget's type.
pub(crate) fn accept(
    widget: Widget,
    value: WidgetValue,
) -> Result<Value, (NodeErrorKind, String)> {
    match (widget, value) {
        (Widget::Checkbox, WidgetValue::Bool(v)) => Ok(Value::Bool(v)),
        (Widget::Checkbox, WidgetValue::Text(text)) => {
            match text.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(mismatch(widget, &format!("'{}'", text.trim()))),
            }
        }

        (Widget::Integer, WidgetValue::Integer(v)) => Ok(Value::from(v)),
        (Widget::Integer, WidgetValue::Float(v)) => {
            if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
                Ok(Value::from(v as i64))
            } else {
                Err(mismatch(widget, &v.to_string()))
            }
        }
        (Widget::Integer, WidgetValue::Text(text)) => text
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| mismatch(widget, &format!("'{}'", text.trim()))),

        (Widget::Float { .. }, WidgetValue::Float(v)) => float_value(v, widget),
        (Widget::Float { .. }, WidgetValue::Integer(v)) => float_value(v as f64, widget),
        (Widget::Float { .. }, WidgetValue::Text(text)) => match text.trim().parse::<f64>() {
            Ok(v) => float_value(v, widget),
            Err(_) => Err(mismatch(widget, &format!("'{}'", text.trim()))),
        },

        (Widget::TextLine | Widget::TextArea, WidgetValue::Text(text)) => Ok(Value::String(text)),

        (Widget::RawJson, WidgetValue::Text(text)) => serde_json::from_str(&text)
            .map_err(|e| (NodeErrorKind::Parse, format!("invalid JSON: {e}"))),

        (_, other) => Err(mismatch(widget, &format!("{other:?}"))),
    }
}

fn float_value(v: f64, widget: Widget) -> Result<Value, (NodeErrorKind, String)> {
    Number::from_f64(v)
        .map(Value::Number)
        .ok_or_else(|| mismatch(widget, &v.to_string()))
}

fn mismatch(widget: Widget, got: &str) -> (NodeErrorKind, String) {
    (
        NodeErrorKind::ShapeMismatch,
        format!("{widget} widget cannot hold {got}"),
    )
}
