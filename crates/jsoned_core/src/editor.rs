use serde_json::{Map as JsonMap, Value};

use crate::classify::{StringContext, placeholder_for, select_widget};
use crate::core_api::{EditReport, EditorOptions, NodeDiagnostic};
use crate::path::NodePath;
use crate::widget::{LeafBinding, LengthBinding, WidgetHost, accept, current_widget_value};

/// One recursive editing pass over a JSON tree.
///
/// Every leaf is bound to a host widget under its own [`NodePath`], every array
/// gets a length control. Containers come back with the same variant, objects
/// with the same keys in the same order. A leaf whose widget result cannot be
/// used keeps its previous value and leaves a diagnostic in the report.
pub struct TreeEditor<'h> {
    host: &'h mut dyn WidgetHost,
    options: EditorOptions,
    report: EditReport,
}

impl<'h> TreeEditor<'h> {
    pub fn new(host: &'h mut dyn WidgetHost, options: EditorOptions) -> Self {
        Self {
            host,
            options,
            report: EditReport::default(),
        }
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn edit_value(&mut self, value: Value, path: &NodePath) -> Value {
        self.edit_node(value, path, StringContext::ObjectField)
    }

    pub fn edit_object(
        &mut self,
        object: JsonMap<String, Value>,
        path: &NodePath,
    ) -> JsonMap<String, Value> {
        let mut out = JsonMap::with_capacity(object.len());
        for (key, value) in object {
            let child = path.key(key.as_str());
            let edited = self.edit_node(value, &child, StringContext::ObjectField);
            out.insert(key, edited);
        }
        out
    }

    pub fn edit_array(&mut self, mut items: Vec<Value>, path: &NodePath) -> Vec<Value> {
        let current_len = items.len();
        let binding = LengthBinding {
            path: path.clone(),
            current_len,
        };
        let desired_len = self.host.bind_length(&binding).unwrap_or(current_len);

        if desired_len > current_len {
            let placeholder = placeholder_for(items.first());
            items.resize(desired_len, placeholder);
        } else if desired_len < current_len {
            items.truncate(desired_len);
        }
        if desired_len != current_len {
            self.report.arrays_resized += 1;
        }

        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                self.edit_node(item, &path.index(index), StringContext::ArrayItem)
            })
            .collect()
    }

    pub fn finish(self) -> EditReport {
        self.report
    }

    fn edit_node(&mut self, value: Value, path: &NodePath, context: StringContext) -> Value {
        match value {
            Value::Object(object) => Value::Object(self.edit_object(object, path)),
            Value::Array(items) => Value::Array(self.edit_array(items, path)),
            leaf => self.edit_leaf(leaf, path, context),
        }
    }

    fn edit_leaf(&mut self, value: Value, path: &NodePath, context: StringContext) -> Value {
        let Some(widget) = select_widget(&value, context, &self.options) else {
            return value;
        };
        let binding = LeafBinding {
            path: path.clone(),
            widget,
            current: current_widget_value(&value, widget),
        };
        let Some(returned) = self.host.bind_leaf(&binding) else {
            return value;
        };

        match accept(widget, returned) {
            Ok(edited) => {
                if edited != value {
                    self.report.leaves_changed += 1;
                }
                edited
            }
            Err((kind, message)) => {
                self.report.diagnostics.push(NodeDiagnostic {
                    path: path.clone(),
                    kind,
                    message,
                });
                value
            }
        }
    }
}
