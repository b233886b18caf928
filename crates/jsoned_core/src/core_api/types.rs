use serde::{Deserialize, Serialize};

use super::error::NodeErrorKind;
use crate::path::NodePath;

pub const DEFAULT_OBJECT_TEXT_THRESHOLD: usize = 100;
pub const DEFAULT_ARRAY_TEXT_THRESHOLD: usize = 50;
pub const DEFAULT_FLOAT_PRECISION: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorOptions {
    /// Object fields (and a string root) longer than this get a multi-line widget.
    pub object_text_threshold: usize,
    /// Array items longer than this get a multi-line widget.
    pub array_text_threshold: usize,
    pub float_precision: usize,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            object_text_threshold: DEFAULT_OBJECT_TEXT_THRESHOLD,
            array_text_threshold: DEFAULT_ARRAY_TEXT_THRESHOLD,
            float_precision: DEFAULT_FLOAT_PRECISION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDiagnostic {
    pub path: NodePath,
    pub kind: NodeErrorKind,
    pub message: String,
}

/// Outcome of one editing pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditReport {
    pub diagnostics: Vec<NodeDiagnostic>,
    pub leaves_changed: usize,
    pub arrays_resized: usize,
}

impl EditReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn diagnostic_for(&self, path: &NodePath) -> Option<&NodeDiagnostic> {
        self.diagnostics.iter().find(|d| &d.path == path)
    }
}
