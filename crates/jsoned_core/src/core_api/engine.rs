use serde_json::Value;

use super::error::{CoreError, CoreErrorCode};
use super::types::{EditReport, EditorOptions};
use crate::editor::TreeEditor;
use crate::path::NodePath;
use crate::state::Recorder;
use crate::widget::{Binding, WidgetHost};

#[derive(Debug, Default, Clone, Copy)]
pub struct Engine {
    options: EditorOptions,
}

/// One edit session over one document.
///
/// The session owns a private copy of the document; nothing done here is
/// visible through the value it was started from. Dropping the session (or
/// calling [`Session::discard`]) throws the edits away.
#[derive(Debug, Clone)]
pub struct Session {
    options: EditorOptions,
    original: Value,
    working: Value,
    last_report: EditReport,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EditorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn begin_session(&self, document: &Value) -> Session {
        Session {
            options: self.options,
            original: document.clone(),
            working: document.clone(),
            last_report: EditReport::default(),
        }
    }

    pub fn open_bytes<B: AsRef<[u8]>>(&self, bytes: B) -> Result<Session, CoreError> {
        let document: Value = serde_json::from_slice(bytes.as_ref()).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Parse,
                format!("failed to parse JSON document: {e}"),
            )
        })?;
        Ok(Session {
            options: self.options,
            working: document.clone(),
            original: document,
            last_report: EditReport::default(),
        })
    }
}

impl Session {
    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn original(&self) -> &Value {
        &self.original
    }

    pub fn edited_value(&self) -> &Value {
        &self.working
    }

    pub fn into_value(self) -> Value {
        self.working
    }

    pub fn is_modified(&self) -> bool {
        self.working != self.original
    }

    pub fn last_report(&self) -> &EditReport {
        &self.last_report
    }

    /// Runs one editing pass against `host`. Passes build on each other: the
    /// next pass starts from the result of this one.
    pub fn edit(&mut self, host: &mut dyn WidgetHost) -> &EditReport {
        let working = std::mem::take(&mut self.working);
        let mut editor = TreeEditor::new(host, self.options);
        self.working = editor.edit_value(working, &NodePath::root());
        self.last_report = editor.finish();
        &self.last_report
    }

    /// Every widget the editor binds for the current working tree, in
    /// document order.
    pub fn outline(&self) -> Vec<Binding> {
        let mut recorder = Recorder::new();
        let mut editor = TreeEditor::new(&mut recorder, self.options);
        editor.edit_value(self.working.clone(), &NodePath::root());
        recorder.into_bindings()
    }

    pub fn reset(&mut self) {
        self.working = self.original.clone();
        self.last_report = EditReport::default();
    }

    pub fn discard(self) {}
}
