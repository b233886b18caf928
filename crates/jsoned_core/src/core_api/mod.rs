mod engine;
mod error;
mod types;

pub use engine::{Engine, Session};
pub use error::{CoreError, CoreErrorCode, NodeErrorKind};
pub use types::{
    DEFAULT_ARRAY_TEXT_THRESHOLD, DEFAULT_FLOAT_PRECISION, DEFAULT_OBJECT_TEXT_THRESHOLD,
    EditReport, EditorOptions, NodeDiagnostic,
};
