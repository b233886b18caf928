pub mod classify;
pub mod core_api;
pub mod editor;
pub mod path;
pub mod state;
pub mod store;
pub mod widget;

pub use classify::{NodeKind, StringContext, Widget, classify};
pub use editor::TreeEditor;
pub use path::{NodePath, PathSegment};
pub use state::{Recorder, WidgetState};
pub use widget::{Binding, LeafBinding, LengthBinding, WidgetHost, WidgetValue};
