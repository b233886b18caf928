use std::collections::HashMap;

use crate::path::NodePath;
use crate::widget::{Binding, LeafBinding, LengthBinding, WidgetHost, WidgetValue};

/// Host-side widget state keyed by node path.
///
/// Paths that were never set read back as `None`, which leaves the bound node
/// untouched. Entries for paths that no longer exist (for example after an
/// array was shortened) are simply never asked for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidgetState {
    values: HashMap<NodePath, WidgetValue>,
    lengths: HashMap<NodePath, usize>,
}

impl WidgetState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, path: NodePath, value: WidgetValue) -> &mut Self {
        self.values.insert(path, value);
        self
    }

    pub fn set_length(&mut self, path: NodePath, len: usize) -> &mut Self {
        self.lengths.insert(path, len);
        self
    }

    pub fn value(&self, path: &NodePath) -> Option<&WidgetValue> {
        self.values.get(path)
    }

    pub fn length(&self, path: &NodePath) -> Option<usize> {
        self.lengths.get(path).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.lengths.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.lengths.clear();
    }
}

impl WidgetHost for WidgetState {
    fn bind_leaf(&mut self, binding: &LeafBinding) -> Option<WidgetValue> {
        self.values.get(&binding.path).cloned()
    }

    fn bind_length(&mut self, binding: &LengthBinding) -> Option<usize> {
        self.length(&binding.path)
    }
}

/// Records every binding of a pass without changing anything.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    bindings: Vec<Binding>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn into_bindings(self) -> Vec<Binding> {
        self.bindings
    }
}

impl WidgetHost for Recorder {
    fn bind_leaf(&mut self, binding: &LeafBinding) -> Option<WidgetValue> {
        self.bindings.push(Binding::Leaf(binding.clone()));
        None
    }

    fn bind_length(&mut self, binding: &LengthBinding) -> Option<usize> {
        self.bindings.push(Binding::Length(binding.clone()));
        None
    }
}
