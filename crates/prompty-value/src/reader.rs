//! Context access for template execution.

use indexmap::IndexMap;

use crate::value::Value;

/// Abstract reader over the execution context.
///
/// Paths are dotted and traverse nested mappings. Implementations that can
/// enumerate their top-level keys return them from [`keys`](Self::keys),
/// which enables "did you mean?" suggestions on variable misses.
pub trait ContextReader {
    /// Look up a dotted path; `None` when absent
    fn get(&self, path: &str) -> Option<Value>;

    /// Look up a path and render it to a string; empty string when absent
    fn get_string(&self, path: &str) -> String {
        self.get(path).map(|v| v.to_string()).unwrap_or_default()
    }

    /// Look up a path and render it to a string, with a fallback
    fn get_string_or(&self, path: &str, fallback: &str) -> String {
        match self.get(path) {
            Some(v) => v.to_string(),
            None => fallback.to_string(),
        }
    }

    /// Whether the path resolves to a value
    fn has(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Top-level key listing, when the implementation can enumerate it
    fn keys(&self) -> Option<Vec<String>> {
        None
    }
}

/// Map-backed context, the standard concrete reader.
#[derive(Debug, Clone, Default)]
pub struct MapContext {
    values: IndexMap<String, Value>,
}

impl MapContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from a value mapping
    pub fn from_map(values: IndexMap<String, Value>) -> Self {
        Self { values }
    }

    /// Bind a top-level name
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Remove a top-level name
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.shift_remove(name)
    }

    /// The underlying mapping
    pub fn as_map(&self) -> &IndexMap<String, Value> {
        &self.values
    }

    /// Consume into the underlying mapping
    pub fn into_map(self) -> IndexMap<String, Value> {
        self.values
    }
}

impl ContextReader for MapContext {
    fn get(&self, path: &str) -> Option<Value> {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };
        let root = self.values.get(head)?;
        match rest {
            None => Some(root.clone()),
            Some(rest) => root.lookup_path(rest).cloned(),
        }
    }

    fn keys(&self) -> Option<Vec<String>> {
        Some(self.values.keys().cloned().collect())
    }
}
