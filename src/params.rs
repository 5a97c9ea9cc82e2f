//! Positional constructor parameters.

use std::collections::BTreeMap;

use crate::value::Value;

/// Ordered positional parameter list with sparse override support.
///
/// Indices are dense integers starting at 0 and correspond to constructor
/// parameter positions. A caller may supply only some positions (e.g. index 1
/// alone) and let stored defaults or resolved dependencies fill the rest.
///
/// # Examples
///
/// ```rust
/// use bindery::{value, Params};
///
/// // Dense list: positions 0 and 1
/// let mut params = Params::new();
/// params.push(value("localhost".to_string()));
/// params.push(value(5432u16));
/// assert_eq!(params.len(), 2);
///
/// // Sparse override: position 1 only
/// let override_port = Params::new().with(1, value(6543u16));
/// assert!(override_port.get(0).is_none());
/// assert!(override_port.get(1).is_some());
/// ```
#[derive(Clone, Default)]
pub struct Params {
    entries: BTreeMap<usize, Value>,
}

impl Params {
    /// Creates an empty parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value at the next position after the highest occupied index.
    pub fn push(&mut self, value: Value) {
        let index = self.entries.keys().next_back().map_or(0, |i| i + 1);
        self.entries.insert(index, value);
    }

    /// Sets the value at an explicit position, replacing any existing one.
    pub fn insert(&mut self, index: usize, value: Value) {
        self.entries.insert(index, value);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, index: usize, value: Value) -> Self {
        self.insert(index, value);
        self
    }

    /// Value at `index`, if supplied.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.entries.get(&index)
    }

    /// Number of occupied positions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no positions are occupied.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Occupied positions in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Value)> {
        self.entries.iter().map(|(i, v)| (*i, v))
    }

    /// Overlays `over` on top of `self`: every index present in `over` wins,
    /// all other indices keep the value from `self`.
    pub fn overlay(&self, over: &Params) -> Params {
        let mut merged = self.clone();
        for (index, value) in over.iter() {
            merged.insert(index, value.clone());
        }
        merged
    }
}

impl From<Vec<Value>> for Params {
    fn from(values: Vec<Value>) -> Self {
        let mut params = Params::new();
        for v in values {
            params.push(v);
        }
        params
    }
}

impl std::fmt::Debug for Params {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.entries.keys().map(|i| (i, "<value>")))
            .finish()
    }
}
