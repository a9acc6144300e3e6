use crate::value::CellValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

const NULL: CellValue = CellValue::Null;

/// One logical record in the displayed collection.
///
/// A row is an opaque mapping from field name to [`CellValue`]; the engine
/// never assumes a fixed shape and reads fields through column accessors.
/// Backed by a `BTreeMap` so serialization order is deterministic.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(BTreeMap<String, CellValue>);

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field assignment.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<CellValue>) {
        self.0.insert(field.into(), value.into());
    }

    /// Field access. Absent fields read as [`CellValue::Null`].
    pub fn get(&self, field: &str) -> &CellValue {
        self.0.get(field).unwrap_or(&NULL)
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, CellValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, CellValue)>>(iter: I) -> Self {
        Row(iter.into_iter().collect())
    }
}

/// Stable key used to track a row across re-renders and recomputed
/// collections, independent of object identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Int(n) => write!(f, "{}", n),
            RowId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RowId {
    fn from(n: i64) -> Self {
        RowId::Int(n)
    }
}

impl From<&str> for RowId {
    fn from(s: &str) -> Self {
        RowId::Text(s.to_string())
    }
}

impl From<String> for RowId {
    fn from(s: String) -> Self {
        RowId::Text(s)
    }
}

/// Caller-supplied identity function.
///
/// Must be stable and unique per logical row for the lifetime of the
/// collection; the selection layer keys on its output.
pub type RowKeyFn = Arc<dyn Fn(&Row) -> RowId + Send + Sync>;
