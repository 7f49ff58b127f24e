use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of a data element; decides which payload a [`DataValue`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataKind {
    Object,
    Array,
    String,
    Number,
    Boolean,
    Null,
    Other,
}

impl DataKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Other => "other",
        }
    }
}

/// Payload of a data element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DataValue {
    /// Key → child; ordered by key
    Object(BTreeMap<String, DataElement>),
    Array(Vec<DataElement>),
    String(String),
    Number(serde_json::Number),
    Boolean(bool),
    Null,
    /// Scalar the model has no dedicated kind for, kept as text
    Other { type_name: String, text: String },
}

impl DataValue {
    #[must_use]
    pub const fn kind(&self) -> DataKind {
        match self {
            Self::Object(_) => DataKind::Object,
            Self::Array(_) => DataKind::Array,
            Self::String(_) => DataKind::String,
            Self::Number(_) => DataKind::Number,
            Self::Boolean(_) => DataKind::Boolean,
            Self::Null => DataKind::Null,
            Self::Other { .. } => DataKind::Other,
        }
    }

    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(self, Self::Object(_) | Self::Array(_))
    }
}

/// A node of a data document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataElement {
    /// Key, bracketed index (`[3]`), or the file base name for the root
    pub name: String,
    pub value: DataValue,
}

impl DataElement {
    pub fn new(name: impl Into<String>, value: DataValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> DataKind {
        self.value.kind()
    }

    /// Number of direct children (object properties or array items)
    #[must_use]
    pub fn child_count(&self) -> usize {
        match &self.value {
            DataValue::Object(children) => children.len(),
            DataValue::Array(items) => items.len(),
            _ => 0,
        }
    }
}

/// Root of an inspected data document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRoot {
    /// Display name; encodes any sub-path that was followed (`config.json:a.b`)
    pub name: String,
    /// Originating file path
    pub path: String,
    pub element: DataElement,
}
