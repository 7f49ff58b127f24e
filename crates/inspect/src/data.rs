use crate::error::{InspectError, Result};
use once_cell::sync::Lazy;
use peek_protocol::{
    DataElement, DataRoot, DataValue, Element, InspectionResult, ResultKind, META_FILE_PATH,
};
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// `name[0][12]` → `name`, `0`, `12`
static BRACKET_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(\d+)\]").expect("valid bracket regex"));

/// Structured document formats handled by the data builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataFormat {
    Json,
    Toml,
}

impl DataFormat {
    pub const ALL: [DataFormat; 2] = [DataFormat::Json, DataFormat::Toml];

    /// Detect format from file extension (case-insensitive)
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    /// Inspector kind name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }

    pub const fn result_kind(self) -> ResultKind {
        match self {
            Self::Json => ResultKind::Json,
            Self::Toml => ResultKind::Toml,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Toml => "TOML",
        }
    }
}

/// A data file plus an optional path into it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTarget {
    pub file: PathBuf,
    pub format: DataFormat,
    /// Path components after the `:`; empty for the whole document
    pub components: Vec<String>,
}

impl DataTarget {
    /// Recognize `file.json` or `file.json:a.b[0]` when the file exists.
    ///
    /// The whole descriptor is tried as a path first, so file names containing
    /// `:` still work.
    pub fn detect(descriptor: &str) -> Option<Self> {
        let whole = Path::new(descriptor);
        if whole.is_file() {
            return DataFormat::from_path(whole).map(|format| Self {
                file: whole.to_path_buf(),
                format,
                components: Vec::new(),
            });
        }

        let (file, path) = descriptor.split_once(':')?;
        let file = Path::new(file);
        if !file.is_file() {
            return None;
        }
        let format = DataFormat::from_path(file)?;
        Some(Self {
            file: file.to_path_buf(),
            format,
            components: split_path(path),
        })
    }

    /// Whether the target points inside the document rather than at all of it
    pub fn has_path(&self) -> bool {
        !self.components.is_empty()
    }
}

/// Split `a.b[0].c` into `["a", "b", "0", "c"]`
pub fn split_path(path: &str) -> Vec<String> {
    if path.is_empty() {
        return Vec::new();
    }
    let dotted = BRACKET_SEGMENT.replace_all(path, ".$1");
    dotted
        .split('.')
        .enumerate()
        // `[0].a` starts with a separator once rewritten
        .filter(|(idx, part)| !(*idx == 0 && part.is_empty() && path.starts_with('[')))
        .map(|(_, part)| part.to_string())
        .collect()
}

/// Parse the document and build the element tree for the target
pub fn build(target: &DataTarget) -> Result<InspectionResult> {
    let content =
        fs::read_to_string(&target.file).map_err(|err| InspectError::io(&target.file, err))?;

    let file_name = target
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| target.file.display().to_string());

    let document = parse_document(target.format, &target.file, &content)?;
    let mut element = DataElement::new(file_name.clone(), document);
    let mut display = file_name;

    if target.has_path() {
        let reached = traverse(&element.value, &target.components)?;
        let joined = target.components.join(".");
        element = DataElement::new(joined.clone(), reached.clone());
        display = format!("{display}:{joined}");
    }

    log::debug!(
        "Built {} tree '{}' from {}",
        target.format.as_str(),
        display,
        target.file.display()
    );

    let path = target.file.display().to_string();
    let root = DataRoot {
        name: display.clone(),
        path: path.clone(),
        element,
    };
    Ok(
        InspectionResult::single(display, target.format.result_kind(), Element::Data(root))
            .with_metadata(META_FILE_PATH, path),
    )
}

fn parse_document(format: DataFormat, file: &Path, content: &str) -> Result<DataValue> {
    match format {
        DataFormat::Json => {
            let value: serde_json::Value = serde_json::from_str(content)
                .map_err(|err| InspectError::parse(format.label(), file, err))?;
            Ok(from_json(value))
        }
        DataFormat::Toml => {
            let table: toml::Table = toml::from_str(content)
                .map_err(|err| InspectError::parse(format.label(), file, err.message()))?;
            Ok(from_toml(toml::Value::Table(table)))
        }
    }
}

fn from_json(value: serde_json::Value) -> DataValue {
    match value {
        serde_json::Value::Null => DataValue::Null,
        serde_json::Value::Bool(flag) => DataValue::Boolean(flag),
        serde_json::Value::Number(number) => DataValue::Number(number),
        serde_json::Value::String(text) => DataValue::String(text),
        serde_json::Value::Array(items) => DataValue::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(idx, item)| DataElement::new(format!("[{idx}]"), from_json(item)))
                .collect(),
        ),
        serde_json::Value::Object(map) => DataValue::Object(
            map.into_iter()
                .map(|(key, item)| {
                    let child = DataElement::new(key.clone(), from_json(item));
                    (key, child)
                })
                .collect::<BTreeMap<_, _>>(),
        ),
    }
}

fn from_toml(value: toml::Value) -> DataValue {
    match value {
        toml::Value::String(text) => DataValue::String(text),
        toml::Value::Integer(int) => DataValue::Number(int.into()),
        toml::Value::Float(float) => match serde_json::Number::from_f64(float) {
            Some(number) => DataValue::Number(number),
            None => DataValue::Other {
                type_name: "float".to_string(),
                text: float.to_string(),
            },
        },
        toml::Value::Boolean(flag) => DataValue::Boolean(flag),
        toml::Value::Datetime(datetime) => DataValue::Other {
            type_name: "datetime".to_string(),
            text: datetime.to_string(),
        },
        toml::Value::Array(items) => DataValue::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(idx, item)| DataElement::new(format!("[{idx}]"), from_toml(item)))
                .collect(),
        ),
        toml::Value::Table(table) => DataValue::Object(
            table
                .into_iter()
                .map(|(key, item)| {
                    let child = DataElement::new(key.clone(), from_toml(item));
                    (key, child)
                })
                .collect::<BTreeMap<_, _>>(),
        ),
    }
}

/// Follow path components from `root`: digits index arrays, anything else is an object key
fn traverse<'a>(root: &'a DataValue, components: &[String]) -> Result<&'a DataValue> {
    let mut current = root;
    for component in components {
        current = match current {
            DataValue::Array(items) => {
                let index = parse_index(component)
                    .ok_or_else(|| InspectError::PathNotFound(component.clone()))?;
                &items
                    .get(index)
                    .ok_or(InspectError::IndexOutOfBounds {
                        index,
                        len: items.len(),
                    })?
                    .value
            }
            DataValue::Object(children) => {
                &children
                    .get(component)
                    .ok_or_else(|| InspectError::PathNotFound(component.clone()))?
                    .value
            }
            scalar => {
                return Err(InspectError::NotTraversable {
                    component: component.clone(),
                    kind: scalar.kind().as_str(),
                })
            }
        };
    }
    Ok(current)
}

fn parse_index(component: &str) -> Option<usize> {
    if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Digit strings too large for usize are past any array end
    Some(component.parse().unwrap_or(usize::MAX))
}
