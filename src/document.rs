//! Structured documents
//!
//! Reads experiment documents (TOML, YAML or JSON) into an unvalidated
//! `serde_json::Value` tree, and renders configuration trees back to text in
//! schema order. Validation against the schema happens in [`crate::merge`].

use serde_json::{Map, Number, Value};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use flagtree_value::TypedValue;

use crate::error::{ConfigError, Result};
use crate::tree::{Child, ConfigNode};

/// Text format of a structured document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DocumentFormat {
    #[default]
    Toml,
    Yaml,
    Json,
}

impl DocumentFormat {
    /// Pick the format from a file extension. Anything unrecognized is TOML.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => DocumentFormat::Yaml,
            Some("json") => DocumentFormat::Json,
            _ => DocumentFormat::Toml,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DocumentFormat::Toml => "toml",
            DocumentFormat::Yaml => "yaml",
            DocumentFormat::Json => "json",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A document read from disk, with provenance.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub path: PathBuf,
    pub format: DocumentFormat,
    /// SHA-256 of the raw file bytes.
    pub digest: String,
    pub value: Value,
}

/// Read and parse a document, choosing the format from the extension.
pub fn load_document(path: &Path) -> Result<LoadedDocument> {
    let bytes = fs::read(path).map_err(|e| ConfigError::persistence(path, e))?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let digest = hex::encode(hasher.finalize());

    let format = DocumentFormat::from_path(path);
    let parse_error = |message: String| ConfigError::DocumentParse {
        path: path.to_path_buf(),
        format: format.name(),
        message,
    };

    let contents =
        String::from_utf8(bytes).map_err(|e| parse_error(format!("invalid UTF-8: {}", e)))?;
    let value = parse_document(&contents, format).map_err(parse_error)?;

    Ok(LoadedDocument {
        path: path.to_path_buf(),
        format,
        digest,
        value,
    })
}

/// Parse document text into a value tree.
pub fn parse_document(text: &str, format: DocumentFormat) -> std::result::Result<Value, String> {
    match format {
        DocumentFormat::Toml => {
            let value: toml::Value = toml::from_str(text).map_err(|e| e.to_string())?;
            Ok(toml_to_json(value))
        }
        DocumentFormat::Yaml => {
            // An empty YAML file is an empty document, not `null`.
            if text.trim().is_empty() {
                return Ok(Value::Object(Map::new()));
            }
            serde_yaml::from_str(text).map_err(|e| e.to_string())
        }
        DocumentFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
    }
}

/// Convert a TOML value to a JSON value.
fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => {
            Value::Object(table.into_iter().map(|(k, v)| (k, toml_to_json(v))).collect())
        }
    }
}

fn render_error(format: DocumentFormat, message: impl Into<String>) -> ConfigError {
    ConfigError::DocumentRender {
        format: format.name(),
        message: message.into(),
    }
}

fn float_number(value: f64) -> Result<Number> {
    Number::from_f64(value)
        .ok_or_else(|| render_error(DocumentFormat::Json, format!("non-finite float {}", value)))
}

fn leaf_to_json(value: &TypedValue) -> Result<Value> {
    Ok(match value {
        TypedValue::Int(v) => Value::from(*v),
        TypedValue::Float(v) => Value::Number(float_number(*v)?),
        TypedValue::Bool(v) => Value::Bool(*v),
        TypedValue::Str(v) => Value::String(v.clone()),
        TypedValue::IntTuple(items) => Value::Array(items.iter().map(|v| Value::from(*v)).collect()),
        TypedValue::FloatTuple(items) => Value::Array(
            items
                .iter()
                .map(|v| float_number(*v).map(Value::Number))
                .collect::<Result<Vec<_>>>()?,
        ),
        TypedValue::StrTuple(items) => {
            Value::Array(items.iter().map(|v| Value::String(v.clone())).collect())
        }
    })
}

/// Value tree of a configuration node, in schema order.
pub fn node_to_json(node: &ConfigNode) -> Result<Value> {
    let mut map = Map::new();
    for (key, child) in node.entries() {
        let value = match child {
            Child::Node(inner) => node_to_json(inner)?,
            Child::Leaf(leaf) => leaf_to_json(leaf)?,
        };
        map.insert(key.clone(), value);
    }
    Ok(Value::Object(map))
}

fn leaf_to_toml(value: &TypedValue) -> toml::Value {
    match value {
        TypedValue::Int(v) => toml::Value::Integer(*v),
        TypedValue::Float(v) => toml::Value::Float(*v),
        TypedValue::Bool(v) => toml::Value::Boolean(*v),
        TypedValue::Str(v) => toml::Value::String(v.clone()),
        TypedValue::IntTuple(items) => {
            toml::Value::Array(items.iter().map(|v| toml::Value::Integer(*v)).collect())
        }
        TypedValue::FloatTuple(items) => {
            toml::Value::Array(items.iter().map(|v| toml::Value::Float(*v)).collect())
        }
        TypedValue::StrTuple(items) => {
            toml::Value::Array(items.iter().map(|v| toml::Value::String(v.clone())).collect())
        }
    }
}

/// TOML table of a node. Leaves come before nested tables, since a TOML
/// table cannot take plain keys after its first sub-table.
fn node_to_toml(node: &ConfigNode) -> toml::Table {
    let mut table = toml::Table::new();
    for (key, child) in node.entries() {
        if let Child::Leaf(leaf) = child {
            table.insert(key.clone(), leaf_to_toml(leaf));
        }
    }
    for (key, child) in node.entries() {
        if let Child::Node(inner) = child {
            table.insert(key.clone(), toml::Value::Table(node_to_toml(inner)));
        }
    }
    table
}

/// Render a configuration tree as document text.
///
/// Output is deterministic: keys follow schema order (leaves first within
/// each TOML table).
pub fn render_document(node: &ConfigNode, format: DocumentFormat) -> Result<String> {
    match format {
        DocumentFormat::Toml => {
            toml::to_string(&node_to_toml(node)).map_err(|e| render_error(format, e.to_string()))
        }
        DocumentFormat::Yaml => serde_yaml::to_string(&node_to_json(node)?)
            .map_err(|e| render_error(format, e.to_string())),
        DocumentFormat::Json => serde_json::to_string_pretty(&node_to_json(node)?)
            .map(|mut text| {
                text.push('\n');
                text
            })
            .map_err(|e| render_error(format, e.to_string())),
    }
}
