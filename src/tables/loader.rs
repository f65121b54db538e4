//! JSON loaders for the table formats exported by the training pipeline.
//!
//! Three shapes exist on disk:
//! - nested tables: `{"<parent>": {"after_encoding": {"<code>": value}}}`
//! - paired vocabularies: `{"<key>": {"original": [...], "encoded": [...]}}`
//! - flat lists: scaler `{"mean": [m], "scale": [s]}` and membership
//!   `{"<category>": ["<procedure>", ...]}`
//!
//! Every loader returns `Result`; the boot path treats a failure as fatal
//! rather than serving from a silently empty table.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;
use tracing::info;

use super::error::TableError;
use super::{EncodingTable, LabelMapping, MembershipTable, Scaler};

const AFTER_ENCODING_KEY: &str = "after_encoding";

/// Loads `{parent: {"after_encoding": {code: value}}}` into an
/// [`EncodingTable`].
pub fn load_nested_encoding(path: &Path, parent: &str) -> Result<EncodingTable, TableError> {
    let root = read_json(path)?;
    let entries = nested_object(&root, path, parent)?;

    let pairs = entries
        .iter()
        .filter_map(|(code, value)| value.as_f64().map(|v| (code.clone(), v as f32)));
    let table = EncodingTable::from_pairs(pairs);

    info!(path = %path.display(), parent = parent, codes = table.len(), "loaded encoding table");
    Ok(table)
}

/// Loads `{key: {"original": [...], "encoded": [...]}}` into an
/// [`EncodingTable`]. The first occurrence of a duplicated original wins,
/// matching the training export.
pub fn load_paired_encoding(path: &Path, key: &str) -> Result<EncodingTable, TableError> {
    let root = read_json(path)?;
    let section = root
        .get(key)
        .ok_or_else(|| TableError::KeyNotFound {
            path: path.to_path_buf(),
            key: key.to_string(),
        })?;

    let originals = string_array(section, path, key, "original")?;
    let encoded = number_array(section, path, key, "encoded")?;

    if originals.len() != encoded.len() {
        return Err(TableError::MisalignedVocabulary {
            path: path.to_path_buf(),
            originals: originals.len(),
            encoded: encoded.len(),
        });
    }

    let table = EncodingTable::from_pairs(originals.into_iter().zip(encoded));

    info!(path = %path.display(), key = key, codes = table.len(), "loaded paired vocabulary");
    Ok(table)
}

/// Loads `{"mean": [m], "scale": [s]}` into a [`Scaler`], rejecting a zero
/// scale.
pub fn load_scaler(path: &Path) -> Result<Scaler, TableError> {
    let root = read_json(path)?;

    let mean = scalar_element(&root, path, "mean")?;
    let scale = scalar_element(&root, path, "scale")?;

    if scale == 0.0 {
        return Err(TableError::InvalidScaler {
            path: path.to_path_buf(),
            reason: "scale must be non-zero".to_string(),
        });
    }

    info!(path = %path.display(), mean = mean, scale = scale, "loaded scaler");
    Ok(Scaler::new(mean, scale))
}

/// Loads `{parent: {"after_encoding": {label: index}}}` into a
/// [`LabelMapping`], failing on index collisions.
pub fn load_nested_mapping(path: &Path, parent: &str) -> Result<LabelMapping, TableError> {
    let root = read_json(path)?;
    let entries = nested_object(&root, path, parent)?;

    let pairs = entries.iter().filter_map(|(label, value)| {
        value
            .as_f64()
            .filter(|v| *v >= 0.0)
            .map(|v| (label.clone(), v as u32))
    });
    let mapping = LabelMapping::from_pairs(pairs)?;

    info!(path = %path.display(), parent = parent, labels = mapping.space_size(), "loaded label mapping");
    Ok(mapping)
}

/// Loads `{category: [procedure, ...]}` into a [`MembershipTable`],
/// dropping empty candidate strings but preserving candidate order.
pub fn load_membership(path: &Path) -> Result<MembershipTable, TableError> {
    let root = read_json(path)?;
    let object = root.as_object().ok_or_else(|| TableError::KeyNotFound {
        path: path.to_path_buf(),
        key: "<root object>".to_string(),
    })?;

    let entries = object.iter().map(|(category, value)| {
        let procedures: Vec<String> = value
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str())
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        (category.clone(), procedures)
    });
    let table = MembershipTable::from_entries(entries);

    info!(path = %path.display(), categories = table.len(), "loaded membership table");
    Ok(table)
}

fn read_json(path: &Path) -> Result<Value, TableError> {
    if !path.exists() {
        return Err(TableError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| TableError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn nested_object<'a>(
    root: &'a Value,
    path: &Path,
    parent: &str,
) -> Result<&'a serde_json::Map<String, Value>, TableError> {
    root.get(parent)
        .and_then(|section| section.get(AFTER_ENCODING_KEY))
        .and_then(Value::as_object)
        .ok_or_else(|| TableError::KeyNotFound {
            path: path.to_path_buf(),
            key: format!("{parent}/{AFTER_ENCODING_KEY}"),
        })
}

fn string_array(
    section: &Value,
    path: &Path,
    key: &str,
    field: &str,
) -> Result<Vec<String>, TableError> {
    let items = section
        .get(field)
        .and_then(Value::as_array)
        .ok_or_else(|| TableError::KeyNotFound {
            path: path.to_path_buf(),
            key: format!("{key}/{field}"),
        })?;

    Ok(items
        .iter()
        .map(|item| item.as_str().unwrap_or_default().to_string())
        .collect())
}

fn number_array(
    section: &Value,
    path: &Path,
    key: &str,
    field: &str,
) -> Result<Vec<f32>, TableError> {
    let items = section
        .get(field)
        .and_then(Value::as_array)
        .ok_or_else(|| TableError::KeyNotFound {
            path: path.to_path_buf(),
            key: format!("{key}/{field}"),
        })?;

    Ok(items
        .iter()
        .map(|item| item.as_f64().unwrap_or_default() as f32)
        .collect())
}

fn scalar_element(root: &Value, path: &Path, field: &str) -> Result<f32, TableError> {
    root.get(field)
        .and_then(Value::as_array)
        .and_then(|items| items.first())
        .and_then(Value::as_f64)
        .map(|v| v as f32)
        .ok_or_else(|| TableError::InvalidScaler {
            path: path.to_path_buf(),
            reason: format!("missing or empty '{field}' array"),
        })
}
