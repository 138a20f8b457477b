//! Resolution pipeline: finds the item data file, deserializes it, and builds
//! the registry.
//!
//! Provides format detection (RON/JSON/TOML), file discovery, and
//! deserialization helpers.

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use transit_core::fixed::checked_f64_to_fixed64;
use transit_core::registry::{ItemRegistry, ItemRegistryBuilder, PropertyDef, RegistryError};

use crate::schema::{ItemEntry, TomlItems};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required data file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: String, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A duplicate name was found.
    #[error("duplicate name '{name}' in {file}")]
    DuplicateName { file: PathBuf, name: String },

    /// A property default cannot be represented as a fixed-point value.
    #[error("item '{item}' in {file}: property '{name}' default {value} is out of range")]
    InvalidProperty {
        file: PathBuf,
        item: String,
        name: String,
        value: f64,
    },

    /// The resolved definitions were rejected by the registry.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for a data file with the given base name (without extension).
///
/// Looks for `{base_name}.ron`, `{base_name}.toml`, and `{base_name}.json`.
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// multiple formats exist for the same base name.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;

    for ext in ["ron", "toml", "json"] {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing,
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

/// Like [`find_data_file`], but returns an error if no file is found.
pub fn require_data_file(dir: &Path, base_name: &str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name.to_string(),
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

fn parse_error(path: &Path, detail: impl ToString) -> DataLoadError {
    DataLoadError::Parse {
        file: path.to_path_buf(),
        detail: detail.to_string(),
    }
}

/// Deserialize a list from a file. TOML files need a top-level table, so they
/// are read as the wrapper `W` and unwrapped. RON and JSON deserialize
/// directly as `Vec<T>`.
pub fn deserialize_list<T, W>(path: &Path) -> Result<Vec<T>, DataLoadError>
where
    T: DeserializeOwned,
    W: DeserializeOwned + Into<Vec<T>>,
{
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => toml::from_str::<W>(&content)
            .map(Into::into)
            .map_err(|e| parse_error(path, e)),
    }
}

// ===========================================================================
// Registry resolution
// ===========================================================================

/// Build a registry from already-parsed entries. `file` is only used for
/// error reporting.
pub fn resolve_items(entries: &[ItemEntry], file: &Path) -> Result<ItemRegistry, DataLoadError> {
    let mut seen: HashMap<&str, ()> = HashMap::with_capacity(entries.len());
    let mut builder = ItemRegistryBuilder::new();

    for entry in entries {
        if seen.insert(entry.name.as_str(), ()).is_some() {
            return Err(DataLoadError::DuplicateName {
                file: file.to_path_buf(),
                name: entry.name.clone(),
            });
        }
        let properties = entry
            .properties
            .iter()
            .map(|p| {
                let default = checked_f64_to_fixed64(p.default).ok_or_else(|| {
                    DataLoadError::InvalidProperty {
                        file: file.to_path_buf(),
                        item: entry.name.clone(),
                        name: p.name.clone(),
                        value: p.default,
                    }
                })?;
                Ok(PropertyDef {
                    name: p.name.clone(),
                    default,
                })
            })
            .collect::<Result<Vec<_>, DataLoadError>>()?;
        builder.register_item(&entry.name, entry.max_stack_size, properties);
    }

    Ok(builder.build()?)
}

/// Load `items.{ron,toml,json}` from `dir` into an [`ItemRegistry`].
pub fn load_item_registry(dir: &Path) -> Result<ItemRegistry, DataLoadError> {
    let path = require_data_file(dir, "items")?;
    let entries = deserialize_list::<ItemEntry, TomlItems>(&path)?;
    let registry = resolve_items(&entries, &path)?;
    tracing::debug!(file = %path.display(), items = registry.item_count(), "loaded item registry");
    Ok(registry)
}

// ===========================================================================
// Tests
// ===========================================================================
