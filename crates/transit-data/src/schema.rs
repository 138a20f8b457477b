//! Serde data file structs for item definitions.
//!
//! These structs define the on-disk format. They are deserialized from RON,
//! JSON, or TOML data files and then resolved into engine types by the loader.

use serde::Deserialize;
use transit_core::registry::DEFAULT_MAX_STACK_SIZE;

/// An item type definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemEntry {
    pub name: String,
    #[serde(default = "default_max_stack_size")]
    pub max_stack_size: u32,
    #[serde(default)]
    pub properties: Vec<PropertyEntry>,
}

/// A property an item carries, with its default value.
#[derive(Debug, Clone, Deserialize)]
pub struct PropertyEntry {
    pub name: String,
    #[serde(default)]
    pub default: f64,
}

fn default_max_stack_size() -> u32 {
    DEFAULT_MAX_STACK_SIZE
}

/// TOML wrapper: TOML files need a top-level table, so the list lives under `items`.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlItems {
    pub items: Vec<ItemEntry>,
}

impl From<TomlItems> for Vec<ItemEntry> {
    fn from(file: TomlItems) -> Self {
        file.items
    }
}
