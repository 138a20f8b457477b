//! Data-driven configuration for the transit engine.
//!
//! Item definitions (name, natural stack cap, property defaults) live in a
//! single `items.ron`, `items.toml`, or `items.json` file and are resolved
//! into an immutable [`transit_core::registry::ItemRegistry`].

pub mod loader;
pub mod schema;

pub use loader::{DataLoadError, load_item_registry};
