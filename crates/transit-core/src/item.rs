use crate::fixed::Fixed64;
use crate::id::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A stack of items of one type with optional per-stack properties.
///
/// A stack with `quantity == 0` is empty. Two stacks only merge into the same
/// slot when [`is_stackable_with`](ItemStack::is_stackable_with) holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item_type: ItemTypeId,
    pub quantity: u32,
    /// Per-stack properties (e.g. stored energy, enchantment level).
    /// Stacks with different properties never merge.
    #[serde(default)]
    pub properties: BTreeMap<PropertyId, Fixed64>,
}

impl ItemStack {
    pub fn new(item_type: ItemTypeId, quantity: u32) -> Self {
        Self {
            item_type,
            quantity,
            properties: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.quantity == 0
    }

    pub fn set_property(&mut self, id: PropertyId, value: Fixed64) {
        self.properties.insert(id, value);
    }

    pub fn get_property(&self, id: PropertyId) -> Option<Fixed64> {
        self.properties.get(&id).copied()
    }

    /// Builder-style variant of [`set_property`](ItemStack::set_property).
    pub fn with_property(mut self, id: PropertyId, value: Fixed64) -> Self {
        self.set_property(id, value);
        self
    }

    /// A copy of this stack resized to `quantity`. Type and properties are kept.
    pub fn with_quantity(&self, quantity: u32) -> Self {
        Self {
            item_type: self.item_type,
            quantity,
            properties: self.properties.clone(),
        }
    }

    /// Returns `true` if both stacks are non-empty and could share a slot:
    /// same item type and identical properties. Quantities are ignored.
    pub fn is_stackable_with(&self, other: &ItemStack) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.item_type == other.item_type
            && self.properties == other.properties
    }
}
