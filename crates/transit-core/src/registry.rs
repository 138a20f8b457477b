use crate::fixed::Fixed64;
use crate::id::*;
use crate::item::ItemStack;
use std::collections::{HashMap, HashSet};

/// Natural per-stack cap used when a data file does not name one.
pub const DEFAULT_MAX_STACK_SIZE: u32 = 64;

/// Describes a property an item type may carry.
#[derive(Debug, Clone)]
pub struct PropertyDef {
    pub name: String,
    pub default: Fixed64,
}

/// An item type definition in the registry.
#[derive(Debug, Clone)]
pub struct ItemTypeDef {
    pub name: String,
    /// How many units fit in one stack when the container imposes no other limit.
    pub max_stack_size: u32,
    pub properties: Vec<PropertyDef>,
}

/// Builder for constructing an immutable [`ItemRegistry`].
/// Two-phase lifecycle: registration -> finalization.
#[derive(Debug, Default)]
pub struct ItemRegistryBuilder {
    items: Vec<ItemTypeDef>,
    item_name_to_id: HashMap<String, ItemTypeId>,
}

impl ItemRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Phase 1: Register an item type. Returns its ID.
    pub fn register_item(
        &mut self,
        name: &str,
        max_stack_size: u32,
        properties: Vec<PropertyDef>,
    ) -> ItemTypeId {
        let id = ItemTypeId(self.items.len() as u32);
        self.items.push(ItemTypeDef {
            name: name.to_string(),
            max_stack_size,
            properties,
        });
        self.item_name_to_id.entry(name.to_string()).or_insert(id);
        id
    }

    /// Lookup item type ID by name.
    pub fn item_id(&self, name: &str) -> Option<ItemTypeId> {
        self.item_name_to_id.get(name).copied()
    }

    /// Phase 2: Validate and build the immutable registry.
    pub fn build(self) -> Result<ItemRegistry, RegistryError> {
        let mut seen = HashSet::with_capacity(self.items.len());
        for item in &self.items {
            if !seen.insert(item.name.as_str()) {
                return Err(RegistryError::DuplicateName(item.name.clone()));
            }
            if item.max_stack_size == 0 {
                return Err(RegistryError::InvalidStackSize {
                    name: item.name.clone(),
                    size: item.max_stack_size,
                });
            }
        }

        Ok(ItemRegistry {
            items: self.items,
            item_name_to_id: self.item_name_to_id,
        })
    }
}

/// Immutable item registry. Frozen after build(). Thread-safe to share.
#[derive(Debug)]
pub struct ItemRegistry {
    items: Vec<ItemTypeDef>,
    item_name_to_id: HashMap<String, ItemTypeId>,
}

impl ItemRegistry {
    pub fn get_item(&self, id: ItemTypeId) -> Option<&ItemTypeDef> {
        self.items.get(id.0 as usize)
    }

    pub fn item_id(&self, name: &str) -> Option<ItemTypeId> {
        self.item_name_to_id.get(name).copied()
    }

    /// Like [`item_id`](ItemRegistry::item_id), but unknown names are an error.
    pub fn require_item(&self, name: &str) -> Result<ItemTypeId, RegistryError> {
        self.item_id(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Natural per-stack cap of an item type, or `None` if unregistered.
    pub fn max_stack_size(&self, id: ItemTypeId) -> Option<u32> {
        self.get_item(id).map(|item| item.max_stack_size)
    }

    /// Create a stack of a registered item with every property at its default.
    pub fn default_stack(&self, id: ItemTypeId, quantity: u32) -> Result<ItemStack, RegistryError> {
        let def = self.get_item(id).ok_or(RegistryError::InvalidItemRef(id))?;
        let mut stack = ItemStack::new(id, quantity);
        for (index, property) in def.properties.iter().enumerate() {
            stack.set_property(PropertyId(index as u16), property.default);
        }
        Ok(stack)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("duplicate item name: {0}")]
    DuplicateName(String),
    #[error("item '{name}' has invalid max stack size {size}")]
    InvalidStackSize { name: String, size: u32 },
    #[error("invalid item reference: {0:?}")]
    InvalidItemRef(ItemTypeId),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_builder() -> ItemRegistryBuilder {
        let mut b = ItemRegistryBuilder::new();
        b.register_item("cobblestone", 64, vec![]);
        b.register_item("ender_pearl", 16, vec![]);
        b.register_item(
            "energy_tablet",
            1,
            vec![PropertyDef {
                name: "energy".to_string(),
                default: Fixed64::ZERO,
            }],
        );
        b
    }

    #[test]
    fn register_and_build() {
        let reg = setup_builder().build().unwrap();
        assert_eq!(reg.item_count(), 3);
    }

    #[test]
    fn lookup_by_name() {
        let reg = setup_builder().build().unwrap();
        assert_eq!(reg.item_id("ender_pearl"), Some(ItemTypeId(1)));
        assert!(reg.item_id("nonexistent").is_none());
        assert!(matches!(reg.require_item("nonexistent"), Err(RegistryError::NotFound(_))));
    }

    #[test]
    fn max_stack_size_per_item() {
        let reg = setup_builder().build().unwrap();
        assert_eq!(reg.max_stack_size(ItemTypeId(0)), Some(64));
        assert_eq!(reg.max_stack_size(ItemTypeId(1)), Some(16));
        assert_eq!(reg.max_stack_size(ItemTypeId(2)), Some(1));
        assert_eq!(reg.max_stack_size(ItemTypeId(99)), None);
    }

    #[test]
    fn duplicate_names_rejected() {
        let mut b = setup_builder();
        b.register_item("cobblestone", 64, vec![]);
        assert!(matches!(
            b.build(),
            Err(RegistryError::DuplicateName(name)) if name == "cobblestone"
        ));
    }

    #[test]
    fn zero_stack_size_rejected() {
        let mut b = ItemRegistryBuilder::new();
        b.register_item("ghost", 0, vec![]);
        assert!(matches!(
            b.build(),
            Err(RegistryError::InvalidStackSize { size: 0, .. })
        ));
    }

    #[test]
    fn default_stack_applies_property_defaults() {
        let reg = setup_builder().build().unwrap();
        let tablet = reg.default_stack(ItemTypeId(2), 1).unwrap();
        assert_eq!(tablet.get_property(PropertyId(0)), Some(Fixed64::ZERO));
        assert!(matches!(
            reg.default_stack(ItemTypeId(42), 1),
            Err(RegistryError::InvalidItemRef(ItemTypeId(42)))
        ));
    }
}
