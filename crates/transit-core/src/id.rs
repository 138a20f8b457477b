use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Identifies a shipment owned by a [`TransporterNetwork`](crate::network::TransporterNetwork).
    pub struct ShipmentId;
}

/// Identifies an item type in the registry. Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemTypeId(pub u32);

/// Identifies a property on an item stack (e.g. temperature, charge).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PropertyId(pub u16);

/// Identifies a loaded world (dimension).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorldId(pub u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_type_id_equality() {
        assert_eq!(ItemTypeId(0), ItemTypeId(0));
        assert_ne!(ItemTypeId(0), ItemTypeId(1));
    }

    #[test]
    fn ids_are_hashable() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(ItemTypeId(0), "cobblestone");
        map.insert(ItemTypeId(1), "ender_pearl");
        assert_eq!(map[&ItemTypeId(1)], "ender_pearl");
    }

    #[test]
    fn shipment_ids_are_distinct_per_insert() {
        let mut map: slotmap::SlotMap<ShipmentId, ()> = slotmap::SlotMap::with_key();
        let a = map.insert(());
        let b = map.insert(());
        assert_ne!(a, b);
    }
}
