//! Read-only view of a destination inventory.
//!
//! The prediction engine never owns or mutates inventory storage. It only
//! needs five queries, all of which may fail if the inventory has gone away
//! (chunk unloaded, block broken) between scheduling and prediction.

use crate::item::ItemStack;

/// Failure to answer an inventory query. Never retried by this crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleFault {
    #[error("inventory is no longer loaded")]
    Unloaded,
    #[error("slot {slot} out of range (inventory has {slots} slots)")]
    SlotOutOfRange { slot: usize, slots: usize },
    #[error("inventory query failed: {0}")]
    Other(String),
}

/// The primitives consumed from a destination inventory.
///
/// Every method is a pure query: implementations must not change stored
/// contents, including in [`simulate_insert`](InventoryOracle::simulate_insert).
pub trait InventoryOracle {
    /// Number of addressable slots.
    fn slot_count(&self) -> Result<usize, OracleFault>;

    /// Advertised capacity of a slot. May overstate what the slot really
    /// accepts for a given item; see [`crate::simulate`].
    fn slot_limit(&self, slot: usize) -> Result<u32, OracleFault>;

    /// Current contents of a slot. An empty slot yields an empty stack.
    fn stack_in_slot(&self, slot: usize) -> Result<ItemStack, OracleFault>;

    /// Whether `stack`'s item type may ever go in `slot`.
    fn is_item_valid(&self, slot: usize, stack: &ItemStack) -> Result<bool, OracleFault>;

    /// Dry-run insert of the whole `stack` into `slot`; returns the number of
    /// units that would be rejected.
    fn simulate_insert(&self, slot: usize, stack: &ItemStack) -> Result<u32, OracleFault>;
}

impl<T: InventoryOracle + ?Sized> InventoryOracle for &T {
    fn slot_count(&self) -> Result<usize, OracleFault> {
        (**self).slot_count()
    }

    fn slot_limit(&self, slot: usize) -> Result<u32, OracleFault> {
        (**self).slot_limit(slot)
    }

    fn stack_in_slot(&self, slot: usize) -> Result<ItemStack, OracleFault> {
        (**self).stack_in_slot(slot)
    }

    fn is_item_valid(&self, slot: usize, stack: &ItemStack) -> Result<bool, OracleFault> {
        (**self).is_item_valid(slot, stack)
    }

    fn simulate_insert(&self, slot: usize, stack: &ItemStack) -> Result<u32, OracleFault> {
        (**self).simulate_insert(slot, stack)
    }
}
