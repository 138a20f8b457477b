//! Shared test helpers for unit tests, integration tests, and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::id::*;
use crate::item::ItemStack;
use crate::oracle::{InventoryOracle, OracleFault};
use crate::registry::{ItemRegistry, ItemRegistryBuilder};
use crate::shipment::{BlockPos, DestinationKey};
use std::cell::Cell;

// ===========================================================================
// Item constructors
// ===========================================================================

/// Stacks to 64.
pub fn cobble() -> ItemTypeId {
    ItemTypeId(0)
}
/// Stacks to 16.
pub fn pearl() -> ItemTypeId {
    ItemTypeId(1)
}
/// Stacks to 1.
pub fn tablet() -> ItemTypeId {
    ItemTypeId(2)
}
/// Stacks to 64.
pub fn ingot() -> ItemTypeId {
    ItemTypeId(3)
}

/// Registry holding the items above, in id order.
pub fn test_registry() -> ItemRegistry {
    let mut b = ItemRegistryBuilder::new();
    b.register_item("cobblestone", 64, vec![]);
    b.register_item("ender_pearl", 16, vec![]);
    b.register_item("energy_tablet", 1, vec![]);
    b.register_item("osmium_ingot", 64, vec![]);
    b.build().expect("test registry is valid")
}

pub fn stack(item: ItemTypeId, quantity: u32) -> ItemStack {
    ItemStack::new(item, quantity)
}

fn natural_cap(item: ItemTypeId) -> u32 {
    match item.0 {
        1 => 16,
        2 => 1,
        _ => 64,
    }
}

// ===========================================================================
// Destinations
// ===========================================================================

pub fn dest(x: i32) -> DestinationKey {
    DestinationKey::new(WorldId(0), BlockPos::new(x, 64, 0))
}

// ===========================================================================
// In-memory inventory
// ===========================================================================

/// One slot of a [`TestInventory`].
#[derive(Debug, Clone)]
pub struct TestSlot {
    pub contents: ItemStack,
    /// Limit reported by `slot_limit`.
    pub limit: u32,
    /// Limit actually enforced on insert, if lower than `limit`.
    pub hidden_limit: Option<u32>,
    /// Only this item type passes `is_item_valid`.
    pub filter: Option<ItemTypeId>,
    /// Valid but currently refusing all input.
    pub locked: bool,
}

impl TestSlot {
    pub fn empty(limit: u32) -> Self {
        Self {
            contents: ItemStack::new(ItemTypeId(0), 0),
            limit,
            hidden_limit: None,
            filter: None,
            locked: false,
        }
    }

    pub fn holding(contents: ItemStack, limit: u32) -> Self {
        Self {
            contents,
            ..Self::empty(limit)
        }
    }

    pub fn only(mut self, item: ItemTypeId) -> Self {
        self.filter = Some(item);
        self
    }

    pub fn true_limit(mut self, limit: u32) -> Self {
        self.hidden_limit = Some(limit);
        self
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    fn accepts_type(&self, stack: &ItemStack) -> bool {
        self.filter.is_none_or(|f| f == stack.item_type)
    }
}

/// A configurable inventory implementing [`InventoryOracle`], with call
/// counters and fault injection.
#[derive(Debug)]
pub struct TestInventory {
    slots: Vec<TestSlot>,
    honor_stack_caps: bool,
    unloaded: bool,
    fail_probes: bool,
    probes: Cell<usize>,
    valid_checks: Cell<usize>,
    last_probe: Cell<Option<u32>>,
}

impl TestInventory {
    pub fn new(slots: Vec<TestSlot>) -> Self {
        Self {
            slots,
            honor_stack_caps: false,
            unloaded: false,
            fail_probes: false,
            probes: Cell::new(0),
            valid_checks: Cell::new(0),
            last_probe: Cell::new(None),
        }
    }

    /// `n` empty slots, each with limit `limit`.
    pub fn uniform(n: usize, limit: u32) -> Self {
        Self::new((0..n).map(|_| TestSlot::empty(limit)).collect())
    }

    /// Clamp inserts to the item's natural stack cap regardless of slot limit.
    pub fn honoring_stack_caps(mut self) -> Self {
        self.honor_stack_caps = true;
        self
    }

    /// Every query fails with [`OracleFault::Unloaded`].
    pub fn unloaded(mut self) -> Self {
        self.unloaded = true;
        self
    }

    /// `simulate_insert` fails; other queries still answer.
    pub fn failing_probes(mut self) -> Self {
        self.fail_probes = true;
        self
    }

    pub fn quantity_in(&self, slot: usize) -> u32 {
        self.slots[slot].contents.quantity
    }

    pub fn total_quantity(&self) -> u64 {
        self.slots.iter().map(|s| u64::from(s.contents.quantity)).sum()
    }

    pub fn probe_count(&self) -> usize {
        self.probes.get()
    }

    pub fn valid_checks(&self) -> usize {
        self.valid_checks.get()
    }

    pub fn last_probe_size(&self) -> Option<u32> {
        self.last_probe.get()
    }

    fn check(&self, slot: usize) -> Result<&TestSlot, OracleFault> {
        if self.unloaded {
            return Err(OracleFault::Unloaded);
        }
        self.slots.get(slot).ok_or(OracleFault::SlotOutOfRange {
            slot,
            slots: self.slots.len(),
        })
    }

    fn room_for(&self, slot: &TestSlot, stack: &ItemStack) -> u32 {
        if slot.locked || !slot.accepts_type(stack) {
            return 0;
        }
        if !slot.contents.is_empty() && !slot.contents.is_stackable_with(stack) {
            return 0;
        }
        let mut limit = slot.limit;
        if let Some(hidden) = slot.hidden_limit {
            limit = limit.min(hidden);
        }
        if self.honor_stack_caps {
            limit = limit.min(natural_cap(stack.item_type));
        }
        limit.saturating_sub(slot.contents.quantity)
    }

    /// Really insert `stack` into `slot`. Returns the amount that did not fit.
    pub fn insert(&mut self, slot: usize, stack: &ItemStack) -> u32 {
        let accepted = self.room_for(&self.slots[slot], stack).min(stack.quantity);
        if accepted > 0 {
            let contents = &mut self.slots[slot].contents;
            if contents.is_empty() {
                *contents = stack.with_quantity(accepted);
            } else {
                contents.quantity += accepted;
            }
        }
        stack.quantity - accepted
    }

    /// Really insert `stack` slot by slot, in order. Returns the leftover.
    pub fn insert_anywhere(&mut self, stack: &ItemStack) -> u32 {
        let mut remaining = stack.quantity;
        for slot in 0..self.slots.len() {
            if remaining == 0 {
                break;
            }
            remaining = self.insert(slot, &stack.with_quantity(remaining));
        }
        remaining
    }

    /// Take up to `quantity` units out of `slot`.
    pub fn extract(&mut self, slot: usize, quantity: u32) -> u32 {
        let contents = &mut self.slots[slot].contents;
        let taken = quantity.min(contents.quantity);
        contents.quantity -= taken;
        taken
    }
}

impl InventoryOracle for TestInventory {
    fn slot_count(&self) -> Result<usize, OracleFault> {
        if self.unloaded {
            return Err(OracleFault::Unloaded);
        }
        Ok(self.slots.len())
    }

    fn slot_limit(&self, slot: usize) -> Result<u32, OracleFault> {
        Ok(self.check(slot)?.limit)
    }

    fn stack_in_slot(&self, slot: usize) -> Result<ItemStack, OracleFault> {
        Ok(self.check(slot)?.contents.clone())
    }

    fn is_item_valid(&self, slot: usize, stack: &ItemStack) -> Result<bool, OracleFault> {
        self.valid_checks.set(self.valid_checks.get() + 1);
        Ok(self.check(slot)?.accepts_type(stack))
    }

    fn simulate_insert(&self, slot: usize, stack: &ItemStack) -> Result<u32, OracleFault> {
        let target = self.check(slot)?;
        if self.fail_probes {
            return Err(OracleFault::Other("probe failed".to_string()));
        }
        self.probes.set(self.probes.get() + 1);
        self.last_probe.set(Some(stack.quantity));
        let accepted = self.room_for(target, stack).min(stack.quantity);
        Ok(stack.quantity - accepted)
    }
}
