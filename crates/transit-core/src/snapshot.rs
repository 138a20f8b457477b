//! Read-once capture of a destination inventory.
//!
//! A snapshot is built at the start of one prediction and thrown away at the
//! end. Its slot count and slot order are fixed at construction; the
//! simulator only ever updates projected counts, probe-learned ceilings and,
//! for slots that were empty, the representative item.

use crate::item::ItemStack;
use crate::oracle::{InventoryOracle, OracleFault};

/// Simulation state for one slot.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotProjection {
    /// Count read from the live inventory when the snapshot was taken.
    captured: u32,
    /// Single-unit stand-in used only for stackability checks. Empty when the
    /// slot holds nothing real or speculative.
    representative: ItemStack,
    /// Count the slot is expected to hold once everything simulated so far lands.
    projected: u32,
    /// Real limit learned from a calibration probe, when lower than advertised.
    ceiling: Option<u32>,
}

/// Per-slot contents of a destination, mutated only in local memory.
#[derive(Debug, Clone, PartialEq)]
pub struct InventorySnapshot {
    slots: Vec<SlotProjection>,
}

impl InventorySnapshot {
    /// Read every slot of `oracle` once. Any fault aborts the capture.
    pub fn capture<I: InventoryOracle + ?Sized>(oracle: &I) -> Result<Self, OracleFault> {
        let slot_count = oracle.slot_count()?;
        let mut slots = Vec::with_capacity(slot_count);
        for slot in 0..slot_count {
            let stack = oracle.stack_in_slot(slot)?;
            let captured = stack.quantity;
            let representative = if stack.is_empty() {
                stack
            } else {
                stack.with_quantity(1)
            };
            slots.push(SlotProjection {
                captured,
                representative,
                projected: captured,
                ceiling: None,
            });
        }
        Ok(Self { slots })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Count the live inventory held in `slot` when captured.
    pub fn captured_count(&self, slot: usize) -> u32 {
        self.slots[slot].captured
    }

    /// Stand-in for the item occupying `slot`, for stackability comparisons.
    pub fn representative(&self, slot: usize) -> &ItemStack {
        &self.slots[slot].representative
    }

    /// Record `stack`'s identity as what now occupies a previously empty slot.
    /// Only a single unit is kept, whatever the size of `stack`.
    pub fn set_representative(&mut self, slot: usize, stack: &ItemStack) {
        self.slots[slot].representative = stack.with_quantity(1);
    }

    pub fn projected_count(&self, slot: usize) -> u32 {
        self.slots[slot].projected
    }

    pub fn set_projected_count(&mut self, slot: usize, count: u32) {
        self.slots[slot].projected = count;
    }

    /// Real limit of `slot` learned earlier in this pass, if any.
    pub fn ceiling(&self, slot: usize) -> Option<u32> {
        self.slots[slot].ceiling
    }

    /// Record a real limit for `slot`. A later, looser ceiling never widens it.
    pub fn tighten_ceiling(&mut self, slot: usize, ceiling: u32) {
        let entry = &mut self.slots[slot].ceiling;
        *entry = Some(entry.map_or(ceiling, |known| known.min(ceiling)));
    }

    /// Sum of projected counts over all slots.
    pub fn projected_total(&self) -> u64 {
        self.slots.iter().map(|s| u64::from(s.projected)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn capture_reads_every_slot() {
        let inv = TestInventory::new(vec![
            TestSlot::holding(stack(cobble(), 10), 64),
            TestSlot::empty(64),
            TestSlot::holding(stack(pearl(), 3), 16),
        ]);
        let snap = InventorySnapshot::capture(&inv).unwrap();
        assert_eq!(snap.len(), 3);
        assert_eq!(snap.projected_count(0), 10);
        assert_eq!(snap.projected_count(1), 0);
        assert_eq!(snap.captured_count(2), 3);
        assert_eq!(snap.projected_total(), 13);
    }

    #[test]
    fn representative_is_single_unit() {
        let inv = TestInventory::new(vec![TestSlot::holding(stack(cobble(), 40), 64)]);
        let snap = InventorySnapshot::capture(&inv).unwrap();
        assert_eq!(snap.representative(0).quantity, 1);
        assert_eq!(snap.representative(0).item_type, cobble());
        assert_eq!(snap.captured_count(0), 40);
    }

    #[test]
    fn empty_slot_has_empty_representative() {
        let inv = TestInventory::new(vec![TestSlot::empty(64)]);
        let snap = InventorySnapshot::capture(&inv).unwrap();
        assert!(snap.representative(0).is_empty());
    }

    #[test]
    fn set_representative_never_records_more_than_one() {
        let inv = TestInventory::new(vec![TestSlot::empty(64)]);
        let mut snap = InventorySnapshot::capture(&inv).unwrap();
        snap.set_representative(0, &stack(cobble(), 65));
        assert_eq!(snap.representative(0).quantity, 1);
        // Projected count is tracked independently.
        assert_eq!(snap.projected_count(0), 0);
    }

    #[test]
    fn mutation_does_not_touch_live_inventory() {
        let inv = TestInventory::new(vec![TestSlot::holding(stack(cobble(), 5), 64)]);
        let mut snap = InventorySnapshot::capture(&inv).unwrap();
        snap.set_projected_count(0, 64);
        assert_eq!(inv.quantity_in(0), 5);
        assert_eq!(snap.captured_count(0), 5);
    }

    #[test]
    fn ceiling_only_tightens() {
        let inv = TestInventory::new(vec![TestSlot::empty(64), TestSlot::empty(64)]);
        let mut snap = InventorySnapshot::capture(&inv).unwrap();
        assert_eq!(snap.ceiling(0), None);
        snap.tighten_ceiling(0, 16);
        snap.tighten_ceiling(0, 32);
        assert_eq!(snap.ceiling(0), Some(16));
        assert_eq!(snap.ceiling(1), None);
    }

    #[test]
    fn capture_propagates_faults() {
        let inv = TestInventory::new(vec![TestSlot::empty(64)]).unloaded();
        assert_eq!(InventorySnapshot::capture(&inv), Err(OracleFault::Unloaded));
    }
}
