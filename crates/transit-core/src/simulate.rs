//! Cumulative insertion simulation.
//!
//! An inventory's own dry-run insert only answers for one stack against the
//! inventory's *current* contents. To account for several stacks converging on
//! the same destination we replay them one after another against an
//! [`InventorySnapshot`], using cheap stacking rules where they are conclusive
//! and falling back to a real dry-run insert (a *calibration probe*) where
//! they are not.
//!
//! # Calibration
//!
//! A probe is needed when:
//!
//! - the slot is empty in the snapshot (we cannot tell whether this item is
//!   accepted there at all);
//! - the slot advertises more room than the item's natural stack cap and the
//!   merged stack would exceed that cap (many inventories advertise a flat
//!   limit but clamp to the item's cap on insert);
//! - the stack is a new request rather than an in-flight replay (the
//!   inventory may be refusing input for reasons `is_item_valid` does not
//!   capture).
//!
//! When the merged stack crosses the item's cap and the request itself fits in
//! one stack, the probe is inflated to `cap + 1` units so that a slot whose
//! real limit is the cap reveals itself by rejecting the extra unit.

use crate::item::ItemStack;
use crate::oracle::{InventoryOracle, OracleFault};
use crate::snapshot::InventorySnapshot;
use std::borrow::Cow;

/// Which accuracy rules apply to a simulated stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationMode {
    /// Replaying a shipment that is already on its way. Partially filled,
    /// stackable slots are trusted without probing.
    InFlight,
    /// Evaluating a new request before anything is sent. Every slot that
    /// would receive items is probed.
    Request,
}

/// Simulate inserting `count` units of `stack` into the destination described
/// by `oracle` and `snapshot`, updating the snapshot's projected counts.
///
/// `count` may be larger or smaller than `stack.quantity`; only the stack's
/// identity is used, except as the starting probe size. `max_stack_size` is
/// the item's natural per-stack cap.
///
/// Returns the number of units that would be left over.
pub fn simulate_insert<I: InventoryOracle + ?Sized>(
    oracle: &I,
    snapshot: &mut InventorySnapshot,
    stack: &ItemStack,
    mut count: u32,
    max_stack_size: u32,
    mode: SimulationMode,
) -> Result<u32, OracleFault> {
    // The probe is resized at most once and then reused for later slots.
    let mut probe: Cow<'_, ItemStack> = if stack.is_empty() {
        Cow::Owned(stack.with_quantity(count))
    } else {
        Cow::Borrowed(stack)
    };

    for slot in 0..snapshot.len() {
        if count == 0 {
            break;
        }
        let mut max = oracle.slot_limit(slot)?;
        if let Some(ceiling) = snapshot.ceiling(slot) {
            max = max.min(ceiling);
        }
        if max == 0 {
            continue;
        }
        if !oracle.is_item_valid(slot, &probe)? {
            continue;
        }

        let dest_count = snapshot.projected_count(slot);
        let merged = u64::from(count) + u64::from(dest_count);
        let mut to_accept = count;
        let needs_probe = if dest_count > 0 {
            if !snapshot.representative(slot).is_stackable_with(&probe) || dest_count >= max {
                continue;
            }
            if max > max_stack_size && merged > u64::from(max_stack_size) {
                if count <= max_stack_size {
                    if probe.quantity <= max_stack_size {
                        probe = Cow::Owned(stack.with_quantity(max_stack_size + 1));
                    }
                    to_accept = probe.quantity;
                } else if probe.quantity <= max_stack_size {
                    probe = Cow::Owned(stack.with_quantity(count));
                }
                true
            } else {
                mode == SimulationMode::Request
            }
        } else {
            true
        };

        if needs_probe {
            let remainder = oracle.simulate_insert(slot, &probe)?;
            let accepted = probe.quantity.saturating_sub(remainder);
            if accepted == 0 {
                continue;
            }
            // A short answer only reveals a limit if the probe offered enough.
            if accepted < to_accept.min(probe.quantity) {
                // The probe ran against the live slot, not the projection, so
                // the real ceiling is what the slot held when captured plus
                // what it took. Speculative units never reached the inventory.
                let ceiling = snapshot.captured_count(slot).saturating_add(accepted);
                if ceiling < max {
                    tracing::debug!(
                        slot,
                        advertised = max,
                        ceiling,
                        "slot limit tightened by probe"
                    );
                    max = ceiling;
                    snapshot.tighten_ceiling(slot, ceiling);
                }
                if dest_count >= max {
                    continue;
                }
            }
            if dest_count == 0 {
                snapshot.set_representative(slot, &probe);
            }
        }

        if merged > u64::from(max) {
            snapshot.set_projected_count(slot, max);
            // dest_count < max here, so the remainder is below `count`.
            count = (merged - u64::from(max)) as u32;
        } else {
            snapshot.set_projected_count(slot, merged as u32);
            return Ok(0);
        }
    }

    Ok(count)
}
