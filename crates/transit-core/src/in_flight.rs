//! Index of shipments currently en route, grouped by destination.
//!
//! The registry is an explicit value rather than process-wide state: whoever
//! owns shipment lifecycle (normally a [`TransporterNetwork`]) owns one, and
//! predictions borrow it immutably. Because a prediction holds `&InFlightRegistry`
//! for its whole pass, the borrow checker rules out adds or removes while a
//! destination's set is being iterated.
//!
//! [`TransporterNetwork`]: crate::network::TransporterNetwork

use crate::id::ShipmentId;
use crate::shipment::{DestinationKey, Shipment};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Default)]
pub struct InFlightRegistry {
    by_destination: HashMap<DestinationKey, BTreeMap<ShipmentId, Shipment>>,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every entry (world reload).
    pub fn reset_all(&mut self) {
        self.by_destination.clear();
    }

    /// Track `shipment` as heading to `destination`. Re-registering the same
    /// id replaces the stored copy.
    pub fn register(&mut self, destination: DestinationKey, shipment: Shipment) {
        self.by_destination
            .entry(destination)
            .or_default()
            .insert(shipment.id, shipment);
    }

    /// Stop tracking `shipment`, but only if it is still routed (has a path
    /// that is not [`PathKind::None`](crate::shipment::PathKind::None)).
    /// Returns `true` if an entry was removed.
    pub fn unregister(&mut self, destination: DestinationKey, shipment: &Shipment) -> bool {
        if !shipment.is_routed() {
            return false;
        }
        self.remove(destination, shipment.id).is_some()
    }

    /// Remove a shipment by id. No-op if absent.
    pub fn remove(&mut self, destination: DestinationKey, id: ShipmentId) -> Option<Shipment> {
        let set = self.by_destination.get_mut(&destination)?;
        let removed = set.remove(&id);
        if set.is_empty() {
            self.by_destination.remove(&destination);
        }
        removed
    }

    /// Shipments currently heading to `destination`, in id order.
    pub fn shipments_for(&self, destination: &DestinationKey) -> impl Iterator<Item = &Shipment> {
        self.by_destination
            .get(destination)
            .into_iter()
            .flat_map(|set| set.values())
    }

    pub fn contains(&self, destination: &DestinationKey, id: ShipmentId) -> bool {
        self.by_destination
            .get(destination)
            .is_some_and(|set| set.contains_key(&id))
    }

    /// Number of destinations with at least one shipment.
    pub fn destination_count(&self) -> usize {
        self.by_destination.len()
    }

    /// Total tracked shipments.
    pub fn len(&self) -> usize {
        self.by_destination.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_destination.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shipment::{BlockPos, PathKind, Side};
    use crate::test_utils::*;
    use slotmap::SlotMap;

    fn shipments(n: usize) -> Vec<Shipment> {
        let mut ids: SlotMap<ShipmentId, ()> = SlotMap::with_key();
        (0..n)
            .map(|_| Shipment {
                id: ids.insert(()),
                stack: stack(cobble(), 16),
                destination: BlockPos::new(1, 64, 0),
                side: Side::Up,
                has_path: true,
                path_kind: PathKind::Active,
            })
            .collect()
    }

    #[test]
    fn register_groups_by_destination() {
        let mut reg = InFlightRegistry::new();
        let s = shipments(3);
        reg.register(dest(1), s[0].clone());
        reg.register(dest(1), s[1].clone());
        reg.register(dest(2), s[2].clone());
        assert_eq!(reg.len(), 3);
        assert_eq!(reg.destination_count(), 2);
        assert_eq!(reg.shipments_for(&dest(1)).count(), 2);
        assert_eq!(reg.shipments_for(&dest(3)).count(), 0);
    }

    #[test]
    fn register_same_id_replaces() {
        let mut reg = InFlightRegistry::new();
        let mut s = shipments(1).remove(0);
        reg.register(dest(1), s.clone());
        s.stack.quantity = 4;
        reg.register(dest(1), s.clone());
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.shipments_for(&dest(1)).next().unwrap().stack.quantity, 4);
    }

    #[test]
    fn unregister_removes_and_drops_empty_sets() {
        let mut reg = InFlightRegistry::new();
        let s = shipments(1).remove(0);
        reg.register(dest(1), s.clone());
        assert!(reg.unregister(dest(1), &s));
        assert!(reg.is_empty());
        assert_eq!(reg.destination_count(), 0);
        // Second removal is a no-op.
        assert!(!reg.unregister(dest(1), &s));
    }

    #[test]
    fn unregister_ignores_unrouted_shipments() {
        let mut reg = InFlightRegistry::new();
        let mut s = shipments(1).remove(0);
        reg.register(dest(1), s.clone());
        s.path_kind = PathKind::None;
        assert!(!reg.unregister(dest(1), &s));
        assert!(reg.contains(&dest(1), s.id));
        // The raw removal still works.
        assert!(reg.remove(dest(1), s.id).is_some());
        assert!(!reg.contains(&dest(1), s.id));
    }

    #[test]
    fn reset_all_clears_everything() {
        let mut reg = InFlightRegistry::new();
        for s in shipments(4) {
            reg.register(dest(1), s);
        }
        reg.reset_all();
        assert!(reg.is_empty());
        assert_eq!(reg.len(), 0);
    }

    #[test]
    fn iteration_order_is_stable() {
        let mut reg = InFlightRegistry::new();
        let s = shipments(3);
        for shipment in s.iter().rev() {
            reg.register(dest(1), shipment.clone());
        }
        let first: Vec<_> = reg.shipments_for(&dest(1)).map(|s| s.id).collect();
        let second: Vec<_> = reg.shipments_for(&dest(1)).map(|s| s.id).collect();
        assert_eq!(first, second);
    }
}
