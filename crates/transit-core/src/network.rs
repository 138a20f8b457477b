//! Shipment lifecycle for one world.
//!
//! The network owns every shipment it launches and keeps the
//! [`InFlightRegistry`] in step with routing changes: a shipment is indexed
//! under its destination exactly while it is routed, and leaves the index when
//! it is delivered, cancelled, loses its path, or is sent elsewhere.

use crate::id::{ShipmentId, WorldId};
use crate::in_flight::InFlightRegistry;
use crate::item::ItemStack;
use crate::oracle::InventoryOracle;
use crate::predict::AdmissionController;
use crate::registry::ItemRegistry;
use crate::request::{TransitRequest, TransitResponse};
use crate::shipment::{BlockPos, DestinationKey, PathKind, Shipment, Side};
use slotmap::SlotMap;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    #[error("shipment not found: {0:?}")]
    UnknownShipment(ShipmentId),
}

#[derive(Debug)]
pub struct TransporterNetwork {
    world: WorldId,
    shipments: SlotMap<ShipmentId, Shipment>,
    in_flight: InFlightRegistry,
}

impl TransporterNetwork {
    pub fn new(world: WorldId) -> Self {
        Self {
            world,
            shipments: SlotMap::with_key(),
            in_flight: InFlightRegistry::new(),
        }
    }

    pub fn world(&self) -> WorldId {
        self.world
    }

    pub fn in_flight(&self) -> &InFlightRegistry {
        &self.in_flight
    }

    pub fn get(&self, id: ShipmentId) -> Option<&Shipment> {
        self.shipments.get(id)
    }

    pub fn len(&self) -> usize {
        self.shipments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shipments.is_empty()
    }

    fn key(&self, pos: BlockPos) -> DestinationKey {
        DestinationKey::new(self.world, pos)
    }

    /// Start a shipment of `stack` toward `destination`, entering through `side`.
    pub fn launch(
        &mut self,
        stack: ItemStack,
        destination: BlockPos,
        side: Side,
        path_kind: PathKind,
    ) -> ShipmentId {
        let id = self.shipments.insert_with_key(|id| Shipment {
            id,
            stack,
            destination,
            side,
            has_path: path_kind != PathKind::None,
            path_kind,
        });
        self.track(id);
        id
    }

    /// Point an existing shipment at a new destination (or the same one with a
    /// different side or classification).
    pub fn reroute(
        &mut self,
        id: ShipmentId,
        destination: BlockPos,
        side: Side,
        path_kind: PathKind,
    ) -> Result<(), NetworkError> {
        self.untrack(id)?;
        let shipment = self.shipments.get_mut(id).ok_or(NetworkError::UnknownShipment(id))?;
        shipment.destination = destination;
        shipment.side = side;
        shipment.has_path = path_kind != PathKind::None;
        shipment.path_kind = path_kind;
        self.track(id);
        Ok(())
    }

    /// The shipment lost its route; it stays owned but is no longer in flight.
    pub fn clear_path(&mut self, id: ShipmentId) -> Result<(), NetworkError> {
        self.untrack(id)?;
        let shipment = self.shipments.get_mut(id).ok_or(NetworkError::UnknownShipment(id))?;
        shipment.has_path = false;
        shipment.path_kind = PathKind::None;
        Ok(())
    }

    /// The shipment reached its destination.
    pub fn complete(&mut self, id: ShipmentId) -> Result<Shipment, NetworkError> {
        self.untrack(id)?;
        self.shipments.remove(id).ok_or(NetworkError::UnknownShipment(id))
    }

    /// The shipment was dropped or destroyed en route.
    pub fn cancel(&mut self, id: ShipmentId) -> Result<Shipment, NetworkError> {
        let shipment = self.complete(id)?;
        tracing::debug!(?id, quantity = shipment.stack.quantity, "shipment cancelled");
        Ok(shipment)
    }

    /// Forget every shipment (world reload).
    pub fn reset(&mut self) {
        self.shipments.clear();
        self.in_flight.reset_all();
    }

    /// Predict what `destination` accepts from `request`, given this network's
    /// shipments in flight.
    pub fn predict<I: InventoryOracle + ?Sized>(
        &self,
        items: &ItemRegistry,
        destination: BlockPos,
        side: Side,
        oracle: &I,
        request: &TransitRequest,
    ) -> TransitResponse {
        AdmissionController::new(items, &self.in_flight).predict(
            &self.key(destination),
            side,
            oracle,
            request,
        )
    }

    fn track(&mut self, id: ShipmentId) {
        if let Some(shipment) = self.shipments.get(id) {
            if shipment.is_routed() {
                let key = self.key(shipment.destination);
                self.in_flight.register(key, shipment.clone());
            }
        }
    }

    fn untrack(&mut self, id: ShipmentId) -> Result<(), NetworkError> {
        let shipment = self.shipments.get(id).ok_or(NetworkError::UnknownShipment(id))?;
        let key = self.key(shipment.destination);
        self.in_flight.unregister(key, shipment);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    fn target() -> BlockPos {
        BlockPos::new(1, 64, 0)
    }

    #[test]
    fn launch_tracks_routed_shipments() {
        let mut net = TransporterNetwork::new(WorldId(0));
        let id = net.launch(stack(cobble(), 16), target(), Side::Up, PathKind::Active);
        assert!(net.in_flight().contains(&dest(1), id));
        assert_eq!(net.len(), 1);
    }

    #[test]
    fn launch_without_path_is_not_tracked() {
        let mut net = TransporterNetwork::new(WorldId(0));
        let id = net.launch(stack(cobble(), 16), target(), Side::Up, PathKind::None);
        assert!(net.in_flight().is_empty());
        assert!(!net.get(id).unwrap().has_path);
    }

    #[test]
    fn reroute_moves_index_entry() {
        let mut net = TransporterNetwork::new(WorldId(0));
        let id = net.launch(stack(cobble(), 16), target(), Side::Up, PathKind::Active);
        let elsewhere = BlockPos::new(2, 64, 0);
        net.reroute(id, elsewhere, Side::North, PathKind::Home).unwrap();
        assert!(!net.in_flight().contains(&dest(1), id));
        assert!(net.in_flight().contains(&dest(2), id));
        assert_eq!(net.get(id).unwrap().side, Side::North);
    }

    #[test]
    fn clear_path_untracks_but_keeps_shipment() {
        let mut net = TransporterNetwork::new(WorldId(0));
        let id = net.launch(stack(cobble(), 16), target(), Side::Up, PathKind::Active);
        net.clear_path(id).unwrap();
        assert!(net.in_flight().is_empty());
        assert_eq!(net.get(id).unwrap().path_kind, PathKind::None);
        // Re-routing after losing the path indexes it again.
        net.reroute(id, target(), Side::Up, PathKind::Active).unwrap();
        assert!(net.in_flight().contains(&dest(1), id));
    }

    #[test]
    fn complete_and_cancel_remove_everywhere() {
        let mut net = TransporterNetwork::new(WorldId(0));
        let a = net.launch(stack(cobble(), 16), target(), Side::Up, PathKind::Active);
        let b = net.launch(stack(cobble(), 8), target(), Side::Up, PathKind::Active);
        assert_eq!(net.complete(a).unwrap().stack.quantity, 16);
        assert_eq!(net.cancel(b).unwrap().stack.quantity, 8);
        assert!(net.is_empty());
        assert!(net.in_flight().is_empty());
        assert_eq!(net.complete(a), Err(NetworkError::UnknownShipment(a)));
    }

    #[test]
    fn reset_forgets_everything() {
        let mut net = TransporterNetwork::new(WorldId(0));
        let id = net.launch(stack(cobble(), 16), target(), Side::Up, PathKind::Active);
        net.reset();
        assert!(net.is_empty());
        assert!(net.in_flight().is_empty());
        assert!(net.get(id).is_none());
    }

    #[test]
    fn predict_sees_own_shipments() {
        let items = test_registry();
        let mut net = TransporterNetwork::new(WorldId(0));
        let inv = TestInventory::new(vec![TestSlot::empty(64)]);
        let request = TransitRequest::single(stack(cobble(), 64));
        assert_eq!(net.predict(&items, target(), Side::Up, &inv, &request).sending_amount(), 64);
        net.launch(stack(cobble(), 64), target(), Side::Up, PathKind::Active);
        assert!(net.predict(&items, target(), Side::Up, &inv, &request).is_empty());
    }

    #[test]
    fn shipments_in_other_worlds_do_not_interfere() {
        let items = test_registry();
        let mut nether = TransporterNetwork::new(WorldId(1));
        let id = nether.launch(stack(cobble(), 64), target(), Side::Up, PathKind::Active);
        assert!(!nether.in_flight().contains(&dest(1), id));
        assert_eq!(nether.in_flight().destination_count(), 1);
        assert_eq!(nether.world(), WorldId(1));
        let inv = TestInventory::new(vec![TestSlot::empty(64)]);
        let request = TransitRequest::single(stack(cobble(), 64));
        let overworld = AdmissionController::new(&items, nether.in_flight());
        assert_eq!(overworld.predict(&dest(1), Side::Up, &inv, &request).sending_amount(), 64);
    }
}
