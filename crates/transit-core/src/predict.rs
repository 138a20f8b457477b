//! Admission control: predict what a destination will accept right now,
//! accounting for everything already promised to shipments en route.

use crate::id::ItemTypeId;
use crate::in_flight::InFlightRegistry;
use crate::item::ItemStack;
use crate::oracle::{InventoryOracle, OracleFault};
use crate::registry::ItemRegistry;
use crate::request::{TransitRequest, TransitResponse};
use crate::shipment::{DestinationKey, PathKind, Side};
use crate::simulate::{SimulationMode, simulate_insert};
use crate::snapshot::InventorySnapshot;

/// Why a prediction could not be completed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PredictError {
    #[error(transparent)]
    Oracle(#[from] OracleFault),
    #[error("item type {0:?} is not registered")]
    UnknownItem(ItemTypeId),
}

/// Stateless entry point combining the item registry (for natural stack caps)
/// with the in-flight index.
#[derive(Debug, Clone, Copy)]
pub struct AdmissionController<'a> {
    items: &'a ItemRegistry,
    in_flight: &'a InFlightRegistry,
}

impl<'a> AdmissionController<'a> {
    pub fn new(items: &'a ItemRegistry, in_flight: &'a InFlightRegistry) -> Self {
        Self { items, in_flight }
    }

    /// Predict the response for `request` at `destination`, entering through
    /// `side`. Any failure collapses to [`TransitResponse::Empty`]; the caller
    /// simply tries again on a later tick.
    pub fn predict<I: InventoryOracle + ?Sized>(
        &self,
        destination: &DestinationKey,
        side: Side,
        oracle: &I,
        request: &TransitRequest,
    ) -> TransitResponse {
        match self.try_predict(destination, side, oracle, request) {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(?destination, ?side, %err, "prediction aborted");
                request.empty_response()
            }
        }
    }

    /// Like [`predict`](Self::predict), but reports why a prediction failed.
    pub fn try_predict<I: InventoryOracle + ?Sized>(
        &self,
        destination: &DestinationKey,
        side: Side,
        oracle: &I,
        request: &TransitRequest,
    ) -> Result<TransitResponse, PredictError> {
        let mut snapshot = InventorySnapshot::capture(oracle)?;

        // Replay everything already heading here so its capacity counts as taken.
        for shipment in self.in_flight.shipments_for(destination) {
            if shipment.path_kind == PathKind::None {
                tracing::warn!(
                    ?destination,
                    id = ?shipment.id,
                    "unrouted shipment left in flight registry, skipping"
                );
                continue;
            }
            let full = shipment.stack.quantity;
            let leftover = self.simulate(
                oracle,
                &mut snapshot,
                &shipment.stack,
                full,
                SimulationMode::InFlight,
            )?;
            if leftover == 0 {
                continue;
            }
            if leftover == full && shipment.side != side {
                // Probably bound for slots this side does not expose.
                continue;
            }
            tracing::debug!(
                ?destination,
                ?side,
                id = ?shipment.id,
                leftover,
                "in-flight shipment does not fit, destination saturated"
            );
            return Ok(request.empty_response());
        }

        for (line, data) in request.lines().iter().enumerate() {
            let wanted = data.total_count();
            let leftover = self.simulate(
                oracle,
                &mut snapshot,
                data.stack(),
                wanted,
                SimulationMode::Request,
            )?;
            if leftover == wanted {
                continue;
            }
            return Ok(request.create_response(line, wanted - leftover));
        }

        Ok(request.empty_response())
    }

    fn simulate<I: InventoryOracle + ?Sized>(
        &self,
        oracle: &I,
        snapshot: &mut InventorySnapshot,
        stack: &ItemStack,
        count: u32,
        mode: SimulationMode,
    ) -> Result<u32, PredictError> {
        let cap = self
            .items
            .max_stack_size(stack.item_type)
            .ok_or(PredictError::UnknownItem(stack.item_type))?;
        Ok(simulate_insert(oracle, snapshot, stack, count, cap, mode)?)
    }
}
