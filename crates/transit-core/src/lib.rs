//! Transit Core -- insertion prediction for item transport networks.
//!
//! This crate answers one question for a transport scheduler: *if I send this
//! batch to that inventory now, how much of it will be accepted once every
//! shipment already en route has arrived?* It never mutates the destination;
//! all bookkeeping happens on a throwaway [`snapshot::InventorySnapshot`].
//!
//! # Prediction Pipeline
//!
//! Each call to [`predict::AdmissionController::predict`] runs three phases:
//!
//! 1. **Capture** -- Read every slot of the destination once into a snapshot.
//! 2. **Replay** -- Simulate every in-flight shipment bound for the destination
//!    against the snapshot, failing fast when the destination is saturated.
//! 3. **Admit** -- Try each line of the transit request in order and return
//!    the first one that is (at least partially) accepted.
//!
//! # Key Types
//!
//! - [`oracle::InventoryOracle`] -- The five read-only primitives consumed
//!   from the host inventory.
//! - [`simulate::simulate_insert`] -- Cumulative insertion simulation with
//!   probe calibration for inventories that misreport slot limits.
//! - [`in_flight::InFlightRegistry`] -- Index of shipments per destination.
//! - [`network::TransporterNetwork`] -- Owns shipment lifecycle and keeps the
//!   registry consistent with it.
//! - [`request::TransitRequest`] / [`request::TransitResponse`] -- What a
//!   source offers and what the destination is predicted to take.

pub mod fixed;
pub mod id;
pub mod in_flight;
pub mod item;
pub mod network;
pub mod oracle;
pub mod predict;
pub mod registry;
pub mod request;
pub mod shipment;
pub mod simulate;
pub mod snapshot;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
