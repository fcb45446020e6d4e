//! In-memory document store
//!
//! Stores invoices and shipments and implements the stock workflow the
//! rental module drives. A unit of work snapshots the store on `begin` and
//! restores the snapshot on `rollback`.
//!
//! # Shipment states
//!
//! ```text
//! Out:    Draft -> Waiting -> Assigned -> Packed -> Done
//! Return: Draft -> Received -> Done
//! Any state but Done -> Cancelled
//! ```
//!
//! Failures can be injected per operation with [`FailPoint`] to exercise
//! rollback paths.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

use core_kernel::{DomainPort, InvoiceId, PortError, ShipmentId};
use domain_rental::{
    InvoicePort, InvoiceRequest, OriginRegistry, ShipmentPort, ShipmentRequest, ShipmentType,
    UnitOfWork,
};

/// State of a stored shipment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShipmentState {
    Draft,
    Waiting,
    Assigned,
    Packed,
    Received,
    Done,
    Cancelled,
}

impl fmt::Display for ShipmentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShipmentState::Draft => "draft",
            ShipmentState::Waiting => "waiting",
            ShipmentState::Assigned => "assigned",
            ShipmentState::Packed => "packed",
            ShipmentState::Received => "received",
            ShipmentState::Done => "done",
            ShipmentState::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Store operation that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    CreateInvoice,
    CreateShipments,
    Wait,
    Assign,
    Pack,
    Done,
    Receive,
    Cancel,
    Commit,
}

/// A persisted invoice
#[derive(Debug, Clone, PartialEq)]
pub struct StoredInvoice {
    pub id: InvoiceId,
    pub request: InvoiceRequest,
    pub created_at: DateTime<Utc>,
}

/// A persisted shipment
#[derive(Debug, Clone, PartialEq)]
pub struct StoredShipment {
    pub id: ShipmentId,
    pub request: ShipmentRequest,
    pub state: ShipmentState,
}

#[derive(Debug, Clone, Default)]
struct StoreState {
    invoices: BTreeMap<InvoiceId, StoredInvoice>,
    shipments: BTreeMap<ShipmentId, StoredShipment>,
}

#[derive(Debug, Default)]
struct Inner {
    state: StoreState,
    snapshot: Option<StoreState>,
    origins: HashSet<String>,
    fail_points: HashSet<FailPoint>,
}

impl Inner {
    fn check(&self, point: FailPoint) -> Result<(), PortError> {
        if self.fail_points.contains(&point) {
            return Err(PortError::ServiceUnavailable {
                service: format!("document store ({point:?})"),
            });
        }
        Ok(())
    }

    fn check_origin(&self, model: &str) -> Result<(), PortError> {
        if self.origins.contains(model) {
            Ok(())
        } else {
            Err(PortError::validation_field(format!("unregistered origin model {model}"), "origin"))
        }
    }

    /// Moves every shipment in `ids` to `to`; all or nothing
    fn advance(
        &mut self,
        ids: &[ShipmentId],
        shipment_type: Option<ShipmentType>,
        from: &[ShipmentState],
        to: ShipmentState,
    ) -> Result<(), PortError> {
        for id in ids {
            let shipment = self
                .state
                .shipments
                .get(id)
                .ok_or_else(|| PortError::not_found("Shipment", id))?;

            if shipment_type.is_some_and(|expected| shipment.request.shipment_type != expected) {
                return Err(PortError::conflict(format!(
                    "shipment {id} cannot become {to} from its direction"
                )));
            }
            if !from.contains(&shipment.state) {
                return Err(PortError::conflict(format!(
                    "shipment {id} cannot go from {} to {to}",
                    shipment.state
                )));
            }
        }

        for id in ids {
            if let Some(shipment) = self.state.shipments.get_mut(id) {
                shipment.state = to;
            }
        }
        debug!(count = ids.len(), state = %to, "Shipments updated");
        Ok(())
    }
}

/// Invoices and shipments kept in memory
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    inner: Mutex<Inner>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes every later call of `point` fail
    pub fn fail_on(&self, point: FailPoint) {
        self.lock().fail_points.insert(point);
    }

    pub fn clear_failures(&self) {
        self.lock().fail_points.clear();
    }

    pub fn invoice(&self, id: InvoiceId) -> Option<StoredInvoice> {
        self.lock().state.invoices.get(&id).cloned()
    }

    pub fn invoices(&self) -> Vec<StoredInvoice> {
        self.lock().state.invoices.values().cloned().collect()
    }

    pub fn shipment(&self, id: ShipmentId) -> Option<StoredShipment> {
        self.lock().state.shipments.get(&id).cloned()
    }

    pub fn shipments(&self) -> Vec<StoredShipment> {
        self.lock().state.shipments.values().cloned().collect()
    }

    pub fn shipment_state(&self, id: ShipmentId) -> Option<ShipmentState> {
        self.lock().state.shipments.get(&id).map(|shipment| shipment.state)
    }

    /// Returns true between `begin` and `commit`/`rollback`
    pub fn in_transaction(&self) -> bool {
        self.lock().snapshot.is_some()
    }
}

impl DomainPort for MemoryDocumentStore {}

impl OriginRegistry for MemoryDocumentStore {
    fn register_origin(&self, model: &str) -> Result<(), PortError> {
        self.lock().origins.insert(model.to_string());
        Ok(())
    }

    fn accepts_origin(&self, model: &str) -> bool {
        self.lock().origins.contains(model)
    }
}

impl InvoicePort for MemoryDocumentStore {
    fn create_invoice(&self, request: InvoiceRequest) -> Result<InvoiceId, PortError> {
        let mut inner = self.lock();
        inner.check(FailPoint::CreateInvoice)?;
        for line in &request.lines {
            inner.check_origin(&line.origin.model)?;
        }

        let id = InvoiceId::new_v7();
        debug!(invoice_id = %id, lines = request.lines.len(), "Stored invoice");
        inner.state.invoices.insert(
            id,
            StoredInvoice {
                id,
                request,
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }
}

impl ShipmentPort for MemoryDocumentStore {
    fn create_shipments(&self, requests: Vec<ShipmentRequest>) -> Result<Vec<ShipmentId>, PortError> {
        let mut inner = self.lock();
        inner.check(FailPoint::CreateShipments)?;
        for request in &requests {
            if request.moves.is_empty() {
                return Err(PortError::validation_field("shipment without moves", "moves"));
            }
            for request_move in &request.moves {
                inner.check_origin(&request_move.origin.model)?;
            }
        }

        let ids: Vec<ShipmentId> = requests
            .into_iter()
            .map(|request| {
                let id = ShipmentId::new_v7();
                inner.state.shipments.insert(
                    id,
                    StoredShipment {
                        id,
                        request,
                        state: ShipmentState::Draft,
                    },
                );
                id
            })
            .collect();

        debug!(count = ids.len(), "Stored shipments");
        Ok(ids)
    }

    fn wait(&self, ids: &[ShipmentId]) -> Result<(), PortError> {
        let mut inner = self.lock();
        inner.check(FailPoint::Wait)?;
        inner.advance(ids, Some(ShipmentType::Out), &[ShipmentState::Draft], ShipmentState::Waiting)
    }

    fn assign(&self, ids: &[ShipmentId]) -> Result<(), PortError> {
        let mut inner = self.lock();
        inner.check(FailPoint::Assign)?;
        inner.advance(ids, Some(ShipmentType::Out), &[ShipmentState::Waiting], ShipmentState::Assigned)
    }

    fn pack(&self, ids: &[ShipmentId]) -> Result<(), PortError> {
        let mut inner = self.lock();
        inner.check(FailPoint::Pack)?;
        inner.advance(ids, Some(ShipmentType::Out), &[ShipmentState::Assigned], ShipmentState::Packed)
    }

    fn done(&self, ids: &[ShipmentId]) -> Result<(), PortError> {
        let mut inner = self.lock();
        inner.check(FailPoint::Done)?;
        inner.advance(
            ids,
            None,
            &[ShipmentState::Packed, ShipmentState::Received],
            ShipmentState::Done,
        )
    }

    fn receive(&self, ids: &[ShipmentId]) -> Result<(), PortError> {
        let mut inner = self.lock();
        inner.check(FailPoint::Receive)?;
        inner.advance(ids, Some(ShipmentType::Return), &[ShipmentState::Draft], ShipmentState::Received)
    }

    fn cancel(&self, ids: &[ShipmentId]) -> Result<(), PortError> {
        let mut inner = self.lock();
        inner.check(FailPoint::Cancel)?;
        inner.advance(
            ids,
            None,
            &[
                ShipmentState::Draft,
                ShipmentState::Waiting,
                ShipmentState::Assigned,
                ShipmentState::Packed,
                ShipmentState::Received,
            ],
            ShipmentState::Cancelled,
        )
    }
}

impl UnitOfWork for MemoryDocumentStore {
    fn begin(&self) -> Result<(), PortError> {
        let mut inner = self.lock();
        if inner.snapshot.is_some() {
            return Err(PortError::conflict("unit of work already open"));
        }
        let snapshot = inner.state.clone();
        inner.snapshot = Some(snapshot);
        Ok(())
    }

    fn commit(&self) -> Result<(), PortError> {
        let mut inner = self.lock();
        inner.check(FailPoint::Commit)?;
        inner
            .snapshot
            .take()
            .map(|_| ())
            .ok_or_else(|| PortError::conflict("no unit of work to commit"))
    }

    fn rollback(&self) -> Result<(), PortError> {
        let mut inner = self.lock();
        let snapshot = inner
            .snapshot
            .take()
            .ok_or_else(|| PortError::conflict("no unit of work to roll back"))?;
        inner.state = snapshot;
        debug!("Rolled back document store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_of_work_cannot_nest() {
        let store = MemoryDocumentStore::new();
        store.begin().unwrap();
        assert!(store.in_transaction());
        assert!(store.begin().is_err());
        store.commit().unwrap();
        assert!(!store.in_transaction());
    }

    #[test]
    fn test_commit_without_begin() {
        let store = MemoryDocumentStore::new();
        assert!(store.commit().is_err());
        assert!(store.rollback().is_err());
    }

    #[test]
    fn test_failing_commit_keeps_snapshot() {
        let store = MemoryDocumentStore::new();
        store.begin().unwrap();
        store.fail_on(FailPoint::Commit);

        let error = store.commit().unwrap_err();
        assert!(error.is_transient());
        assert!(store.in_transaction());
        store.rollback().unwrap();
    }

    #[test]
    fn test_origin_registry() {
        let store = MemoryDocumentStore::new();
        assert!(!store.accepts_origin("rental.contract.line"));
        store.register_origin("rental.contract.line").unwrap();
        store.register_origin("rental.contract.line").unwrap();
        assert!(store.accepts_origin("rental.contract.line"));
    }

    #[test]
    fn test_unknown_shipment() {
        let store = MemoryDocumentStore::new();
        assert!(store.wait(&[ShipmentId::new()]).unwrap_err().is_not_found());
    }
}
