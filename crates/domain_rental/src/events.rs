//! Domain events for the rental contract
//!
//! One event is recorded per successful transition. They are drained by the
//! caller with `RentalContract::take_events` once the transition returned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ContractId, InvoiceId, ShipmentId};

use crate::contract::ContractState;

/// Domain events emitted by the rental contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ContractEvent {
    /// Contract moved to quotation
    Quoted {
        contract_id: ContractId,
        reference: String,
        timestamp: DateTime<Utc>,
    },

    /// Contract reserved; documents were generated
    Reserved {
        contract_id: ContractId,
        invoice: Option<InvoiceId>,
        shipments: Vec<ShipmentId>,
        return_shipments: Vec<ShipmentId>,
        timestamp: DateTime<Utc>,
    },

    /// Goods delivered to the customer
    Activated {
        contract_id: ContractId,
        timestamp: DateTime<Utc>,
    },

    /// Goods received back
    Closed {
        contract_id: ContractId,
        timestamp: DateTime<Utc>,
    },

    Cancelled {
        contract_id: ContractId,
        cancelled_shipments: usize,
        timestamp: DateTime<Utc>,
    },

    /// Contract sent back to draft
    ResetToDraft {
        contract_id: ContractId,
        from: ContractState,
        timestamp: DateTime<Utc>,
    },
}

impl ContractEvent {
    /// Returns the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            ContractEvent::Quoted { .. } => "ContractQuoted",
            ContractEvent::Reserved { .. } => "ContractReserved",
            ContractEvent::Activated { .. } => "ContractActivated",
            ContractEvent::Closed { .. } => "ContractClosed",
            ContractEvent::Cancelled { .. } => "ContractCancelled",
            ContractEvent::ResetToDraft { .. } => "ContractResetToDraft",
        }
    }

    /// Returns the contract the event belongs to
    pub fn contract_id(&self) -> ContractId {
        match self {
            ContractEvent::Quoted { contract_id, .. }
            | ContractEvent::Reserved { contract_id, .. }
            | ContractEvent::Activated { contract_id, .. }
            | ContractEvent::Closed { contract_id, .. }
            | ContractEvent::Cancelled { contract_id, .. }
            | ContractEvent::ResetToDraft { contract_id, .. } => *contract_id,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            ContractEvent::Quoted { timestamp, .. }
            | ContractEvent::Reserved { timestamp, .. }
            | ContractEvent::Activated { timestamp, .. }
            | ContractEvent::Closed { timestamp, .. }
            | ContractEvent::Cancelled { timestamp, .. }
            | ContractEvent::ResetToDraft { timestamp, .. } => *timestamp,
        }
    }
}
