//! Rental Domain Ports
//!
//! The rental module owns no persistence and no accounting or stock logic.
//! Everything it needs from the host system is reached through the traits
//! below, which adapters implement (see `infra_memory` for the in-memory
//! versions used by tests and the demo binary).
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use domain_rental::ports::SequencePort;
//!
//! pub struct Numbering {
//!     sequences: Arc<dyn SequencePort>,
//! }
//!
//! impl Numbering {
//!     pub fn next_reference(&self, sequence: SequenceId) -> Result<String, PortError> {
//!         self.sequences.next(sequence)
//!     }
//! }
//! ```
//!
//! All calls are synchronous. Document ports are expected to honour the
//! `UnitOfWork` bracket opened by the workflow: everything created between
//! `begin` and `rollback` must disappear.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{
    AccountId, AddressId, Currency, DomainPort, InvoiceId, LocationId, PartyId, PaymentTermId,
    PortError, SequenceId, ShipmentId,
};

use crate::documents::{InvoiceRequest, ShipmentRequest};

/// Produces the next value of a numbering sequence
pub trait SequencePort: DomainPort {
    /// Returns the next formatted value; consumed values are never reused
    fn next(&self, sequence: SequenceId) -> Result<String, PortError>;
}

/// Converts amounts between currencies
pub trait CurrencyPort: DomainPort {
    /// Converts `amount` using the rate in force on `as_of`, without rounding
    fn convert(
        &self,
        amount: Decimal,
        from: Currency,
        to: Currency,
        as_of: NaiveDate,
    ) -> Result<Decimal, PortError>;
}

/// What the rental module needs to know about a customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyProfile {
    pub id: PartyId,
    pub name: String,
    pub account_receivable: Option<AccountId>,
    pub customer_payment_term: Option<PaymentTermId>,
    /// Stock location representing the customer's premises
    pub customer_location: LocationId,
}

/// Read access to the party directory
pub trait PartyPort: DomainPort {
    fn get_party(&self, id: PartyId) -> Result<PartyProfile, PortError>;

    /// Returns the party's default address, if any
    fn default_address(&self, id: PartyId) -> Result<Option<AddressId>, PortError>;
}

/// Whitelist of document origins accepted by a document port
pub trait OriginRegistry: DomainPort {
    /// Adds `model` to the accepted origins; registering twice is a no-op
    fn register_origin(&self, model: &str) -> Result<(), PortError>;

    fn accepts_origin(&self, model: &str) -> bool;
}

/// Creates customer invoices
pub trait InvoicePort: OriginRegistry {
    fn create_invoice(&self, request: InvoiceRequest) -> Result<InvoiceId, PortError>;
}

/// Creates customer shipments and drives them through the stock workflow
pub trait ShipmentPort: OriginRegistry {
    /// Persists the shipments, returning their ids in request order
    fn create_shipments(&self, requests: Vec<ShipmentRequest>) -> Result<Vec<ShipmentId>, PortError>;

    fn wait(&self, ids: &[ShipmentId]) -> Result<(), PortError>;

    fn assign(&self, ids: &[ShipmentId]) -> Result<(), PortError>;

    fn pack(&self, ids: &[ShipmentId]) -> Result<(), PortError>;

    fn done(&self, ids: &[ShipmentId]) -> Result<(), PortError>;

    /// Receives return shipments
    fn receive(&self, ids: &[ShipmentId]) -> Result<(), PortError>;

    fn cancel(&self, ids: &[ShipmentId]) -> Result<(), PortError>;
}

/// Transaction bracket around a contract transition
pub trait UnitOfWork: DomainPort {
    fn begin(&self) -> Result<(), PortError>;

    fn commit(&self) -> Result<(), PortError>;

    /// Discards every change made since `begin`
    fn rollback(&self) -> Result<(), PortError>;
}
