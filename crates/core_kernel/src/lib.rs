//! Core Kernel - Foundational types and utilities for the rental system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money and currency types with precise decimal arithmetic
//! - Strongly-typed identifiers
//! - Port error types shared by every adapter

pub mod money;
pub mod identifiers;
pub mod ports;

pub use money::{Money, Currency, MoneyError};
pub use identifiers::{
    ContractId, ContractLineId, ProductId, UomId, UomCategoryId,
    CompanyId, PartyId, AddressId, AccountId, JournalId, PaymentTermId,
    InvoiceId, WarehouseId, LocationId, ShipmentId, SequenceId,
};
pub use ports::{PortError, DomainPort};
