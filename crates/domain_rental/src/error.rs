//! Rental domain errors
//!
//! This module defines all error types that can occur within the
//! rental contract domain.

use rust_decimal::Decimal;
use thiserror::Error;

use core_kernel::{ContractLineId, PortError, ProductId, UomId};

use crate::contract::ContractState;

/// Errors that can occur in the rental domain
#[derive(Debug, Error)]
pub enum RentalError {
    /// The requested edge is not part of the contract transition table
    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition {
        from: ContractState,
        to: ContractState,
    },

    /// A field required by the target state is missing
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    /// The line quantity cannot be turned into documents.
    ///
    /// Logged when a line is skipped during synthesis, never returned from a transition.
    #[error("Unsupported quantity {quantity} on line {line}")]
    UnsupportedQuantity {
        line: ContractLineId,
        quantity: Decimal,
    },

    /// Contract cannot be modified in its current state
    #[error("Contract cannot be modified in state {0}")]
    NotModifiable(ContractState),

    /// Line does not belong to the contract
    #[error("Contract line not found: {0}")]
    LineNotFound(ContractLineId),

    /// Product is not flagged as rentable
    #[error("Product {0} is not rentable")]
    ProductNotRentable(ProductId),

    /// Unit of measure outside the product's category
    #[error("Unit {unit} is not in the unit category of product {product}")]
    InvalidUnit {
        unit: UomId,
        product: ProductId,
    },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A collaborator failed
    #[error("External service error: {0}")]
    Port(#[from] PortError),
}

impl RentalError {
    /// Creates a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        RentalError::Validation(message.into())
    }

    /// Creates a missing field error
    pub fn missing(field: impl Into<String>) -> Self {
        RentalError::MissingRequiredField(field.into())
    }
}
