//! Rental configuration
//!
//! Company-wide settings used when generating documents. Loaded from the
//! environment with the `RENTAL_` prefix:
//!
//! * `RENTAL_CONTRACT_SEQUENCE` - sequence numbering quoted contracts
//! * `RENTAL_SUBSCRIPTION_JOURNAL` - journal of generated invoices
//! * `RENTAL_SUBSCRIPTION_INVOICE_PAYMENT_TERM` - fallback payment term
//! * `RENTAL_RENT_RETURN_LOCATION` - location receiving returned goods

use serde::Deserialize;

use core_kernel::{JournalId, LocationId, PaymentTermId, SequenceId};

use crate::error::RentalError;

/// Rental configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RentalConfiguration {
    pub contract_sequence: SequenceId,
    pub subscription_journal: JournalId,
    /// Used when the customer has no payment term of their own
    pub subscription_invoice_payment_term: PaymentTermId,
    pub rent_return_location: LocationId,
}

impl RentalConfiguration {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, RentalError> {
        Self::from_source(config::Environment::with_prefix("RENTAL"))
    }

    /// Loads configuration from any `config` source
    pub fn from_source<S>(source: S) -> Result<Self, RentalError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        config::Config::builder()
            .add_source(source)
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(|e| RentalError::Configuration(e.to_string()))
    }
}
