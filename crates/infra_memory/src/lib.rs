//! In-memory Infrastructure
//!
//! This crate wires the rental domain to in-memory implementations of its
//! ports. It backs the test suites and the `rental-demo` binary.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_memory::MemoryAdapters;
//! use domain_rental::ContractWorkflow;
//!
//! let adapters = MemoryAdapters::new(Currency::USD);
//! let workflow = ContractWorkflow::new(adapters.rental_services())?;
//! ```

pub mod adapters;

use std::sync::Arc;

use core_kernel::{Currency, JournalId, LocationId, PaymentTermId, SequenceId};
use domain_rental::{PricingService, RentalConfiguration, RentalServices};

pub use adapters::{
    FailPoint, MemoryCurrencyTable, MemoryDocumentStore, MemoryPartyDirectory, MemorySequence,
    ShipmentState, StoredInvoice, StoredShipment,
};

/// Prefix of contract references issued by the default sequence
pub const CONTRACT_PREFIX: &str = "RC";

/// Digits of contract references issued by the default sequence
pub const CONTRACT_PADDING: usize = 4;

/// One instance of every in-memory adapter plus the configuration
#[derive(Debug, Clone)]
pub struct MemoryAdapters {
    pub sequences: Arc<MemorySequence>,
    pub currencies: Arc<MemoryCurrencyTable>,
    pub parties: Arc<MemoryPartyDirectory>,
    pub documents: Arc<MemoryDocumentStore>,
    pub config: RentalConfiguration,
}

impl MemoryAdapters {
    /// Creates adapters with a freshly generated configuration
    pub fn new(company_currency: Currency) -> Self {
        let config = RentalConfiguration {
            contract_sequence: SequenceId::new(),
            subscription_journal: JournalId::new(),
            subscription_invoice_payment_term: PaymentTermId::new(),
            rent_return_location: LocationId::new(),
        };
        Self::with_config(company_currency, config)
    }

    /// Creates adapters for an existing configuration
    ///
    /// The contract sequence is defined in the sequence adapter.
    pub fn with_config(company_currency: Currency, config: RentalConfiguration) -> Self {
        let sequences = MemorySequence::new();
        sequences.define_with_id(config.contract_sequence, CONTRACT_PREFIX, CONTRACT_PADDING);

        Self {
            sequences: Arc::new(sequences),
            currencies: Arc::new(MemoryCurrencyTable::new(company_currency)),
            parties: Arc::new(MemoryPartyDirectory::new()),
            documents: Arc::new(MemoryDocumentStore::new()),
            config,
        }
    }

    pub fn rental_services(&self) -> RentalServices {
        RentalServices {
            sequences: self.sequences.clone(),
            currencies: self.currencies.clone(),
            parties: self.parties.clone(),
            invoices: self.documents.clone(),
            shipments: self.documents.clone(),
            unit_of_work: self.documents.clone(),
            config: self.config,
        }
    }

    pub fn pricing(&self) -> PricingService {
        PricingService::new(self.currencies.clone())
    }
}
