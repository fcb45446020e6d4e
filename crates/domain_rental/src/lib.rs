//! Rental Contract Domain
//!
//! This crate implements rental contracts on top of host-provided party,
//! product, invoicing and stock capabilities, following the same Hexagonal
//! Architecture as the rest of the workspace.
//!
//! # Architecture
//!
//! - **Aggregate**: `RentalContract` with its `ContractLine`s
//! - **Domain Services**: `PricingService`, `DocumentSynthesizer`, `ContractWorkflow`
//! - **Ports**: sequences, currency rates, parties, invoices, shipments, unit of work
//! - **Domain Events**: `ContractQuoted`, `ContractReserved`, ...
//!
//! # Contract Lifecycle
//!
//! ```text
//! Draft -> Quotation -> Reservation -> Active -> Close
//!            |   \-> Draft     \-> Cancel -> Draft
//!            \-> Cancel
//! ```
//!
//! Reserving a contract invoices the rent and creates the outbound and
//! return shipments; activating delivers the goods and closing receives
//! them back.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_rental::{ContractLine, ContractWorkflow, RentalContract};
//!
//! let workflow = ContractWorkflow::new(services)?;
//! let mut contract = RentalContract::new(company, customer);
//! let line = contract.add_line(ContractLine::new().with_quantity(dec!(2)))?;
//! contract.select_product(line, projector, &workflow.services().pricing())?;
//! contract.set_period(start, end)?;
//!
//! workflow.quote(&mut contract)?;
//! workflow.reserve(&mut contract)?;
//! ```

pub mod billing;
pub mod config;
pub mod contract;
pub mod documents;
pub mod error;
pub mod events;
pub mod line;
pub mod origin;
pub mod ports;
pub mod pricing;
pub mod product;
pub mod synthesizer;
pub mod workflow;

pub use billing::BillingMethod;
pub use config::RentalConfiguration;
pub use contract::{Company, ContractState, ContractTerms, RentalContract, ShipmentRef, Warehouse};
pub use documents::{
    InvoiceLineRequest, InvoiceRequest, InvoiceType, LineType, MoveRequest, MoveState,
    ShipmentRequest, ShipmentType,
};
pub use error::RentalError;
pub use events::ContractEvent;
pub use line::{ContractLine, LineChanges, MoveLocations};
pub use origin::{register_origins, Origin, OriginProvider, CONTRACT_LINE_ORIGIN};
pub use ports::{
    CurrencyPort, InvoicePort, OriginRegistry, PartyPort, PartyProfile, SequencePort,
    ShipmentPort, UnitOfWork,
};
pub use pricing::{PricingService, RentContext};
pub use product::{ProductType, RentRates, RentableProduct, UnitOfMeasure};
pub use synthesizer::{group_moves, DocumentSynthesizer, MoveGroup};
pub use workflow::{is_allowed, ContractWorkflow, RentalServices, TRANSITIONS};
