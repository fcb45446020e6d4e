//! Port Adapters
//!
//! In-memory implementations of the rental ports. Each adapter:
//! - Implements one or more port traits from `domain_rental::ports`
//! - Keeps its data behind a lock so it can be shared as `Arc<dyn Port>`
//! - Reports failures as `PortError`
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_memory::adapters::MemorySequence;
//! use domain_rental::SequencePort;
//!
//! let sequences = MemorySequence::new();
//! let id = sequences.define("RC", 4);
//! assert_eq!(sequences.next(id)?, "RC0001");
//! ```

pub mod currency;
pub mod documents;
pub mod party;
pub mod sequence;

pub use currency::MemoryCurrencyTable;
pub use documents::{FailPoint, MemoryDocumentStore, ShipmentState, StoredInvoice, StoredShipment};
pub use party::MemoryPartyDirectory;
pub use sequence::MemorySequence;
