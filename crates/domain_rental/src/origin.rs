//! Document origins
//!
//! Invoice lines and stock moves generated from a contract point back to the
//! contract line that produced them. Document ports only accept origins from
//! models registered with them.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;
use uuid::Uuid;

use core_kernel::PortError;

use crate::ports::{InvoicePort, ShipmentPort};

/// Model name under which contract lines appear as document origins
pub const CONTRACT_LINE_ORIGIN: &str = "rental.contract.line";

/// Reference from a generated document back to its source record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Origin {
    pub model: String,
    pub id: Uuid,
}

impl Origin {
    pub fn new(model: impl Into<String>, id: Uuid) -> Self {
        Self {
            model: model.into(),
            id,
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.model, self.id)
    }
}

/// Something that can be referenced as the origin of a generated document
pub trait OriginProvider {
    fn origin(&self) -> Origin;
}

/// Registers contract lines as a valid origin on both document ports
pub fn register_origins(invoices: &dyn InvoicePort, shipments: &dyn ShipmentPort) -> Result<(), PortError> {
    invoices.register_origin(CONTRACT_LINE_ORIGIN)?;
    shipments.register_origin(CONTRACT_LINE_ORIGIN)?;
    debug!(model = CONTRACT_LINE_ORIGIN, "Registered document origin");
    Ok(())
}
