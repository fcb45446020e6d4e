//! Contract workflow
//!
//! Drives a contract through its lifecycle:
//!
//! ```text
//! Draft -> Quotation -> Reservation -> Active -> Close
//!   ^          |  \            \
//!   |          |   \-> Cancel <-/
//!   \----------+-------/
//! ```
//!
//! Each transition is atomic. Side effects run on a staged copy of the
//! contract inside a unit of work; the caller's contract only changes when
//! the unit of work commits.

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::config::RentalConfiguration;
use crate::contract::{ContractState, RentalContract};
use crate::documents::{InvoiceType, ShipmentType};
use crate::error::RentalError;
use crate::events::ContractEvent;
use crate::origin::register_origins;
use crate::ports::{CurrencyPort, InvoicePort, PartyPort, SequencePort, ShipmentPort, UnitOfWork};
use crate::pricing::PricingService;
use crate::synthesizer::DocumentSynthesizer;

/// Every allowed `(from, to)` edge
pub const TRANSITIONS: [(ContractState, ContractState); 8] = [
    (ContractState::Draft, ContractState::Quotation),
    (ContractState::Quotation, ContractState::Reservation),
    (ContractState::Reservation, ContractState::Active),
    (ContractState::Active, ContractState::Close),
    (ContractState::Reservation, ContractState::Cancel),
    (ContractState::Quotation, ContractState::Cancel),
    (ContractState::Quotation, ContractState::Draft),
    (ContractState::Cancel, ContractState::Draft),
];

/// Returns true if the edge is part of the transition table
pub fn is_allowed(from: ContractState, to: ContractState) -> bool {
    TRANSITIONS.contains(&(from, to))
}

/// Collaborators of the rental module
#[derive(Clone)]
pub struct RentalServices {
    pub sequences: Arc<dyn SequencePort>,
    pub currencies: Arc<dyn CurrencyPort>,
    pub parties: Arc<dyn PartyPort>,
    pub invoices: Arc<dyn InvoicePort>,
    pub shipments: Arc<dyn ShipmentPort>,
    pub unit_of_work: Arc<dyn UnitOfWork>,
    pub config: RentalConfiguration,
}

impl RentalServices {
    pub fn pricing(&self) -> PricingService {
        PricingService::new(self.currencies.clone())
    }
}

/// Executes contract transitions and their side effects
pub struct ContractWorkflow {
    services: RentalServices,
}

impl ContractWorkflow {
    /// Creates the workflow and registers contract lines as document origin
    pub fn new(services: RentalServices) -> Result<Self, RentalError> {
        register_origins(services.invoices.as_ref(), services.shipments.as_ref())?;
        Ok(Self { services })
    }

    pub fn services(&self) -> &RentalServices {
        &self.services
    }

    /// Moves `contract` to `target`
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` if the edge is not in [`TRANSITIONS`]
    /// - `MissingRequiredField` if `target` needs a field the contract lacks
    /// - Any error raised by a side effect, after rolling the unit of work back
    ///
    /// The contract is left untouched on error.
    #[instrument(
        skip(self, contract),
        fields(contract_id = %contract.id(), from = %contract.state(), to = %target)
    )]
    pub fn transition(&self, contract: &mut RentalContract, target: ContractState) -> Result<(), RentalError> {
        let from = contract.state();
        if !is_allowed(from, target) {
            warn!("Rejected contract transition");
            return Err(RentalError::InvalidTransition { from, to: target });
        }

        contract.check_required_for(target)?;
        if target == ContractState::Quotation {
            contract.validate_lines()?;
        }

        let mut staged = contract.clone();
        self.services.unit_of_work.begin()?;

        let outcome = self
            .apply(&mut staged, from, target)
            .and_then(|()| self.services.unit_of_work.commit().map_err(RentalError::from));

        if let Err(error) = outcome {
            if let Err(rollback_error) = self.services.unit_of_work.rollback() {
                warn!(%rollback_error, "Rollback failed");
            }
            warn!(%error, "Contract transition aborted");
            return Err(error);
        }

        *contract = staged;
        info!(reference = ?contract.reference(), "Contract transitioned");
        Ok(())
    }

    pub fn quote(&self, contract: &mut RentalContract) -> Result<(), RentalError> {
        self.transition(contract, ContractState::Quotation)
    }

    pub fn reserve(&self, contract: &mut RentalContract) -> Result<(), RentalError> {
        self.transition(contract, ContractState::Reservation)
    }

    pub fn activate(&self, contract: &mut RentalContract) -> Result<(), RentalError> {
        self.transition(contract, ContractState::Active)
    }

    pub fn close(&self, contract: &mut RentalContract) -> Result<(), RentalError> {
        self.transition(contract, ContractState::Close)
    }

    pub fn cancel(&self, contract: &mut RentalContract) -> Result<(), RentalError> {
        self.transition(contract, ContractState::Cancel)
    }

    pub fn draft(&self, contract: &mut RentalContract) -> Result<(), RentalError> {
        self.transition(contract, ContractState::Draft)
    }

    fn apply(&self, staged: &mut RentalContract, from: ContractState, target: ContractState) -> Result<(), RentalError> {
        match target {
            ContractState::Quotation => self.on_quote(staged)?,
            ContractState::Reservation => self.on_reserve(staged)?,
            ContractState::Active => self.on_activate(staged)?,
            ContractState::Close => self.on_close(staged)?,
            ContractState::Cancel => self.on_cancel(staged)?,
            ContractState::Draft => staged.record_event(ContractEvent::ResetToDraft {
                contract_id: staged.id(),
                from,
                timestamp: Utc::now(),
            }),
        }
        staged.set_state(target);
        Ok(())
    }

    fn on_quote(&self, staged: &mut RentalContract) -> Result<(), RentalError> {
        if staged.reference().is_none() {
            let reference = self.services.sequences.next(self.services.config.contract_sequence)?;
            staged.assign_reference(reference);
        }

        staged.record_event(ContractEvent::Quoted {
            contract_id: staged.id(),
            reference: staged.display_name(),
            timestamp: Utc::now(),
        });
        Ok(())
    }

    fn on_reserve(&self, staged: &mut RentalContract) -> Result<(), RentalError> {
        let synthesizer = DocumentSynthesizer::new(&self.services);

        let invoice = synthesizer.create_invoice(staged, InvoiceType::Out)?;
        if let Some(invoice) = invoice {
            staged.record_invoice(invoice);
        }

        let shipments = synthesizer.create_shipment(staged, ShipmentType::Out)?;
        staged.record_shipments(&shipments, ShipmentType::Out);

        let return_shipments = synthesizer.create_shipment(staged, ShipmentType::Return)?;
        staged.record_shipments(&return_shipments, ShipmentType::Return);

        staged.record_event(ContractEvent::Reserved {
            contract_id: staged.id(),
            invoice,
            shipments,
            return_shipments,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    fn on_activate(&self, staged: &mut RentalContract) -> Result<(), RentalError> {
        let ids = staged.open_shipments(ShipmentType::Out);
        if !ids.is_empty() {
            let shipments = &self.services.shipments;
            shipments.assign(&ids)?;
            shipments.pack(&ids)?;
            shipments.done(&ids)?;
        }

        staged.record_event(ContractEvent::Activated {
            contract_id: staged.id(),
            timestamp: Utc::now(),
        });
        Ok(())
    }

    fn on_close(&self, staged: &mut RentalContract) -> Result<(), RentalError> {
        let ids = staged.open_shipments(ShipmentType::Return);
        if !ids.is_empty() {
            self.services.shipments.receive(&ids)?;
            self.services.shipments.done(&ids)?;
        }

        staged.record_event(ContractEvent::Closed {
            contract_id: staged.id(),
            timestamp: Utc::now(),
        });
        Ok(())
    }

    fn on_cancel(&self, staged: &mut RentalContract) -> Result<(), RentalError> {
        let mut ids = staged.open_shipments(ShipmentType::Out);
        ids.extend(staged.open_shipments(ShipmentType::Return));
        if !ids.is_empty() {
            self.services.shipments.cancel(&ids)?;
            staged.mark_cancelled(&ids);
        }

        staged.record_event(ContractEvent::Cancelled {
            contract_id: staged.id(),
            cancelled_shipments: ids.len(),
            timestamp: Utc::now(),
        });
        Ok(())
    }
}
