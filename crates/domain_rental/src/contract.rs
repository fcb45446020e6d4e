//! Rental Contract Aggregate Root
//!
//! The contract is the consistency boundary of the rental module. It owns
//! its lines and remembers the documents generated for it; state changes
//! are driven exclusively by [`ContractWorkflow`](crate::workflow::ContractWorkflow).
//!
//! # Invariants
//!
//! - The reference is assigned once, when the contract is first quoted
//! - Header fields and lines are editable in draft only; dates and billing
//!   method stay editable while quoted
//! - Addresses, dates and warehouse are required once the contract leaves
//!   draft, quotation and cancel
//! - A line's unit belongs to its product's unit category

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{
    AddressId, CompanyId, ContractId, ContractLineId, Currency, InvoiceId, LocationId, Money,
    PartyId, ShipmentId, WarehouseId,
};

use crate::billing::BillingMethod;
use crate::documents::ShipmentType;
use crate::error::RentalError;
use crate::events::ContractEvent;
use crate::line::{ContractLine, LineChanges};
use crate::ports::PartyPort;
use crate::pricing::PricingService;
use crate::product::{RentableProduct, UnitOfMeasure};

/// Contract lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractState {
    #[default]
    Draft,
    Quotation,
    Reservation,
    Active,
    Close,
    Cancel,
}

impl ContractState {
    pub const ALL: [ContractState; 6] = [
        ContractState::Draft,
        ContractState::Quotation,
        ContractState::Reservation,
        ContractState::Active,
        ContractState::Close,
        ContractState::Cancel,
    ];

    /// Returns true if addresses, dates and warehouse must be set in this state
    pub fn requires_addresses(&self) -> bool {
        !matches!(
            self,
            ContractState::Draft | ContractState::Quotation | ContractState::Cancel
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContractState::Draft => "draft",
            ContractState::Quotation => "quotation",
            ContractState::Reservation => "reservation",
            ContractState::Active => "active",
            ContractState::Close => "close",
            ContractState::Cancel => "cancel",
        }
    }
}

impl fmt::Display for ContractState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Company renting out the goods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    /// Currency product rates are expressed in
    pub currency: Currency,
}

impl Company {
    pub fn new(currency: Currency) -> Self {
        Self {
            id: CompanyId::new(),
            currency,
        }
    }
}

/// Warehouse the goods leave from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: WarehouseId,
    pub output_location: LocationId,
}

impl Warehouse {
    pub fn new(output_location: LocationId) -> Self {
        Self {
            id: WarehouseId::new(),
            output_location,
        }
    }
}

/// A shipment generated for the contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentRef {
    pub id: ShipmentId,
    pub shipment_type: ShipmentType,
    pub cancelled: bool,
}

/// Header values lines need to price themselves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractTerms {
    pub company: Company,
    pub currency: Currency,
    pub party: PartyId,
    pub billing_method: BillingMethod,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// The rental contract aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalContract {
    id: ContractId,
    reference: Option<String>,
    description: Option<String>,
    company: Company,
    currency: Currency,
    party: PartyId,
    invoice_address: Option<AddressId>,
    shipment_address: Option<AddressId>,
    warehouse: Option<Warehouse>,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
    billing_method: BillingMethod,
    state: ContractState,
    lines: Vec<ContractLine>,
    invoices: Vec<InvoiceId>,
    shipments: Vec<ShipmentRef>,
    #[serde(skip)]
    events: Vec<ContractEvent>,
}

impl RentalContract {
    /// Creates a draft contract billed hourly in the company currency
    pub fn new(company: Company, party: PartyId) -> Self {
        Self {
            id: ContractId::new_v7(),
            reference: None,
            description: None,
            company,
            currency: company.currency,
            party,
            invoice_address: None,
            shipment_address: None,
            warehouse: None,
            start_date: None,
            end_date: None,
            billing_method: BillingMethod::default(),
            state: ContractState::default(),
            lines: Vec::new(),
            invoices: Vec::new(),
            shipments: Vec::new(),
            events: Vec::new(),
        }
    }

    // Getters

    pub fn id(&self) -> ContractId {
        self.id
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn company(&self) -> Company {
        self.company
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn party(&self) -> PartyId {
        self.party
    }

    pub fn invoice_address(&self) -> Option<AddressId> {
        self.invoice_address
    }

    pub fn shipment_address(&self) -> Option<AddressId> {
        self.shipment_address
    }

    pub fn warehouse(&self) -> Option<Warehouse> {
        self.warehouse
    }

    pub fn start_date(&self) -> Option<DateTime<Utc>> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        self.end_date
    }

    pub fn billing_method(&self) -> BillingMethod {
        self.billing_method
    }

    pub fn state(&self) -> ContractState {
        self.state
    }

    /// Lines in display order
    pub fn lines(&self) -> &[ContractLine] {
        &self.lines
    }

    pub fn line(&self, id: ContractLineId) -> Option<&ContractLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    /// Invoices generated for the contract
    pub fn invoices(&self) -> &[InvoiceId] {
        &self.invoices
    }

    /// Outbound shipments generated for the contract
    pub fn shipments(&self) -> Vec<ShipmentId> {
        self.shipment_ids(ShipmentType::Out)
    }

    pub fn return_shipments(&self) -> Vec<ShipmentId> {
        self.shipment_ids(ShipmentType::Return)
    }

    fn shipment_ids(&self, shipment_type: ShipmentType) -> Vec<ShipmentId> {
        self.shipments
            .iter()
            .filter(|shipment| shipment.shipment_type == shipment_type)
            .map(|shipment| shipment.id)
            .collect()
    }

    /// Shipments of a direction that have not been cancelled
    pub fn open_shipments(&self, shipment_type: ShipmentType) -> Vec<ShipmentId> {
        self.shipments
            .iter()
            .filter(|shipment| shipment.shipment_type == shipment_type && !shipment.cancelled)
            .map(|shipment| shipment.id)
            .collect()
    }

    /// Returns accumulated domain events and clears them
    pub fn take_events(&mut self) -> Vec<ContractEvent> {
        std::mem::take(&mut self.events)
    }

    /// Reference once quoted, the contract id before
    pub fn display_name(&self) -> String {
        match &self.reference {
            Some(reference) => reference.clone(),
            None => self.id.to_string(),
        }
    }

    /// Contract length in periods of its billing method
    pub fn duration(&self) -> i64 {
        self.billing_method.duration(self.start_date, self.end_date)
    }

    pub fn terms(&self) -> ContractTerms {
        ContractTerms {
            company: self.company,
            currency: self.currency,
            party: self.party,
            billing_method: self.billing_method,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }

    /// Sum of the line amounts in the contract currency
    pub fn total_amount(&self) -> Money {
        let total: Decimal = self
            .lines
            .iter()
            .map(|line| line.compute_amount(Some(self.currency)))
            .sum();
        Money::new(total, self.currency)
    }

    pub fn is_modifiable(&self) -> bool {
        self.state == ContractState::Draft
    }

    /// Checks the fields required to enter `target`
    pub fn check_required_for(&self, target: ContractState) -> Result<(), RentalError> {
        if !target.requires_addresses() {
            return Ok(());
        }

        if self.invoice_address.is_none() {
            return Err(RentalError::missing("invoice_address"));
        }
        if self.shipment_address.is_none() {
            return Err(RentalError::missing("shipment_address"));
        }
        if self.start_date.is_none() {
            return Err(RentalError::missing("start_date"));
        }
        if self.end_date.is_none() {
            return Err(RentalError::missing("end_date"));
        }
        if self.warehouse.is_none() {
            return Err(RentalError::missing("warehouse"));
        }
        Ok(())
    }

    /// Checks every line's product and unit
    pub fn validate_lines(&self) -> Result<(), RentalError> {
        self.lines.iter().try_for_each(ContractLine::validate)
    }

    fn ensure_modifiable(&self) -> Result<(), RentalError> {
        if self.is_modifiable() {
            Ok(())
        } else {
            Err(RentalError::NotModifiable(self.state))
        }
    }

    fn ensure_terms_modifiable(&self) -> Result<(), RentalError> {
        match self.state {
            ContractState::Draft | ContractState::Quotation => Ok(()),
            state => Err(RentalError::NotModifiable(state)),
        }
    }

    // Header edits

    pub fn set_description(&mut self, description: impl Into<String>) -> Result<(), RentalError> {
        self.ensure_modifiable()?;
        self.description = Some(description.into());
        Ok(())
    }

    /// Changes the customer and takes over their default address
    ///
    /// Both addresses are cleared when the party has no default address.
    pub fn set_party(&mut self, party: PartyId, parties: &dyn PartyPort) -> Result<(), RentalError> {
        self.ensure_modifiable()?;
        let address = parties.default_address(party)?;
        self.party = party;
        self.invoice_address = address;
        self.shipment_address = address;
        Ok(())
    }

    pub fn set_invoice_address(&mut self, address: AddressId) -> Result<(), RentalError> {
        self.ensure_modifiable()?;
        self.invoice_address = Some(address);
        Ok(())
    }

    pub fn set_shipment_address(&mut self, address: AddressId) -> Result<(), RentalError> {
        self.ensure_modifiable()?;
        self.shipment_address = Some(address);
        Ok(())
    }

    pub fn set_warehouse(&mut self, warehouse: Warehouse) -> Result<(), RentalError> {
        self.ensure_modifiable()?;
        self.warehouse = Some(warehouse);
        Ok(())
    }

    pub fn set_currency(&mut self, currency: Currency) -> Result<(), RentalError> {
        self.ensure_modifiable()?;
        self.currency = currency;
        Ok(())
    }

    pub fn set_start_date(&mut self, start: DateTime<Utc>) -> Result<(), RentalError> {
        self.ensure_terms_modifiable()?;
        self.start_date = Some(start);
        Ok(())
    }

    pub fn set_end_date(&mut self, end: DateTime<Utc>) -> Result<(), RentalError> {
        self.ensure_terms_modifiable()?;
        self.end_date = Some(end);
        Ok(())
    }

    /// Sets both ends of the rental period
    pub fn set_period(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), RentalError> {
        self.ensure_terms_modifiable()?;
        self.start_date = Some(start);
        self.end_date = Some(end);
        Ok(())
    }

    pub fn set_billing_method(&mut self, billing_method: BillingMethod) -> Result<(), RentalError> {
        self.ensure_terms_modifiable()?;
        self.billing_method = billing_method;
        Ok(())
    }

    // Line edits

    fn line_mut(&mut self, id: ContractLineId) -> Result<&mut ContractLine, RentalError> {
        self.lines
            .iter_mut()
            .find(|line| line.id == id)
            .ok_or(RentalError::LineNotFound(id))
    }

    /// Adds a line, keeping lines ordered by sequence
    pub fn add_line(&mut self, line: ContractLine) -> Result<ContractLineId, RentalError> {
        self.ensure_modifiable()?;
        let id = line.id;
        self.lines.push(line);
        self.lines.sort_by_key(|line| line.sequence);
        Ok(id)
    }

    pub fn remove_line(&mut self, id: ContractLineId) -> Result<ContractLine, RentalError> {
        self.ensure_modifiable()?;
        let index = self
            .lines
            .iter()
            .position(|line| line.id == id)
            .ok_or(RentalError::LineNotFound(id))?;
        Ok(self.lines.remove(index))
    }

    /// Selects the product of a line, deriving its unit, price and description
    pub fn select_product(
        &mut self,
        id: ContractLineId,
        product: RentableProduct,
        pricing: &PricingService,
    ) -> Result<LineChanges, RentalError> {
        self.ensure_modifiable()?;
        let terms = self.terms();
        self.line_mut(id)?.on_product_selected(product, &terms, pricing)
    }

    /// Changes a line's quantity and returns its new amount
    pub fn set_line_quantity(&mut self, id: ContractLineId, quantity: Decimal) -> Result<Decimal, RentalError> {
        self.ensure_modifiable()?;
        let currency = self.currency;
        let line = self.line_mut(id)?;
        line.quantity = quantity;
        Ok(line.compute_amount(Some(currency)))
    }

    pub fn set_line_unit(&mut self, id: ContractLineId, unit: UnitOfMeasure) -> Result<(), RentalError> {
        self.ensure_modifiable()?;
        self.line_mut(id)?.set_unit(unit)
    }

    pub fn set_line_description(&mut self, id: ContractLineId, description: impl Into<String>) -> Result<(), RentalError> {
        self.ensure_modifiable()?;
        self.line_mut(id)?.description = Some(description.into());
        Ok(())
    }

    /// Overrides the planned dates of a line's outbound and return moves
    pub fn set_line_dates(
        &mut self,
        id: ContractLineId,
        delivery_date: Option<DateTime<Utc>>,
        return_date: Option<DateTime<Utc>>,
    ) -> Result<(), RentalError> {
        self.ensure_modifiable()?;
        let line = self.line_mut(id)?;
        line.delivery_date = delivery_date;
        line.return_date = return_date;
        Ok(())
    }

    // Workflow mutators

    pub(crate) fn set_state(&mut self, state: ContractState) {
        self.state = state;
    }

    pub(crate) fn assign_reference(&mut self, reference: String) {
        if self.reference.is_none() {
            self.reference = Some(reference);
        }
    }

    pub(crate) fn record_invoice(&mut self, invoice: InvoiceId) {
        self.invoices.push(invoice);
    }

    pub(crate) fn record_shipments(&mut self, ids: &[ShipmentId], shipment_type: ShipmentType) {
        self.shipments.extend(ids.iter().map(|&id| ShipmentRef {
            id,
            shipment_type,
            cancelled: false,
        }));
    }

    pub(crate) fn mark_cancelled(&mut self, ids: &[ShipmentId]) {
        for shipment in self.shipments.iter_mut().filter(|s| ids.contains(&s.id)) {
            shipment.cancelled = true;
        }
    }

    pub(crate) fn record_event(&mut self, event: ContractEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn contract() -> RentalContract {
        RentalContract::new(Company::new(Currency::EUR), PartyId::new())
    }

    #[test]
    fn test_new_contract_defaults() {
        let mut contract = contract();
        assert_eq!(contract.state(), ContractState::Draft);
        assert_eq!(contract.billing_method(), BillingMethod::Hourly);
        assert_eq!(contract.currency(), Currency::EUR);
        assert!(contract.reference().is_none());
        assert_eq!(contract.duration(), 0);
        assert!(contract.take_events().is_empty());
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        let mut contract = contract();
        assert_eq!(contract.display_name(), contract.id().to_string());

        contract.assign_reference("RC0001".to_string());
        assert_eq!(contract.display_name(), "RC0001");
    }

    #[test]
    fn test_reference_assigned_once() {
        let mut contract = contract();
        contract.assign_reference("RC0001".to_string());
        contract.assign_reference("RC0002".to_string());
        assert_eq!(contract.reference(), Some("RC0001"));
    }

    #[test]
    fn test_required_fields_depend_on_target() {
        let contract = contract();
        assert!(contract.check_required_for(ContractState::Quotation).is_ok());
        assert!(contract.check_required_for(ContractState::Cancel).is_ok());
        assert!(matches!(
            contract.check_required_for(ContractState::Reservation),
            Err(RentalError::MissingRequiredField(field)) if field == "invoice_address"
        ));
    }

    #[test]
    fn test_lines_locked_outside_draft() {
        let mut contract = contract();
        contract.set_state(ContractState::Quotation);

        assert!(matches!(
            contract.add_line(ContractLine::new()),
            Err(RentalError::NotModifiable(ContractState::Quotation))
        ));
        assert!(matches!(
            contract.set_description("x"),
            Err(RentalError::NotModifiable(ContractState::Quotation))
        ));

        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(contract.set_start_date(start).is_ok());

        contract.set_state(ContractState::Active);
        assert!(contract.set_billing_method(BillingMethod::Daily).is_err());
    }

    #[test]
    fn test_lines_ordered_by_sequence() {
        let mut contract = contract();
        let late = contract.add_line(ContractLine::new().with_sequence(20)).unwrap();
        let early = contract.add_line(ContractLine::new().with_sequence(5)).unwrap();

        let order: Vec<_> = contract.lines().iter().map(|line| line.id).collect();
        assert_eq!(order, vec![early, late]);
    }

    #[test]
    fn test_total_amount() {
        let mut contract = contract();
        let mut first = ContractLine::new().with_quantity(dec!(3));
        first.unit_price = dec!(10);
        let mut second = ContractLine::new().with_quantity(dec!(1));
        second.unit_price = dec!(0.125);
        contract.add_line(first).unwrap();
        contract.add_line(second).unwrap();

        assert_eq!(contract.total_amount(), Money::new(dec!(30.12), Currency::EUR));
    }

    #[test]
    fn test_open_shipments_exclude_cancelled() {
        let mut contract = contract();
        let out = [ShipmentId::new(), ShipmentId::new()];
        let back = [ShipmentId::new()];
        contract.record_shipments(&out, ShipmentType::Out);
        contract.record_shipments(&back, ShipmentType::Return);
        contract.mark_cancelled(&out[..1]);

        assert_eq!(contract.shipments(), out.to_vec());
        assert_eq!(contract.open_shipments(ShipmentType::Out), vec![out[1]]);
        assert_eq!(contract.return_shipments(), back.to_vec());
    }
}
