//! Contract lines
//!
//! A line rents a quantity of one product for the whole contract period. Its
//! unit price is the rent per billing period, fixed when the product is
//! selected; the invoiced price multiplies it by the contract duration.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use core_kernel::{ContractLineId, Currency, LocationId};

use crate::contract::{ContractTerms, RentalContract};
use crate::documents::{InvoiceLineRequest, InvoiceType, LineType, MoveRequest, MoveState, ShipmentType};
use crate::error::RentalError;
use crate::origin::{Origin, OriginProvider, CONTRACT_LINE_ORIGIN};
use crate::pricing::{PricingService, RentContext};
use crate::product::{RentableProduct, UnitOfMeasure};

/// Digits kept on a line's unit price
pub const UNIT_PRICE_DIGITS: u32 = 4;

/// Display order given to new lines
pub const DEFAULT_SEQUENCE: u32 = 10;

/// Stock locations a move can reach besides the warehouse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveLocations {
    /// The customer's location
    pub customer: LocationId,
    /// Where returned goods are received
    pub rent_return: LocationId,
}

/// Values changed by selecting a product on a line
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineChanges {
    pub unit: Option<UnitOfMeasure>,
    pub unit_price: Option<Decimal>,
    pub description: Option<String>,
    pub amount: Option<Decimal>,
}

impl LineChanges {
    pub fn is_empty(&self) -> bool {
        self.unit.is_none()
            && self.unit_price.is_none()
            && self.description.is_none()
            && self.amount.is_none()
    }
}

/// A billable line of a rental contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractLine {
    pub id: ContractLineId,
    pub sequence: u32,
    pub line_type: LineType,
    pub product: Option<RentableProduct>,
    pub unit: Option<UnitOfMeasure>,
    /// Negative quantities are kept but never turned into documents
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub description: Option<String>,
    pub note: Option<String>,
    /// Overrides the contract start date for the outbound move
    pub delivery_date: Option<DateTime<Utc>>,
    /// Overrides the contract end date for the return move
    pub return_date: Option<DateTime<Utc>>,
}

impl Default for ContractLine {
    fn default() -> Self {
        Self::new()
    }
}

impl ContractLine {
    pub fn new() -> Self {
        Self {
            id: ContractLineId::new_v7(),
            sequence: DEFAULT_SEQUENCE,
            line_type: LineType::Line,
            product: None,
            unit: None,
            quantity: Decimal::ZERO,
            unit_price: Decimal::ZERO,
            description: None,
            note: None,
            delivery_date: None,
            return_date: None,
        }
    }

    pub fn with_quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_sequence(mut self, sequence: u32) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Pricing context of this line on a contract
    ///
    /// The unit falls back to the product's default unit.
    pub fn rent_context(&self, terms: &ContractTerms) -> RentContext {
        let uom = self
            .unit
            .as_ref()
            .map(|unit| unit.id)
            .or_else(|| self.product.as_ref().map(|product| product.default_uom.id));

        RentContext {
            currency: Some(terms.currency),
            customer: Some(terms.party),
            billing_method: terms.billing_method,
            contract_start_date: terms.start_date,
            uom,
        }
    }

    /// Sets the product and derives unit, price, description and amount
    ///
    /// Selecting the same product again changes nothing. Nothing is modified
    /// when pricing fails.
    pub fn on_product_selected(
        &mut self,
        product: RentableProduct,
        terms: &ContractTerms,
        pricing: &PricingService,
    ) -> Result<LineChanges, RentalError> {
        if !product.rentable {
            return Err(RentalError::ProductNotRentable(product.id));
        }

        let amount_before = self.compute_amount(Some(terms.currency));
        let mut changes = LineChanges::default();

        let unit = match &self.unit {
            Some(unit) if product.accepts_unit(unit) => unit.clone(),
            _ => {
                changes.unit = Some(product.default_uom.clone());
                product.default_uom.clone()
            }
        };

        let context = RentContext {
            uom: Some(unit.id),
            ..self.rent_context(terms)
        };
        let unit_price = pricing
            .get_rent(&[&product], self.quantity, &context, terms.company.currency)?
            .get(&product.id)
            .copied()
            .unwrap_or_default()
            .round_dp(UNIT_PRICE_DIGITS);

        if unit_price != self.unit_price {
            changes.unit_price = Some(unit_price);
        }
        if self.description.is_none() {
            changes.description = Some(product.display_name());
            self.description = changes.description.clone();
        }

        self.unit = Some(unit);
        self.unit_price = unit_price;
        self.product = Some(product);

        let amount = self.compute_amount(Some(terms.currency));
        if amount != amount_before {
            changes.amount = Some(amount);
        }

        Ok(changes)
    }

    /// Changes the unit, which must belong to the product's category
    pub fn set_unit(&mut self, unit: UnitOfMeasure) -> Result<(), RentalError> {
        if let Some(product) = &self.product {
            if !product.accepts_unit(&unit) {
                return Err(RentalError::InvalidUnit {
                    unit: unit.id,
                    product: product.id,
                });
            }
        }
        self.unit = Some(unit);
        Ok(())
    }

    /// Quantity times unit price, rounded to the currency when known
    pub fn compute_amount(&self, currency: Option<Currency>) -> Decimal {
        match self.line_type {
            LineType::Line => {
                let amount = self.quantity * self.unit_price;
                match currency {
                    Some(currency) => currency.round(amount),
                    None => amount,
                }
            }
        }
    }

    /// Checks the line can be quoted
    pub fn validate(&self) -> Result<(), RentalError> {
        let product = self
            .product
            .as_ref()
            .ok_or_else(|| RentalError::missing(format!("product on line {}", self.id)))?;

        if !product.rentable {
            return Err(RentalError::ProductNotRentable(product.id));
        }

        if let Some(unit) = &self.unit {
            if !product.accepts_unit(unit) {
                return Err(RentalError::InvalidUnit {
                    unit: unit.id,
                    product: product.id,
                });
            }
        }

        Ok(())
    }

    fn is_unsupported_quantity(&self) -> bool {
        if self.quantity < Decimal::ZERO {
            let error = RentalError::UnsupportedQuantity {
                line: self.id,
                quantity: self.quantity,
            };
            warn!(line_id = %self.id, %error, "Skipping contract line");
            return true;
        }
        false
    }

    /// Invoice lines billing this line over the contract duration
    ///
    /// Returns at most one line; none for negative quantities.
    pub fn to_invoice_line(&self, contract: &RentalContract, invoice_type: InvoiceType) -> Vec<InvoiceLineRequest> {
        if self.line_type != LineType::Line || self.is_unsupported_quantity() {
            return Vec::new();
        }

        let Some(product) = &self.product else {
            warn!(line_id = %self.id, "Skipping contract line without product");
            return Vec::new();
        };

        vec![InvoiceLineRequest {
            line_type: self.line_type,
            invoice_type,
            description: self.description.clone(),
            note: self.note.clone(),
            quantity: self.quantity,
            unit: self.unit.as_ref().map(|unit| unit.id),
            product: product.id,
            unit_price: self.unit_price * Decimal::from(contract.duration()),
            account: product.account_revenue,
            origin: self.origin(),
        }]
    }

    /// Planned date of this line's move for a shipment direction
    pub fn planned_date(&self, contract: &RentalContract, shipment_type: ShipmentType) -> Option<DateTime<Utc>> {
        match shipment_type {
            ShipmentType::Out => self.delivery_date.or(contract.start_date()),
            ShipmentType::Return => self.return_date.or(contract.end_date()),
        }
    }

    /// Stock move carrying this line's goods in the given direction
    ///
    /// Returns `None` for services and for lines without a positive quantity.
    pub fn to_move(
        &self,
        contract: &RentalContract,
        shipment_type: ShipmentType,
        locations: &MoveLocations,
    ) -> Result<Option<MoveRequest>, RentalError> {
        if self.line_type != LineType::Line || self.is_unsupported_quantity() || self.quantity.is_zero() {
            return Ok(None);
        }

        let Some(product) = &self.product else {
            return Ok(None);
        };
        if !product.product_type.is_physical() {
            return Ok(None);
        }

        let warehouse = contract.warehouse().ok_or_else(|| RentalError::missing("warehouse"))?;
        let planned_date = self.planned_date(contract, shipment_type).ok_or_else(|| match shipment_type {
            ShipmentType::Out => RentalError::missing("start_date"),
            ShipmentType::Return => RentalError::missing("end_date"),
        })?;

        let (from_location, to_location) = match shipment_type {
            ShipmentType::Out => (warehouse.output_location, locations.customer),
            ShipmentType::Return => (locations.customer, locations.rent_return),
        };

        Ok(Some(MoveRequest {
            quantity: self.quantity,
            unit: self.unit.as_ref().map(|unit| unit.id),
            product: product.id,
            from_location,
            to_location,
            unit_price: self.unit_price,
            currency: contract.currency(),
            company: contract.company().id,
            planned_date,
            warehouse: warehouse.id,
            origin: self.origin(),
            state: MoveState::Draft,
        }))
    }
}

impl OriginProvider for ContractLine {
    fn origin(&self) -> Origin {
        Origin::new(CONTRACT_LINE_ORIGIN, *self.id.as_uuid())
    }
}
