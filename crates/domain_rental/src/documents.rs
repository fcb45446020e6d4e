//! Document requests
//!
//! Descriptors of the invoices and shipments a contract asks the host system
//! to create. They carry no identity of their own: the document ports assign
//! ids when persisting them.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{
    AccountId, AddressId, CompanyId, Currency, JournalId, LocationId, Money, PartyId,
    PaymentTermId, ProductId, UomId, WarehouseId,
};

use crate::origin::Origin;

/// Direction of an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceType {
    /// Customer invoice
    Out,
    /// Supplier invoice
    In,
}

/// Direction of a customer shipment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShipmentType {
    /// Goods leaving the warehouse for the customer
    Out,
    /// Goods coming back at the end of the rental
    Return,
}

/// Kind of contract or invoice line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineType {
    #[default]
    Line,
}

/// State of a stock move when created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveState {
    #[default]
    Draft,
}

/// One invoice line derived from a contract line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLineRequest {
    pub line_type: LineType,
    pub invoice_type: InvoiceType,
    pub description: Option<String>,
    pub note: Option<String>,
    pub quantity: Decimal,
    pub unit: Option<UomId>,
    pub product: ProductId,
    /// Line unit price multiplied by the contract duration
    pub unit_price: Decimal,
    pub account: Option<AccountId>,
    pub origin: Origin,
}

/// Header and lines of an invoice to create
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRequest {
    pub company: CompanyId,
    pub invoice_type: InvoiceType,
    pub journal: JournalId,
    pub party: PartyId,
    pub invoice_address: AddressId,
    pub currency: Currency,
    pub account: AccountId,
    pub description: String,
    pub payment_term: PaymentTermId,
    pub lines: Vec<InvoiceLineRequest>,
}

impl InvoiceRequest {
    /// Sum of quantity times unit price over all lines
    pub fn untaxed_amount(&self) -> Money {
        let total: Decimal = self
            .lines
            .iter()
            .map(|line| line.quantity * line.unit_price)
            .sum();
        Money::new(total, self.currency)
    }
}

/// A stock move derived from a contract line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub quantity: Decimal,
    pub unit: Option<UomId>,
    pub product: ProductId,
    pub from_location: LocationId,
    pub to_location: LocationId,
    pub unit_price: Decimal,
    pub currency: Currency,
    pub company: CompanyId,
    pub planned_date: DateTime<Utc>,
    pub warehouse: WarehouseId,
    pub origin: Origin,
    pub state: MoveState,
}

impl MoveRequest {
    /// Key under which moves are grouped into one shipment
    pub fn grouping_key(&self) -> (NaiveDate, WarehouseId) {
        (self.planned_date.date_naive(), self.warehouse)
    }
}

/// A customer shipment and its moves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentRequest {
    pub shipment_type: ShipmentType,
    pub customer: PartyId,
    pub delivery_address: AddressId,
    pub company: CompanyId,
    pub planned_date: DateTime<Utc>,
    pub warehouse: WarehouseId,
    pub moves: Vec<MoveRequest>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn line(quantity: Decimal, unit_price: Decimal) -> InvoiceLineRequest {
        InvoiceLineRequest {
            line_type: LineType::Line,
            invoice_type: InvoiceType::Out,
            description: None,
            note: None,
            quantity,
            unit: None,
            product: ProductId::new(),
            unit_price,
            account: None,
            origin: Origin::new("rental.contract.line", Uuid::new_v4()),
        }
    }

    #[test]
    fn test_untaxed_amount() {
        let request = InvoiceRequest {
            company: CompanyId::new(),
            invoice_type: InvoiceType::Out,
            journal: JournalId::new(),
            party: PartyId::new(),
            invoice_address: AddressId::new(),
            currency: Currency::USD,
            account: AccountId::new(),
            description: "Contract #RC-1".to_string(),
            payment_term: PaymentTermId::new(),
            lines: vec![line(dec!(2), dec!(48.005)), line(dec!(1), dec!(10))],
        };

        assert_eq!(request.untaxed_amount(), Money::new(dec!(106.01), Currency::USD));
    }

    #[test]
    fn test_shipment_type_serialization() {
        let json = serde_json::to_string(&ShipmentType::Return).unwrap();
        assert_eq!(json, "\"return\"");
    }
}
