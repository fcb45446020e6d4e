//! Rentable products and units of measure
//!
//! Products come from the external catalogue; this module only carries the
//! rental-specific view of them: the five rent rates and the unit category
//! used to validate contract lines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{AccountId, ProductId, UomCategoryId, UomId};

use crate::billing::BillingMethod;

/// Kind of product, as defined by the catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    /// Stockable goods
    #[default]
    Goods,
    /// Fixed assets
    Assets,
    /// Non-physical service, never shipped
    Service,
}

impl ProductType {
    /// Returns true if the product moves through a warehouse
    pub fn is_physical(&self) -> bool {
        !matches!(self, ProductType::Service)
    }
}

/// A unit of measure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitOfMeasure {
    pub id: UomId,
    pub name: String,
    pub category: UomCategoryId,
    /// Decimal digits used to display quantities
    pub digits: u32,
}

impl UnitOfMeasure {
    pub fn new(name: impl Into<String>, category: UomCategoryId) -> Self {
        Self {
            id: UomId::new(),
            name: name.into(),
            category,
            digits: 2,
        }
    }
}

/// Rent price per billing period, in the company currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RentRates {
    pub hourly: Decimal,
    pub daily: Decimal,
    pub weekly: Decimal,
    pub monthly: Decimal,
    pub yearly: Decimal,
}

impl RentRates {
    pub fn hourly(&self) -> Decimal {
        self.hourly
    }

    pub fn daily(&self) -> Decimal {
        self.daily
    }

    pub fn weekly(&self) -> Decimal {
        self.weekly
    }

    pub fn monthly(&self) -> Decimal {
        self.monthly
    }

    pub fn yearly(&self) -> Decimal {
        self.yearly
    }
}

/// The rental view of a catalogue product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentableProduct {
    pub id: ProductId,
    pub code: Option<String>,
    pub name: String,
    pub product_type: ProductType,
    pub rentable: bool,
    pub default_uom: UnitOfMeasure,
    pub rates: RentRates,
    /// Revenue account used on generated invoice lines
    pub account_revenue: Option<AccountId>,
}

impl RentableProduct {
    /// Creates a rentable goods product with zero rates
    pub fn new(name: impl Into<String>, default_uom: UnitOfMeasure) -> Self {
        Self {
            id: ProductId::new(),
            code: None,
            name: name.into(),
            product_type: ProductType::Goods,
            rentable: true,
            default_uom,
            rates: RentRates::default(),
            account_revenue: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_type(mut self, product_type: ProductType) -> Self {
        self.product_type = product_type;
        self
    }

    pub fn with_rates(mut self, rates: RentRates) -> Self {
        self.rates = rates;
        self
    }

    pub fn with_revenue_account(mut self, account: AccountId) -> Self {
        self.account_revenue = Some(account);
        self
    }

    pub fn not_rentable(mut self) -> Self {
        self.rentable = false;
        self
    }

    /// Name shown to users: `[CODE] Name` when a code is set
    pub fn display_name(&self) -> String {
        match &self.code {
            Some(code) => format!("[{}] {}", code, self.name),
            None => self.name.clone(),
        }
    }

    /// Returns the base rent for one period of the billing method
    pub fn rent(&self, billing_method: BillingMethod) -> Decimal {
        billing_method.rate(&self.rates)
    }

    /// Returns true if the unit belongs to the default unit's category
    pub fn accepts_unit(&self, unit: &UnitOfMeasure) -> bool {
        unit.category == self.default_uom.category
    }
}
