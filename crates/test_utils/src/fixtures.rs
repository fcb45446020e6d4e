//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for the rental domain. Fixtures are
//! deterministic: the same call always returns the same ids and values, so
//! products built from them share a unit category.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal_macros::dec;
use uuid::Uuid;

use core_kernel::{AccountId, LocationId, PartyId, ProductId, UomCategoryId, UomId};
use domain_rental::{PartyProfile, ProductType, RentRates, RentableProduct, UnitOfMeasure};

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Builds a UTC timestamp on the hour
    pub fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
    }

    /// Standard rental start (Jan 1, 2024, midnight)
    pub fn rental_start() -> DateTime<Utc> {
        Self::at(2024, 1, 1, 0)
    }

    /// Standard rental end, two days after the start
    pub fn rental_end() -> DateTime<Utc> {
        Self::at(2024, 1, 3, 0)
    }

    /// A day within the standard rental
    pub fn mid_rental() -> DateTime<Utc> {
        Self::at(2024, 1, 2, 12)
    }
}

/// Fixture for units and rentable products
pub struct ProductFixtures;

impl ProductFixtures {
    /// The "countable items" unit category
    pub fn unit_category() -> UomCategoryId {
        UomCategoryId::from_uuid(Uuid::from_u128(0x0001))
    }

    /// The "weight" unit category
    pub fn weight_category() -> UomCategoryId {
        UomCategoryId::from_uuid(Uuid::from_u128(0x0002))
    }

    /// One item
    pub fn unit() -> UnitOfMeasure {
        UnitOfMeasure {
            id: UomId::from_uuid(Uuid::from_u128(0x0101)),
            name: "Unit".to_string(),
            category: Self::unit_category(),
            digits: 0,
        }
    }

    /// A dozen items, same category as [`ProductFixtures::unit`]
    pub fn dozen() -> UnitOfMeasure {
        UnitOfMeasure {
            id: UomId::from_uuid(Uuid::from_u128(0x0102)),
            name: "Dozen".to_string(),
            category: Self::unit_category(),
            digits: 0,
        }
    }

    pub fn kilogram() -> UnitOfMeasure {
        UnitOfMeasure {
            id: UomId::from_uuid(Uuid::from_u128(0x0201)),
            name: "Kilogram".to_string(),
            category: Self::weight_category(),
            digits: 3,
        }
    }

    /// Rates used by the standard products
    pub fn standard_rates() -> RentRates {
        RentRates {
            hourly: dec!(2.50),
            daily: dec!(10.00),
            weekly: dec!(60.00),
            monthly: dec!(200.00),
            yearly: dec!(1800.00),
        }
    }

    /// Rentable goods priced with [`ProductFixtures::standard_rates`]
    pub fn projector() -> RentableProduct {
        RentableProduct {
            id: ProductId::from_uuid(Uuid::from_u128(0x1001)),
            code: Some("PRJ".to_string()),
            name: "Projector".to_string(),
            product_type: ProductType::Goods,
            rentable: true,
            default_uom: Self::unit(),
            rates: Self::standard_rates(),
            account_revenue: Some(AccountId::from_uuid(Uuid::from_u128(0x7001))),
        }
    }

    /// Second rentable goods product
    pub fn tent() -> RentableProduct {
        RentableProduct {
            id: ProductId::from_uuid(Uuid::from_u128(0x1002)),
            code: None,
            name: "Party Tent".to_string(),
            product_type: ProductType::Goods,
            rentable: true,
            default_uom: Self::unit(),
            rates: RentRates {
                hourly: dec!(8),
                daily: dec!(75),
                weekly: dec!(400),
                monthly: dec!(1200),
                yearly: dec!(9000),
            },
            account_revenue: Some(AccountId::from_uuid(Uuid::from_u128(0x7001))),
        }
    }

    /// A rentable service, never shipped
    pub fn technician() -> RentableProduct {
        RentableProduct {
            id: ProductId::from_uuid(Uuid::from_u128(0x1003)),
            code: Some("TECH".to_string()),
            name: "On-site Technician".to_string(),
            product_type: ProductType::Service,
            rentable: true,
            default_uom: Self::unit(),
            rates: Self::standard_rates(),
            account_revenue: None,
        }
    }

    /// Goods that cannot be rented
    pub fn forklift() -> RentableProduct {
        RentableProduct {
            id: ProductId::from_uuid(Uuid::from_u128(0x1004)),
            code: None,
            name: "Forklift".to_string(),
            product_type: ProductType::Goods,
            rentable: false,
            default_uom: Self::unit(),
            rates: Self::standard_rates(),
            account_revenue: None,
        }
    }
}

/// Fixture for customers
pub struct PartyFixtures;

impl PartyFixtures {
    /// A customer with a receivable account and no payment term
    pub fn customer() -> PartyProfile {
        PartyProfile {
            id: PartyId::from_uuid(Uuid::from_u128(0x2001)),
            name: "Northwind Events".to_string(),
            account_receivable: Some(AccountId::from_uuid(Uuid::from_u128(0x7100))),
            customer_payment_term: None,
            customer_location: LocationId::from_uuid(Uuid::from_u128(0x3001)),
        }
    }
}
