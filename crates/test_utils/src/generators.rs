//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use core_kernel::Currency;
use domain_rental::{BillingMethod, ContractState};

/// Strategy for generating valid Currency values
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::USD),
        Just(Currency::EUR),
        Just(Currency::GBP),
        Just(Currency::JPY),
        Just(Currency::CHF),
        Just(Currency::INR),
        Just(Currency::AUD),
        Just(Currency::CAD),
        Just(Currency::KWD),
    ]
}

/// Strategy for generating billing methods
pub fn billing_method_strategy() -> impl Strategy<Value = BillingMethod> {
    proptest::sample::select(BillingMethod::ALL.to_vec())
}

/// Strategy for generating contract states
pub fn contract_state_strategy() -> impl Strategy<Value = ContractState> {
    proptest::sample::select(ContractState::ALL.to_vec())
}

/// Strategy for generating line quantities with up to 2 decimals, negatives included
pub fn quantity_strategy() -> impl Strategy<Value = Decimal> {
    (-1_000i64..100_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for generating unit prices with 4 decimals
pub fn unit_price_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|n| Decimal::new(n, 4))
}

/// Strategy for generating valid timestamps within a year
pub fn timestamp_2024_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..365 * 24).prop_map(|hours| {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(hours)
    })
}

/// Strategy for generating rental periods (start before end)
pub fn rental_period_strategy() -> impl Strategy<Value = (DateTime<Utc>, DateTime<Utc>)> {
    (timestamp_2024_strategy(), 1i64..3 * 365 * 24 * 60).prop_map(|(start, minutes)| {
        (start, start + Duration::minutes(minutes))
    })
}
