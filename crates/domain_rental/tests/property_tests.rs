//! Property-based tests for the rental domain

use proptest::prelude::*;
use rust_decimal::Decimal;

use domain_rental::{is_allowed, BillingMethod, ContractLine, ContractState};
use test_utils::{
    billing_method_strategy, contract_state_strategy, currency_strategy, quantity_strategy,
    rental_period_strategy, unit_price_strategy,
};

proptest! {
    #[test]
    fn amount_is_rounded_product(
        quantity in quantity_strategy(),
        unit_price in unit_price_strategy(),
        currency in currency_strategy(),
    ) {
        let mut line = ContractLine::new().with_quantity(quantity);
        line.unit_price = unit_price;

        let amount = line.compute_amount(Some(currency));

        prop_assert_eq!(amount, currency.round(quantity * unit_price));
        prop_assert!(amount.scale() <= currency.decimal_places());
    }

    #[test]
    fn duration_is_never_negative(
        (start, end) in rental_period_strategy(),
        method in billing_method_strategy(),
    ) {
        prop_assert!(method.duration(Some(start), Some(end)) >= 0);
        prop_assert_eq!(method.duration(Some(end), Some(start)), 0);
    }

    #[test]
    fn daily_duration_matches_whole_days((start, end) in rental_period_strategy()) {
        let days = (end - start).num_days();
        prop_assert_eq!(BillingMethod::Daily.duration(Some(start), Some(end)), days);
        prop_assert_eq!(BillingMethod::Weekly.duration(Some(start), Some(end)), days / 7);
    }

    #[test]
    fn transitions_never_loop(from in contract_state_strategy()) {
        prop_assert!(!is_allowed(from, from));
    }

    #[test]
    fn zero_quantity_has_zero_amount(
        unit_price in unit_price_strategy(),
        currency in currency_strategy(),
    ) {
        let mut line = ContractLine::new();
        line.unit_price = unit_price;
        prop_assert_eq!(line.compute_amount(Some(currency)), Decimal::ZERO);
    }
}

#[test]
fn every_state_can_be_reached_from_draft() {
    let mut reached = vec![ContractState::Draft];
    let mut frontier = vec![ContractState::Draft];

    while let Some(state) = frontier.pop() {
        for next in ContractState::ALL {
            if is_allowed(state, next) && !reached.contains(&next) {
                reached.push(next);
                frontier.push(next);
            }
        }
    }

    assert_eq!(reached.len(), ContractState::ALL.len());
}
