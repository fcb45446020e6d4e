//! Rental contract aggregate tests
//!
//! Tests cover party changes, edit rules per state, duration and totals.

use chrono::Duration;
use rust_decimal_macros::dec;

use core_kernel::{AddressId, Currency, Money, PartyId};
use domain_rental::{
    BillingMethod, ContractLine, ContractState, RentalContract, RentalError,
};
use test_utils::{PartyFixtures, ProductFixtures, RentalTestEnv, TemporalFixtures};

mod party {
    use super::*;

    #[test]
    fn test_party_change_takes_default_address() {
        let env = RentalTestEnv::new();
        let mut contract = RentalContract::new(env.company, PartyId::new());

        contract
            .set_party(env.customer.id, env.adapters.parties.as_ref())
            .unwrap();

        assert_eq!(contract.party(), env.customer.id);
        assert_eq!(contract.invoice_address(), Some(env.customer_address));
        assert_eq!(contract.shipment_address(), Some(env.customer_address));
    }

    #[test]
    fn test_party_without_address_clears_addresses() {
        let env = RentalTestEnv::new();
        let mut other = PartyFixtures::customer();
        other.id = PartyId::new();
        env.adapters.parties.insert(other.clone(), None);
        let mut contract = env.contract().build();
        assert!(contract.invoice_address().is_some());

        contract.set_party(other.id, env.adapters.parties.as_ref()).unwrap();

        assert!(contract.invoice_address().is_none());
        assert!(contract.shipment_address().is_none());
    }

    #[test]
    fn test_unknown_party_leaves_contract_unchanged() {
        let env = RentalTestEnv::new();
        let mut contract = env.contract().build();
        let before = contract.clone();

        let result = contract.set_party(PartyId::new(), env.adapters.parties.as_ref());

        assert!(matches!(result, Err(RentalError::Port(ref e)) if e.is_not_found()));
        assert_eq!(contract, before);
    }

    #[test]
    fn test_explicit_addresses() {
        let env = RentalTestEnv::new();
        let mut contract = env.contract().build();
        let billing = AddressId::new();
        let delivery = AddressId::new();

        contract.set_invoice_address(billing).unwrap();
        contract.set_shipment_address(delivery).unwrap();

        assert_eq!(contract.invoice_address(), Some(billing));
        assert_eq!(contract.shipment_address(), Some(delivery));
    }
}

mod edit_rules {
    use super::*;

    #[test]
    fn test_quoted_contract_locks_lines_and_header() {
        let env = RentalTestEnv::new();
        let (mut contract, ids) = env
            .contract()
            .line(ProductFixtures::projector(), dec!(1))
            .build_with_lines();
        env.workflow.quote(&mut contract).unwrap();

        let not_modifiable = |result: Result<(), RentalError>| {
            matches!(result, Err(RentalError::NotModifiable(ContractState::Quotation)))
        };

        assert!(not_modifiable(contract.add_line(ContractLine::new()).map(|_| ())));
        assert!(not_modifiable(contract.remove_line(ids[0]).map(|_| ())));
        assert!(not_modifiable(contract.set_line_quantity(ids[0], dec!(2)).map(|_| ())));
        assert!(not_modifiable(contract.set_line_unit(ids[0], ProductFixtures::dozen())));
        assert!(not_modifiable(contract.set_description("late change")));
        assert!(not_modifiable(contract.set_currency(Currency::EUR)));
        assert!(not_modifiable(contract.set_warehouse(env.warehouse)));
        assert!(not_modifiable(
            contract.set_party(env.customer.id, env.adapters.parties.as_ref())
        ));
    }

    #[test]
    fn test_quoted_contract_accepts_new_period() {
        let env = RentalTestEnv::new();
        let mut contract = env.contract().build();
        env.workflow.quote(&mut contract).unwrap();
        let end = TemporalFixtures::rental_end() + Duration::days(1);

        contract.set_end_date(end).unwrap();
        contract.set_billing_method(BillingMethod::Hourly).unwrap();

        assert_eq!(contract.end_date(), Some(end));
        assert_eq!(contract.duration(), 72);
    }

    #[test]
    fn test_reserved_contract_locks_period() {
        let env = RentalTestEnv::new();
        let mut contract = env.contract().build();
        env.workflow.quote(&mut contract).unwrap();
        env.workflow.reserve(&mut contract).unwrap();

        let result = contract.set_start_date(TemporalFixtures::mid_rental());

        assert!(matches!(result, Err(RentalError::NotModifiable(ContractState::Reservation))));
    }

    #[test]
    fn test_back_to_draft_unlocks_lines() {
        let env = RentalTestEnv::new();
        let mut contract = env.contract().build();
        env.workflow.quote(&mut contract).unwrap();
        env.workflow.draft(&mut contract).unwrap();

        assert!(contract.add_line(ContractLine::new()).is_ok());
    }

    #[test]
    fn test_line_unit_outside_category() {
        let env = RentalTestEnv::new();
        let (mut contract, ids) = env
            .contract()
            .line(ProductFixtures::projector(), dec!(1))
            .build_with_lines();

        let result = contract.set_line_unit(ids[0], ProductFixtures::kilogram());

        assert!(matches!(result, Err(RentalError::InvalidUnit { .. })));
        assert!(contract.set_line_unit(ids[0], ProductFixtures::dozen()).is_ok());
    }

    #[test]
    fn test_remove_line() {
        let env = RentalTestEnv::new();
        let (mut contract, ids) = env
            .contract()
            .line(ProductFixtures::projector(), dec!(1))
            .line(ProductFixtures::tent(), dec!(1))
            .build_with_lines();

        let removed = contract.remove_line(ids[0]).unwrap();

        assert_eq!(removed.id, ids[0]);
        assert_eq!(contract.lines().len(), 1);
        assert!(matches!(contract.remove_line(ids[0]), Err(RentalError::LineNotFound(_))));
    }
}

mod duration {
    use super::*;

    #[test]
    fn test_two_day_rental() {
        let env = RentalTestEnv::new();
        let daily = env.contract().billing_method(BillingMethod::Daily).build();
        let hourly = env.contract().billing_method(BillingMethod::Hourly).build();

        assert_eq!(daily.duration(), 2);
        assert_eq!(hourly.duration(), 48);
    }

    #[test]
    fn test_duration_without_dates() {
        let env = RentalTestEnv::new();
        let contract = env.contract().without_dates().build();
        assert_eq!(contract.duration(), 0);
    }

    #[test]
    fn test_end_before_start() {
        let env = RentalTestEnv::new();
        let contract = env
            .contract()
            .period(TemporalFixtures::rental_end(), TemporalFixtures::rental_start())
            .build();
        assert_eq!(contract.duration(), 0);
    }

    #[test]
    fn test_long_periods_truncate() {
        let env = RentalTestEnv::new();
        let start = TemporalFixtures::rental_start();
        let contract = env
            .contract()
            .period(start, start + Duration::days(59))
            .billing_method(BillingMethod::Monthly)
            .build();
        assert_eq!(contract.duration(), 1);
    }
}

mod totals {
    use super::*;

    #[test]
    fn test_total_amount_in_contract_currency() {
        let env = RentalTestEnv::new();
        let contract = env
            .contract()
            .line(ProductFixtures::projector(), dec!(3))
            .line(ProductFixtures::tent(), dec!(2))
            .build();

        assert_eq!(contract.total_amount(), Money::new(dec!(180.00), Currency::USD));
    }

    #[test]
    fn test_total_of_empty_contract() {
        let env = RentalTestEnv::new();
        let contract = env.contract().build();
        assert!(contract.total_amount().is_zero());
    }
}
