//! Unit tests for the Money module
//!
//! Tests cover money creation, currency rounding, checked arithmetic,
//! parsing and display.

use core_kernel::{Money, Currency, MoneyError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

mod creation {
    use super::*;

    #[test]
    fn test_new_creates_money_with_correct_amount() {
        let m = Money::new(dec!(100.50), Currency::USD);
        assert_eq!(m.amount(), dec!(100.50));
        assert_eq!(m.currency(), Currency::USD);
    }

    #[test]
    fn test_new_rounds_to_currency_precision() {
        let m = Money::new(dec!(100.123456789), Currency::USD);
        assert_eq!(m.amount(), dec!(100.12));
    }

    #[test]
    fn test_zero_creates_zero_amount() {
        let m = Money::zero(Currency::EUR);
        assert!(m.is_zero());
        assert_eq!(m.amount(), Decimal::ZERO);
    }
}

mod rounding {
    use super::*;

    #[test]
    fn test_round_usd_half_to_even() {
        assert_eq!(Currency::USD.round(dec!(2.345)), dec!(2.34));
        assert_eq!(Currency::USD.round(dec!(2.355)), dec!(2.36));
    }

    #[test]
    fn test_round_jpy_has_no_decimals() {
        assert_eq!(Currency::JPY.round(dec!(1234.56)), dec!(1235));
    }

    #[test]
    fn test_round_kwd_three_decimals() {
        assert_eq!(Currency::KWD.round(dec!(0.12345)), dec!(0.123));
    }

    #[test]
    fn test_rental_amount_rounding() {
        let amount = dec!(3) * dec!(10.00);
        assert_eq!(Currency::USD.round(amount), dec!(30.00));
    }
}

mod currency {
    use super::*;

    #[test]
    fn test_currency_codes_roundtrip() {
        for currency in [
            Currency::USD, Currency::EUR, Currency::GBP, Currency::JPY, Currency::CHF,
            Currency::INR, Currency::AUD, Currency::CAD, Currency::KWD,
        ] {
            let parsed: Currency = currency.code().parse().unwrap();
            assert_eq!(parsed, currency);
            assert!(!currency.symbol().is_empty());
        }
    }

    #[test]
    fn test_unknown_currency_code() {
        assert_eq!(
            "ZZZ".parse::<Currency>(),
            Err(MoneyError::UnknownCurrency("ZZZ".to_string()))
        );
    }

    #[test]
    fn test_currency_json_uses_code() {
        let json = serde_json::to_string(&Currency::EUR).unwrap();
        assert_eq!(json, "\"EUR\"");
    }
}

mod display {
    use super::*;

    #[test]
    fn test_money_display_usd() {
        assert_eq!(Money::new(dec!(1234.5), Currency::USD).to_string(), "$ 1234.50");
    }

    #[test]
    fn test_money_display_jpy() {
        assert_eq!(Money::new(dec!(1000), Currency::JPY).to_string(), "¥ 1000");
    }
}
