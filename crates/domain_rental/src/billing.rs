//! Billing methods and contract duration
//!
//! A contract is billed per period of its billing method. The duration in
//! periods is a deliberately coarse approximation: weeks are 7 days, months
//! 30 days and years 365 days, always truncated.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RentalError;
use crate::product::RentRates;

/// Period used to price and bill a contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingMethod {
    #[default]
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl BillingMethod {
    pub const ALL: [BillingMethod; 5] = [
        BillingMethod::Hourly,
        BillingMethod::Daily,
        BillingMethod::Weekly,
        BillingMethod::Monthly,
        BillingMethod::Yearly,
    ];

    /// Returns the accessor reading this method's rate from a product
    pub fn price_accessor(self) -> fn(&RentRates) -> Decimal {
        match self {
            BillingMethod::Hourly => RentRates::hourly,
            BillingMethod::Daily => RentRates::daily,
            BillingMethod::Weekly => RentRates::weekly,
            BillingMethod::Monthly => RentRates::monthly,
            BillingMethod::Yearly => RentRates::yearly,
        }
    }

    /// Reads this method's rate
    pub fn rate(self, rates: &RentRates) -> Decimal {
        (self.price_accessor())(rates)
    }

    /// Number of whole billing periods in `delta`
    ///
    /// Negative spans count as zero periods.
    pub fn periods_in(self, delta: Duration) -> i64 {
        if delta < Duration::zero() {
            return 0;
        }

        let days = delta.num_days();
        match self {
            BillingMethod::Hourly => delta.num_seconds() / 3600,
            BillingMethod::Daily => days,
            BillingMethod::Weekly => days / 7,
            BillingMethod::Monthly => days / 30,
            BillingMethod::Yearly => days / 365,
        }
    }

    /// Duration of a contract in billing periods; zero unless both dates are set
    pub fn duration(self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> i64 {
        match (start, end) {
            (Some(start), Some(end)) => self.periods_in(end - start),
            _ => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BillingMethod::Hourly => "hourly",
            BillingMethod::Daily => "daily",
            BillingMethod::Weekly => "weekly",
            BillingMethod::Monthly => "monthly",
            BillingMethod::Yearly => "yearly",
        }
    }
}

impl fmt::Display for BillingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillingMethod {
    type Err = RentalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BillingMethod::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| RentalError::validation(format!("unknown billing method: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_two_days() {
        let start = Some(at(2024, 1, 1, 0));
        let end = Some(at(2024, 1, 3, 0));
        assert_eq!(BillingMethod::Daily.duration(start, end), 2);
        assert_eq!(BillingMethod::Hourly.duration(start, end), 48);
        assert_eq!(BillingMethod::Weekly.duration(start, end), 0);
    }

    #[test]
    fn test_missing_dates_give_zero() {
        let start = Some(at(2024, 1, 1, 0));
        assert_eq!(BillingMethod::Daily.duration(start, None), 0);
        assert_eq!(BillingMethod::Daily.duration(None, start), 0);
        assert_eq!(BillingMethod::Daily.duration(None, None), 0);
    }

    #[test]
    fn test_truncation() {
        let start = at(2024, 1, 1, 0);
        let end = start + Duration::minutes(119);
        assert_eq!(BillingMethod::Hourly.periods_in(end - start), 1);

        let end = at(2024, 1, 14, 0);
        assert_eq!(BillingMethod::Weekly.duration(Some(start), Some(end)), 1);

        let end = at(2024, 3, 1, 0);
        assert_eq!(BillingMethod::Monthly.duration(Some(start), Some(end)), 2);

        let end = at(2025, 1, 1, 0);
        assert_eq!(BillingMethod::Yearly.duration(Some(start), Some(end)), 1);
    }

    #[test]
    fn test_negative_span_is_zero() {
        let start = at(2024, 1, 3, 0);
        let end = at(2024, 1, 1, 0);
        for method in BillingMethod::ALL {
            assert_eq!(method.duration(Some(start), Some(end)), 0);
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("weekly".parse::<BillingMethod>().unwrap(), BillingMethod::Weekly);
        assert!("fortnightly".parse::<BillingMethod>().is_err());
    }
}
