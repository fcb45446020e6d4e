//! In-memory currency rate table
//!
//! Rates are stored against a base currency with the date they take effect.
//! A conversion uses, for each currency, the latest rate dated on or before
//! the conversion date.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

use core_kernel::{Currency, DomainPort, PortError};
use domain_rental::CurrencyPort;

/// Dated exchange rates relative to a base currency
#[derive(Debug)]
pub struct MemoryCurrencyTable {
    base: Currency,
    rates: RwLock<HashMap<Currency, BTreeMap<NaiveDate, Decimal>>>,
}

impl MemoryCurrencyTable {
    pub fn new(base: Currency) -> Self {
        Self {
            base,
            rates: RwLock::new(HashMap::new()),
        }
    }

    pub fn base(&self) -> Currency {
        self.base
    }

    /// Sets how many units of `currency` one unit of the base buys from `date`
    pub fn set_rate(&self, currency: Currency, date: NaiveDate, rate: Decimal) -> Result<(), PortError> {
        if rate <= Decimal::ZERO {
            return Err(PortError::validation_field("rate must be positive", "rate"));
        }
        self.rates
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(currency)
            .or_default()
            .insert(date, rate);
        Ok(())
    }

    fn rate_at(&self, currency: Currency, as_of: NaiveDate) -> Result<Decimal, PortError> {
        if currency == self.base {
            return Ok(Decimal::ONE);
        }

        let rates = self.rates.read().unwrap_or_else(PoisonError::into_inner);
        rates
            .get(&currency)
            .and_then(|dated| dated.range(..=as_of).next_back())
            .map(|(_, rate)| *rate)
            .ok_or_else(|| PortError::not_found("CurrencyRate", format!("{currency} on {as_of}")))
    }
}

impl DomainPort for MemoryCurrencyTable {}

impl CurrencyPort for MemoryCurrencyTable {
    fn convert(
        &self,
        amount: Decimal,
        from: Currency,
        to: Currency,
        as_of: NaiveDate,
    ) -> Result<Decimal, PortError> {
        if from == to {
            return Ok(amount);
        }
        let from_rate = self.rate_at(from, as_of)?;
        let to_rate = self.rate_at(to, as_of)?;
        Ok(amount * to_rate / from_rate)
    }
}
