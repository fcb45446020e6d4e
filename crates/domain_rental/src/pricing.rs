//! Rent pricing
//!
//! Products carry one rent rate per billing period, expressed in the company
//! currency. The pricing service picks the rate for the contract's billing
//! method and converts it into the contract currency when they differ.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use core_kernel::{Currency, PartyId, ProductId, UomId};

use crate::billing::BillingMethod;
use crate::error::RentalError;
use crate::ports::CurrencyPort;
use crate::product::RentableProduct;

/// Everything that influences the rent of a product on a contract
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RentContext {
    /// Currency the price is wanted in; company currency when absent
    pub currency: Option<Currency>,
    pub customer: Option<PartyId>,
    pub billing_method: BillingMethod,
    pub contract_start_date: Option<DateTime<Utc>>,
    pub uom: Option<UomId>,
}

impl RentContext {
    /// Date the currency rate is taken at: contract start, else today
    pub fn rate_date(&self) -> NaiveDate {
        self.contract_start_date
            .map(|start| start.date_naive())
            .unwrap_or_else(|| Utc::now().date_naive())
    }
}

/// Computes rent prices for products
pub struct PricingService {
    currencies: Arc<dyn CurrencyPort>,
}

impl PricingService {
    pub fn new(currencies: Arc<dyn CurrencyPort>) -> Self {
        Self { currencies }
    }

    /// Returns the rent per billing period of each product
    ///
    /// Prices are not rounded; callers quantize them to their own precision.
    /// `quantity` is accepted for parity with sale pricing and does not
    /// affect the result.
    ///
    /// # Errors
    ///
    /// Returns a port error when a currency conversion fails.
    pub fn get_rent(
        &self,
        products: &[&RentableProduct],
        quantity: Decimal,
        context: &RentContext,
        company_currency: Currency,
    ) -> Result<HashMap<ProductId, Decimal>, RentalError> {
        let rate = context.billing_method.price_accessor();
        let mut prices = HashMap::with_capacity(products.len());

        for product in products {
            let mut price = rate(&product.rates);

            if let Some(currency) = context.currency {
                if currency != company_currency {
                    price = self.currencies.convert(
                        price,
                        company_currency,
                        currency,
                        context.rate_date(),
                    )?;
                }
            }

            prices.insert(product.id, price);
        }

        debug!(
            products = products.len(),
            %quantity,
            billing_method = %context.billing_method,
            "Computed rent prices"
        );

        Ok(prices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use core_kernel::{DomainPort, PortError, UomCategoryId};
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    use crate::product::{RentRates, UnitOfMeasure};

    /// Doubles every amount and records the date it was asked for
    #[derive(Default)]
    struct DoublingRates {
        asked_on: Mutex<Vec<NaiveDate>>,
    }

    impl DomainPort for DoublingRates {}

    impl CurrencyPort for DoublingRates {
        fn convert(
            &self,
            amount: Decimal,
            _from: Currency,
            _to: Currency,
            as_of: NaiveDate,
        ) -> Result<Decimal, PortError> {
            self.asked_on.lock().unwrap().push(as_of);
            Ok(amount * dec!(2))
        }
    }

    fn product() -> RentableProduct {
        RentableProduct::new("Scaffold", UnitOfMeasure::new("Unit", UomCategoryId::new())).with_rates(
            RentRates {
                hourly: dec!(1.5),
                daily: dec!(10),
                weekly: dec!(60),
                monthly: dec!(200),
                yearly: dec!(2000),
            },
        )
    }

    #[test]
    fn test_rate_follows_billing_method() {
        let service = PricingService::new(Arc::new(DoublingRates::default()));
        let product = product();

        for (method, expected) in [
            (BillingMethod::Hourly, dec!(1.5)),
            (BillingMethod::Daily, dec!(10)),
            (BillingMethod::Weekly, dec!(60)),
            (BillingMethod::Monthly, dec!(200)),
            (BillingMethod::Yearly, dec!(2000)),
        ] {
            let context = RentContext {
                billing_method: method,
                ..Default::default()
            };
            let prices = service.get_rent(&[&product], dec!(1), &context, Currency::USD).unwrap();
            assert_eq!(prices[&product.id], expected);
        }
    }

    #[test]
    fn test_same_currency_is_not_converted() {
        let rates = Arc::new(DoublingRates::default());
        let service = PricingService::new(rates.clone());
        let product = product();
        let context = RentContext {
            currency: Some(Currency::USD),
            billing_method: BillingMethod::Daily,
            ..Default::default()
        };

        let prices = service.get_rent(&[&product], dec!(1), &context, Currency::USD).unwrap();

        assert_eq!(prices[&product.id], dec!(10));
        assert!(rates.asked_on.lock().unwrap().is_empty());
    }

    #[test]
    fn test_foreign_currency_converted_at_contract_start() {
        let rates = Arc::new(DoublingRates::default());
        let service = PricingService::new(rates.clone());
        let product = product();
        let start = Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap();
        let context = RentContext {
            currency: Some(Currency::EUR),
            billing_method: BillingMethod::Daily,
            contract_start_date: Some(start),
            ..Default::default()
        };

        let prices = service.get_rent(&[&product], dec!(1), &context, Currency::USD).unwrap();

        assert_eq!(prices[&product.id], dec!(20));
        assert_eq!(
            rates.asked_on.lock().unwrap().as_slice(),
            &[NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()]
        );
    }

    #[test]
    fn test_rate_date_defaults_to_today() {
        let context = RentContext::default();
        assert_eq!(context.rate_date(), Utc::now().date_naive());
    }
}
