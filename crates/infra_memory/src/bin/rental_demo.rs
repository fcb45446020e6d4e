//! Rental Contract Demo Binary
//!
//! Runs one contract through its whole lifecycle against the in-memory
//! adapters and logs the generated documents.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin rental-demo
//!
//! DEMO_LOG_LEVEL=debug DEMO_CURRENCY=EUR cargo run --bin rental-demo
//! ```
//!
//! # Environment Variables
//!
//! * `DEMO_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `DEMO_CURRENCY` - Company currency code (default: USD)
//! * `RENTAL_*` - Rental configuration; generated when absent

use anyhow::Context;
use chrono::{Duration, TimeZone, Utc};
use rust_decimal_macros::dec;
use serde::Deserialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use core_kernel::{AccountId, AddressId, Currency, LocationId, PartyId, UomCategoryId};
use domain_rental::{
    BillingMethod, Company, ContractLine, ContractWorkflow, PartyProfile, RentRates,
    RentableProduct, RentalConfiguration, RentalContract, UnitOfMeasure, Warehouse,
};
use infra_memory::MemoryAdapters;

/// Demo configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct DemoConfig {
    log_level: String,
    currency: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            currency: "USD".to_string(),
        }
    }
}

impl DemoConfig {
    fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("DEMO"))
            .build()?
            .try_deserialize()
    }
}

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let demo = DemoConfig::from_env().context("loading DEMO_* configuration")?;
    init_tracing(&demo.log_level);

    let currency: Currency = demo.currency.parse().context("parsing DEMO_CURRENCY")?;
    let adapters = match RentalConfiguration::from_env() {
        Ok(config) => MemoryAdapters::with_config(currency, config),
        Err(error) => {
            tracing::info!(%error, "No rental configuration in environment, generating one");
            MemoryAdapters::new(currency)
        }
    };

    let customer = PartyProfile {
        id: PartyId::new(),
        name: "Northwind Events".to_string(),
        account_receivable: Some(AccountId::new()),
        customer_payment_term: None,
        customer_location: LocationId::new(),
    };
    adapters.parties.insert(customer.clone(), Some(AddressId::new()));

    let workflow = ContractWorkflow::new(adapters.rental_services())?;
    let pricing = adapters.pricing();

    let units = UomCategoryId::new();
    let projector = RentableProduct::new("Projector", UnitOfMeasure::new("Unit", units))
        .with_code("PRJ")
        .with_revenue_account(AccountId::new())
        .with_rates(RentRates {
            hourly: dec!(6),
            daily: dec!(45),
            weekly: dec!(250),
            monthly: dec!(800),
            yearly: dec!(7500),
        });
    let screen = RentableProduct::new("Screen", UnitOfMeasure::new("Unit", units)).with_rates(RentRates {
        daily: dec!(15),
        ..RentRates::default()
    });

    let start = Utc.with_ymd_and_hms(2024, 6, 3, 8, 0, 0).single().context("invalid start date")?;
    let end = start + Duration::days(4);

    let mut contract = RentalContract::new(Company::new(currency), PartyId::new());
    contract.set_party(customer.id, adapters.parties.as_ref())?;
    contract.set_description("Conference equipment")?;
    contract.set_warehouse(Warehouse::new(LocationId::new()))?;
    contract.set_period(start, end)?;
    contract.set_billing_method(BillingMethod::Daily)?;

    let projectors = contract.add_line(ContractLine::new().with_quantity(dec!(2)))?;
    contract.select_product(projectors, projector, &pricing)?;
    let screens = contract.add_line(ContractLine::new().with_quantity(dec!(2)))?;
    contract.select_product(screens, screen, &pricing)?;
    // Screens are picked up a day early
    contract.set_line_dates(screens, Some(start - Duration::days(1)), None)?;

    workflow.quote(&mut contract)?;
    workflow.reserve(&mut contract)?;
    workflow.activate(&mut contract)?;
    workflow.close(&mut contract)?;

    for event in contract.take_events() {
        tracing::info!(event = event.event_type(), at = %event.timestamp(), "Contract event");
    }

    for invoice in adapters.documents.invoices() {
        tracing::info!(
            invoice_id = %invoice.id,
            description = %invoice.request.description,
            untaxed = %invoice.request.untaxed_amount(),
            lines = invoice.request.lines.len(),
            "Invoice"
        );
    }

    for shipment in adapters.documents.shipments() {
        tracing::info!(
            shipment_id = %shipment.id,
            direction = ?shipment.request.shipment_type,
            planned = %shipment.request.planned_date,
            moves = shipment.request.moves.len(),
            state = %shipment.state,
            "Shipment"
        );
    }

    tracing::info!(
        contract = %contract.display_name(),
        state = %contract.state(),
        duration = contract.duration(),
        total = %contract.total_amount(),
        "Contract closed"
    );

    Ok(())
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
