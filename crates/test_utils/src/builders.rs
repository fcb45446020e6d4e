//! Test Data Builders
//!
//! Provides a fully wired in-memory rental environment and a builder for
//! contracts inside it. Tests specify only what matters to them; everything
//! else gets a sensible default (customer with a default address, warehouse,
//! the standard rental period, daily billing).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use core_kernel::{AddressId, ContractLineId, Currency, LocationId};
use domain_rental::{
    BillingMethod, Company, ContractLine, ContractWorkflow, PartyProfile, PricingService,
    RentableProduct, RentalContract, Warehouse,
};
use infra_memory::MemoryAdapters;

use crate::fixtures::{PartyFixtures, TemporalFixtures};

/// In-memory adapters, a workflow and the master data around them
pub struct RentalTestEnv {
    pub adapters: MemoryAdapters,
    pub workflow: ContractWorkflow,
    pub pricing: PricingService,
    pub company: Company,
    pub customer: PartyProfile,
    pub customer_address: AddressId,
    pub warehouse: Warehouse,
}

impl Default for RentalTestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl RentalTestEnv {
    /// Creates an environment for a USD company
    pub fn new() -> Self {
        Self::with_currency(Currency::USD)
    }

    /// Creates an environment for a company in `currency`
    pub fn with_currency(currency: Currency) -> Self {
        let adapters = MemoryAdapters::new(currency);
        let customer = PartyFixtures::customer();
        let customer_address = AddressId::new();
        adapters.parties.insert(customer.clone(), Some(customer_address));

        let workflow = ContractWorkflow::new(adapters.rental_services())
            .expect("in-memory origin registration cannot fail");
        let pricing = adapters.pricing();

        Self {
            adapters,
            workflow,
            pricing,
            company: Company::new(currency),
            customer,
            customer_address,
            warehouse: Warehouse::new(LocationId::new()),
        }
    }

    /// Starts building a contract for the default customer
    pub fn contract(&self) -> TestContractBuilder<'_> {
        TestContractBuilder::new(self)
    }
}

struct PlannedLine {
    product: RentableProduct,
    quantity: Decimal,
    delivery_date: Option<DateTime<Utc>>,
    return_date: Option<DateTime<Utc>>,
}

/// Builder for draft contracts
pub struct TestContractBuilder<'a> {
    env: &'a RentalTestEnv,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    billing_method: BillingMethod,
    currency: Option<Currency>,
    with_party_addresses: bool,
    with_warehouse: bool,
    lines: Vec<PlannedLine>,
}

impl<'a> TestContractBuilder<'a> {
    /// Creates a new builder with default values
    pub fn new(env: &'a RentalTestEnv) -> Self {
        Self {
            env,
            start: Some(TemporalFixtures::rental_start()),
            end: Some(TemporalFixtures::rental_end()),
            billing_method: BillingMethod::Daily,
            currency: None,
            with_party_addresses: true,
            with_warehouse: true,
            lines: Vec::new(),
        }
    }

    /// Sets the rental period
    pub fn period(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Leaves both dates unset
    pub fn without_dates(mut self) -> Self {
        self.start = None;
        self.end = None;
        self
    }

    pub fn billing_method(mut self, billing_method: BillingMethod) -> Self {
        self.billing_method = billing_method;
        self
    }

    /// Sets a contract currency different from the company's
    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = Some(currency);
        self
    }

    /// Leaves invoice and shipment addresses unset
    pub fn without_addresses(mut self) -> Self {
        self.with_party_addresses = false;
        self
    }

    pub fn without_warehouse(mut self) -> Self {
        self.with_warehouse = false;
        self
    }

    /// Adds a line renting `quantity` of `product`
    pub fn line(self, product: RentableProduct, quantity: Decimal) -> Self {
        self.line_with_dates(product, quantity, None, None)
    }

    /// Adds a line with its own delivery and return dates
    pub fn line_with_dates(
        mut self,
        product: RentableProduct,
        quantity: Decimal,
        delivery_date: Option<DateTime<Utc>>,
        return_date: Option<DateTime<Utc>>,
    ) -> Self {
        self.lines.push(PlannedLine {
            product,
            quantity,
            delivery_date,
            return_date,
        });
        self
    }

    /// Builds the draft contract, pricing every line
    pub fn build(self) -> RentalContract {
        self.build_with_lines().0
    }

    /// Builds the draft contract and returns the line ids in insertion order
    pub fn build_with_lines(self) -> (RentalContract, Vec<ContractLineId>) {
        let env = self.env;
        let mut contract = RentalContract::new(env.company, env.customer.id);

        if self.with_party_addresses {
            contract
                .set_party(env.customer.id, env.adapters.parties.as_ref())
                .expect("customer is registered");
        }
        if self.with_warehouse {
            contract.set_warehouse(env.warehouse).expect("draft contract");
        }
        if let Some(currency) = self.currency {
            contract.set_currency(currency).expect("draft contract");
        }
        if let Some(start) = self.start {
            contract.set_start_date(start).expect("draft contract");
        }
        if let Some(end) = self.end {
            contract.set_end_date(end).expect("draft contract");
        }
        contract
            .set_billing_method(self.billing_method)
            .expect("draft contract");

        let mut ids = Vec::with_capacity(self.lines.len());
        for planned in self.lines {
            let id = contract
                .add_line(ContractLine::new().with_quantity(planned.quantity))
                .expect("draft contract");
            contract
                .select_product(id, planned.product, &env.pricing)
                .expect("product can be priced");
            contract
                .set_line_dates(id, planned.delivery_date, planned.return_date)
                .expect("draft contract");
            ids.push(id);
        }

        (contract, ids)
    }
}
