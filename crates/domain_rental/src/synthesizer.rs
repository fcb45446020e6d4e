//! Document synthesis
//!
//! Turns a contract's lines into the invoice and shipments the host system
//! has to create. Moves are grouped into one shipment per planned day and
//! warehouse.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

use core_kernel::{InvoiceId, ShipmentId, WarehouseId};

use crate::contract::RentalContract;
use crate::documents::{InvoiceLineRequest, InvoiceRequest, InvoiceType, MoveRequest, ShipmentRequest, ShipmentType};
use crate::error::RentalError;
use crate::line::MoveLocations;
use crate::workflow::RentalServices;

/// Moves sharing a planned day and warehouse
#[derive(Debug, Clone, PartialEq)]
pub struct MoveGroup {
    /// Latest planned date among the moves
    pub planned_date: DateTime<Utc>,
    pub warehouse: WarehouseId,
    pub moves: Vec<MoveRequest>,
}

/// Groups moves by planned day and warehouse
///
/// Groups come out ordered by day, then warehouse; moves keep their order.
pub fn group_moves(moves: Vec<MoveRequest>) -> Vec<MoveGroup> {
    let mut groups: BTreeMap<(NaiveDate, WarehouseId), MoveGroup> = BTreeMap::new();

    for request in moves {
        let group = groups.entry(request.grouping_key()).or_insert_with(|| MoveGroup {
            planned_date: request.planned_date,
            warehouse: request.warehouse,
            moves: Vec::new(),
        });
        group.planned_date = group.planned_date.max(request.planned_date);
        group.moves.push(request);
    }

    groups.into_values().collect()
}

/// Builds and persists the documents of a contract
pub struct DocumentSynthesizer<'a> {
    services: &'a RentalServices,
}

impl<'a> DocumentSynthesizer<'a> {
    pub fn new(services: &'a RentalServices) -> Self {
        Self { services }
    }

    /// Invoice lines for every line of the contract
    pub fn invoice_lines(&self, contract: &RentalContract, invoice_type: InvoiceType) -> Vec<InvoiceLineRequest> {
        contract
            .lines()
            .iter()
            .flat_map(|line| line.to_invoice_line(contract, invoice_type))
            .collect()
    }

    /// Creates the contract invoice; `None` when no line is billable
    #[instrument(skip(self, contract), fields(contract_id = %contract.id()))]
    pub fn create_invoice(
        &self,
        contract: &RentalContract,
        invoice_type: InvoiceType,
    ) -> Result<Option<InvoiceId>, RentalError> {
        let lines = self.invoice_lines(contract, invoice_type);
        if lines.is_empty() {
            debug!("No billable lines, skipping invoice");
            return Ok(None);
        }

        let party = self.services.parties.get_party(contract.party())?;
        let account = party
            .account_receivable
            .ok_or_else(|| RentalError::missing("account_receivable"))?;
        let invoice_address = contract
            .invoice_address()
            .ok_or_else(|| RentalError::missing("invoice_address"))?;
        let payment_term = party
            .customer_payment_term
            .unwrap_or(self.services.config.subscription_invoice_payment_term);

        let request = InvoiceRequest {
            company: contract.company().id,
            invoice_type,
            journal: self.services.config.subscription_journal,
            party: party.id,
            invoice_address,
            currency: contract.currency(),
            account,
            description: format!("Contract #{}", contract.display_name()),
            payment_term,
            lines,
        };

        let invoice = self.services.invoices.create_invoice(request)?;
        debug!(invoice_id = %invoice, "Created invoice");
        Ok(Some(invoice))
    }

    /// Moves for every line of the contract in one direction
    pub fn shipment_moves(
        &self,
        contract: &RentalContract,
        shipment_type: ShipmentType,
        locations: &MoveLocations,
    ) -> Result<Vec<MoveRequest>, RentalError> {
        let mut moves = Vec::new();
        for line in contract.lines() {
            if let Some(request) = line.to_move(contract, shipment_type, locations)? {
                moves.push(request);
            }
        }
        Ok(moves)
    }

    /// Creates the shipments of a direction and returns their ids
    ///
    /// Outbound shipments are set to waiting once created.
    #[instrument(skip(self, contract), fields(contract_id = %contract.id()))]
    pub fn create_shipment(
        &self,
        contract: &RentalContract,
        shipment_type: ShipmentType,
    ) -> Result<Vec<ShipmentId>, RentalError> {
        if contract.lines().is_empty() {
            return Ok(Vec::new());
        }

        let party = self.services.parties.get_party(contract.party())?;
        let locations = MoveLocations {
            customer: party.customer_location,
            rent_return: self.services.config.rent_return_location,
        };

        let moves = self.shipment_moves(contract, shipment_type, &locations)?;
        if moves.is_empty() {
            debug!("No moves, skipping shipment");
            return Ok(Vec::new());
        }

        let delivery_address = contract
            .shipment_address()
            .ok_or_else(|| RentalError::missing("shipment_address"))?;

        let requests: Vec<ShipmentRequest> = group_moves(moves)
            .into_iter()
            .map(|group| ShipmentRequest {
                shipment_type,
                customer: party.id,
                delivery_address,
                company: contract.company().id,
                planned_date: group.planned_date,
                warehouse: group.warehouse,
                moves: group.moves,
            })
            .collect();

        let ids = self.services.shipments.create_shipments(requests)?;
        if shipment_type == ShipmentType::Out {
            self.services.shipments.wait(&ids)?;
        }

        debug!(count = ids.len(), "Created shipments");
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use core_kernel::{CompanyId, Currency, LocationId, ProductId};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use crate::documents::MoveState;
    use crate::origin::Origin;

    fn move_at(planned_date: DateTime<Utc>, warehouse: WarehouseId) -> MoveRequest {
        MoveRequest {
            quantity: dec!(1),
            unit: None,
            product: ProductId::new(),
            from_location: LocationId::new(),
            to_location: LocationId::new(),
            unit_price: dec!(10),
            currency: Currency::USD,
            company: CompanyId::new(),
            planned_date,
            warehouse,
            origin: Origin::new("rental.contract.line", Uuid::new_v4()),
            state: MoveState::Draft,
        }
    }

    #[test]
    fn test_same_day_same_warehouse_share_group() {
        let warehouse = WarehouseId::new();
        let morning = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let evening = morning + Duration::hours(10);

        let groups = group_moves(vec![move_at(morning, warehouse), move_at(evening, warehouse)]);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].moves.len(), 2);
        assert_eq!(groups[0].planned_date, evening);
    }

    #[test]
    fn test_different_days_split() {
        let warehouse = WarehouseId::new();
        let first = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let second = first + Duration::days(1);

        let groups = group_moves(vec![move_at(second, warehouse), move_at(first, warehouse)]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].planned_date, first);
        assert_eq!(groups[1].planned_date, second);
    }

    #[test]
    fn test_different_warehouses_split() {
        let date = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let groups = group_moves(vec![move_at(date, WarehouseId::new()), move_at(date, WarehouseId::new())]);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_no_moves_no_groups() {
        assert!(group_moves(Vec::new()).is_empty());
    }
}
