//! Unit tests for strongly-typed identifiers

use core_kernel::{ContractId, ContractLineId, ShipmentId, SequenceId};
use uuid::Uuid;

mod contract_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        assert_ne!(ContractId::new(), ContractId::new());
    }

    #[test]
    fn test_new_v7_is_time_ordered() {
        let id1 = ContractId::new_v7();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = ContractId::new_v7();
        assert!(id1 < id2);
    }

    #[test]
    fn test_prefix() {
        assert_eq!(ContractId::prefix(), "RC");
        assert_eq!(ContractLineId::prefix(), "RCL");
    }

    #[test]
    fn test_line_prefix_is_not_stripped_as_contract_prefix() {
        let line = ContractLineId::new();
        let parsed: Result<ContractId, _> = line.to_string().parse();
        assert!(parsed.is_err());
    }

    #[test]
    fn test_json_serialization_is_transparent() {
        let id = ShipmentId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_uuid()));
        let back: ShipmentId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn test_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = SequenceId::from_uuid(uuid);
        assert_eq!(*id.as_uuid(), uuid);
    }
}
