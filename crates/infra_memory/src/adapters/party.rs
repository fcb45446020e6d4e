//! In-memory party directory

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use core_kernel::{AddressId, DomainPort, PartyId, PortError};
use domain_rental::{PartyPort, PartyProfile};

#[derive(Debug, Clone)]
struct PartyEntry {
    profile: PartyProfile,
    default_address: Option<AddressId>,
}

/// Customers known to the rental module
#[derive(Debug, Default)]
pub struct MemoryPartyDirectory {
    parties: RwLock<HashMap<PartyId, PartyEntry>>,
}

impl MemoryPartyDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a party
    pub fn insert(&self, profile: PartyProfile, default_address: Option<AddressId>) {
        let entry = PartyEntry {
            profile,
            default_address,
        };
        self.parties
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(entry.profile.id, entry);
    }

    fn entry(&self, id: PartyId) -> Result<PartyEntry, PortError> {
        self.parties
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Party", id))
    }
}

impl DomainPort for MemoryPartyDirectory {}

impl PartyPort for MemoryPartyDirectory {
    fn get_party(&self, id: PartyId) -> Result<PartyProfile, PortError> {
        self.entry(id).map(|entry| entry.profile)
    }

    fn default_address(&self, id: PartyId) -> Result<Option<AddressId>, PortError> {
        self.entry(id).map(|entry| entry.default_address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::LocationId;

    fn profile() -> PartyProfile {
        PartyProfile {
            id: PartyId::new(),
            name: "Acme Events".to_string(),
            account_receivable: None,
            customer_payment_term: None,
            customer_location: LocationId::new(),
        }
    }

    #[test]
    fn test_get_inserted_party() {
        let directory = MemoryPartyDirectory::new();
        let profile = profile();
        let address = AddressId::new();
        directory.insert(profile.clone(), Some(address));

        assert_eq!(directory.get_party(profile.id).unwrap(), profile);
        assert_eq!(directory.default_address(profile.id).unwrap(), Some(address));
    }

    #[test]
    fn test_unknown_party() {
        let directory = MemoryPartyDirectory::new();
        assert!(directory.get_party(PartyId::new()).unwrap_err().is_not_found());
        assert!(directory.default_address(PartyId::new()).is_err());
    }
}
