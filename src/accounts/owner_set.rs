use std::collections::HashMap;

use crate::accounts::Address;
use crate::error::{ConfigError, WalletError};

/// The fixed set of owners and the confirmation quorum.
///
/// Both are established once at construction and never change. Each owner's
/// position in the set doubles as its slot in per-transaction confirmation
/// bitsets.
#[derive(Debug, Clone)]
pub struct OwnerSet {
    owners: Vec<Address>,
    slots: HashMap<Address, usize>,
    required: usize,
}

impl OwnerSet {
    pub fn new(owners: Vec<Address>, required: usize) -> Result<Self, ConfigError> {
        if owners.is_empty() {
            return Err(ConfigError::EmptyOwners);
        }
        if required == 0 || required > owners.len() {
            return Err(ConfigError::InvalidQuorum {
                required,
                owners: owners.len(),
            });
        }

        let mut slots = HashMap::with_capacity(owners.len());
        for (slot, owner) in owners.iter().enumerate() {
            if owner.is_zero() {
                return Err(ConfigError::NullOwner);
            }
            if slots.insert(*owner, slot).is_some() {
                return Err(ConfigError::DuplicateOwner(*owner));
            }
        }

        Ok(Self {
            owners,
            slots,
            required,
        })
    }

    pub fn is_owner(&self, address: &Address) -> bool {
        self.slots.contains_key(address)
    }

    pub fn owner_index(&self, address: &Address) -> Option<usize> {
        self.slots.get(address).copied()
    }

    /// Gate for every mutating entry point. Returns the caller's slot.
    pub fn require_owner(&self, caller: &Address) -> Result<usize, WalletError> {
        self.owner_index(caller).ok_or(WalletError::NotOwner)
    }

    pub fn owners(&self) -> &[Address] {
        &self.owners
    }

    pub(crate) fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn required_confirmations(&self) -> usize {
        self.required
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn addrs(ids: &[u64]) -> Vec<Address> {
        ids.iter().map(|id| Address::from(*id)).collect()
    }

    #[test]
    fn test_valid_owner_set() {
        let set = OwnerSet::new(addrs(&[1, 2, 3]), 2).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.required_confirmations(), 2);
        assert_eq!(set.owners(), addrs(&[1, 2, 3]).as_slice());
        assert_eq!(set.owner_index(&Address::from(3)), Some(2));
        assert!(set.is_owner(&Address::from(1)));
        assert!(!set.is_owner(&Address::from(4)));
    }

    #[test]
    fn test_empty_owners_rejected() {
        assert_eq!(OwnerSet::new(vec![], 1).unwrap_err(), ConfigError::EmptyOwners);
    }

    #[test]
    fn test_quorum_bounds() {
        assert_eq!(
            OwnerSet::new(addrs(&[1, 2]), 0).unwrap_err(),
            ConfigError::InvalidQuorum { required: 0, owners: 2 }
        );
        assert_eq!(
            OwnerSet::new(addrs(&[1, 2]), 3).unwrap_err(),
            ConfigError::InvalidQuorum { required: 3, owners: 2 }
        );
        assert!(OwnerSet::new(addrs(&[1, 2]), 2).is_ok());
        assert!(OwnerSet::new(addrs(&[1]), 1).is_ok());
    }

    #[test]
    fn test_null_and_duplicate_owners_rejected() {
        assert_eq!(
            OwnerSet::new(vec![Address::from(1), Address::ZERO], 1).unwrap_err(),
            ConfigError::NullOwner
        );
        assert_eq!(
            OwnerSet::new(addrs(&[1, 2, 1]), 1).unwrap_err(),
            ConfigError::DuplicateOwner(Address::from(1))
        );
    }

    #[test]
    fn test_require_owner() {
        let set = OwnerSet::new(addrs(&[5, 6]), 1).unwrap();
        assert_eq!(set.require_owner(&Address::from(6)), Ok(1));
        assert_eq!(set.require_owner(&Address::from(7)), Err(WalletError::NotOwner));
    }
}
