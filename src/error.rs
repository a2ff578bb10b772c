use thiserror::Error;

use crate::accounts::Address;

/// Invalid constructor arguments. Construction aborts entirely.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("owners required")]
    EmptyOwners,

    #[error("invalid owner")]
    NullOwner,

    #[error("owner not unique: {0}")]
    DuplicateOwner(Address),

    #[error("invalid number of required confirmations: {required} of {owners} owners")]
    InvalidQuorum { required: usize, owners: usize },
}

impl ConfigError {
    pub fn reason(&self) -> &'static str {
        match self {
            ConfigError::EmptyOwners => "owners required",
            ConfigError::NullOwner => "invalid owner",
            ConfigError::DuplicateOwner(_) => "owner not unique",
            ConfigError::InvalidQuorum { .. } => "invalid number of required confirmations",
        }
    }
}

/// A rejected wallet call. No state has changed when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error("not owner")]
    NotOwner,

    #[error("tx doesn't exist")]
    NotFound(usize),

    #[error("tx already confirmed")]
    AlreadyConfirmed,

    #[error("tx not confirmed")]
    NotConfirmed,

    #[error("tx already executed")]
    AlreadyExecuted,

    #[error("cannot execute tx")]
    InsufficientConfirmations { have: usize, need: usize },

    /// The call primitive refused the call, or the wallet could not fund it.
    #[error("tx failed")]
    CallFailed,

    #[error("balance overflow")]
    BalanceOverflow,
}

impl WalletError {
    /// The machine-checkable reason string for this rejection.
    pub fn reason(&self) -> &'static str {
        match self {
            WalletError::Configuration(err) => err.reason(),
            WalletError::NotOwner => "not owner",
            WalletError::NotFound(_) => "tx doesn't exist",
            WalletError::AlreadyConfirmed => "tx already confirmed",
            WalletError::NotConfirmed => "tx not confirmed",
            WalletError::AlreadyExecuted => "tx already executed",
            WalletError::InsufficientConfirmations { .. } => "cannot execute tx",
            WalletError::CallFailed => "tx failed",
            WalletError::BalanceOverflow => "balance overflow",
        }
    }
}

pub type Result<T> = std::result::Result<T, WalletError>;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_reason_for_call_errors() {
        let errors = [
            WalletError::NotOwner,
            WalletError::NotFound(3),
            WalletError::AlreadyConfirmed,
            WalletError::NotConfirmed,
            WalletError::AlreadyExecuted,
            WalletError::InsufficientConfirmations { have: 1, need: 2 },
            WalletError::CallFailed,
        ];
        for err in errors {
            assert_eq!(err.to_string(), err.reason());
        }
    }

    #[test]
    fn test_configuration_reason_is_short_form() {
        let err = WalletError::from(ConfigError::DuplicateOwner(Address::from(7)));
        assert_eq!(err.reason(), "owner not unique");
        assert!(err.to_string().starts_with("owner not unique: 0x"));
    }
}
