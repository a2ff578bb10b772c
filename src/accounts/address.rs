use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const ADDRESS_LEN: usize = 20;

/// A 20-byte account identifier, written as `0x` followed by hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; ADDRESS_LEN]);

#[derive(Debug, Error, PartialEq)]
pub enum AddressParseError {
    #[error("address has {0} hex digits, at most 40 allowed")]
    TooLong(usize),
    #[error("invalid address hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

impl Address {
    /// The null address. Never a valid owner.
    pub const ZERO: Address = Address([0; ADDRESS_LEN]);

    pub fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0; ADDRESS_LEN]
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }
}

impl From<u64> for Address {
    fn from(value: u64) -> Self {
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes[ADDRESS_LEN - 8..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    /// Accepts an optional `0x` prefix; short inputs are left-padded with zeros.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim();
        let digits = digits
            .strip_prefix("0x")
            .or_else(|| digits.strip_prefix("0X"))
            .unwrap_or(digits);
        if digits.len() > ADDRESS_LEN * 2 {
            return Err(AddressParseError::TooLong(digits.len()));
        }
        let padded = format!("{:0>width$}", digits, width = ADDRESS_LEN * 2);
        let mut bytes = [0u8; ADDRESS_LEN];
        hex::decode_to_slice(padded, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = AddressParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}
