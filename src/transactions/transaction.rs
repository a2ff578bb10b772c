use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::accounts::Address;
use crate::transactions::confirmations::Confirmations;

/// The kind of wallet call in a command script row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallType {
    Deposit,
    Submit,
    Confirm,
    Revoke,
    Execute,
}

/// One row of a command script: `type,caller,tx,to,amount,data`.
#[derive(Debug, Clone, Deserialize)]
pub struct CallRecord {
    #[serde(rename = "type")]
    pub call_type: CallType,
    pub caller: Address,
    pub tx: Option<usize>,
    pub to: Option<Address>,
    pub amount: Option<u128>,
    #[serde(default, deserialize_with = "deserialize_payload")]
    pub data: Vec<u8>,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{call:?} call is missing the `{field}` column")]
pub struct MissingField {
    pub call: CallType,
    pub field: &'static str,
}

impl CallRecord {
    pub fn require_tx(&self) -> Result<usize, MissingField> {
        self.tx.ok_or(MissingField { call: self.call_type, field: "tx" })
    }

    pub fn require_to(&self) -> Result<Address, MissingField> {
        self.to.ok_or(MissingField { call: self.call_type, field: "to" })
    }

    pub fn require_amount(&self) -> Result<u128, MissingField> {
        self.amount.ok_or(MissingField { call: self.call_type, field: "amount" })
    }
}

/// A proposed call held in the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub to: Address,
    pub value: u128,
    pub data: Vec<u8>,
    pub executed: bool,
    confirmations: Confirmations,
}

impl Transaction {
    pub fn new(to: Address, value: u128, data: Vec<u8>, owner_count: usize) -> Self {
        Self {
            to,
            value,
            data,
            executed: false,
            confirmations: Confirmations::for_owners(owner_count),
        }
    }

    pub fn num_confirmations(&self) -> usize {
        self.confirmations.count()
    }

    pub fn is_confirmed_by(&self, slot: usize) -> bool {
        self.confirmations.contains(slot)
    }

    /// Returns false if `slot` had already confirmed.
    pub fn confirm(&mut self, slot: usize) -> bool {
        self.confirmations.insert(slot)
    }

    /// Returns false if `slot` had not confirmed.
    pub fn revoke(&mut self, slot: usize) -> bool {
        self.confirmations.remove(slot)
    }

    pub fn view(&self, index: usize) -> TransactionView {
        TransactionView {
            tx: index,
            to: self.to,
            value: self.value,
            data: self.data.clone(),
            executed: self.executed,
            num_confirmations: self.num_confirmations(),
        }
    }
}

/// Read-only snapshot of a ledger entry, also the row shape of the ledger report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionView {
    pub tx: usize,
    pub to: Address,
    pub value: u128,
    #[serde(serialize_with = "serialize_payload")]
    pub data: Vec<u8>,
    pub executed: bool,
    #[serde(rename = "confirmations")]
    pub num_confirmations: usize,
}

/// Payloads are written as `0x`-prefixed hex; an empty field is an empty payload.
pub fn parse_payload(text: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let digits = text.trim();
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(digits);
    hex::decode(digits)
}

fn deserialize_payload<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_payload(&text).map_err(serde::de::Error::custom)
}

fn serialize_payload<S>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format!("0x{}", hex::encode(data)))
}
