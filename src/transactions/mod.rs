pub mod confirmations;
pub mod transaction;

pub use confirmations::Confirmations;
pub use transaction::{CallRecord, CallType, MissingField, Transaction, TransactionView, parse_payload};
