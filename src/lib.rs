pub mod orchestrator;
pub mod engine;
pub mod accounts;
pub mod transactions;
pub mod events;
pub mod error;

pub use orchestrator::{run, VaultConfig};
pub use engine::MultiSigWallet;
pub use accounts::{Address, CallPrimitive, ValueTransfer};
pub use transactions::TransactionView;
pub use events::WalletEvent;
pub use error::{ConfigError, Result, WalletError};
