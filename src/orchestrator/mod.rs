pub mod orchestrator;

pub use orchestrator::{ReplaySummary, VaultConfig, replay, run, write_ledger};
