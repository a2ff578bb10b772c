pub mod engine;

pub use engine::MultiSigWallet;
