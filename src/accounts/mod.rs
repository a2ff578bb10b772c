pub mod address;
pub mod call;
pub mod owner_set;

pub use address::{Address, AddressParseError};
pub use call::{CallPrimitive, CallReceipt, ValueTransfer};
pub use owner_set::OwnerSet;
