pub mod asset;
pub mod error;
pub mod instruction;
pub mod state;
pub mod transaction;

pub use asset::AssetBundle;
pub use error::BankError;
pub use instruction::BankInstruction;
pub use state::BankState;
pub use transaction::Transaction;
