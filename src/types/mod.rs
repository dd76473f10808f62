//! Type definitions for calls and transactions

mod call;
mod operation;
mod transaction;

pub use call::Call;
pub use operation::Operation;
pub use transaction::UnsignedTransaction;
