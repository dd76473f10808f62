//! Sub-calls collected into Safe batches

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;

use super::UnsignedTransaction;

/// A logical (to, value, data) sub-call; always executed as a plain call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Call {
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}

impl Call {
    pub fn new(to: Address, value: U256, data: impl Into<Bytes>) -> Self {
        Self {
            to,
            value,
            data: data.into(),
        }
    }

    /// Zero-value call with raw calldata
    pub fn call(to: Address, data: impl Into<Bytes>) -> Self {
        Self::new(to, U256::ZERO, data)
    }

    /// Zero-value call encoding a `sol!` call struct
    pub fn typed<C: SolCall>(to: Address, call: &C) -> Self {
        Self::new(to, U256::ZERO, call.abi_encode())
    }
}

impl From<Call> for UnsignedTransaction {
    fn from(call: Call) -> Self {
        UnsignedTransaction::call(call.to, call.value, call.data)
    }
}
