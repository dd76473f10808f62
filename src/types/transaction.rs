//! Logical transactions handed to signing backends

use alloy::primitives::{Address, Bytes, U256};

use super::Operation;

/// An unsigned transaction before any backend rewriting.
///
/// `to == None` requests contract creation. The optional fields override
/// what a signing backend would otherwise derive from the node.
/// `operation` is only honoured by the Safe proxy backend; every other
/// backend ignores it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnsignedTransaction {
    pub from: Option<Address>,
    pub to: Option<Address>,
    pub value: U256,
    pub data: Bytes,
    pub gas: Option<u64>,
    pub max_fee_per_gas: Option<u128>,
    pub max_priority_fee_per_gas: Option<u128>,
    pub nonce: Option<u64>,
    pub chain_id: Option<u64>,
    pub operation: Option<Operation>,
}

impl UnsignedTransaction {
    /// A call to `to` with `value` and `data`
    pub fn call(to: Address, value: U256, data: impl Into<Bytes>) -> Self {
        Self {
            to: Some(to),
            value,
            data: data.into(),
            ..Default::default()
        }
    }

    /// A contract creation with the given init code
    pub fn create(value: U256, init_code: impl Into<Bytes>) -> Self {
        Self {
            to: None,
            value,
            data: init_code.into(),
            ..Default::default()
        }
    }

    pub fn with_from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    pub fn with_gas(mut self, gas: u64) -> Self {
        self.gas = Some(gas);
        self
    }

    pub fn with_max_fee_per_gas(mut self, fee: u128) -> Self {
        self.max_fee_per_gas = Some(fee);
        self
    }

    pub fn with_max_priority_fee_per_gas(mut self, fee: u128) -> Self {
        self.max_priority_fee_per_gas = Some(fee);
        self
    }

    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Sets the hidden Safe operation flag
    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operation = Some(operation);
        self
    }

    /// Whether this transaction deploys a contract
    pub fn is_create(&self) -> bool {
        self.to.is_none()
    }
}
