//! Backend executing every transaction through a 1/1 Safe

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::{carry_overrides, SigningBackend};
use crate::client::{PendingTransaction, RpcClient};
use crate::contracts::ISafe;
use crate::error::{Error, Result};
use crate::signing::encode_pre_validated_signature;
use crate::types::UnsignedTransaction;

/// Acts as the Safe at `safe`, whose sole approving owner is the wrapped signer
#[derive(Debug, Clone)]
pub struct SafeProxy<S> {
    inner: S,
    safe: Address,
}

impl<S: SigningBackend> SafeProxy<S> {
    pub fn new(inner: S, safe: Address) -> Self {
        Self { inner, safe }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn safe(&self) -> Address {
        self.safe
    }

    /// Encodes `execTransaction` with zeroed refund parameters and the
    /// wrapped signer's pre-validated signature
    pub fn encode_exec(&self, tx: &UnsignedTransaction) -> Result<Bytes> {
        let to = tx.to.ok_or(Error::ContractCreationUnsupported {
            backend: self.name(),
        })?;

        let call = ISafe::execTransactionCall {
            to,
            value: tx.value,
            data: tx.data.clone(),
            operation: tx.operation.unwrap_or_default().as_u8(),
            safeTxGas: U256::ZERO,
            baseGas: U256::ZERO,
            gasPrice: U256::ZERO,
            gasToken: Address::ZERO,
            refundReceiver: Address::ZERO,
            signatures: encode_pre_validated_signature(self.inner.address()),
        };

        Ok(Bytes::from(call.abi_encode()))
    }

    fn as_safe(&self, tx: &UnsignedTransaction) -> UnsignedTransaction {
        let mut tx = tx.clone();
        tx.from = Some(self.safe);
        tx
    }
}

#[async_trait]
impl<S: SigningBackend> SigningBackend for SafeProxy<S> {
    fn name(&self) -> &'static str {
        "Safe proxy"
    }

    fn address(&self) -> Address {
        self.safe
    }

    fn client(&self) -> &RpcClient {
        self.inner.client()
    }

    fn is_readonly(&self) -> bool {
        self.inner.is_readonly()
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        self.inner.request(method, params).await
    }

    /// Reads as if sent by the Safe itself
    async fn call(&self, tx: &UnsignedTransaction) -> Result<Bytes> {
        self.client().call(&self.as_safe(tx)).await
    }

    async fn estimate_gas(&self, tx: &UnsignedTransaction) -> Result<u64> {
        self.client().estimate_gas(&self.as_safe(tx)).await
    }

    async fn send_transaction(&self, tx: UnsignedTransaction) -> Result<PendingTransaction> {
        let data = self.encode_exec(&tx)?;
        debug!(
            safe = %self.safe,
            to = ?tx.to,
            operation = ?tx.operation.unwrap_or_default(),
            "routing transaction through Safe"
        );

        let outer = UnsignedTransaction::call(self.safe, U256::ZERO, data).with_from(self.inner.address());
        self.inner.send_transaction(carry_overrides(&tx, outer)).await
    }
}
