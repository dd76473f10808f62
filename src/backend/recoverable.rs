//! Backend routing every transaction through a recoverable proxy wallet

use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use serde_json::Value;

use super::{carry_overrides, SigningBackend};
use crate::client::{PendingTransaction, RpcClient};
use crate::contracts::IRecoverableWallet;
use crate::error::{Error, Result};
use crate::types::UnsignedTransaction;

/// Acts as the proxy wallet at `wallet`, signing with the wrapped owner.
///
/// Calls become `execute(to, value, data)`; contract creations become
/// `deploy(value, data, salt)`, which has no read-only equivalent.
#[derive(Debug, Clone)]
pub struct RecoverableProxy<S> {
    inner: S,
    wallet: Address,
    salt: B256,
}

impl<S: SigningBackend> RecoverableProxy<S> {
    pub fn new(inner: S, wallet: Address) -> Self {
        Self {
            inner,
            wallet,
            salt: B256::ZERO,
        }
    }

    /// Salt passed to `deploy` for contract creations
    pub fn with_salt(mut self, salt: B256) -> Self {
        self.salt = salt;
        self
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// The owner-signed transaction to the proxy wallet
    pub fn rewrite(&self, tx: &UnsignedTransaction) -> UnsignedTransaction {
        let data = match tx.to {
            Some(to) => IRecoverableWallet::executeCall {
                to,
                value: tx.value,
                data: tx.data.clone(),
            }
            .abi_encode(),
            None => IRecoverableWallet::deployCall {
                value: tx.value,
                data: tx.data.clone(),
                salt: self.salt,
            }
            .abi_encode(),
        };

        let outer = UnsignedTransaction::call(self.wallet, U256::ZERO, data).with_from(self.inner.address());
        carry_overrides(tx, outer)
    }

    fn rewrite_read(&self, tx: &UnsignedTransaction, what: &'static str) -> Result<UnsignedTransaction> {
        if tx.is_create() {
            return Err(Error::CallUnsupported {
                backend: self.name(),
                what,
            });
        }
        Ok(self.rewrite(tx))
    }
}

#[async_trait]
impl<S: SigningBackend> SigningBackend for RecoverableProxy<S> {
    fn name(&self) -> &'static str {
        "recoverable proxy"
    }

    fn address(&self) -> Address {
        self.wallet
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

    /// Simulates `execute` and unwraps the forwarded return data
    async fn call(&self, tx: &UnsignedTransaction) -> Result<Bytes> {
        let outer = self.rewrite_read(tx, "call for contract creation")?;
        let output = self.inner.call(&outer).await?;
        Ok(IRecoverableWallet::executeCall::abi_decode_returns(&output)?)
    }

    async fn estimate_gas(&self, tx: &UnsignedTransaction) -> Result<u64> {
        let outer = self.rewrite_read(tx, "gas estimation for contract creation")?;
        self.inner.estimate_gas(&outer).await
    }

    async fn send_transaction(&self, tx: UnsignedTransaction) -> Result<PendingTransaction> {
        self.inner.send_transaction(self.rewrite(&tx)).await
    }
}
