//! Transaction signing backends
//!
//! Every backend exposes the same capability set over a [`RpcClient`].
//! Proxy backends own the backend they wrap and rewrite each logical
//! transaction into a call on their contract before handing it down, so
//! any backend can sit beneath any other.

mod fees;
mod hardware;
mod injected;
mod local;
mod readonly;
mod recoverable;
mod safe_proxy;

pub use fees::{compute_fees, prepare_eip1559, FeeEstimate, DEFAULT_PRIORITY_FEE};
pub use hardware::{HardwareBackend, HardwareDevice, DEFAULT_DERIVATION_PATH};
pub use injected::InjectedBackend;
pub use local::LocalKeyBackend;
pub use readonly::ReadOnlyBackend;
pub use recoverable::RecoverableProxy;
pub use safe_proxy::SafeProxy;

use std::sync::Arc;

use alloy::primitives::{Address, Bytes};
use async_trait::async_trait;
use serde_json::Value;

use crate::client::{PendingTransaction, RpcClient};
use crate::error::Result;
use crate::types::UnsignedTransaction;

/// Capability set shared by every signing backend
#[async_trait]
pub trait SigningBackend: Send + Sync {
    /// Short name used in capability errors and logs
    fn name(&self) -> &'static str;

    /// The account this backend acts as
    fn address(&self) -> Address;

    /// Client used for reads and broadcasting
    fn client(&self) -> &RpcClient;

    fn is_readonly(&self) -> bool {
        false
    }

    /// Passes an arbitrary request through to the node
    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        self.client().raw_request(method, params).await
    }

    /// `eth_call` as this account
    async fn call(&self, tx: &UnsignedTransaction) -> Result<Bytes> {
        self.client().call(&with_sender(tx, self.address())).await
    }

    /// `eth_estimateGas` as this account
    async fn estimate_gas(&self, tx: &UnsignedTransaction) -> Result<u64> {
        self.client()
            .estimate_gas(&with_sender(tx, self.address()))
            .await
    }

    /// Signs (or has signed) and broadcasts a transaction
    async fn send_transaction(&self, tx: UnsignedTransaction) -> Result<PendingTransaction>;
}

#[async_trait]
impl<T: SigningBackend + ?Sized> SigningBackend for Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn address(&self) -> Address {
        (**self).address()
    }

    fn client(&self) -> &RpcClient {
        (**self).client()
    }

    fn is_readonly(&self) -> bool {
        (**self).is_readonly()
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        (**self).request(method, params).await
    }

    async fn call(&self, tx: &UnsignedTransaction) -> Result<Bytes> {
        (**self).call(tx).await
    }

    async fn estimate_gas(&self, tx: &UnsignedTransaction) -> Result<u64> {
        (**self).estimate_gas(tx).await
    }

    async fn send_transaction(&self, tx: UnsignedTransaction) -> Result<PendingTransaction> {
        (**self).send_transaction(tx).await
    }
}

/// Fills the sender when the transaction does not name one
pub(crate) fn with_sender(tx: &UnsignedTransaction, from: Address) -> UnsignedTransaction {
    let mut tx = tx.clone();
    tx.from.get_or_insert(from);
    tx
}

/// Copies the caller's fee and nonce overrides onto a rewritten transaction.
/// A gas override describes the inner call, so the outer one is re-estimated.
pub(crate) fn carry_overrides(from: &UnsignedTransaction, mut into: UnsignedTransaction) -> UnsignedTransaction {
    into.max_fee_per_gas = from.max_fee_per_gas;
    into.max_priority_fee_per_gas = from.max_priority_fee_per_gas;
    into.nonce = from.nonce;
    into.chain_id = from.chain_id;
    into
}
