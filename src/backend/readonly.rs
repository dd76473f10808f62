//! Backend for plain JSON-RPC endpoints without an account

use alloy::primitives::Address;
use async_trait::async_trait;
use tracing::debug;

use super::SigningBackend;
use crate::client::{PendingTransaction, RpcClient};
use crate::error::{Error, Result};
use crate::types::UnsignedTransaction;

/// Reads only; every send fails with [`Error::ReadOnly`]
#[derive(Debug, Clone)]
pub struct ReadOnlyBackend {
    client: RpcClient,
}

impl ReadOnlyBackend {
    /// Probes the endpoint with `eth_blockNumber` before accepting it
    pub async fn connect(client: RpcClient) -> Result<Self> {
        let block = client.block_number().await?;
        debug!(block, "read-only endpoint is live");
        Ok(Self { client })
    }

    #[cfg(test)]
    pub(crate) fn unchecked(client: RpcClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SigningBackend for ReadOnlyBackend {
    fn name(&self) -> &'static str {
        "read-only"
    }

    /// The client's default sender, or the zero address
    fn address(&self) -> Address {
        self.client.default_from().unwrap_or(Address::ZERO)
    }

    fn client(&self) -> &RpcClient {
        &self.client
    }

    fn is_readonly(&self) -> bool {
        true
    }

    async fn send_transaction(&self, _tx: UnsignedTransaction) -> Result<PendingTransaction> {
        Err(Error::ReadOnly)
    }
}
