//! Backend delegating to an externally supplied provider

use std::sync::Arc;

use alloy::primitives::Address;
use async_trait::async_trait;
use tracing::info;

use super::{with_sender, SigningBackend};
use crate::client::{ClientConfig, PendingTransaction, RpcClient};
use crate::error::{Error, Result};
use crate::transport::{Eip1193Provider, InjectedTransport};
use crate::types::UnsignedTransaction;

/// Signs through an EIP-1193 provider; transactions are passed through unchanged
#[derive(Debug, Clone)]
pub struct InjectedBackend {
    address: Address,
    client: RpcClient,
}

impl InjectedBackend {
    /// Requests account access and binds to the first exposed account
    pub async fn connect(provider: Arc<dyn Eip1193Provider>) -> Result<Self> {
        Self::connect_with_config(provider, ClientConfig::default()).await
    }

    pub async fn connect_with_config(provider: Arc<dyn Eip1193Provider>, config: ClientConfig) -> Result<Self> {
        let client = RpcClient::with_config(InjectedTransport::new(provider), config);
        let address = client
            .request_accounts()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Signing("provider exposed no accounts".to_string()))?;

        info!(%address, "connected injected provider");
        Ok(Self {
            address,
            client: client.with_default_from(address),
        })
    }
}

#[async_trait]
impl SigningBackend for InjectedBackend {
    fn name(&self) -> &'static str {
        "injected provider"
    }

    fn address(&self) -> Address {
        self.address
    }

    fn client(&self) -> &RpcClient {
        &self.client
    }

    async fn send_transaction(&self, tx: UnsignedTransaction) -> Result<PendingTransaction> {
        self.client
            .send_transaction(&with_sender(&tx, self.address))
            .await
    }
}
