//! Backend holding a private key in memory

use alloy::consensus::{SignableTransaction, TxEnvelope};
use alloy::eips::eip2718::Encodable2718;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use async_trait::async_trait;

use super::{prepare_eip1559, SigningBackend};
use crate::client::{PendingTransaction, RpcClient};
use crate::error::{Error, Result};
use crate::types::UnsignedTransaction;

/// Signs EIP-1559 transactions locally and broadcasts the raw encoding
#[derive(Debug, Clone)]
pub struct LocalKeyBackend {
    signer: PrivateKeySigner,
    client: RpcClient,
    priority_fee: Option<u128>,
}

impl LocalKeyBackend {
    pub fn new(signer: PrivateKeySigner, client: RpcClient) -> Self {
        let client = client.with_default_from(signer.address());
        Self {
            signer,
            client,
            priority_fee: None,
        }
    }

    /// Parses a hex private key (with or without `0x`)
    pub fn from_private_key(key: &str, client: RpcClient) -> Result<Self> {
        let signer: PrivateKeySigner = key
            .trim()
            .parse()
            .map_err(|e| Error::Signing(format!("invalid private key: {}", e)))?;
        Ok(Self::new(signer, client))
    }

    /// Overrides the default 0.1 gwei priority fee
    pub fn with_priority_fee(mut self, fee: u128) -> Self {
        self.priority_fee = Some(fee);
        self
    }

    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }
}

#[async_trait]
impl SigningBackend for LocalKeyBackend {
    fn name(&self) -> &'static str {
        "local key"
    }

    fn address(&self) -> Address {
        self.signer.address()
    }

    fn client(&self) -> &RpcClient {
        &self.client
    }

    async fn send_transaction(&self, tx: UnsignedTransaction) -> Result<PendingTransaction> {
        let unsigned = prepare_eip1559(&self.client, self.address(), &tx, self.priority_fee).await?;

        let signature = self.signer.sign_hash(&unsigned.signature_hash()).await?;
        let envelope = TxEnvelope::from(unsigned.into_signed(signature));

        self.client
            .send_raw_transaction(envelope.encoded_2718().into())
            .await
    }
}
