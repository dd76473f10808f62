//! Backend delegating the signature step to a hardware device

use alloy::consensus::{SignableTransaction, TxEnvelope};
use alloy::eips::eip2718::Encodable2718;
use alloy::primitives::{Address, Signature};
use async_trait::async_trait;
use tracing::debug;

use super::{prepare_eip1559, SigningBackend};
use crate::client::{PendingTransaction, RpcClient};
use crate::error::Result;
use crate::types::UnsignedTransaction;

/// First account of the standard Ethereum derivation
pub const DEFAULT_DERIVATION_PATH: &str = "44'/60'/0'/0/0";

/// The two operations a signing device has to provide
#[async_trait]
pub trait HardwareDevice: Send + Sync {
    async fn get_address(&self, path: &str) -> Result<Address>;

    /// Signs the EIP-2718 signing payload of an unsigned transaction
    async fn sign_transaction(&self, unsigned: &[u8], path: &str) -> Result<Signature>;
}

/// Same fee and nonce derivation as the local key, signature from the device
#[derive(Debug, Clone)]
pub struct HardwareBackend<D> {
    device: D,
    address: Address,
    client: RpcClient,
    path: String,
}

impl<D: HardwareDevice> HardwareBackend<D> {
    /// Reads the device address at the default path
    pub async fn connect(device: D, client: RpcClient) -> Result<Self> {
        let path = DEFAULT_DERIVATION_PATH.to_string();
        let address = device.get_address(&path).await?;
        debug!(%address, %path, "connected hardware device");

        Ok(Self {
            device,
            address,
            client: client.with_default_from(address),
            path,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

#[async_trait]
impl<D: HardwareDevice> SigningBackend for HardwareBackend<D> {
    fn name(&self) -> &'static str {
        "hardware device"
    }

    fn address(&self) -> Address {
        self.address
    }

    fn client(&self) -> &RpcClient {
        &self.client
    }

    async fn send_transaction(&self, tx: UnsignedTransaction) -> Result<PendingTransaction> {
        let unsigned = prepare_eip1559(&self.client, self.address, &tx, None).await?;

        let payload = unsigned.encoded_for_signing();
        let signature = self.device.sign_transaction(&payload, &self.path).await?;
        let envelope = TxEnvelope::from(unsigned.into_signed(signature));

        self.client
            .send_raw_transaction(envelope.encoded_2718().into())
            .await
    }
}
