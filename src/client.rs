//! Typed JSON-RPC client over a [`Transport`]

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, Bytes, TxHash, B256, U256};
use alloy::sol_types::SolCall;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, info, trace};
use url::Url;

use crate::error::{Error, Result};
use crate::transport::{HttpTransport, Transport};
use crate::types::UnsignedTransaction;
use crate::wire::{
    BlockHeader, BlockTag, CallRequest, JsonRpcRequest, Log, LogFilter, Request, SignedTransaction,
    TransactionReceipt, WireValue,
};

/// Default interval between receipt polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Transport knobs shared by every request of one client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Interval between `eth_getTransactionReceipt` polls
    pub poll_interval: Duration,
    /// Upper bound on receipt waiting; `None` waits indefinitely
    pub receipt_timeout: Option<Duration>,
    /// Sender injected into call/estimate/send payloads that carry none
    pub default_from: Option<Address>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            receipt_timeout: None,
            default_from: None,
        }
    }
}

impl ClientConfig {
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_receipt_timeout(mut self, timeout: Duration) -> Self {
        self.receipt_timeout = Some(timeout);
        self
    }

    pub fn with_default_from(mut self, from: Address) -> Self {
        self.default_from = Some(from);
        self
    }
}

/// JSON-RPC client with monotonically increasing request ids.
///
/// Cloning is cheap and clones share the transport and the id counter.
#[derive(Clone)]
pub struct RpcClient {
    transport: Arc<dyn Transport>,
    next_id: Arc<AtomicU64>,
    config: ClientConfig,
}

impl fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcClient")
            .field("config", &self.config)
            .field("next_id", &self.next_id.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl RpcClient {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    pub fn with_config(transport: impl Transport + 'static, config: ClientConfig) -> Self {
        Self {
            transport: Arc::new(transport),
            next_id: Arc::new(AtomicU64::new(1)),
            config,
        }
    }

    /// Client for an HTTP endpoint
    pub fn http(url: Url) -> Self {
        Self::new(HttpTransport::new(url))
    }

    /// Returns a client sharing this transport with a different default sender
    pub fn with_default_from(&self, from: Address) -> Self {
        let mut client = self.clone();
        client.config.default_from = Some(from);
        client
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn default_from(&self) -> Option<Address> {
        self.config.default_from
    }

    /// Sends an arbitrary method with raw parameters
    pub async fn raw_request(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(method, id, "JSON-RPC request");

        let request = JsonRpcRequest::new(id, method, params);
        self.transport.send(&request).await?.into_result()
    }

    /// Sends a typed request, injecting the default sender where applicable
    pub async fn request(&self, request: Request) -> Result<Value> {
        let request = self.inject_from(request);
        self.raw_request(request.method(), request.params()?).await
    }

    fn inject_from(&self, request: Request) -> Request {
        let Some(from) = self.config.default_from else {
            return request;
        };
        let fill = |mut tx: CallRequest| {
            tx.from.get_or_insert(from);
            tx
        };
        match request {
            Request::Call(tx, block) => Request::Call(fill(tx), block),
            Request::EstimateGas(tx) => Request::EstimateGas(fill(tx)),
            Request::SendTransaction(tx) => Request::SendTransaction(fill(tx)),
            other => other,
        }
    }

    async fn request_wire<T: WireValue>(&self, request: Request) -> Result<T> {
        parse_wire_value(self.request(request).await?)
    }

    async fn request_json<T: DeserializeOwned>(&self, request: Request) -> Result<T> {
        let value = self.request(request).await?;
        serde_json::from_value(value).map_err(|e| Error::Transport(format!("invalid result: {}", e)))
    }

    pub async fn block_number(&self) -> Result<u64> {
        self.request_wire(Request::BlockNumber).await
    }

    pub async fn chain_id(&self) -> Result<u64> {
        self.request_wire(Request::ChainId).await
    }

    pub async fn gas_price(&self) -> Result<u128> {
        self.request_wire(Request::GasPrice).await
    }

    pub async fn max_priority_fee_per_gas(&self) -> Result<u128> {
        self.request_wire(Request::MaxPriorityFeePerGas).await
    }

    pub async fn get_balance(&self, address: Address, block: BlockTag) -> Result<U256> {
        self.request_wire(Request::GetBalance(address, block)).await
    }

    pub async fn get_transaction_count(&self, address: Address, block: BlockTag) -> Result<u64> {
        self.request_wire(Request::GetTransactionCount(address, block))
            .await
    }

    pub async fn get_code(&self, address: Address) -> Result<Bytes> {
        self.request_wire(Request::GetCode(address, BlockTag::Latest))
            .await
    }

    pub async fn get_storage_at(&self, address: Address, slot: B256) -> Result<B256> {
        self.request_wire(Request::GetStorageAt(address, slot, BlockTag::Latest))
            .await
    }

    /// `eth_call` against the latest block
    pub async fn call(&self, tx: &UnsignedTransaction) -> Result<Bytes> {
        self.request_wire(Request::Call(CallRequest::from(tx), BlockTag::Latest))
            .await
    }

    pub async fn estimate_gas(&self, tx: &UnsignedTransaction) -> Result<u64> {
        self.request_wire(Request::EstimateGas(CallRequest::from(tx)))
            .await
    }

    /// Reads a view function and decodes its return value
    pub async fn read<C: SolCall>(&self, to: Address, call: &C) -> Result<C::Return> {
        let tx = UnsignedTransaction::call(to, U256::ZERO, call.abi_encode());
        let output = self.call(&tx).await?;
        Ok(C::abi_decode_returns(&output)?)
    }

    /// Broadcasts a signed, encoded transaction
    pub async fn send_raw_transaction(&self, raw: Bytes) -> Result<PendingTransaction> {
        let tx_hash: TxHash = self.request_wire(Request::SendRawTransaction(raw)).await?;
        info!(%tx_hash, "broadcast raw transaction");
        Ok(PendingTransaction::new(tx_hash, self.clone()))
    }

    /// Asks the node's own account manager to sign and broadcast
    pub async fn send_transaction(&self, tx: &UnsignedTransaction) -> Result<PendingTransaction> {
        let tx_hash: TxHash = self
            .request_wire(Request::SendTransaction(CallRequest::from(tx)))
            .await?;
        info!(%tx_hash, "submitted transaction");
        Ok(PendingTransaction::new(tx_hash, self.clone()))
    }

    pub async fn request_accounts(&self) -> Result<Vec<Address>> {
        parse_wire_list(self.request(Request::RequestAccounts).await?)
    }

    pub async fn accounts(&self) -> Result<Vec<Address>> {
        parse_wire_list(self.request(Request::Accounts).await?)
    }

    /// Receipt of a mined transaction, `None` while pending
    pub async fn get_transaction_receipt(&self, hash: TxHash) -> Result<Option<TransactionReceipt>> {
        self.request_json(Request::GetTransactionReceipt(hash)).await
    }

    pub async fn get_transaction_by_hash(&self, hash: TxHash) -> Result<Option<SignedTransaction>> {
        self.request_json(Request::GetTransactionByHash(hash)).await
    }

    pub async fn get_logs(&self, filter: LogFilter) -> Result<Vec<Log>> {
        self.request_json(Request::GetLogs(filter)).await
    }

    pub async fn get_block_by_number(&self, block: BlockTag) -> Result<Option<BlockHeader>> {
        self.request_json(Request::GetBlockByNumber(block, false))
            .await
    }

    /// Base fee of the latest block
    pub async fn get_base_fee(&self) -> Result<u128> {
        let header = self
            .get_block_by_number(BlockTag::Latest)
            .await?
            .ok_or_else(|| Error::Transport("latest block not found".to_string()))?;
        header
            .base_fee_per_gas
            .ok_or_else(|| Error::Transport("latest block has no base fee".to_string()))
    }

    /// Timestamp of the latest block
    pub async fn latest_timestamp(&self) -> Result<u64> {
        let header = self
            .get_block_by_number(BlockTag::Latest)
            .await?
            .ok_or_else(|| Error::Transport("latest block not found".to_string()))?;
        Ok(header.timestamp)
    }

    /// Polls until the receipt exists, bounded only by the configured timeout
    pub async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TransactionReceipt> {
        let deadline = self.config.receipt_timeout.map(|t| Instant::now() + t);

        loop {
            if let Some(receipt) = self.get_transaction_receipt(tx_hash).await? {
                debug!(%tx_hash, success = receipt.is_success(), "transaction mined");
                return Ok(receipt);
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return Err(Error::ReceiptTimeout(tx_hash));
            }
            trace!(%tx_hash, "receipt not yet available");
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }
}

fn parse_wire_value<T: WireValue>(value: Value) -> Result<T> {
    match value {
        Value::String(s) => T::parse_wire(&s),
        other => Err(Error::wire("hex string", other.to_string())),
    }
}

fn parse_wire_list<T: WireValue>(value: Value) -> Result<Vec<T>> {
    match value {
        Value::Array(items) => items.into_iter().map(parse_wire_value).collect(),
        other => Err(Error::wire("array of hex strings", other.to_string())),
    }
}

/// A broadcast transaction awaiting inclusion
#[derive(Debug, Clone)]
pub struct PendingTransaction {
    tx_hash: TxHash,
    client: RpcClient,
}

impl PendingTransaction {
    pub fn new(tx_hash: TxHash, client: RpcClient) -> Self {
        Self { tx_hash, client }
    }

    pub fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }

    /// Polls for the receipt at the client's interval
    pub async fn wait_for_receipt(&self) -> Result<TransactionReceipt> {
        self.client.wait_for_receipt(self.tx_hash).await
    }
}
