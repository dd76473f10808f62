//! Common test utilities for E2E tests
//!
//! [`MockNode`] is a scripted JSON-RPC node: methods answer from registered
//! handlers, `eth_call` is routed by target address and selector, and every
//! request is recorded so tests can decode exactly what was broadcast.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use alloy::consensus::{Signed, TxEip1559, TxEnvelope};
use alloy::eips::eip2718::Decodable2718;
use alloy::hex;
use alloy::primitives::{keccak256, Address, B256};
use alloy::signers::local::PrivateKeySigner;
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use serde_json::{json, Value};

use safe_wallet::wire::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use safe_wallet::{Eip1193Provider, LocalKeyBackend, Result, RpcClient, Transport};

/// Anvil's first dev account
pub const TEST_PRIVATE_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

pub const CHAIN_ID: u64 = 1;
pub const BASE_FEE: u128 = 1_000_000_000;
pub const GAS_ESTIMATE: u64 = 200_000;
pub const BLOCK_TIMESTAMP: u64 = 1_700_000_000;

type MethodHandler = Box<dyn Fn(&Value) -> std::result::Result<Value, JsonRpcError> + Send + Sync>;
type CallHandler = Box<dyn Fn(&[u8]) -> std::result::Result<Vec<u8>, JsonRpcError> + Send + Sync>;

/// Scripted JSON-RPC node
#[derive(Default)]
pub struct MockNode {
    methods: Mutex<HashMap<String, MethodHandler>>,
    contracts: Mutex<HashMap<(Address, [u8; 4]), CallHandler>>,
    log: Mutex<Vec<JsonRpcRequest>>,
}

impl MockNode {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A node answering everything a key-holding backend needs to send
    pub fn with_chain() -> Arc<Self> {
        let node = Self::new();
        node.on("eth_chainId", json!(format!("0x{CHAIN_ID:x}")));
        node.on("eth_blockNumber", json!("0x10"));
        node.on("eth_getTransactionCount", json!("0x3"));
        node.on("eth_estimateGas", json!(format!("0x{GAS_ESTIMATE:x}")));
        node.on("eth_getBalance", json!("0x8ac7230489e80000"));
        node.set_block(BLOCK_TIMESTAMP, BASE_FEE);
        node.on_with("eth_sendRawTransaction", |params| {
            let raw = hex::decode(params[0].as_str().unwrap_or_default()).map_err(|e| rpc_error(-32602, &e.to_string()))?;
            Ok(json!(format!("0x{}", hex::encode(keccak256(raw)))))
        });
        node.on("eth_sendTransaction", json!(format!("0x{}", "ab".repeat(32))));
        node
    }

    pub fn client(self: &Arc<Self>) -> RpcClient {
        RpcClient::new(Arc::clone(self))
    }

    pub fn local_backend(self: &Arc<Self>) -> LocalKeyBackend {
        LocalKeyBackend::from_private_key(TEST_PRIVATE_KEY, self.client()).expect("valid test key")
    }

    /// Answers `method` with a fixed result
    pub fn on(&self, method: &str, result: Value) {
        self.on_with(method, move |_| Ok(result.clone()));
    }

    pub fn on_with(
        &self,
        method: &str,
        handler: impl Fn(&Value) -> std::result::Result<Value, JsonRpcError> + Send + Sync + 'static,
    ) {
        self.methods
            .lock()
            .unwrap()
            .insert(method.to_string(), Box::new(handler));
    }

    /// Answers `method` with an error response
    pub fn fail(&self, method: &str, code: i64, message: &str) {
        let error = rpc_error(code, message);
        self.on_with(method, move |_| Err(error.clone()));
    }

    /// Serves the latest block with the given timestamp and base fee
    pub fn set_block(&self, timestamp: u64, base_fee: u128) {
        self.on("eth_getBlockByNumber", block_header(timestamp, base_fee));
    }

    /// Answers `C` on `to` with fixed ABI-encoded return data
    pub fn on_call<C: SolCall>(&self, to: Address, returns: Vec<u8>) {
        self.contracts
            .lock()
            .unwrap()
            .insert((to, C::SELECTOR), Box::new(move |_| Ok(returns.clone())));
    }

    /// Answers `C` on `to` from its decoded arguments
    pub fn on_call_with<C: SolCall + 'static>(&self, to: Address, handler: impl Fn(C) -> Vec<u8> + Send + Sync + 'static) {
        self.contracts.lock().unwrap().insert(
            (to, C::SELECTOR),
            Box::new(move |calldata| {
                let call = C::abi_decode(calldata).map_err(|e| rpc_error(-32602, &e.to_string()))?;
                Ok(handler(call))
            }),
        );
    }

    /// Reverts `C` on `to` with `error`
    pub fn revert_call<C: SolCall>(&self, to: Address, error: JsonRpcError) {
        self.contracts
            .lock()
            .unwrap()
            .insert((to, C::SELECTOR), Box::new(move |_| Err(error.clone())));
    }

    /// Params of every recorded request for `method`
    pub fn requests(&self, method: &str) -> Vec<Value> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|req| req.method == method)
            .map(|req| req.params.clone())
            .collect()
    }

    pub fn count(&self, method: &str) -> usize {
        self.requests(method).len()
    }

    /// Decodes every broadcast raw transaction
    pub fn sent(&self) -> Vec<Signed<TxEip1559>> {
        self.requests("eth_sendRawTransaction")
            .iter()
            .map(|params| {
                let raw = hex::decode(params[0].as_str().expect("raw transaction hex")).expect("valid hex");
                match TxEnvelope::decode_2718(&mut raw.as_slice()).expect("valid envelope") {
                    TxEnvelope::Eip1559(signed) => signed,
                    other => panic!("expected an EIP-1559 transaction, got {other:?}"),
                }
            })
            .collect()
    }

    /// The single broadcast transaction
    pub fn sent_one(&self) -> TxEip1559 {
        let sent = self.sent();
        assert_eq!(sent.len(), 1, "expected exactly one broadcast");
        sent[0].tx().clone()
    }

    fn dispatch(&self, method: &str, params: &Value) -> std::result::Result<Value, JsonRpcError> {
        if method == "eth_call" {
            return self.dispatch_call(params);
        }
        match self.methods.lock().unwrap().get(method) {
            Some(handler) => handler(params),
            None => Err(rpc_error(-32601, &format!("method {method} not scripted"))),
        }
    }

    fn dispatch_call(&self, params: &Value) -> std::result::Result<Value, JsonRpcError> {
        let tx = &params[0];
        let to = tx["to"]
            .as_str()
            .and_then(|s| Address::from_str(s).ok())
            .ok_or_else(|| rpc_error(-32602, "missing call target"))?;
        let data = hex::decode(tx["data"].as_str().unwrap_or("0x")).map_err(|e| rpc_error(-32602, &e.to_string()))?;

        let mut selector = [0u8; 4];
        if data.len() >= 4 {
            selector.copy_from_slice(&data[..4]);
        }

        match self.contracts.lock().unwrap().get(&(to, selector)) {
            Some(handler) => handler(&data).map(|out| json!(format!("0x{}", hex::encode(out)))),
            None => Err(rpc_error(3, "execution reverted")),
        }
    }
}

#[async_trait]
impl Transport for MockNode {
    async fn send(&self, request: &JsonRpcRequest) -> Result<JsonRpcResponse> {
        self.log.lock().unwrap().push(request.clone());
        Ok(match self.dispatch(&request.method, &request.params) {
            Ok(result) => JsonRpcResponse::success(request.id, result),
            Err(error) => JsonRpcResponse::failure(request.id, error),
        })
    }
}

#[async_trait]
impl Eip1193Provider for MockNode {
    async fn request(&self, method: &str, params: Value) -> std::result::Result<Value, JsonRpcError> {
        self.log
            .lock()
            .unwrap()
            .push(JsonRpcRequest::new(0, method, params.clone()));
        self.dispatch(method, &params)
    }
}

pub fn rpc_error(code: i64, message: &str) -> JsonRpcError {
    JsonRpcError {
        code,
        message: message.to_string(),
        data: None,
    }
}

pub fn block_header(timestamp: u64, base_fee: u128) -> Value {
    json!({
        "number": "0x10",
        "hash": format!("0x{}", "22".repeat(32)),
        "parentHash": format!("0x{}", "11".repeat(32)),
        "timestamp": format!("0x{timestamp:x}"),
        "gasLimit": "0x1c9c380",
        "gasUsed": "0x0",
        "baseFeePerGas": format!("0x{base_fee:x}"),
        "logsBloom": format!("0x{}", "00".repeat(256)),
    })
}

pub fn receipt_json(tx_hash: B256, success: bool) -> Value {
    json!({
        "transactionHash": format!("0x{}", hex::encode(tx_hash)),
        "blockHash": format!("0x{}", "22".repeat(32)),
        "blockNumber": "0x10",
        "from": "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
        "to": null,
        "contractAddress": null,
        "gasUsed": "0x5208",
        "effectiveGasPrice": "0x3b9aca00",
        "status": if success { "0x1" } else { "0x0" },
        "logs": [],
    })
}

pub fn test_signer() -> PrivateKeySigner {
    TEST_PRIVATE_KEY.parse().expect("valid test key")
}
