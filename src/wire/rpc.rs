//! JSON-RPC 2.0 envelopes and the typed method table

use alloy::primitives::{Address, Bytes, TxHash, B256, U256};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::primitives::{format_address, format_bytes, strict_opt, WireValue};
use super::revert::decode_revert_reason;
use crate::error::{Error, Result};
use crate::types::UnsignedTransaction;

pub const JSONRPC_VERSION: &str = "2.0";

/// Request envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    pub params: Value,
}

impl JsonRpcRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.into(),
            params,
        }
    }
}

/// Error object of a failed response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl From<JsonRpcError> for Error {
    fn from(err: JsonRpcError) -> Self {
        Error::Revert {
            code: err.code,
            reason: decode_revert_reason(&err.message, err.data.as_ref()),
        }
    }
}

/// Response envelope carrying either `result` or `error`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: u64, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: id.into(),
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: u64, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: id.into(),
            result: None,
            error: Some(error),
        }
    }

    /// Unwraps the result; a missing or `null` result is `Value::Null`
    pub fn into_result(self) -> Result<Value> {
        match self.error {
            Some(err) => Err(err.into()),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

/// Block selector for state queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockTag {
    #[default]
    Latest,
    Pending,
    Number(u64),
}

impl BlockTag {
    pub fn to_wire(&self) -> String {
        match self {
            BlockTag::Latest => "latest".to_string(),
            BlockTag::Pending => "pending".to_string(),
            BlockTag::Number(n) => n.to_wire(),
        }
    }
}

/// Wire form of a call/estimate/send transaction object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRequest {
    #[serde(skip_serializing_if = "Option::is_none", with = "strict_opt")]
    pub from: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none", with = "strict_opt")]
    pub to: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none", with = "strict_opt")]
    pub value: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none", with = "strict_opt")]
    pub data: Option<Bytes>,
    #[serde(skip_serializing_if = "Option::is_none", with = "strict_opt")]
    pub gas: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", with = "strict_opt")]
    pub max_fee_per_gas: Option<u128>,
    #[serde(skip_serializing_if = "Option::is_none", with = "strict_opt")]
    pub max_priority_fee_per_gas: Option<u128>,
    #[serde(skip_serializing_if = "Option::is_none", with = "strict_opt")]
    pub nonce: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", with = "strict_opt")]
    pub chain_id: Option<u64>,
}

impl From<&UnsignedTransaction> for CallRequest {
    fn from(tx: &UnsignedTransaction) -> Self {
        Self {
            from: tx.from,
            to: tx.to,
            value: Some(tx.value),
            data: Some(tx.data.clone()),
            gas: tx.gas,
            max_fee_per_gas: tx.max_fee_per_gas,
            max_priority_fee_per_gas: tx.max_priority_fee_per_gas,
            nonce: tx.nonce,
            chain_id: tx.chain_id,
        }
    }
}

/// Filter object for `eth_getLogs`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFilter {
    #[serde(skip_serializing_if = "Option::is_none", with = "strict_opt")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none", with = "strict_opt")]
    pub from_block: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", with = "strict_opt")]
    pub to_block: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", with = "strict_opt")]
    pub block_hash: Option<B256>,
}

impl LogFilter {
    pub fn address(address: Address) -> Self {
        Self {
            address: Some(address),
            ..Default::default()
        }
    }

    /// Matches `topic` at `position`; earlier unset positions become wildcards
    pub fn with_topic(mut self, position: usize, topic: B256) -> Self {
        if self.topics.len() <= position {
            self.topics.resize(position + 1, None);
        }
        self.topics[position] = Some(topic.to_wire());
        self
    }

    pub fn with_block_range(mut self, from: u64, to: u64) -> Self {
        self.from_block = Some(from);
        self.to_block = Some(to);
        self
    }
}

/// Every method the client speaks, with its positional parameters
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    BlockNumber,
    ChainId,
    GasPrice,
    MaxPriorityFeePerGas,
    Call(CallRequest, BlockTag),
    EstimateGas(CallRequest),
    GetBalance(Address, BlockTag),
    GetTransactionCount(Address, BlockTag),
    GetCode(Address, BlockTag),
    GetStorageAt(Address, B256, BlockTag),
    SendRawTransaction(Bytes),
    SendTransaction(CallRequest),
    RequestAccounts,
    Accounts,
    GetTransactionReceipt(TxHash),
    GetTransactionByHash(TxHash),
    GetLogs(LogFilter),
    GetBlockByNumber(BlockTag, bool),
}

impl Request {
    pub fn method(&self) -> &'static str {
        match self {
            Request::BlockNumber => "eth_blockNumber",
            Request::ChainId => "eth_chainId",
            Request::GasPrice => "eth_gasPrice",
            Request::MaxPriorityFeePerGas => "eth_maxPriorityFeePerGas",
            Request::Call(..) => "eth_call",
            Request::EstimateGas(_) => "eth_estimateGas",
            Request::GetBalance(..) => "eth_getBalance",
            Request::GetTransactionCount(..) => "eth_getTransactionCount",
            Request::GetCode(..) => "eth_getCode",
            Request::GetStorageAt(..) => "eth_getStorageAt",
            Request::SendRawTransaction(_) => "eth_sendRawTransaction",
            Request::SendTransaction(_) => "eth_sendTransaction",
            Request::RequestAccounts => "eth_requestAccounts",
            Request::Accounts => "eth_accounts",
            Request::GetTransactionReceipt(_) => "eth_getTransactionReceipt",
            Request::GetTransactionByHash(_) => "eth_getTransactionByHash",
            Request::GetLogs(_) => "eth_getLogs",
            Request::GetBlockByNumber(..) => "eth_getBlockByNumber",
        }
    }

    pub fn params(&self) -> Result<Value> {
        let params = match self {
            Request::BlockNumber
            | Request::ChainId
            | Request::GasPrice
            | Request::MaxPriorityFeePerGas
            | Request::RequestAccounts
            | Request::Accounts => json!([]),
            Request::Call(tx, block) => json!([serde_json::to_value(tx)?, block.to_wire()]),
            Request::EstimateGas(tx) | Request::SendTransaction(tx) => {
                json!([serde_json::to_value(tx)?])
            }
            Request::GetBalance(addr, block)
            | Request::GetTransactionCount(addr, block)
            | Request::GetCode(addr, block) => json!([format_address(*addr), block.to_wire()]),
            Request::GetStorageAt(addr, slot, block) => {
                json!([format_address(*addr), slot.to_wire(), block.to_wire()])
            }
            Request::SendRawTransaction(raw) => json!([format_bytes(raw)]),
            Request::GetTransactionReceipt(hash) | Request::GetTransactionByHash(hash) => {
                json!([hash.to_wire()])
            }
            Request::GetLogs(filter) => json!([serde_json::to_value(filter)?]),
            Request::GetBlockByNumber(block, full) => json!([block.to_wire(), full]),
        };
        Ok(params)
    }
}
