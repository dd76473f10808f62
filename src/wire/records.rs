//! Transaction, receipt, log and block records as returned by a node

use alloy::consensus::{SignableTransaction, TxEip1559, TxEip2930, TxLegacy};
use alloy::eips::eip2930::AccessList;
use alloy::primitives::{Address, Bytes, FixedBytes, Signature, TxHash, TxKind, B256, U256};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::primitives::{strict, strict_opt, strict_vec, WireValue};
use crate::error::{Error, Result};

/// Fields shared by every transaction type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFields {
    #[serde(with = "strict")]
    pub hash: TxHash,
    #[serde(with = "strict")]
    pub nonce: u64,
    #[serde(with = "strict")]
    pub from: Address,
    #[serde(default, with = "strict_opt")]
    pub to: Option<Address>,
    #[serde(with = "strict")]
    pub value: U256,
    #[serde(with = "strict")]
    pub input: Bytes,
    #[serde(with = "strict")]
    pub gas: u64,
    #[serde(default, with = "strict_opt", skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    #[serde(with = "strict")]
    pub v: u64,
    #[serde(with = "strict")]
    pub r: U256,
    #[serde(with = "strict")]
    pub s: U256,
    #[serde(default, with = "strict_opt")]
    pub block_hash: Option<B256>,
    #[serde(default, with = "strict_opt")]
    pub block_number: Option<u64>,
    #[serde(default, with = "strict_opt")]
    pub transaction_index: Option<u64>,
}

impl TransactionFields {
    fn kind(&self) -> TxKind {
        match self.to {
            Some(to) => TxKind::Call(to),
            None => TxKind::Create,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyTransaction {
    #[serde(flatten)]
    pub fields: TransactionFields,
    #[serde(with = "strict")]
    pub gas_price: u128,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessListTransaction {
    #[serde(flatten)]
    pub fields: TransactionFields,
    #[serde(with = "strict")]
    pub gas_price: u128,
    #[serde(default)]
    pub access_list: AccessList,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicFeeTransaction {
    #[serde(flatten)]
    pub fields: TransactionFields,
    #[serde(with = "strict")]
    pub max_fee_per_gas: u128,
    #[serde(with = "strict")]
    pub max_priority_fee_per_gas: u128,
    #[serde(default)]
    pub access_list: AccessList,
}

/// A mined or pending transaction, discriminated by its `type` tag.
///
/// A missing tag means legacy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum SignedTransaction {
    #[serde(rename = "0x0")]
    Legacy(LegacyTransaction),
    #[serde(rename = "0x1")]
    Eip2930(AccessListTransaction),
    #[serde(rename = "0x2")]
    Eip1559(DynamicFeeTransaction),
}

impl<'de> Deserialize<'de> for SignedTransaction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let tag = match value.get("type") {
            None | Some(Value::Null) => 0,
            Some(Value::String(s)) => u64::parse_wire(s).map_err(D::Error::custom)?,
            Some(other) => return Err(D::Error::custom(format!("invalid type tag {other}"))),
        };

        let tx = match tag {
            0 => SignedTransaction::Legacy(serde_json::from_value(value).map_err(D::Error::custom)?),
            1 => SignedTransaction::Eip2930(serde_json::from_value(value).map_err(D::Error::custom)?),
            2 => SignedTransaction::Eip1559(serde_json::from_value(value).map_err(D::Error::custom)?),
            other => {
                return Err(D::Error::custom(format!(
                    "unsupported transaction type {other}, expected 0x0, 0x1 or 0x2"
                )))
            }
        };
        Ok(tx)
    }
}

impl SignedTransaction {
    pub fn fields(&self) -> &TransactionFields {
        match self {
            SignedTransaction::Legacy(tx) => &tx.fields,
            SignedTransaction::Eip2930(tx) => &tx.fields,
            SignedTransaction::Eip1559(tx) => &tx.fields,
        }
    }

    /// The hash reported by the node
    pub fn hash(&self) -> TxHash {
        self.fields().hash
    }

    /// Recomputes the hash from the signed contents
    pub fn derived_hash(&self) -> Result<TxHash> {
        let fields = self.fields();
        let hash = match self {
            SignedTransaction::Legacy(tx) => {
                let (chain_id, parity) = legacy_v(fields.v)?;
                let unsigned = TxLegacy {
                    chain_id,
                    nonce: fields.nonce,
                    gas_price: tx.gas_price,
                    gas_limit: fields.gas,
                    to: fields.kind(),
                    value: fields.value,
                    input: fields.input.clone(),
                };
                *unsigned
                    .into_signed(Signature::new(fields.r, fields.s, parity))
                    .hash()
            }
            SignedTransaction::Eip2930(tx) => {
                let unsigned = TxEip2930 {
                    chain_id: required_chain_id(fields)?,
                    nonce: fields.nonce,
                    gas_price: tx.gas_price,
                    gas_limit: fields.gas,
                    to: fields.kind(),
                    value: fields.value,
                    access_list: tx.access_list.clone(),
                    input: fields.input.clone(),
                };
                *unsigned
                    .into_signed(Signature::new(fields.r, fields.s, typed_parity(fields.v)?))
                    .hash()
            }
            SignedTransaction::Eip1559(tx) => {
                let unsigned = TxEip1559 {
                    chain_id: required_chain_id(fields)?,
                    nonce: fields.nonce,
                    gas_limit: fields.gas,
                    max_fee_per_gas: tx.max_fee_per_gas,
                    max_priority_fee_per_gas: tx.max_priority_fee_per_gas,
                    to: fields.kind(),
                    value: fields.value,
                    access_list: tx.access_list.clone(),
                    input: fields.input.clone(),
                };
                *unsigned
                    .into_signed(Signature::new(fields.r, fields.s, typed_parity(fields.v)?))
                    .hash()
            }
        };
        Ok(hash)
    }
}

/// Splits a legacy `v` into (EIP-155 chain id, y parity)
fn legacy_v(v: u64) -> Result<(Option<u64>, bool)> {
    match v {
        27 | 28 => Ok((None, v == 28)),
        v if v >= 35 => Ok((Some((v - 35) / 2), (v - 35) % 2 == 1)),
        _ => Err(Error::wire("legacy v of 27, 28 or >= 35", v.to_wire())),
    }
}

fn typed_parity(v: u64) -> Result<bool> {
    match v {
        0 | 1 => Ok(v == 1),
        _ => Err(Error::wire("y parity of 0x0 or 0x1", v.to_wire())),
    }
}

fn required_chain_id(fields: &TransactionFields) -> Result<u64> {
    fields
        .chain_id
        .ok_or_else(|| Error::wire("chainId on a typed transaction", "null"))
}

/// Final execution status of a mined transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptStatus {
    Success,
    Failure,
}

impl Serialize for ReceiptStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(match self {
            ReceiptStatus::Success => "0x1",
            ReceiptStatus::Failure => "0x0",
        })
    }
}

impl<'de> Deserialize<'de> for ReceiptStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        match u64::parse_wire(&s).map_err(D::Error::custom)? {
            1 => Ok(ReceiptStatus::Success),
            0 => Ok(ReceiptStatus::Failure),
            other => Err(D::Error::custom(format!("invalid receipt status {other}"))),
        }
    }
}

/// An event log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    #[serde(with = "strict")]
    pub address: Address,
    #[serde(with = "strict_vec")]
    pub topics: Vec<B256>,
    #[serde(with = "strict")]
    pub data: Bytes,
    #[serde(default, with = "strict_opt")]
    pub block_number: Option<u64>,
    #[serde(default, with = "strict_opt")]
    pub transaction_hash: Option<TxHash>,
    #[serde(default, with = "strict_opt")]
    pub log_index: Option<u64>,
    #[serde(default)]
    pub removed: bool,
}

/// Receipt of a mined transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    #[serde(with = "strict")]
    pub transaction_hash: TxHash,
    #[serde(with = "strict")]
    pub block_hash: B256,
    #[serde(with = "strict")]
    pub block_number: u64,
    #[serde(with = "strict")]
    pub from: Address,
    #[serde(default, with = "strict_opt")]
    pub to: Option<Address>,
    #[serde(default, with = "strict_opt")]
    pub contract_address: Option<Address>,
    #[serde(with = "strict")]
    pub gas_used: u64,
    #[serde(default, with = "strict_opt")]
    pub effective_gas_price: Option<u128>,
    pub status: ReceiptStatus,
    pub logs: Vec<Log>,
}

impl TransactionReceipt {
    pub fn is_success(&self) -> bool {
        self.status == ReceiptStatus::Success
    }
}

/// The subset of a block header this client reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockHeader {
    #[serde(default, with = "strict_opt")]
    pub number: Option<u64>,
    #[serde(default, with = "strict_opt")]
    pub hash: Option<B256>,
    #[serde(with = "strict")]
    pub parent_hash: B256,
    #[serde(with = "strict")]
    pub timestamp: u64,
    #[serde(with = "strict")]
    pub gas_limit: u64,
    #[serde(with = "strict")]
    pub gas_used: u64,
    #[serde(default, with = "strict_opt")]
    pub base_fee_per_gas: Option<u128>,
    #[serde(with = "strict")]
    pub logs_bloom: FixedBytes<256>,
}
