//! Wire codec: strict hex primitives, JSON-RPC envelopes and node records

mod primitives;
mod records;
mod revert;
mod rpc;

pub use primitives::{
    format_address, format_bytes, format_quantity, parse_address, parse_bytes, parse_quantity,
    strict, strict_opt, strict_vec, WireValue, ADDRESS_PATTERN, BYTES_PATTERN, QUANTITY_PATTERN,
};
pub use records::{
    AccessListTransaction, BlockHeader, DynamicFeeTransaction, LegacyTransaction, Log,
    ReceiptStatus, SignedTransaction, TransactionFields, TransactionReceipt,
};
pub use revert::{decode_revert_reason, RevertReason, ERROR_STRING_SELECTOR};
pub use rpc::{
    BlockTag, CallRequest, JsonRpcError, JsonRpcRequest, JsonRpcResponse, LogFilter, Request,
    JSONRPC_VERSION,
};
