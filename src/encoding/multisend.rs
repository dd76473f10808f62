//! MultiSend packed batch encoding
//!
//! Each entry is `operation (1) | to (20) | value (32) | data length (32) | data`,
//! entries are concatenated without padding. Entries are always plain calls:
//! only the outer transaction reaching the MultiSend contract is a delegatecall.

use alloy::primitives::{Bytes, FixedBytes, U256};
use alloy::sol_types::SolValue;

use crate::types::{Call, Operation};

/// Bytes preceding the calldata of one packed entry
pub const ENTRY_HEADER_LEN: usize = 1 + 20 + 32 + 32;

/// Packs one sub-call
pub fn encode_transaction(call: &Call) -> Vec<u8> {
    (
        FixedBytes::<1>::from([Operation::Call.as_u8()]),
        call.to,
        call.value,
        U256::from(call.data.len()),
        call.data.clone(),
    )
        .abi_encode_packed()
}

/// Concatenates the packed entries of `calls`
pub fn encode_multisend_data(calls: &[Call]) -> Bytes {
    calls.iter().flat_map(encode_transaction).collect::<Vec<u8>>().into()
}
