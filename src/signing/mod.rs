//! The single-owner "pre-approved" signature blob understood by the Safe
//!
//! A Safe accepts a signature with type byte 1 when its `r` word holds the
//! address of an owner that is also `msg.sender`. The Safe proxy backend
//! always signs this way, so no ECDSA signature over the Safe transaction
//! hash is ever produced.

use alloy::primitives::{Address, Bytes, B256};

use crate::error::{Error, Result};

/// Trailing type byte of a pre-approved signature
pub const PRE_VALIDATED_SIGNATURE_TYPE: u8 = 1;

/// Length of one packed Safe signature: `r (32) | s (32) | v (1)`
pub const SIGNATURE_LEN: usize = 65;

/// 12 zero bytes, the owner, 32 zero bytes, type byte 1
pub fn encode_pre_validated_signature(owner: Address) -> Bytes {
    let r = owner.into_word();
    [r.as_slice(), B256::ZERO.as_slice(), &[PRE_VALIDATED_SIGNATURE_TYPE]]
        .concat()
        .into()
}

/// Recovers the owner from a pre-approved signature, rejecting any other shape
pub fn pre_validated_owner(signature: &[u8]) -> Result<Address> {
    if signature.len() != SIGNATURE_LEN {
        return Err(Error::Signing(format!(
            "expected a {SIGNATURE_LEN}-byte signature, got {} bytes",
            signature.len()
        )));
    }
    if signature[64] != PRE_VALIDATED_SIGNATURE_TYPE {
        return Err(Error::Signing(format!("signature type {} is not pre-approved", signature[64])));
    }
    if signature[..12].iter().chain(&signature[32..64]).any(|b| *b != 0) {
        return Err(Error::Signing("pre-approved signature has non-zero padding".to_string()));
    }
    Ok(Address::from_slice(&signature[12..32]))
}
