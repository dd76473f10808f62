//! Revert reason extraction from JSON-RPC error objects

use std::fmt;

use alloy::hex;
use alloy::primitives::U256;
use serde_json::Value;

/// Selector of `Error(string)`
pub const ERROR_STRING_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

const REVERTED_PREFIX: &str = "Reverted ";

/// A decoded revert reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevertReason {
    /// Human-readable reason, from `Error(string)` or raw UTF-8 data
    Message(String),
    /// ABI-encoded custom error that this client has no definition for
    UnrecognizedError { selector: [u8; 4], data: Vec<u8> },
    /// Anything that is not hex-encoded
    Raw(String),
}

impl fmt::Display for RevertReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RevertReason::Message(msg) => f.write_str(msg),
            RevertReason::UnrecognizedError { selector, data } => write!(
                f,
                "unrecognized error 0x{} (0x{})",
                hex::encode(selector),
                hex::encode(data)
            ),
            RevertReason::Raw(raw) => f.write_str(raw),
        }
    }
}

/// Decodes the reason carried by an error's `message` and optional `data`.
///
/// `data` wins over `message` when it is a string (or an object with a
/// string `data` field). The candidate is then interpreted in order:
/// `Reverted ` prefix stripped, `Error(string)` payload, unknown selector
/// followed by non-zero bytes, raw UTF-8 hex, and finally the string as-is.
pub fn decode_revert_reason(message: &str, data: Option<&Value>) -> RevertReason {
    let candidate = match data {
        Some(Value::String(s)) => s.as_str(),
        Some(Value::Object(obj)) => obj.get("data").and_then(Value::as_str).unwrap_or(message),
        _ => message,
    };
    let candidate = candidate.strip_prefix(REVERTED_PREFIX).unwrap_or(candidate);

    let Some(digits) = candidate.strip_prefix("0x") else {
        return RevertReason::Raw(candidate.to_string());
    };
    let Ok(raw) = hex::decode(digits) else {
        return RevertReason::Raw(candidate.to_string());
    };

    if raw.starts_with(&ERROR_STRING_SELECTOR) {
        if let Some(msg) = decode_error_string(&raw[4..]) {
            return RevertReason::Message(msg);
        }
    }

    if raw.len() > 4 && raw[4..].iter().any(|b| *b != 0) {
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&raw[..4]);
        return RevertReason::UnrecognizedError {
            selector,
            data: raw[4..].to_vec(),
        };
    }

    RevertReason::Message(String::from_utf8_lossy(&raw).into_owned())
}

/// Decodes the ABI body of `Error(string)`: offset word, length word, payload
fn decode_error_string(body: &[u8]) -> Option<String> {
    let offset = read_word(body, 0)?;
    let len = read_word(body, offset)?;
    let start = offset.checked_add(32)?;
    let payload = body.get(start..start.checked_add(len)?)?;
    String::from_utf8(payload.to_vec()).ok()
}

fn read_word(body: &[u8], at: usize) -> Option<usize> {
    let word = body.get(at..at.checked_add(32)?)?;
    let value = u64::try_from(U256::from_be_slice(word)).ok()?;
    usize::try_from(value).ok()
}
