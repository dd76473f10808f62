//! Error types for safe-wallet

use alloy::primitives::Address;
use thiserror::Error;

use crate::wire::RevertReason;

/// Result type alias for safe-wallet operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to a node or managing an account
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed wire data
    #[error("Invalid wire value {found:?}: expected {expected}")]
    WireValidation {
        expected: &'static str,
        found: String,
    },

    /// The node answered with a JSON-RPC error object
    #[error("Execution reverted ({code}): {reason}")]
    Revert { code: i64, reason: RevertReason },

    /// Non-success HTTP status or an unparseable response body
    #[error("Transport error: {0}")]
    Transport(String),

    /// The active backend cannot send transactions
    #[error("Wallet is read-only")]
    ReadOnly,

    /// Contract creation requested through a backend that cannot express it
    #[error("{backend} does not support contract creation")]
    ContractCreationUnsupported { backend: &'static str },

    /// `call` / `estimateGas` requested on a path that has no read equivalent
    #[error("{backend} does not support {what}")]
    CallUnsupported {
        backend: &'static str,
        what: &'static str,
    },

    /// A list entry to be removed is not present on chain
    #[error("{what} {address} not found")]
    NotFound { what: &'static str, address: Address },

    /// The signer is not a registered recoverer of the Delay module
    #[error("Signer {signer} is not a recoverer of module {module}")]
    NotRecoverer { signer: Address, module: Address },

    /// The queued transaction is not the recovery this signer would execute
    #[error("Queued transaction on module {module} does not recover to {signer}")]
    QueuedRecoveryMismatch { signer: Address, module: Address },

    /// The cooldown of the queued recovery has not elapsed yet
    #[error("Recovery is not ready, {remaining}s of cooldown remaining")]
    RecoveryNotReady { remaining: u64 },

    /// No recovery transaction is queued on the Delay module
    #[error("No recovery queued on module {0}")]
    NoQueuedRecovery(Address),

    /// The signer does not solely control the Safe
    #[error("Signer {signer} does not own Safe {safe} with threshold 1")]
    NotOwned { signer: Address, safe: Address },

    /// The address does not behave like a Safe
    #[error("{0} is not a valid Safe")]
    InvalidSafe(Address),

    /// The module does not guard the given Safe
    #[error("Module {module} is not attached to Safe {safe}")]
    InvalidModule { module: Address, safe: Address },

    /// A batch was executed without any calls
    #[error("No calls to execute")]
    NoCalls,

    /// Signature generation failed
    #[error("Failed to sign: {0}")]
    Signing(String),

    /// ABI encoding/decoding error
    #[error("ABI error: {0}")]
    Abi(String),

    /// Receipt polling exceeded the configured bound
    #[error("Timed out waiting for receipt of {0}")]
    ReceiptTimeout(alloy::primitives::TxHash),

    /// Persisted store failure
    #[error("Store error: {0}")]
    Store(String),
}

impl Error {
    /// Returns true for precondition violations that are never retried
    pub fn is_capability(&self) -> bool {
        matches!(
            self,
            Error::ReadOnly
                | Error::ContractCreationUnsupported { .. }
                | Error::CallUnsupported { .. }
                | Error::NotFound { .. }
                | Error::NotRecoverer { .. }
                | Error::QueuedRecoveryMismatch { .. }
                | Error::RecoveryNotReady { .. }
                | Error::NoQueuedRecovery(_)
                | Error::NotOwned { .. }
        )
    }

    pub(crate) fn wire(expected: &'static str, found: impl Into<String>) -> Self {
        Error::WireValidation {
            expected,
            found: found.into(),
        }
    }
}

impl From<alloy::signers::Error> for Error {
    fn from(err: alloy::signers::Error) -> Self {
        Error::Signing(err.to_string())
    }
}

impl From<alloy::sol_types::Error> for Error {
    fn from(err: alloy::sol_types::Error) -> Self {
        Error::Abi(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Transport(err.to_string())
    }
}
