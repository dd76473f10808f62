//! Inner-call kind executed by a Safe or a Zodiac module

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The `operation` byte of `execTransaction`, `execTransactionFromModule`
/// and every packed MultiSend entry.
///
/// Only the Safe proxy backend honours [`DelegateCall`](Operation::DelegateCall);
/// any other backend sends the transaction as a plain call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Operation {
    #[default]
    Call = 0,
    /// Runs the target's code in the Safe's own storage context
    DelegateCall = 1,
}

impl Operation {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Operation::Call),
            1 => Some(Operation::DelegateCall),
            _ => None,
        }
    }

    pub fn is_delegate_call(self) -> bool {
        self == Operation::DelegateCall
    }
}

impl TryFrom<u8> for Operation {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Operation::from_u8(value).ok_or_else(|| Error::wire("operation 0 (call) or 1 (delegatecall)", value.to_string()))
    }
}

impl From<Operation> for u8 {
    fn from(op: Operation) -> Self {
        op.as_u8()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Call => "call",
            Operation::DelegateCall => "delegatecall",
        })
    }
}
