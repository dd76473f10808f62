//! Calldata packing for batched Safe execution

mod multisend;

pub use multisend::{encode_multisend_data, encode_transaction, ENTRY_HEADER_LEN};
