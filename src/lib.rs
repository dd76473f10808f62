//! # safe-wallet
//!
//! An Ethereum account client built around 1/1 Safe smart accounts.
//!
//! ## Features
//!
//! - Strict JSON-RPC wire codec with revert reason decoding
//! - Composable signing backends: injected provider, read-only endpoint,
//!   local key, hardware device, recoverable proxy and Safe proxy
//! - Safe owner/module management with MultiSend batching
//! - Timelocked recovery through a Zodiac Delay module
//! - Single-flight [`AsyncOperation`] slots for UI-driven actions
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use safe_wallet::{LocalKeyBackend, RpcClient, Safe, SafeAccess};
//!
//! let signer = LocalKeyBackend::from_private_key(&key, RpcClient::http(rpc_url))?;
//!
//! // Probe the Safe and check that the signer solely controls it
//! let SafeAccess::Owned(safe) = Safe::connect(signer, safe_address).await?.classify() else {
//!     return Err(eyre!("not an owner"));
//! };
//!
//! // Batch two calls through MultiSend
//! safe.batch()
//!     .add_typed(usdc, IERC20::transferCall { to: recipient, amount })
//!     .add_typed(usdc, IERC20::approveCall { spender, amount: U256::MAX })
//!     .execute().await?
//!     .wait_for_receipt().await?;
//! ```
//!
//! ## Backends
//!
//! Proxy backends own the backend they wrap, so they nest:
//!
//! ```rust,ignore
//! let device = HardwareBackend::connect(ledger, client).await?;
//! let proxy = RecoverableProxy::new(device, proxy_wallet);
//! let safe = SafeProxy::new(proxy, safe_address);
//! safe.send_transaction(UnsignedTransaction::call(to, value, data)).await?;
//! ```

pub mod async_op;
pub mod backend;
pub mod chain;
pub mod client;
pub mod contracts;
pub mod create2;
pub mod encoding;
pub mod error;
pub mod recovery;
pub mod safe;
pub mod signing;
pub mod store;
pub mod transport;
pub mod types;
pub mod wallet;
pub mod wire;

// Re-export main types at crate root
pub use async_op::{AsyncOperation, AsyncProperty};
pub use backend::{
    HardwareBackend, HardwareDevice, InjectedBackend, LocalKeyBackend, ReadOnlyBackend, RecoverableProxy,
    SafeProxy, SigningBackend,
};
pub use chain::{ChainAddresses, Network, SAFE_SINGLETONS};
pub use client::{ClientConfig, PendingTransaction, RpcClient};
pub use contracts::{IDelay, IMultiSend, IModuleProxyFactory, IRecoverableWallet, IERC20, ISafe};
pub use error::{Error, Result};
pub use recovery::{deploy_delay_module, find_delay_modules, DelayModule, DelayModuleState, RecoveryStatus};
pub use safe::{find_previous, is_safe, multisend, OwnedSafe, Safe, SafeAccess, SafeState, SENTINEL};
pub use store::{AddressBookStore, JsonFileStore, MemoryStore, Token, TokenRegistry};
pub use transport::{choose_endpoint, Eip1193Provider, HttpTransport, InjectedTransport, Transport};
pub use types::{Call, Operation, UnsignedTransaction};
pub use wallet::{ActiveWallet, Wallet, WalletKind};
pub use wire::{RevertReason, SignedTransaction, TransactionReceipt};

// Re-export alloy types that are commonly used
pub use alloy::primitives::{Address, Bytes, U256};
