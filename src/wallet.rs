//! The active wallet: an account, its client and its signing backend
//!
//! A [`Wallet`] is immutable. Reconfiguring (switching backend, wrapping
//! in a Safe or recoverable proxy) produces a new `Wallet` which replaces
//! the previous one in the [`ActiveWallet`] slot, so every reader holds a
//! consistent snapshot.
//!
//! # Example
//!
//! ```rust,ignore
//! let local = LocalKeyBackend::from_private_key(&key, RpcClient::http(url))?;
//! let wallet = Wallet::new(WalletKind::LocalKey, local).through_safe(safe_address);
//!
//! let active = ActiveWallet::new();
//! active.replace(wallet);
//! ```

use std::fmt;
use std::sync::Arc;

use alloy::primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::info;

use crate::backend::{RecoverableProxy, SafeProxy, SigningBackend};
use crate::client::RpcClient;

/// Which kind of backend a wallet was configured with
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletKind {
    Injected,
    ReadOnly,
    LocalKey,
    Hardware,
    Recoverable,
    Safe,
}

impl fmt::Display for WalletKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WalletKind::Injected => "injected",
            WalletKind::ReadOnly => "read_only",
            WalletKind::LocalKey => "local_key",
            WalletKind::Hardware => "hardware",
            WalletKind::Recoverable => "recoverable",
            WalletKind::Safe => "safe",
        };
        f.write_str(name)
    }
}

/// An account together with the capabilities to read and sign for it
#[derive(Clone)]
pub struct Wallet {
    kind: WalletKind,
    address: Address,
    client: RpcClient,
    signer: Arc<dyn SigningBackend>,
    readonly: bool,
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("kind", &self.kind)
            .field("address", &self.address)
            .field("backend", &self.signer.name())
            .field("readonly", &self.readonly)
            .finish()
    }
}

impl Wallet {
    pub fn new(kind: WalletKind, backend: impl SigningBackend + 'static) -> Self {
        Self::from_arc(kind, Arc::new(backend))
    }

    pub fn from_arc(kind: WalletKind, signer: Arc<dyn SigningBackend>) -> Self {
        Self {
            kind,
            address: signer.address(),
            client: signer.client().clone(),
            readonly: signer.is_readonly(),
            signer,
        }
    }

    pub fn kind(&self) -> WalletKind {
        self.kind
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn client(&self) -> &RpcClient {
        &self.client
    }

    pub fn signer(&self) -> &Arc<dyn SigningBackend> {
        &self.signer
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    /// A new wallet acting as `safe`, signed by this wallet's backend
    pub fn through_safe(&self, safe: Address) -> Wallet {
        Wallet::new(WalletKind::Safe, SafeProxy::new(self.signer.clone(), safe))
    }

    /// A new wallet acting as the recoverable proxy at `proxy`
    pub fn through_recoverable(&self, proxy: Address, salt: B256) -> Wallet {
        Wallet::new(
            WalletKind::Recoverable,
            RecoverableProxy::new(self.signer.clone(), proxy).with_salt(salt),
        )
    }
}

/// Slot holding the current wallet, replaced wholesale
#[derive(Debug, Clone)]
pub struct ActiveWallet {
    slot: Arc<watch::Sender<Option<Arc<Wallet>>>>,
}

impl Default for ActiveWallet {
    fn default() -> Self {
        Self::new()
    }
}

impl ActiveWallet {
    pub fn new() -> Self {
        let (slot, _) = watch::channel(None);
        Self { slot: Arc::new(slot) }
    }

    /// Snapshot of the current wallet
    pub fn current(&self) -> Option<Arc<Wallet>> {
        self.slot.borrow().clone()
    }

    /// Installs `wallet`, returning the snapshot now current
    pub fn replace(&self, wallet: Wallet) -> Arc<Wallet> {
        let wallet = Arc::new(wallet);
        info!(kind = %wallet.kind(), address = %wallet.address(), "switching active wallet");
        self.slot.send_replace(Some(Arc::clone(&wallet)));
        wallet
    }

    pub fn clear(&self) {
        self.slot.send_replace(None);
    }

    /// Notified on every replacement
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Wallet>>> {
        self.slot.subscribe()
    }
}
