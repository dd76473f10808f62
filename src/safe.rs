//! Safe client: owner and module list management for 1/1 Safes

use std::future::Future;

use alloy::primitives::{address, Address, Bytes, B256, U256};
use alloy::sol_types::SolCall;
use tracing::{info, warn};

use crate::backend::{SafeProxy, SigningBackend};
use crate::chain::ChainAddresses;
use crate::client::{PendingTransaction, RpcClient};
use crate::contracts::{IMultiSend, ISafe};
use crate::encoding::encode_multisend_data;
use crate::error::{Error, Result};
use crate::types::{Call, Operation, UnsignedTransaction};

/// Head and tail marker of the on-chain owner and module lists
pub const SENTINEL: Address = address!("0000000000000000000000000000000000000001");

/// Entries requested per paginated list read
pub const PAGE_SIZE: u64 = 100;

/// Safe proxy singleton storage slot (slot 0)
pub const SAFE_SINGLETON_SLOT: B256 = B256::ZERO;

/// Returns the entry preceding `target`: the sentinel when `target` is the
/// head, `None` when it is absent.
pub fn find_previous(list: &[Address], target: Address) -> Option<Address> {
    let index = list.iter().position(|entry| *entry == target)?;
    Some(if index == 0 { SENTINEL } else { list[index - 1] })
}

/// Follows a sentinel-seeded paginated list until `next` is zero or the sentinel
pub(crate) async fn collect_paginated<F, Fut>(mut fetch_page: F) -> Result<Vec<Address>>
where
    F: FnMut(Address) -> Fut,
    Fut: Future<Output = Result<(Vec<Address>, Address)>>,
{
    let mut entries = Vec::new();
    let mut start = SENTINEL;

    loop {
        let (page, next) = fetch_page(start).await?;
        let exhausted = page.is_empty();
        entries.extend(page);

        if next == Address::ZERO || next == SENTINEL || exhausted {
            return Ok(entries);
        }
        start = next;
    }
}

/// Checks if an address is a Safe proxy by reading the singleton storage slot
/// and matching against known Safe singleton addresses.
pub async fn is_safe(client: &RpcClient, address: Address) -> Result<bool> {
    let slot = client.get_storage_at(address, SAFE_SINGLETON_SLOT).await?;
    let singleton = Address::from_slice(&slot[12..]);
    Ok(ChainAddresses::is_known_singleton(singleton))
}

/// Sends `calls` as one MultiSend batch.
///
/// Every sub-call is packed as a plain call and the batch itself is flagged
/// as a delegatecall, so only a signer that honours the operation flag (a
/// [`SafeProxy`]) executes it as intended.
pub async fn multisend<S: SigningBackend + ?Sized>(
    signer: &S,
    multi_send: Address,
    calls: &[Call],
) -> Result<PendingTransaction> {
    if calls.is_empty() {
        return Err(Error::NoCalls);
    }

    let data = IMultiSend::multiSendCall {
        transactions: encode_multisend_data(calls),
    }
    .abi_encode();

    info!(count = calls.len(), %multi_send, "sending MultiSend batch");
    signer
        .send_transaction(
            UnsignedTransaction::call(multi_send, U256::ZERO, data).with_operation(Operation::DelegateCall),
        )
        .await
}

/// Owners, threshold and modules read at one point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeState {
    pub owners: Vec<Address>,
    pub threshold: u64,
    pub modules: Vec<Address>,
}

/// A probed Safe, readable through any signer
#[derive(Debug, Clone)]
pub struct Safe<S> {
    signer: S,
    address: Address,
    addresses: ChainAddresses,
    state: SafeState,
}

impl<S: SigningBackend + Clone> Safe<S> {
    /// Probes owners, threshold and modules.
    ///
    /// Zero owners, a zero threshold, and any failure while probing all
    /// yield [`Error::InvalidSafe`].
    pub async fn connect(signer: S, address: Address) -> Result<Self> {
        Self::connect_with_addresses(signer, address, ChainAddresses::default()).await
    }

    pub async fn connect_with_addresses(signer: S, address: Address, addresses: ChainAddresses) -> Result<Self> {
        let client = signer.client();
        let probe = async {
            tokio::try_join!(
                read_owners(client, address),
                read_threshold(client, address),
                read_modules(client, address),
            )
        };

        let (owners, threshold, modules) = match probe.await {
            Ok(state) => state,
            Err(e) => {
                warn!(safe = %address, error = %e, "Safe probe failed");
                return Err(Error::InvalidSafe(address));
            }
        };

        if owners.is_empty() || threshold == 0 {
            warn!(safe = %address, owners = owners.len(), threshold, "address is not a usable Safe");
            return Err(Error::InvalidSafe(address));
        }

        Ok(Self {
            signer,
            address,
            addresses,
            state: SafeState {
                owners,
                threshold,
                modules,
            },
        })
    }

    /// Splits into the mutable view when the signer solely controls the Safe
    pub fn classify(self) -> SafeAccess<S> {
        if self.is_owned() {
            let proxy = SafeProxy::new(self.signer.clone(), self.address);
            SafeAccess::Owned(OwnedSafe { safe: self, proxy })
        } else {
            SafeAccess::Watched(self)
        }
    }

    /// Like [`classify`](Self::classify), failing for Safes the signer does not own
    pub fn into_owned(self) -> Result<OwnedSafe<S>> {
        let signer = self.signer.address();
        let safe = self.address;
        match self.classify() {
            SafeAccess::Owned(owned) => Ok(owned),
            SafeAccess::Watched(_) => Err(Error::NotOwned { signer, safe }),
        }
    }
}

impl<S: SigningBackend> Safe<S> {
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn signer(&self) -> &S {
        &self.signer
    }

    pub fn addresses(&self) -> &ChainAddresses {
        &self.addresses
    }

    /// State captured at connect time
    pub fn state(&self) -> &SafeState {
        &self.state
    }

    /// Whether the signer is an owner and the threshold is 1
    pub fn is_owned(&self) -> bool {
        self.state.threshold == 1 && self.state.owners.contains(&self.signer.address())
    }

    fn client(&self) -> &RpcClient {
        self.signer.client()
    }

    pub async fn owners(&self) -> Result<Vec<Address>> {
        read_owners(self.client(), self.address).await
    }

    pub async fn threshold(&self) -> Result<u64> {
        read_threshold(self.client(), self.address).await
    }

    pub async fn modules(&self) -> Result<Vec<Address>> {
        read_modules(self.client(), self.address).await
    }

    pub async fn nonce(&self) -> Result<U256> {
        self.client()
            .read(self.address, &ISafe::nonceCall {})
            .await
    }

    pub async fn is_owner(&self, address: Address) -> Result<bool> {
        self.client()
            .read(self.address, &ISafe::isOwnerCall { owner: address })
            .await
    }

    pub async fn is_module_enabled(&self, module: Address) -> Result<bool> {
        self.client()
            .read(self.address, &ISafe::isModuleEnabledCall { module })
            .await
    }

    /// Re-reads owners, threshold and modules
    pub async fn refresh(&mut self) -> Result<&SafeState> {
        let (owners, threshold, modules) = tokio::try_join!(self.owners(), self.threshold(), self.modules())?;
        self.state = SafeState {
            owners,
            threshold,
            modules,
        };
        Ok(&self.state)
    }
}

async fn read_owners(client: &RpcClient, safe: Address) -> Result<Vec<Address>> {
    client.read(safe, &ISafe::getOwnersCall {}).await
}

async fn read_threshold(client: &RpcClient, safe: Address) -> Result<u64> {
    let threshold = client.read(safe, &ISafe::getThresholdCall {}).await?;
    Ok(threshold.saturating_to::<u64>())
}

async fn read_modules(client: &RpcClient, safe: Address) -> Result<Vec<Address>> {
    collect_paginated(|start| async move {
        let page = client
            .read(
                safe,
                &ISafe::getModulesPaginatedCall {
                    start,
                    pageSize: U256::from(PAGE_SIZE),
                },
            )
            .await?;
        Ok::<_, Error>((page.array, page.next))
    })
    .await
}

/// A Safe as seen by a particular signer
#[derive(Debug, Clone)]
pub enum SafeAccess<S> {
    /// The signer is an owner and the threshold is 1
    Owned(OwnedSafe<S>),
    /// Read-only view
    Watched(Safe<S>),
}

impl<S: SigningBackend> SafeAccess<S> {
    pub fn safe(&self) -> &Safe<S> {
        match self {
            SafeAccess::Owned(owned) => &owned.safe,
            SafeAccess::Watched(safe) => safe,
        }
    }
}

/// A Safe the signer solely controls; the only view exposing mutations
#[derive(Debug, Clone)]
pub struct OwnedSafe<S> {
    safe: Safe<S>,
    proxy: SafeProxy<S>,
}

impl<S: SigningBackend> OwnedSafe<S> {
    pub fn safe(&self) -> &Safe<S> {
        &self.safe
    }

    /// Backend that executes transactions as this Safe
    pub fn proxy(&self) -> &SafeProxy<S> {
        &self.proxy
    }

    pub fn address(&self) -> Address {
        self.safe.address
    }

    async fn self_call<C: SolCall>(&self, call: C) -> Result<PendingTransaction> {
        let tx = UnsignedTransaction::call(self.address(), U256::ZERO, call.abi_encode());
        self.proxy.send_transaction(tx).await
    }

    /// Executes an arbitrary transaction through the Safe, honouring its operation
    pub async fn exec(&self, tx: UnsignedTransaction) -> Result<PendingTransaction> {
        self.proxy.send_transaction(tx).await
    }

    /// Adds an owner, keeping the threshold at 1
    pub async fn add_owner(&self, owner: Address) -> Result<PendingTransaction> {
        info!(safe = %self.address(), %owner, "adding Safe owner");
        self.self_call(ISafe::addOwnerWithThresholdCall {
            owner,
            _threshold: U256::from(1),
        })
        .await
    }

    /// Removes an owner; the list is re-read so the predecessor is current
    pub async fn remove_owner(&self, owner: Address) -> Result<PendingTransaction> {
        let owners = self.safe.owners().await?;
        let prev_owner = find_previous(&owners, owner).ok_or(Error::NotFound {
            what: "owner",
            address: owner,
        })?;

        info!(safe = %self.address(), %owner, %prev_owner, "removing Safe owner");
        self.self_call(ISafe::removeOwnerCall {
            prevOwner: prev_owner,
            owner,
            _threshold: U256::from(1),
        })
        .await
    }

    pub async fn enable_module(&self, module: Address) -> Result<PendingTransaction> {
        info!(safe = %self.address(), %module, "enabling Safe module");
        self.self_call(ISafe::enableModuleCall { module }).await
    }

    /// Disables a module; the list is re-read so the predecessor is current
    pub async fn disable_module(&self, module: Address) -> Result<PendingTransaction> {
        let modules = self.safe.modules().await?;
        let prev_module = find_previous(&modules, module).ok_or(Error::NotFound {
            what: "module",
            address: module,
        })?;

        info!(safe = %self.address(), %module, %prev_module, "disabling Safe module");
        self.self_call(ISafe::disableModuleCall {
            prevModule: prev_module,
            module,
        })
        .await
    }

    /// Sends `calls` atomically through the MultiSend contract
    pub async fn multisend(&self, calls: &[Call]) -> Result<PendingTransaction> {
        multisend(&self.proxy, self.safe.addresses.multi_send, calls).await
    }

    /// Starts a batch of calls executed by this Safe
    pub fn batch(&self) -> BatchBuilder<'_, S> {
        BatchBuilder {
            safe: self,
            calls: Vec::new(),
        }
    }
}

/// Builder collecting calls for one Safe transaction
pub struct BatchBuilder<'a, S> {
    safe: &'a OwnedSafe<S>,
    calls: Vec<Call>,
}

impl<S: SigningBackend> BatchBuilder<'_, S> {
    pub fn add(mut self, call: Call) -> Self {
        self.calls.push(call);
        self
    }

    pub fn add_raw(self, to: Address, value: U256, data: impl Into<Bytes>) -> Self {
        self.add(Call::new(to, value, data))
    }

    pub fn add_typed<C: SolCall>(self, to: Address, call: C) -> Self {
        self.add(Call::typed(to, &call))
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// A single call executes directly; several go through MultiSend
    pub async fn execute(self) -> Result<PendingTransaction> {
        match self.calls.as_slice() {
            [] => Err(Error::NoCalls),
            [call] => self.safe.exec(call.clone().into()).await,
            calls => self.safe.multisend(calls).await,
        }
    }
}
