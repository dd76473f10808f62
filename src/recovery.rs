//! Timelocked recovery through a Zodiac Delay module
//!
//! A recoverer is a module enabled on the Delay modifier. Queuing submits
//! "make the recoverer the Safe's sole owner" to the Delay; once the
//! cooldown has elapsed anyone holding the same payload can execute it.
//! The Delay only executes a transaction whose hash matches the queued
//! one, so queue and execute must build byte-identical calldata.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;
use tracing::{info, warn};

use crate::backend::SigningBackend;
use crate::client::{PendingTransaction, RpcClient};
use crate::contracts::{IDelay, IModuleProxyFactory, ISafe};
use crate::create2::{compute_module_address, encode_delay_setup};
use crate::error::{Error, Result};
use crate::safe::{collect_paginated, find_previous, OwnedSafe, Safe, PAGE_SIZE};
use crate::types::{Call, Operation, UnsignedTransaction};

/// On-chain timelock counters of a Delay module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayModuleState {
    /// Seconds between queuing and earliest execution
    pub cooldown: u64,
    /// Nonce of the next transaction to execute
    pub tx_nonce: U256,
    /// Nonce the next queued transaction will get
    pub queue_nonce: U256,
    /// Creation time of the transaction at `tx_nonce`, zero when none
    pub queued_at: u64,
}

impl DelayModuleState {
    pub fn has_queued_transaction(&self) -> bool {
        self.queue_nonce > self.tx_nonce
    }

    /// Seconds of cooldown left at `now`, saturating at zero
    pub fn remaining(&self, now: u64) -> u64 {
        self.queued_at
            .saturating_add(self.cooldown)
            .saturating_sub(now)
    }

    pub fn status(&self, now: u64) -> RecoveryStatus {
        if !self.has_queued_transaction() {
            return RecoveryStatus::NoQueuedTransaction;
        }
        match self.remaining(now) {
            0 => RecoveryStatus::Ready {
                queued_at: self.queued_at,
            },
            remaining => RecoveryStatus::Queued {
                queued_at: self.queued_at,
                remaining,
            },
        }
    }
}

/// Where a Delay module is in its queue/execute cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryStatus {
    NoQueuedTransaction,
    Queued { queued_at: u64, remaining: u64 },
    Ready { queued_at: u64 },
}

impl RecoveryStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, RecoveryStatus::Ready { .. })
    }
}

/// The fixed recovery payload: the Safe adds `recoverer` as owner with threshold 1
pub fn recovery_payload(recoverer: Address) -> Bytes {
    Bytes::from(
        ISafe::addOwnerWithThresholdCall {
            owner: recoverer,
            _threshold: U256::from(1),
        }
        .abi_encode(),
    )
}

/// A Delay module whose avatar is a given Safe
#[derive(Debug, Clone)]
pub struct DelayModule<S> {
    signer: S,
    module: Address,
    safe: Address,
}

impl<S: SigningBackend> DelayModule<S> {
    /// Accepts the module only if its `avatar` is `safe`; any probe failure
    /// counts as a mismatch.
    pub async fn connect(signer: S, module: Address, safe: Address) -> Result<Self> {
        match signer.client().read(module, &IDelay::avatarCall {}).await {
            Ok(avatar) if avatar == safe => Ok(Self { signer, module, safe }),
            Ok(avatar) => {
                warn!(%module, %safe, %avatar, "Delay module guards a different avatar");
                Err(Error::InvalidModule { module, safe })
            }
            Err(e) => {
                warn!(%module, %safe, error = %e, "Delay module probe failed");
                Err(Error::InvalidModule { module, safe })
            }
        }
    }

    pub fn address(&self) -> Address {
        self.module
    }

    pub fn safe(&self) -> Address {
        self.safe
    }

    pub fn signer(&self) -> &S {
        &self.signer
    }

    fn client(&self) -> &RpcClient {
        self.signer.client()
    }

    /// Reads cooldown and nonces, then the creation time of the next transaction
    pub async fn state(&self) -> Result<DelayModuleState> {
        let client = self.client();
        let (cooldown, tx_nonce, queue_nonce) = tokio::try_join!(
            client.read(self.module, &IDelay::txCooldownCall {}),
            client.read(self.module, &IDelay::txNonceCall {}),
            client.read(self.module, &IDelay::queueNonceCall {}),
        )?;

        let queued_at = client
            .read(self.module, &IDelay::txCreatedAtCall { nonce: tx_nonce })
            .await?;

        Ok(DelayModuleState {
            cooldown: cooldown.saturating_to(),
            tx_nonce,
            queue_nonce,
            queued_at: queued_at.saturating_to(),
        })
    }

    /// Status against the latest block timestamp
    pub async fn status(&self) -> Result<RecoveryStatus> {
        let (state, now) = tokio::try_join!(self.state(), self.client().latest_timestamp())?;
        Ok(state.status(now))
    }

    /// Modules enabled on the Delay, i.e. the addresses allowed to queue
    pub async fn recoverers(&self) -> Result<Vec<Address>> {
        let client = self.client();
        let module = self.module;
        collect_paginated(|start| async move {
            let page = client
                .read(
                    module,
                    &IDelay::getModulesPaginatedCall {
                        start,
                        pageSize: U256::from(PAGE_SIZE),
                    },
                )
                .await?;
            Ok::<_, Error>((page.array, page.next))
        })
        .await
    }

    /// Queues the recovery payload; the signer must be a recoverer
    pub async fn queue_recovery(&self) -> Result<PendingTransaction> {
        let signer = self.signer.address();
        if !self.recoverers().await?.contains(&signer) {
            return Err(Error::NotRecoverer {
                signer,
                module: self.module,
            });
        }

        info!(module = %self.module, safe = %self.safe, recoverer = %signer, "queuing recovery");
        let call = IDelay::execTransactionFromModuleCall {
            to: self.safe,
            value: U256::ZERO,
            data: recovery_payload(signer),
            operation: Operation::Call.as_u8(),
        };
        self.send(call).await
    }

    /// Executes the queued recovery once the cooldown has elapsed.
    ///
    /// The module only accepts calldata hashing to `txHash(txNonce)`, so the
    /// rebuilt payload is checked against it before anything is sent.
    pub async fn execute_recovery(&self) -> Result<PendingTransaction> {
        let (state, now) = tokio::try_join!(self.state(), self.client().latest_timestamp())?;
        match state.status(now) {
            RecoveryStatus::NoQueuedTransaction => return Err(Error::NoQueuedRecovery(self.module)),
            RecoveryStatus::Queued { remaining, .. } => return Err(Error::RecoveryNotReady { remaining }),
            RecoveryStatus::Ready { .. } => {}
        }

        let recoverer = self.signer.address();
        let data = recovery_payload(recoverer);
        let client = self.client();
        let queued_call = IDelay::txHashCall { nonce: state.tx_nonce };
        let rebuilt_call = IDelay::getTransactionHashCall {
            to: self.safe,
            value: U256::ZERO,
            data: data.clone(),
            operation: Operation::Call.as_u8(),
        };
        let (queued, rebuilt) = tokio::try_join!(
            client.read(self.module, &queued_call),
            client.read(self.module, &rebuilt_call),
        )?;
        if queued != rebuilt {
            warn!(module = %self.module, %recoverer, %queued, "queued transaction is not this signer's recovery");
            return Err(Error::QueuedRecoveryMismatch {
                signer: recoverer,
                module: self.module,
            });
        }

        info!(module = %self.module, safe = %self.safe, %recoverer, "executing recovery");
        let call = IDelay::executeNextTxCall {
            to: self.safe,
            value: U256::ZERO,
            data,
            operation: Operation::Call.as_u8(),
        };
        self.send(call).await
    }

    async fn send<C: SolCall>(&self, call: C) -> Result<PendingTransaction> {
        let tx = UnsignedTransaction::call(self.module, U256::ZERO, call.abi_encode());
        self.signer.send_transaction(tx).await
    }

    fn ensure_avatar<T: SigningBackend>(&self, owner: &OwnedSafe<T>) -> Result<()> {
        if owner.address() != self.safe {
            return Err(Error::InvalidModule {
                module: self.module,
                safe: owner.address(),
            });
        }
        Ok(())
    }

    /// Registers a recoverer; the Safe owns the module so it sends the call
    pub async fn add_recoverer<T: SigningBackend>(
        &self,
        owner: &OwnedSafe<T>,
        recoverer: Address,
    ) -> Result<PendingTransaction> {
        self.ensure_avatar(owner)?;
        info!(module = %self.module, %recoverer, "adding recoverer");
        owner
            .exec(UnsignedTransaction::call(
                self.module,
                U256::ZERO,
                IDelay::enableModuleCall { module: recoverer }.abi_encode(),
            ))
            .await
    }

    pub async fn remove_recoverer<T: SigningBackend>(
        &self,
        owner: &OwnedSafe<T>,
        recoverer: Address,
    ) -> Result<PendingTransaction> {
        self.ensure_avatar(owner)?;
        let recoverers = self.recoverers().await?;
        let prev_module = find_previous(&recoverers, recoverer).ok_or(Error::NotFound {
            what: "recoverer",
            address: recoverer,
        })?;

        info!(module = %self.module, %recoverer, "removing recoverer");
        owner
            .exec(UnsignedTransaction::call(
                self.module,
                U256::ZERO,
                IDelay::disableModuleCall {
                    prevModule: prev_module,
                    module: recoverer,
                }
                .abi_encode(),
            ))
            .await
    }

    pub async fn set_cooldown<T: SigningBackend>(&self, owner: &OwnedSafe<T>, cooldown: u64) -> Result<PendingTransaction> {
        self.ensure_avatar(owner)?;
        info!(module = %self.module, cooldown, "setting recovery cooldown");
        owner
            .exec(UnsignedTransaction::call(
                self.module,
                U256::ZERO,
                IDelay::setTxCooldownCall {
                    cooldown: U256::from(cooldown),
                }
                .abi_encode(),
            ))
            .await
    }
}

/// Enabled modules of `safe` that are Delay modules guarding it
pub async fn find_delay_modules<S: SigningBackend + Clone>(safe: &Safe<S>) -> Result<Vec<DelayModule<S>>> {
    let mut found = Vec::new();
    for module in safe.modules().await? {
        if let Ok(delay) = DelayModule::connect(safe.signer().clone(), module, safe.address()).await {
            found.push(delay);
        }
    }
    Ok(found)
}

/// A recoverer registered on one of a Safe's Delay modules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recoverer {
    pub module: Address,
    pub address: Address,
}

/// Every recoverer across the Safe's valid Delay modules
pub async fn list_recoverers<S: SigningBackend + Clone>(safe: &Safe<S>) -> Result<Vec<Recoverer>> {
    let mut recoverers = Vec::new();
    for delay in find_delay_modules(safe).await? {
        recoverers.extend(delay.recoverers().await?.into_iter().map(|address| Recoverer {
            module: delay.address(),
            address,
        }));
    }
    Ok(recoverers)
}

/// Result of [`deploy_delay_module`]
#[derive(Debug, Clone)]
pub struct DelayDeployment {
    /// Address the module proxy is deployed at
    pub module: Address,
    pub pending: PendingTransaction,
}

/// Deploys a Delay module for the Safe, enables it and registers `recoverer`.
///
/// The module address is predicted before deployment so the three steps
/// can be sent as one MultiSend batch.
pub async fn deploy_delay_module<S: SigningBackend>(
    owner: &OwnedSafe<S>,
    recoverer: Address,
    cooldown: u64,
    salt_nonce: U256,
) -> Result<DelayDeployment> {
    let safe = owner.address();
    let addresses = owner.safe().addresses();

    let initializer = encode_delay_setup(safe, cooldown);
    let module = compute_module_address(
        addresses.module_proxy_factory,
        addresses.delay_master_copy,
        &initializer,
        salt_nonce,
    );

    let calls = [
        Call::typed(
            addresses.module_proxy_factory,
            &IModuleProxyFactory::deployModuleCall {
                masterCopy: addresses.delay_master_copy,
                initializer,
                saltNonce: salt_nonce,
            },
        ),
        Call::typed(safe, &ISafe::enableModuleCall { module }),
        Call::typed(module, &IDelay::enableModuleCall { module: recoverer }),
    ];

    info!(%safe, %module, %recoverer, cooldown, "deploying Delay module");
    let pending = owner.multisend(&calls).await?;
    Ok(DelayDeployment { module, pending })
}
