//! Delay-module recovery E2E tests

use std::sync::Arc;

use alloy::primitives::{address, keccak256, Address, Bytes, FixedBytes, TxKind, B256, U256};
use alloy::sol_types::{SolCall, SolValue};

use crate::common::{MockNode, BASE_FEE};
use safe_wallet::create2::{compute_module_address, encode_delay_setup};
use safe_wallet::encoding::encode_multisend_data;
use safe_wallet::recovery::{list_recoverers, recovery_payload};
use safe_wallet::{
    deploy_delay_module, Call, ChainAddresses, DelayModule, Error, IDelay, IModuleProxyFactory, IMultiSend, ISafe,
    RecoveryStatus, Safe, SigningBackend, SENTINEL,
};

const SAFE: Address = address!("5afe00000000000000000000000000000000cafe");
const MODULE: Address = address!("00000000000000000000000000000000de1a7000");
const FOREIGN_MODULE: Address = address!("00000000000000000000000000000000f0f0f0f0");
const OTHER_RECOVERER: Address = address!("000000000000000000000000000000000000beef");

const COOLDOWN: u64 = 86_400;
const QUEUED_AT: u64 = 1_700_000_000;

/// Delay's `keccak256(abi.encodePacked(to, value, data, operation))`
fn delay_tx_hash(to: Address, value: U256, data: Bytes, operation: u8) -> B256 {
    keccak256((to, value, data, FixedBytes::<1>::from([operation])).abi_encode_packed())
}

/// Scripts the Delay module counters; `queued_for` is the recoverer whose
/// recovery is waiting at `txNonce`, if any
fn script_delay(node: &Arc<MockNode>, recoverers: Vec<Address>, queued_for: Option<Address>) {
    let queued = queued_for.is_some();
    node.on_call::<IDelay::avatarCall>(MODULE, SAFE.abi_encode());
    node.on_call::<IDelay::getModulesPaginatedCall>(MODULE, (recoverers, SENTINEL).abi_encode_params());
    node.on_call::<IDelay::txCooldownCall>(MODULE, U256::from(COOLDOWN).abi_encode());
    node.on_call::<IDelay::txNonceCall>(MODULE, U256::from(4).abi_encode());
    node.on_call::<IDelay::queueNonceCall>(MODULE, U256::from(if queued { 5u64 } else { 4 }).abi_encode());
    node.on_call_with::<IDelay::txCreatedAtCall>(MODULE, move |call| {
        assert_eq!(call.nonce, U256::from(4), "creation time is read at txNonce");
        U256::from(if queued { QUEUED_AT } else { 0 }).abi_encode()
    });
    node.on_call_with::<IDelay::txHashCall>(MODULE, move |call| {
        assert_eq!(call.nonce, U256::from(4), "queued hash is read at txNonce");
        queued_for
            .map(|recoverer| delay_tx_hash(SAFE, U256::ZERO, recovery_payload(recoverer), 0))
            .unwrap_or_default()
            .abi_encode()
    });
    node.on_call_with::<IDelay::getTransactionHashCall>(MODULE, |call| {
        delay_tx_hash(call.to, call.value, call.data, call.operation).abi_encode()
    });
}

fn sent_to_module(node: &MockNode) -> Vec<u8> {
    let tx = node.sent_one();
    assert_eq!(tx.to, TxKind::Call(MODULE));
    assert_eq!(tx.value, U256::ZERO);
    tx.input.to_vec()
}

#[tokio::test]
async fn test_connect_rejects_foreign_avatar() {
    let node = MockNode::with_chain();
    node.on_call::<IDelay::avatarCall>(MODULE, OTHER_RECOVERER.abi_encode());

    let result = DelayModule::connect(node.local_backend(), MODULE, SAFE).await;
    assert!(matches!(
        result,
        Err(Error::InvalidModule { module, safe }) if module == MODULE && safe == SAFE
    ));
}

#[tokio::test]
async fn test_connect_rejects_non_module() {
    let node = MockNode::with_chain();

    let result = DelayModule::connect(node.local_backend(), MODULE, SAFE).await;
    assert!(matches!(result, Err(Error::InvalidModule { .. })));
}

#[tokio::test]
async fn test_queue_requires_recoverer() {
    let node = MockNode::with_chain();
    script_delay(&node, vec![OTHER_RECOVERER], None);
    let delay = DelayModule::connect(node.local_backend(), MODULE, SAFE).await.unwrap();

    let result = delay.queue_recovery().await;

    assert!(matches!(result, Err(Error::NotRecoverer { module, .. }) if module == MODULE));
    assert_eq!(node.count("eth_sendRawTransaction"), 0);
}

#[tokio::test]
async fn test_queue_submits_recovery_payload() {
    let node = MockNode::with_chain();
    let signer = node.local_backend();
    let me = signer.address();
    script_delay(&node, vec![OTHER_RECOVERER, me], None);
    let delay = DelayModule::connect(signer, MODULE, SAFE).await.unwrap();

    delay.queue_recovery().await.unwrap();

    let queued = IDelay::execTransactionFromModuleCall::abi_decode(&sent_to_module(&node)).unwrap();
    assert_eq!(queued.to, SAFE);
    assert_eq!(queued.value, U256::ZERO);
    assert_eq!(queued.operation, 0);
    assert_eq!(queued.data, recovery_payload(me));

    let add = ISafe::addOwnerWithThresholdCall::abi_decode(&queued.data).unwrap();
    assert_eq!(add.owner, me);
    assert_eq!(add._threshold, U256::from(1));
}

#[tokio::test]
async fn test_status_without_queue() {
    let node = MockNode::with_chain();
    script_delay(&node, vec![], None);
    let delay = DelayModule::connect(node.local_backend(), MODULE, SAFE).await.unwrap();

    assert_eq!(delay.status().await.unwrap(), RecoveryStatus::NoQueuedTransaction);
    assert!(matches!(
        delay.execute_recovery().await,
        Err(Error::NoQueuedRecovery(module)) if module == MODULE
    ));
}

#[tokio::test]
async fn test_status_counts_down_cooldown() {
    let node = MockNode::with_chain();
    node.set_block(QUEUED_AT + 1_000, BASE_FEE);
    script_delay(&node, vec![OTHER_RECOVERER], Some(OTHER_RECOVERER));
    let delay = DelayModule::connect(node.local_backend(), MODULE, SAFE).await.unwrap();

    let state = delay.state().await.unwrap();
    assert!(state.has_queued_transaction());
    assert_eq!(state.cooldown, COOLDOWN);
    assert_eq!(state.queued_at, QUEUED_AT);

    assert_eq!(
        delay.status().await.unwrap(),
        RecoveryStatus::Queued {
            queued_at: QUEUED_AT,
            remaining: 85_400,
        }
    );
}

#[tokio::test]
async fn test_execute_before_cooldown_sends_nothing() {
    let node = MockNode::with_chain();
    node.set_block(QUEUED_AT + 1_000, BASE_FEE);
    script_delay(&node, vec![OTHER_RECOVERER], Some(OTHER_RECOVERER));
    let delay = DelayModule::connect(node.local_backend(), MODULE, SAFE).await.unwrap();

    let result = delay.execute_recovery().await;

    assert!(matches!(result, Err(Error::RecoveryNotReady { remaining: 85_400 })));
    assert_eq!(node.count("eth_sendRawTransaction"), 0);
}

#[tokio::test]
async fn test_execute_after_cooldown_replays_payload() {
    let node = MockNode::with_chain();
    node.set_block(QUEUED_AT + COOLDOWN + 10, BASE_FEE);
    let signer = node.local_backend();
    let me = signer.address();
    script_delay(&node, vec![me], Some(me));
    let delay = DelayModule::connect(signer, MODULE, SAFE).await.unwrap();

    assert!(delay.status().await.unwrap().is_ready());
    delay.execute_recovery().await.unwrap();

    let executed = IDelay::executeNextTxCall::abi_decode(&sent_to_module(&node)).unwrap();
    assert_eq!(executed.to, SAFE);
    assert_eq!(executed.value, U256::ZERO);
    assert_eq!(executed.operation, 0);
    assert_eq!(executed.data, recovery_payload(me));
    assert_eq!(
        delay_tx_hash(executed.to, executed.value, executed.data, executed.operation),
        delay_tx_hash(SAFE, U256::ZERO, recovery_payload(me), 0),
    );
}

#[tokio::test]
async fn test_execute_rejects_recovery_queued_for_another_recoverer() {
    let node = MockNode::with_chain();
    node.set_block(QUEUED_AT + COOLDOWN + 10, BASE_FEE);
    let signer = node.local_backend();
    let me = signer.address();
    script_delay(&node, vec![OTHER_RECOVERER, me], Some(OTHER_RECOVERER));
    let delay = DelayModule::connect(signer, MODULE, SAFE).await.unwrap();

    let result = delay.execute_recovery().await;

    assert!(matches!(
        result,
        Err(Error::QueuedRecoveryMismatch { signer, module }) if signer == me && module == MODULE
    ));
    assert_eq!(node.count("eth_sendRawTransaction"), 0);
}

#[tokio::test]
async fn test_list_recoverers_skips_foreign_modules() {
    let node = MockNode::with_chain();
    let signer = node.local_backend();
    node.on_call::<ISafe::getOwnersCall>(SAFE, vec![signer.address()].abi_encode());
    node.on_call::<ISafe::getThresholdCall>(SAFE, U256::from(1).abi_encode());
    node.on_call::<ISafe::getModulesPaginatedCall>(SAFE, (vec![FOREIGN_MODULE, MODULE], SENTINEL).abi_encode_params());
    node.on_call::<IDelay::avatarCall>(FOREIGN_MODULE, OTHER_RECOVERER.abi_encode());
    script_delay(&node, vec![OTHER_RECOVERER], None);

    let safe = Safe::connect(signer, SAFE).await.unwrap();
    let recoverers = list_recoverers(&safe).await.unwrap();

    assert_eq!(recoverers.len(), 1);
    assert_eq!(recoverers[0].module, MODULE);
    assert_eq!(recoverers[0].address, OTHER_RECOVERER);
}

#[tokio::test]
async fn test_add_recoverer_through_owned_safe() {
    let node = MockNode::with_chain();
    let signer = node.local_backend();
    node.on_call::<ISafe::getOwnersCall>(SAFE, vec![signer.address()].abi_encode());
    node.on_call::<ISafe::getThresholdCall>(SAFE, U256::from(1).abi_encode());
    node.on_call::<ISafe::getModulesPaginatedCall>(SAFE, (vec![MODULE], SENTINEL).abi_encode_params());
    script_delay(&node, vec![], None);

    let owned = Safe::connect(signer.clone(), SAFE).await.unwrap().into_owned().unwrap();
    let delay = DelayModule::connect(signer, MODULE, SAFE).await.unwrap();

    delay.add_recoverer(&owned, OTHER_RECOVERER).await.unwrap();

    let tx = node.sent_one();
    assert_eq!(tx.to, TxKind::Call(SAFE));
    let exec = ISafe::execTransactionCall::abi_decode(&tx.input).unwrap();
    assert_eq!(exec.to, MODULE);
    let enable = IDelay::enableModuleCall::abi_decode(&exec.data).unwrap();
    assert_eq!(enable.module, OTHER_RECOVERER);
}

#[tokio::test]
async fn test_deploy_delay_module_batches_three_calls() {
    let node = MockNode::with_chain();
    let signer = node.local_backend();
    node.on_call::<ISafe::getOwnersCall>(SAFE, vec![signer.address()].abi_encode());
    node.on_call::<ISafe::getThresholdCall>(SAFE, U256::from(1).abi_encode());
    node.on_call::<ISafe::getModulesPaginatedCall>(SAFE, (Vec::<Address>::new(), SENTINEL).abi_encode_params());
    let owned = Safe::connect(signer, SAFE).await.unwrap().into_owned().unwrap();

    let salt_nonce = U256::from(42);
    let deployment = deploy_delay_module(&owned, OTHER_RECOVERER, COOLDOWN, salt_nonce)
        .await
        .unwrap();

    let addresses = ChainAddresses::default();
    let initializer = encode_delay_setup(SAFE, COOLDOWN);
    let expected_module = compute_module_address(
        addresses.module_proxy_factory,
        addresses.delay_master_copy,
        &initializer,
        salt_nonce,
    );
    assert_eq!(deployment.module, expected_module);

    let exec = ISafe::execTransactionCall::abi_decode(&node.sent_one().input).unwrap();
    assert_eq!(exec.to, addresses.multi_send);
    assert_eq!(exec.operation, 1);

    let expected = [
        Call::typed(
            addresses.module_proxy_factory,
            &IModuleProxyFactory::deployModuleCall {
                masterCopy: addresses.delay_master_copy,
                initializer,
                saltNonce: salt_nonce,
            },
        ),
        Call::typed(SAFE, &ISafe::enableModuleCall { module: expected_module }),
        Call::typed(expected_module, &IDelay::enableModuleCall { module: OTHER_RECOVERER }),
    ];
    let multisend = IMultiSend::multiSendCall::abi_decode(&exec.data).unwrap();
    assert_eq!(multisend.transactions, encode_multisend_data(&expected));
}
