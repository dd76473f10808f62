//! Safe owner and module management E2E tests

use alloy::primitives::{address, Address, TxKind, B256, U256};
use alloy::sol_types::{SolCall, SolValue};
use std::sync::Arc;

use crate::common::MockNode;
use safe_wallet::encoding::encode_multisend_data;
use safe_wallet::signing::encode_pre_validated_signature;
use safe_wallet::{
    Call, ChainAddresses, Error, IMultiSend, ISafe, LocalKeyBackend, Safe, SafeAccess, SigningBackend, UnsignedTransaction,
    SENTINEL,
};

const SAFE: Address = address!("5afe00000000000000000000000000000000cafe");
const OWNER_A: Address = address!("000000000000000000000000000000000000000a");
const OWNER_B: Address = address!("000000000000000000000000000000000000000b");
const STRANGER: Address = address!("000000000000000000000000000000000000000d");
const MODULE: Address = address!("00000000000000000000000000000000000d1a70");
const TOKEN: Address = address!("0000000000000000000000000000000000000070");

/// Scripts a Safe with the given owners, threshold and a single module page
fn script_safe(node: &Arc<MockNode>, owners: Vec<Address>, threshold: u64, modules: Vec<Address>) {
    node.on_call::<ISafe::getOwnersCall>(SAFE, owners.abi_encode());
    node.on_call::<ISafe::getThresholdCall>(SAFE, U256::from(threshold).abi_encode());
    node.on_call::<ISafe::getModulesPaginatedCall>(SAFE, (modules, SENTINEL).abi_encode_params());
}

async fn owned_safe(node: &Arc<MockNode>, extra_owners: &[Address]) -> safe_wallet::OwnedSafe<LocalKeyBackend> {
    let signer = node.local_backend();
    let mut owners = extra_owners.to_vec();
    owners.push(signer.address());
    script_safe(node, owners, 1, vec![MODULE]);

    Safe::connect(signer, SAFE)
        .await
        .expect("Failed to connect Safe")
        .into_owned()
        .expect("Signer should own the Safe")
}

/// Decodes the `execTransaction` call the signer broadcast to the Safe
fn sent_exec(node: &MockNode) -> ISafe::execTransactionCall {
    let tx = node.sent_one();
    assert_eq!(tx.to, TxKind::Call(SAFE), "outer transaction must target the Safe");
    assert_eq!(tx.value, U256::ZERO, "outer transaction carries no value");
    ISafe::execTransactionCall::abi_decode(&tx.input).expect("execTransaction calldata")
}

#[tokio::test]
async fn test_connect_classifies_owned_safe() {
    let node = MockNode::with_chain();
    let signer = node.local_backend();
    script_safe(&node, vec![OWNER_A, signer.address()], 1, vec![MODULE]);

    let safe = Safe::connect(signer, SAFE).await.unwrap();

    assert_eq!(safe.state().owners.len(), 2);
    assert_eq!(safe.state().threshold, 1);
    assert_eq!(safe.state().modules, vec![MODULE]);
    assert!(safe.is_owned());
    assert!(matches!(safe.classify(), SafeAccess::Owned(_)));
}

#[tokio::test]
async fn test_connect_watches_multisig() {
    let node = MockNode::with_chain();
    let signer = node.local_backend();
    let me = signer.address();
    script_safe(&node, vec![OWNER_A, me], 2, vec![]);

    let safe = Safe::connect(signer, SAFE).await.unwrap();
    assert!(!safe.is_owned());

    match safe.into_owned() {
        Err(Error::NotOwned { signer, safe }) => {
            assert_eq!(signer, me);
            assert_eq!(safe, SAFE);
        }
        other => panic!("expected NotOwned, got {other:?}"),
    }
}

#[tokio::test]
async fn test_connect_rejects_empty_owner_list() {
    let node = MockNode::with_chain();
    script_safe(&node, vec![], 1, vec![]);

    let result = Safe::connect(node.local_backend(), SAFE).await;
    assert!(matches!(result, Err(Error::InvalidSafe(addr)) if addr == SAFE));
}

#[tokio::test]
async fn test_connect_rejects_non_safe() {
    // Nothing scripted: every probe reverts
    let node = MockNode::with_chain();

    let result = Safe::connect(node.local_backend(), SAFE).await;
    assert!(matches!(result, Err(Error::InvalidSafe(_))));
}

#[tokio::test]
async fn test_modules_follow_pagination() {
    let node = MockNode::with_chain();
    let signer = node.local_backend();
    let first = address!("00000000000000000000000000000000000000f1");
    let second = address!("00000000000000000000000000000000000000f2");
    let third = address!("00000000000000000000000000000000000000f3");

    node.on_call::<ISafe::getOwnersCall>(SAFE, vec![signer.address()].abi_encode());
    node.on_call::<ISafe::getThresholdCall>(SAFE, U256::from(1).abi_encode());
    node.on_call_with::<ISafe::getModulesPaginatedCall>(SAFE, move |call| {
        if call.start == SENTINEL {
            (vec![first, second], second).abi_encode_params()
        } else {
            assert_eq!(call.start, second, "next page starts at the returned cursor");
            (vec![third], SENTINEL).abi_encode_params()
        }
    });

    let safe = Safe::connect(signer, SAFE).await.unwrap();
    assert_eq!(safe.state().modules, vec![first, second, third]);
}

#[tokio::test]
async fn test_remove_owner_uses_predecessor() {
    let node = MockNode::with_chain();
    let safe = owned_safe(&node, &[OWNER_A, OWNER_B]).await;
    let me = safe.safe().signer().address();

    safe.remove_owner(OWNER_B).await.unwrap();

    let exec = sent_exec(&node);
    assert_eq!(exec.to, SAFE, "owner management is a self-call");
    assert_eq!(exec.operation, 0);
    assert_eq!(exec.signatures, encode_pre_validated_signature(me));

    let remove = ISafe::removeOwnerCall::abi_decode(&exec.data).unwrap();
    assert_eq!(remove.prevOwner, OWNER_A);
    assert_eq!(remove.owner, OWNER_B);
    assert_eq!(remove._threshold, U256::from(1));
}

#[tokio::test]
async fn test_remove_head_owner_points_at_sentinel() {
    let node = MockNode::with_chain();
    let safe = owned_safe(&node, &[OWNER_A, OWNER_B]).await;

    safe.remove_owner(OWNER_A).await.unwrap();

    let remove = ISafe::removeOwnerCall::abi_decode(&sent_exec(&node).data).unwrap();
    assert_eq!(remove.prevOwner, SENTINEL);
}

#[tokio::test]
async fn test_remove_unknown_owner_sends_nothing() {
    let node = MockNode::with_chain();
    let safe = owned_safe(&node, &[OWNER_A, OWNER_B]).await;

    let result = safe.remove_owner(STRANGER).await;

    assert!(matches!(
        result,
        Err(Error::NotFound { what: "owner", address }) if address == STRANGER
    ));
    assert_eq!(node.count("eth_sendRawTransaction"), 0);
}

#[tokio::test]
async fn test_add_owner_keeps_threshold_one() {
    let node = MockNode::with_chain();
    let safe = owned_safe(&node, &[]).await;

    safe.add_owner(OWNER_B).await.unwrap();

    let add = ISafe::addOwnerWithThresholdCall::abi_decode(&sent_exec(&node).data).unwrap();
    assert_eq!(add.owner, OWNER_B);
    assert_eq!(add._threshold, U256::from(1));
}

#[tokio::test]
async fn test_disable_module_uses_predecessor() {
    let node = MockNode::with_chain();
    let safe = owned_safe(&node, &[]).await;

    safe.disable_module(MODULE).await.unwrap();

    let disable = ISafe::disableModuleCall::abi_decode(&sent_exec(&node).data).unwrap();
    assert_eq!(disable.prevModule, SENTINEL);
    assert_eq!(disable.module, MODULE);
}

#[tokio::test]
async fn test_disable_unknown_module() {
    let node = MockNode::with_chain();
    let safe = owned_safe(&node, &[]).await;

    let result = safe.disable_module(STRANGER).await;
    assert!(matches!(result, Err(Error::NotFound { what: "module", .. })));
}

#[tokio::test]
async fn test_batch_routes_through_multisend() {
    let node = MockNode::with_chain();
    let safe = owned_safe(&node, &[]).await;

    let transfer = Call::new(OWNER_A, U256::from(1_000), Vec::new());
    let approve = Call::typed(
        TOKEN,
        &safe_wallet::IERC20::approveCall {
            spender: OWNER_B,
            amount: U256::MAX,
        },
    );

    safe.batch()
        .add(transfer.clone())
        .add(approve.clone())
        .execute()
        .await
        .unwrap();

    let exec = sent_exec(&node);
    assert_eq!(exec.to, ChainAddresses::default().multi_send);
    assert_eq!(exec.operation, 1, "MultiSend must be delegatecalled");
    assert_eq!(exec.value, U256::ZERO);

    let multisend = IMultiSend::multiSendCall::abi_decode(&exec.data).unwrap();
    assert_eq!(multisend.transactions, encode_multisend_data(&[transfer, approve]));
}

#[tokio::test]
async fn test_single_call_batch_executes_directly() {
    let node = MockNode::with_chain();
    let safe = owned_safe(&node, &[]).await;

    safe.batch()
        .add_raw(OWNER_A, U256::from(42), vec![0xde, 0xad])
        .execute()
        .await
        .unwrap();

    let exec = sent_exec(&node);
    assert_eq!(exec.to, OWNER_A);
    assert_eq!(exec.value, U256::from(42));
    assert_eq!(exec.data.as_ref(), &[0xde, 0xad]);
    assert_eq!(exec.operation, 0);
}

#[tokio::test]
async fn test_empty_batch_is_rejected() {
    let node = MockNode::with_chain();
    let safe = owned_safe(&node, &[]).await;

    assert!(matches!(safe.batch().execute().await, Err(Error::NoCalls)));
    assert_eq!(node.count("eth_sendRawTransaction"), 0);
}

#[tokio::test]
async fn test_exec_forwards_value_to_target() {
    let node = MockNode::with_chain();
    let safe = owned_safe(&node, &[]).await;

    let pending = safe
        .exec(UnsignedTransaction::call(OWNER_B, U256::from(7), Vec::new()))
        .await
        .unwrap();

    let exec = sent_exec(&node);
    assert_eq!(exec.to, OWNER_B);
    assert_eq!(exec.value, U256::from(7));
    assert_ne!(pending.tx_hash(), B256::ZERO);
}
