//! JSON-RPC client E2E tests: receipts, reverts and endpoint probing

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{address, B256, U256};
use serde_json::{json, Value};

use crate::common::{receipt_json, MockNode};
use safe_wallet::wire::{JsonRpcError, RevertReason};
use safe_wallet::{ClientConfig, Error, ISafe, PendingTransaction, RpcClient, UnsignedTransaction};

const SAFE: alloy::primitives::Address = address!("5afe00000000000000000000000000000000cafe");

fn error_string(msg: &str) -> String {
    let mut body = vec![0u8; 64];
    body[31] = 0x20;
    body[63] = msg.len() as u8;
    let mut padded = msg.as_bytes().to_vec();
    padded.resize(msg.len().div_ceil(32) * 32, 0);
    body.extend_from_slice(&padded);
    format!("0x08c379a0{}", alloy::hex::encode(body))
}

#[tokio::test(start_paused = true)]
async fn test_receipt_polling_until_mined() {
    let node = MockNode::new();
    let tx_hash = B256::repeat_byte(0x42);
    let polls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&polls);
    node.on_with("eth_getTransactionReceipt", move |_| {
        if counter.fetch_add(1, Ordering::SeqCst) < 2 {
            Ok(Value::Null)
        } else {
            Ok(receipt_json(tx_hash, true))
        }
    });

    let client = RpcClient::with_config(
        Arc::clone(&node),
        ClientConfig::default().with_poll_interval(Duration::from_secs(2)),
    );
    let receipt = PendingTransaction::new(tx_hash, client)
        .wait_for_receipt()
        .await
        .unwrap();

    assert!(receipt.is_success());
    assert_eq!(receipt.transaction_hash, tx_hash);
    assert_eq!(polls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn test_default_config_polls_every_second_without_bound() {
    let config = ClientConfig::default();
    assert_eq!(config.poll_interval, Duration::from_secs(1));
    assert!(config.receipt_timeout.is_none());

    let node = MockNode::new();
    let tx_hash = B256::repeat_byte(0x33);
    let polls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&polls);
    node.on_with("eth_getTransactionReceipt", move |_| {
        if counter.fetch_add(1, Ordering::SeqCst) < 120 {
            Ok(Value::Null)
        } else {
            Ok(receipt_json(tx_hash, true))
        }
    });

    let start = tokio::time::Instant::now();
    let receipt = node.client().wait_for_receipt(tx_hash).await.unwrap();

    assert!(receipt.is_success());
    assert_eq!(polls.load(Ordering::SeqCst), 121);
    assert_eq!(start.elapsed(), Duration::from_secs(120));
}

#[tokio::test(start_paused = true)]
async fn test_receipt_timeout_is_reported() {
    let node = MockNode::new();
    node.on("eth_getTransactionReceipt", Value::Null);

    let client = RpcClient::with_config(
        Arc::clone(&node),
        ClientConfig::default()
            .with_poll_interval(Duration::from_secs(1))
            .with_receipt_timeout(Duration::from_secs(5)),
    );
    let tx_hash = B256::repeat_byte(0x01);

    assert!(matches!(
        client.wait_for_receipt(tx_hash).await,
        Err(Error::ReceiptTimeout(hash)) if hash == tx_hash
    ));
    assert!(node.count("eth_getTransactionReceipt") >= 5);
}

#[tokio::test]
async fn test_failed_receipt_is_returned() {
    let node = MockNode::new();
    let tx_hash = B256::repeat_byte(0x07);
    node.on("eth_getTransactionReceipt", receipt_json(tx_hash, false));

    let receipt = node.client().wait_for_receipt(tx_hash).await.unwrap();
    assert!(!receipt.is_success());
}

#[tokio::test]
async fn test_revert_reason_is_decoded() {
    let node = MockNode::new();
    let data = error_string("GS013");
    node.revert_call::<ISafe::nonceCall>(
        SAFE,
        JsonRpcError {
            code: 3,
            message: "execution reverted".to_string(),
            data: Some(json!(data)),
        },
    );

    let result = node.client().read(SAFE, &ISafe::nonceCall {}).await;

    match result {
        Err(Error::Revert { code, reason }) => {
            assert_eq!(code, 3);
            assert_eq!(reason, RevertReason::Message("GS013".to_string()));
        }
        other => panic!("expected a revert, got {other:?}"),
    }
}

#[tokio::test]
async fn test_typed_reads_decode_quantities() {
    let node = MockNode::with_chain();
    let client = node.client();

    assert_eq!(client.block_number().await.unwrap(), 16);
    assert_eq!(client.chain_id().await.unwrap(), 1);
    assert_eq!(client.get_base_fee().await.unwrap(), crate::common::BASE_FEE);
    assert_eq!(
        client.latest_timestamp().await.unwrap(),
        crate::common::BLOCK_TIMESTAMP
    );
}

#[tokio::test]
async fn test_malformed_quantity_is_rejected() {
    let node = MockNode::new();
    node.on("eth_blockNumber", json!("0x"));

    assert!(matches!(
        node.client().block_number().await,
        Err(Error::WireValidation { .. })
    ));
}

#[tokio::test]
async fn test_default_sender_fills_call() {
    let node = MockNode::new();
    node.on("eth_estimateGas", json!("0x5208"));
    let sender = address!("1111111111111111111111111111111111111111");
    let client = node.client().with_default_from(sender);

    client
        .estimate_gas(&UnsignedTransaction::call(SAFE, U256::ZERO, Vec::new()))
        .await
        .unwrap();

    let params = &node.requests("eth_estimateGas")[0][0];
    assert_eq!(params["from"], json!("0x1111111111111111111111111111111111111111"));
    assert_eq!(params["to"], json!("0x5afe00000000000000000000000000000000cafe"));
}
