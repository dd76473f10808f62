//! EIP-1559 fee and nonce derivation shared by the key-holding backends

use alloy::consensus::TxEip1559;
use alloy::primitives::{Address, TxKind, U256};
use tracing::debug;

use crate::client::RpcClient;
use crate::error::Result;
use crate::types::UnsignedTransaction;
use crate::wire::BlockTag;

/// Priority fee used when the caller gives none: 0.1 gwei
pub const DEFAULT_PRIORITY_FEE: u128 = 100_000_000;

/// Fee caps for one EIP-1559 transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeEstimate {
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
}

/// Computes fee caps from the latest base fee.
///
/// `max_fee_per_gas` is twice the base fee unless that could not be paid
/// for out of `balance` after `value`, in which case it drops to the
/// highest affordable price. The priority fee never exceeds the max fee.
pub fn compute_fees(
    base_fee: u128,
    gas_limit: u64,
    value: U256,
    balance: U256,
    priority_override: Option<u128>,
) -> FeeEstimate {
    let gas = U256::from(gas_limit);
    let naive = U256::from(base_fee).saturating_mul(U256::from(2));

    let max_fee = if naive.saturating_mul(gas).saturating_add(value) > balance && !gas.is_zero() {
        balance.saturating_sub(value) / gas
    } else {
        naive
    };
    let max_fee_per_gas = u128::try_from(max_fee).unwrap_or(u128::MAX);

    let max_priority_fee_per_gas = priority_override
        .unwrap_or(DEFAULT_PRIORITY_FEE)
        .min(max_fee_per_gas);

    FeeEstimate {
        max_fee_per_gas,
        max_priority_fee_per_gas,
    }
}

/// Builds an unsigned EIP-1559 transaction for `from`.
///
/// Nonce (pending), gas limit, base fee, chain id and balance are fetched
/// concurrently; any field the caller already set is used as-is.
pub async fn prepare_eip1559(
    client: &RpcClient,
    from: Address,
    tx: &UnsignedTransaction,
    priority_override: Option<u128>,
) -> Result<TxEip1559> {
    let estimate_tx = tx.clone().with_from(from);

    let (nonce, gas_limit, base_fee, chain_id, balance) = tokio::try_join!(
        async {
            match tx.nonce {
                Some(nonce) => Ok(nonce),
                None => client.get_transaction_count(from, BlockTag::Pending).await,
            }
        },
        async {
            match tx.gas {
                Some(gas) => Ok(gas),
                None => client.estimate_gas(&estimate_tx).await,
            }
        },
        client.get_base_fee(),
        async {
            match tx.chain_id {
                Some(chain_id) => Ok(chain_id),
                None => client.chain_id().await,
            }
        },
        client.get_balance(from, BlockTag::Latest),
    )?;

    let mut fees = compute_fees(
        base_fee,
        gas_limit,
        tx.value,
        balance,
        tx.max_priority_fee_per_gas.or(priority_override),
    );
    if let Some(max_fee) = tx.max_fee_per_gas {
        fees.max_fee_per_gas = max_fee;
        fees.max_priority_fee_per_gas = fees.max_priority_fee_per_gas.min(max_fee);
    }

    debug!(
        %from,
        nonce,
        gas_limit,
        base_fee,
        max_fee_per_gas = fees.max_fee_per_gas,
        "prepared EIP-1559 transaction"
    );

    Ok(TxEip1559 {
        chain_id,
        nonce,
        gas_limit,
        max_fee_per_gas: fees.max_fee_per_gas,
        max_priority_fee_per_gas: fees.max_priority_fee_per_gas,
        to: match tx.to {
            Some(to) => TxKind::Call(to),
            None => TxKind::Create,
        },
        value: tx.value,
        access_list: Default::default(),
        input: tx.data.clone(),
    })
}
