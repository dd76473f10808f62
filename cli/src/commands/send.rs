use alloy::primitives::{Address, Bytes, U256};
use color_eyre::eyre::{eyre, Result};
use safe_wallet::{Operation, Safe, SafeAccess, SigningBackend, UnsignedTransaction};

use crate::cli::SendArgs;
use crate::output::{confirm_prompt, ExecutionOutput};
use crate::wallet::connect_local;

/// Builds the logical transaction; a delegatecall only exists inside a Safe
fn build_transaction(args: &SendArgs) -> Result<UnsignedTransaction> {
    let to: Address = args.to.parse()?;
    let value: U256 = args.value.parse()?;
    let data: Bytes = args.data.parse()?;

    let tx = UnsignedTransaction::call(to, value, data);
    match (args.delegatecall, &args.safe) {
        (false, _) => Ok(tx),
        (true, Some(_)) => Ok(tx.with_operation(Operation::DelegateCall)),
        (true, None) => Err(eyre!("--delegatecall requires --safe")),
    }
}

pub async fn run(args: SendArgs, json: bool) -> Result<()> {
    let tx = build_transaction(&args)?;
    let to = tx.to.unwrap_or_default();
    let value = tx.value;

    let signer = connect_local(&args.rpc, &args.wallet).await?;
    let signer_address = signer.address();

    if !json {
        println!("Signer: {}", signer_address);
        if let Some(safe) = &args.safe {
            println!("Safe: {}", safe);
        }
        println!("To: {}", to);
        if !value.is_zero() {
            println!("Value: {} wei", value);
        }
        println!("Data: {} bytes", tx.data.len());
        println!();
    }

    if !args.no_confirm && !json && !confirm_prompt("Send transaction?") {
        println!("Aborted");
        return Ok(());
    }

    let pending = match &args.safe {
        Some(safe) => {
            let safe_address: Address = safe.parse()?;
            match Safe::connect(signer, safe_address).await?.classify() {
                SafeAccess::Owned(owned) => owned.exec(tx).await?,
                SafeAccess::Watched(_) => {
                    return Err(eyre!(
                        "Signer {} does not own Safe {} with threshold 1",
                        signer_address,
                        safe_address
                    ))
                }
            }
        }
        None => signer.send_transaction(tx).await?,
    };

    if !json {
        println!("Submitted {}, waiting for receipt...", pending.tx_hash());
    }
    let receipt = pending.wait_for_receipt().await?;

    ExecutionOutput::from_receipt(&receipt).print(json);

    Ok(())
}
