use alloy::primitives::{Address, U256};
use color_eyre::eyre::Result;
use safe_wallet::recovery::deploy_delay_module;
use safe_wallet::{DelayModule, PendingTransaction, Safe, SigningBackend};

use crate::cli::{DeployArgs, ModuleArgs, RecoveryArgs};
use crate::output::{confirm_prompt, ExecutionOutput, RecoveryStatusOutput};
use crate::wallet::{connect_local, connect_readonly};

fn parse_module_args(args: &ModuleArgs) -> Result<(Address, Address)> {
    Ok((args.module.parse()?, args.safe.parse()?))
}

async fn finish(pending: PendingTransaction, module: Option<Address>, json: bool) -> Result<()> {
    if !json {
        println!("Submitted {}, waiting for receipt...", pending.tx_hash());
    }
    let receipt = pending.wait_for_receipt().await?;

    let mut output = ExecutionOutput::from_receipt(&receipt);
    output.module = module;
    output.print(json);
    Ok(())
}

pub async fn status(args: ModuleArgs, json: bool) -> Result<()> {
    let (module, safe) = parse_module_args(&args)?;
    let backend = connect_readonly(&args.rpc).await?;

    let delay = DelayModule::connect(backend, module, safe).await?;
    let (state, now) = tokio::try_join!(delay.state(), delay.signer().client().latest_timestamp())?;

    RecoveryStatusOutput::new(module, safe, state.cooldown, state.status(now)).print(json);
    Ok(())
}

pub async fn queue(args: RecoveryArgs, json: bool) -> Result<()> {
    let (module, safe) = parse_module_args(&args.module)?;
    let signer = connect_local(&args.module.rpc, &args.wallet).await?;
    let delay = DelayModule::connect(signer, module, safe).await?;

    if !args.no_confirm && !json && !confirm_prompt(&format!("Queue recovery of Safe {}?", safe)) {
        println!("Aborted");
        return Ok(());
    }

    finish(delay.queue_recovery().await?, None, json).await
}

pub async fn execute(args: RecoveryArgs, json: bool) -> Result<()> {
    let (module, safe) = parse_module_args(&args.module)?;
    let signer = connect_local(&args.module.rpc, &args.wallet).await?;
    let delay = DelayModule::connect(signer, module, safe).await?;

    if !args.no_confirm && !json && !confirm_prompt(&format!("Execute recovery of Safe {}?", safe)) {
        println!("Aborted");
        return Ok(());
    }

    finish(delay.execute_recovery().await?, None, json).await
}

pub async fn deploy(args: DeployArgs, json: bool) -> Result<()> {
    let safe_address: Address = args.safe.parse()?;
    let recoverer: Address = args.recoverer.parse()?;
    let salt_nonce: U256 = args.salt_nonce.parse()?;

    let signer = connect_local(&args.rpc, &args.wallet).await?;
    let owned = Safe::connect(signer, safe_address).await?.into_owned()?;

    if !args.no_confirm
        && !json
        && !confirm_prompt(&format!(
            "Deploy a Delay module ({}s cooldown) for Safe {} with recoverer {}?",
            args.cooldown, safe_address, recoverer
        ))
    {
        println!("Aborted");
        return Ok(());
    }

    let deployment = deploy_delay_module(&owned, recoverer, args.cooldown, salt_nonce).await?;
    finish(deployment.pending, Some(deployment.module), json).await
}
