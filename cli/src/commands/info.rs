use alloy::primitives::Address;
use color_eyre::eyre::Result;
use safe_wallet::recovery::list_recoverers;
use safe_wallet::{Network, Safe, SigningBackend};

use crate::cli::InfoArgs;
use crate::output::SafeInfoOutput;
use crate::wallet::connect_readonly;

pub async fn run(args: InfoArgs, json: bool) -> Result<()> {
    let backend = connect_readonly(&args.rpc).await?;
    let safe_address: Address = args.safe.parse()?;
    let chain_id = backend.client().chain_id().await?;
    let network = Network::from_chain_id(chain_id);
    if network.is_none() {
        tracing::warn!(chain_id, "no canonical Safe deployments known for this chain");
    }

    let safe = Safe::connect(backend, safe_address).await?;
    let nonce = safe.nonce().await?;
    let recoverers = list_recoverers(&safe).await?;

    let state = safe.state();
    let output = SafeInfoOutput {
        address: safe_address,
        chain_id,
        network: network.map(|n| n.name),
        nonce,
        threshold: state.threshold,
        owners: state.owners.clone(),
        modules: state.modules.clone(),
        recoverers: recoverers.into_iter().map(Into::into).collect(),
    };

    output.print(json);

    Ok(())
}
