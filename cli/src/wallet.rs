use std::time::Duration;

use alloy::signers::local::PrivateKeySigner;
use color_eyre::eyre::{eyre, Result};
use safe_wallet::{choose_endpoint, ClientConfig, LocalKeyBackend, ReadOnlyBackend, RpcClient, SigningBackend};
use tracing::debug;
use url::Url;

use crate::cli::{RpcArgs, WalletArgs};

pub fn create_signer(args: &WalletArgs) -> Result<PrivateKeySigner> {
    // Priority: interactive > private_key
    if args.interactive {
        let key = rpassword::prompt_password("Enter private key: ")?;
        parse_private_key(&key)
    } else if let Some(private_key) = &args.private_key {
        parse_private_key(private_key)
    } else {
        Err(eyre!("No wallet specified. Use --private-key or --interactive"))
    }
}

fn parse_private_key(key: &str) -> Result<PrivateKeySigner> {
    let key = key.trim();
    let key = key.strip_prefix("0x").unwrap_or(key);

    key.parse::<PrivateKeySigner>()
        .map_err(|e| eyre!("Invalid private key: {}", e))
}

fn client_config(args: &RpcArgs) -> ClientConfig {
    let config = ClientConfig::default();
    match args.receipt_timeout {
        Some(secs) => config.with_receipt_timeout(Duration::from_secs(secs)),
        None => config,
    }
}

/// Picks the first endpoint that answers
pub async fn connect_readonly(args: &RpcArgs) -> Result<ReadOnlyBackend> {
    let urls = args
        .rpc_urls
        .iter()
        .map(|u| u.parse::<Url>())
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(choose_endpoint(&urls, client_config(args)).await?)
}

/// Local-key backend on the first live endpoint
pub async fn connect_local(rpc: &RpcArgs, wallet: &WalletArgs) -> Result<LocalKeyBackend> {
    let signer = create_signer(wallet)?;
    debug!(signer = %signer.address(), "loaded local key");
    let readonly = connect_readonly(rpc).await?;
    let client: RpcClient = readonly.client().clone();
    Ok(LocalKeyBackend::new(signer, client))
}
