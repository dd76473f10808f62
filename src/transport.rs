//! JSON-RPC transports
//!
//! A [`Transport`] moves one request envelope to a node and returns the
//! response envelope. Error responses are returned as envelopes, not as
//! `Err`; only failures to obtain a well-formed envelope are errors.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::backend::ReadOnlyBackend;
use crate::client::{ClientConfig, RpcClient};
use crate::error::{Error, Result};
use crate::wire::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};

/// Moves JSON-RPC envelopes to a node
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &JsonRpcRequest) -> Result<JsonRpcResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: &JsonRpcRequest) -> Result<JsonRpcResponse> {
        (**self).send(request).await
    }
}

/// JSON-RPC over HTTP POST
#[derive(Debug, Clone)]
pub struct HttpTransport {
    url: Url,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }

    /// Uses a preconfigured HTTP client (proxies, headers, timeouts)
    pub fn with_client(url: Url, client: reqwest::Client) -> Self {
        Self { url, client }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &JsonRpcRequest) -> Result<JsonRpcResponse> {
        let response = self
            .client
            .post(self.url.clone())
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Transport(format!("HTTP {}: {}", status, text)));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body)
            .map_err(|e| Error::Transport(format!("invalid JSON-RPC response: {}", e)))
    }
}

/// An externally supplied EIP-1193 provider (browser extension, embedded wallet)
#[async_trait]
pub trait Eip1193Provider: Send + Sync {
    async fn request(&self, method: &str, params: Value) -> std::result::Result<Value, JsonRpcError>;
}

/// Adapts an [`Eip1193Provider`] to the envelope-level [`Transport`]
#[derive(Clone)]
pub struct InjectedTransport {
    provider: Arc<dyn Eip1193Provider>,
}

impl InjectedTransport {
    pub fn new(provider: Arc<dyn Eip1193Provider>) -> Self {
        Self { provider }
    }
}

impl fmt::Debug for InjectedTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectedTransport").finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for InjectedTransport {
    async fn send(&self, request: &JsonRpcRequest) -> Result<JsonRpcResponse> {
        let response = match self
            .provider
            .request(&request.method, request.params.clone())
            .await
        {
            Ok(result) => JsonRpcResponse::success(request.id, result),
            Err(err) => JsonRpcResponse::failure(request.id, err),
        };
        Ok(response)
    }
}

/// Returns a read-only backend for the first candidate that answers a
/// liveness probe, or the last probe error when none does.
pub async fn choose_endpoint(candidates: &[Url], config: ClientConfig) -> Result<ReadOnlyBackend> {
    let mut last_err = Error::Transport("no RPC endpoints configured".to_string());

    for url in candidates {
        let client = RpcClient::with_config(HttpTransport::new(url.clone()), config.clone());
        match ReadOnlyBackend::connect(client).await {
            Ok(backend) => {
                debug!(%url, "selected RPC endpoint");
                return Ok(backend);
            }
            Err(e) => {
                warn!(%url, error = %e, "RPC endpoint failed liveness probe");
                last_err = e;
            }
        }
    }

    Err(last_err)
}
