//! Persisted address books and token metadata
//!
//! Both are plain values handed to whoever needs them; nothing here is
//! process-global.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use alloy::primitives::utils::{format_units, parse_units, ParseUnits};
use alloy::primitives::{address, Address, U256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::client::RpcClient;
use crate::contracts::IERC20;
use crate::error::{Error, Result};
use crate::wallet::WalletKind;

type AddressBook = BTreeMap<WalletKind, Vec<Address>>;

/// Address lists keyed by wallet kind
#[async_trait]
pub trait AddressBookStore: Send + Sync {
    async fn get(&self, kind: WalletKind) -> Result<Vec<Address>>;

    async fn set(&self, kind: WalletKind, addresses: Vec<Address>) -> Result<()>;

    async fn remove(&self, kind: WalletKind) -> Result<()>;

    /// Appends `address` unless already present
    async fn add(&self, kind: WalletKind, address: Address) -> Result<()> {
        let mut addresses = self.get(kind).await?;
        if !addresses.contains(&address) {
            addresses.push(address);
            self.set(kind, addresses).await?;
        }
        Ok(())
    }
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    book: Mutex<AddressBook>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AddressBookStore for MemoryStore {
    async fn get(&self, kind: WalletKind) -> Result<Vec<Address>> {
        Ok(self.book.lock().await.get(&kind).cloned().unwrap_or_default())
    }

    async fn set(&self, kind: WalletKind, addresses: Vec<Address>) -> Result<()> {
        self.book.lock().await.insert(kind, addresses);
        Ok(())
    }

    async fn remove(&self, kind: WalletKind) -> Result<()> {
        self.book.lock().await.remove(&kind);
        Ok(())
    }
}

/// Store persisted as one JSON object per file
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<AddressBook> {
        match tokio::fs::read(&self.path).await {
            Ok(raw) => serde_json::from_slice(&raw)
                .map_err(|e| Error::Store(format!("{}: {}", self.path.display(), e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AddressBook::new()),
            Err(e) => Err(Error::Store(format!("{}: {}", self.path.display(), e))),
        }
    }

    async fn save(&self, book: &AddressBook) -> Result<()> {
        let raw = serde_json::to_vec_pretty(book).map_err(|e| Error::Store(e.to_string()))?;
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|e| Error::Store(format!("{}: {}", self.path.display(), e)))?;
        debug!(path = %self.path.display(), "saved address book");
        Ok(())
    }
}

#[async_trait]
impl AddressBookStore for JsonFileStore {
    async fn get(&self, kind: WalletKind) -> Result<Vec<Address>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(&kind).unwrap_or_default())
    }

    async fn set(&self, kind: WalletKind, addresses: Vec<Address>) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut book = self.load().await?;
        book.insert(kind, addresses);
        self.save(&book).await
    }

    async fn remove(&self, kind: WalletKind) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut book = self.load().await?;
        if book.remove(&kind).is_some() {
            self.save(&book).await?;
        }
        Ok(())
    }
}

/// ERC-20 metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub symbol: String,
    pub address: Address,
    pub decimals: u8,
}

impl Token {
    pub fn new(symbol: impl Into<String>, address: Address, decimals: u8) -> Self {
        Self {
            symbol: symbol.into(),
            address,
            decimals,
        }
    }

    /// Reads symbol and decimals from the token contract
    pub async fn fetch(client: &RpcClient, address: Address) -> Result<Self> {
        let (symbol, decimals) = tokio::try_join!(
            client.read(address, &IERC20::symbolCall {}),
            client.read(address, &IERC20::decimalsCall {}),
        )?;
        Ok(Self::new(symbol, address, decimals))
    }

    /// Formats a raw amount in whole-token units
    pub fn format_amount(&self, amount: U256) -> Result<String> {
        format_units(amount, self.decimals).map_err(|e| Error::Abi(e.to_string()))
    }

    /// Parses a non-negative decimal amount into raw units
    pub fn parse_amount(&self, amount: &str) -> Result<U256> {
        match parse_units(amount, self.decimals).map_err(|e| Error::Abi(e.to_string()))? {
            ParseUnits::U256(raw) => Ok(raw),
            ParseUnits::I256(raw) if raw.is_negative() => {
                Err(Error::Abi(format!("negative {} amount: {amount}", self.symbol)))
            }
            ParseUnits::I256(raw) => Ok(raw.into_raw()),
        }
    }
}

/// Symbol ↔ address ↔ decimals lookup
#[derive(Debug, Clone, Default)]
pub struct TokenRegistry {
    tokens: Vec<Token>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// WETH, USDC and DAI on Ethereum mainnet
    pub fn mainnet() -> Self {
        let mut registry = Self::new();
        registry.insert(Token::new("WETH", address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"), 18));
        registry.insert(Token::new("USDC", address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"), 6));
        registry.insert(Token::new("DAI", address!("6B175474E89094C44Da98b954EedeAC495271d0F"), 18));
        registry
    }

    /// Adds a token, replacing any entry with the same address
    pub fn insert(&mut self, token: Token) {
        self.tokens.retain(|t| t.address != token.address);
        self.tokens.push(token);
    }

    /// Case-insensitive symbol lookup
    pub fn by_symbol(&self, symbol: &str) -> Option<&Token> {
        self.tokens.iter().find(|t| t.symbol.eq_ignore_ascii_case(symbol))
    }

    pub fn by_address(&self, address: Address) -> Option<&Token> {
        self.tokens.iter().find(|t| t.address == address)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}
