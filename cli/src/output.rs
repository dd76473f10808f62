use alloy::primitives::{Address, TxHash, U256};
use safe_wallet::recovery::Recoverer;
use safe_wallet::{RecoveryStatus, TransactionReceipt};
use serde::Serialize;

#[derive(Serialize)]
pub struct SafeInfoOutput {
    pub address: Address,
    pub chain_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<&'static str>,
    pub nonce: U256,
    pub threshold: u64,
    pub owners: Vec<Address>,
    pub modules: Vec<Address>,
    pub recoverers: Vec<RecovererOutput>,
}

#[derive(Serialize)]
pub struct RecovererOutput {
    pub module: Address,
    pub recoverer: Address,
}

impl From<Recoverer> for RecovererOutput {
    fn from(r: Recoverer) -> Self {
        Self {
            module: r.module,
            recoverer: r.address,
        }
    }
}

impl SafeInfoOutput {
    pub fn print(&self, json: bool) {
        if json {
            println!("{}", serde_json::to_string_pretty(self).unwrap());
        } else {
            println!("Safe: {}", self.address);
            println!("Chain: {} ({})", self.chain_id, self.network.unwrap_or("unknown"));
            println!("Nonce: {}", self.nonce);
            println!("Threshold: {}", self.threshold);
            println!("Owners:");
            for (i, owner) in self.owners.iter().enumerate() {
                println!("  {}: {}", i + 1, owner);
            }
            println!("Modules:");
            for (i, module) in self.modules.iter().enumerate() {
                println!("  {}: {}", i + 1, module);
            }
            if !self.recoverers.is_empty() {
                println!("Recoverers:");
                for r in &self.recoverers {
                    println!("  {} (via {})", r.recoverer, r.module);
                }
            }
        }
    }
}

#[derive(Serialize)]
pub struct RecoveryStatusOutput {
    pub module: Address,
    pub safe: Address,
    pub cooldown: u64,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queued_at: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<u64>,
}

impl RecoveryStatusOutput {
    pub fn new(module: Address, safe: Address, cooldown: u64, status: RecoveryStatus) -> Self {
        let (label, queued_at, remaining) = match status {
            RecoveryStatus::NoQueuedTransaction => ("none", None, None),
            RecoveryStatus::Queued { queued_at, remaining } => ("queued", Some(queued_at), Some(remaining)),
            RecoveryStatus::Ready { queued_at } => ("ready", Some(queued_at), Some(0)),
        };
        Self {
            module,
            safe,
            cooldown,
            status: label,
            queued_at,
            remaining,
        }
    }

    pub fn print(&self, json: bool) {
        if json {
            println!("{}", serde_json::to_string_pretty(self).unwrap());
        } else {
            println!("Delay module: {}", self.module);
            println!("  Safe: {}", self.safe);
            println!("  Cooldown: {}s", self.cooldown);
            println!("  Status: {}", self.status);
            if let Some(queued_at) = self.queued_at {
                println!("  Queued At: {}", queued_at);
            }
            if let Some(remaining) = self.remaining {
                println!("  Remaining: {}s", remaining);
            }
        }
    }
}

#[derive(Serialize)]
pub struct ExecutionOutput {
    pub tx_hash: TxHash,
    pub success: bool,
    pub gas_used: u64,
    pub block_number: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<Address>,
}

impl ExecutionOutput {
    pub fn from_receipt(receipt: &TransactionReceipt) -> Self {
        Self {
            tx_hash: receipt.transaction_hash,
            success: receipt.is_success(),
            gas_used: receipt.gas_used,
            block_number: receipt.block_number,
            module: None,
        }
    }

    pub fn print(&self, json: bool) {
        if json {
            println!("{}", serde_json::to_string_pretty(self).unwrap());
        } else {
            println!("Transaction Executed:");
            println!("  Tx Hash: {}", self.tx_hash);
            println!("  Success: {}", self.success);
            println!("  Gas Used: {}", self.gas_used);
            println!("  Block: {}", self.block_number);
            if let Some(module) = self.module {
                println!("  Module: {}", module);
            }
        }
    }
}

pub fn confirm_prompt(message: &str) -> bool {
    use dialoguer::Confirm;

    Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .unwrap_or(false)
}
