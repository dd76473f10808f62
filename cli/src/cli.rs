use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "safe-wallet")]
#[command(about = "Manage 1/1 Safes and their Delay-module recovery", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send a transaction from the signer, optionally through a Safe
    Send(SendArgs),

    /// Display Safe information (owners, threshold, modules, recovery)
    Info(InfoArgs),

    /// Inspect and drive Delay-module recovery
    Recovery {
        #[command(subcommand)]
        command: RecoveryCommands,
    },
}

#[derive(Subcommand)]
pub enum RecoveryCommands {
    /// Show the timelock state of a Delay module
    Status(ModuleArgs),

    /// Queue "make me the sole owner" as a registered recoverer
    Queue(RecoveryArgs),

    /// Execute the queued recovery once the cooldown has elapsed
    Execute(RecoveryArgs),

    /// Deploy and enable a Delay module with one recoverer
    Deploy(DeployArgs),
}

#[derive(Parser, Clone)]
pub struct SendArgs {
    /// Target address
    #[arg(value_name = "TO")]
    pub to: String,

    /// Calldata as hex
    #[arg(long, default_value = "0x")]
    pub data: String,

    /// ETH value to send (in wei)
    #[arg(long, default_value = "0")]
    pub value: String,

    /// Execute through this Safe instead of sending directly
    #[arg(long, env = "SAFE_ADDRESS")]
    pub safe: Option<String>,

    /// Execute the Safe transaction as a delegatecall
    #[arg(long, requires = "safe")]
    pub delegatecall: bool,

    /// Skip confirmation prompt
    #[arg(long)]
    pub no_confirm: bool,

    #[command(flatten)]
    pub rpc: RpcArgs,

    #[command(flatten)]
    pub wallet: WalletArgs,
}

#[derive(Parser, Clone)]
pub struct InfoArgs {
    /// Safe contract address
    #[arg(long, env = "SAFE_ADDRESS")]
    pub safe: String,

    #[command(flatten)]
    pub rpc: RpcArgs,
}

#[derive(Parser, Clone)]
pub struct ModuleArgs {
    /// Safe guarded by the module
    #[arg(long, env = "SAFE_ADDRESS")]
    pub safe: String,

    /// Delay module address
    #[arg(long)]
    pub module: String,

    #[command(flatten)]
    pub rpc: RpcArgs,
}

#[derive(Parser, Clone)]
pub struct RecoveryArgs {
    #[command(flatten)]
    pub module: ModuleArgs,

    /// Skip confirmation prompt
    #[arg(long)]
    pub no_confirm: bool,

    #[command(flatten)]
    pub wallet: WalletArgs,
}

#[derive(Parser, Clone)]
pub struct DeployArgs {
    /// Safe to protect (the signer must own it with threshold 1)
    #[arg(long, env = "SAFE_ADDRESS")]
    pub safe: String,

    /// Address allowed to queue a recovery
    #[arg(long)]
    pub recoverer: String,

    /// Seconds between queuing and executing a recovery
    #[arg(long, default_value = "86400")]
    pub cooldown: u64,

    /// Salt nonce for the module proxy address
    #[arg(long, default_value = "0")]
    pub salt_nonce: String,

    /// Skip confirmation prompt
    #[arg(long)]
    pub no_confirm: bool,

    #[command(flatten)]
    pub rpc: RpcArgs,

    #[command(flatten)]
    pub wallet: WalletArgs,
}

#[derive(Parser, Clone)]
pub struct RpcArgs {
    /// RPC endpoint URL (repeatable; the first live one is used)
    #[arg(long = "rpc-url", env = "ETH_RPC_URL", value_delimiter = ',', required = true)]
    pub rpc_urls: Vec<String>,

    /// Give up waiting for a receipt after this many seconds
    #[arg(long)]
    pub receipt_timeout: Option<u64>,
}

#[derive(Parser, Clone)]
pub struct WalletArgs {
    /// Raw private key
    #[arg(long, env = "PRIVATE_KEY")]
    pub private_key: Option<String>,

    /// Prompt for private key interactively
    #[arg(short, long)]
    pub interactive: bool,
}
