//! Deployed Safe and Zodiac contracts, per network

use alloy::primitives::{address, Address};

/// Singletons a Safe proxy may delegate to, L1 and L2 flavours of v1.4.1 and v1.3.0
pub const SAFE_SINGLETONS: [Address; 4] = [
    address!("41675C099F32341bf84BFc5382aF534df5C7461a"),
    address!("29fcB43b46531BcA003ddC8FCB67FFE91900C762"),
    address!("d9Db270c1B5E3Bd161E8c8503c55cEABeE709552"),
    address!("3E5c63644E683549055b9Be8653de26E0B4CD36E"),
];

/// Contracts the wallet calls into besides the Safe itself.
///
/// The defaults are the CREATE2 deployments, identical on every network that
/// has them. Local or forked chains can point elsewhere with the `with_*`
/// builders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainAddresses {
    /// Target of batched execution, reached by delegatecall
    pub multi_send: Address,
    pub module_proxy_factory: Address,
    /// Implementation cloned for every recovery module
    pub delay_master_copy: Address,
}

impl Default for ChainAddresses {
    fn default() -> Self {
        Self {
            multi_send: address!("38869bf66a61cF6bDB996A6aE40D5853Fd43B526"),
            module_proxy_factory: address!("000000000000aDdB49795b0f9bA5BC298cDda236"),
            delay_master_copy: address!("d54895B1121A2eE3f37b502F507631FA1331BED6"),
        }
    }
}

impl ChainAddresses {
    pub fn is_known_singleton(singleton: Address) -> bool {
        SAFE_SINGLETONS.contains(&singleton)
    }

    pub fn with_multi_send(mut self, multi_send: Address) -> Self {
        self.multi_send = multi_send;
        self
    }

    pub fn with_delay_contracts(mut self, module_proxy_factory: Address, delay_master_copy: Address) -> Self {
        self.module_proxy_factory = module_proxy_factory;
        self.delay_master_copy = delay_master_copy;
        self
    }
}

/// A network with the canonical deployments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Network {
    pub chain_id: u64,
    pub name: &'static str,
}

const NETWORKS: &[Network] = &[
    Network { chain_id: 1, name: "mainnet" },
    Network { chain_id: 10, name: "optimism" },
    Network { chain_id: 100, name: "gnosis" },
    Network { chain_id: 137, name: "polygon" },
    Network { chain_id: 8453, name: "base" },
    Network { chain_id: 42161, name: "arbitrum" },
    Network { chain_id: 11155111, name: "sepolia" },
];

impl Network {
    /// Looks up a supported network, `None` for anything else
    pub fn from_chain_id(chain_id: u64) -> Option<Self> {
        NETWORKS.iter().copied().find(|n| n.chain_id == chain_id)
    }

    pub fn addresses(&self) -> ChainAddresses {
        ChainAddresses::default()
    }
}
