//! CREATE2 address prediction for Zodiac module proxies
//!
//! The ModuleProxyFactory deploys EIP-1167 minimal proxies at addresses
//! derived from the master copy, the initializer and a salt nonce:
//! ```text
//! salt      = keccak256(keccak256(initializer) ++ saltNonce)
//! init_code = PROXY_PREFIX ++ master_copy ++ PROXY_SUFFIX
//! address   = keccak256(0xff ++ factory ++ salt ++ keccak256(init_code))[12:]
//! ```

use alloy::primitives::{hex, keccak256, Address, Bytes, B256, U256};
use alloy::sol_types::{SolCall, SolValue};

use crate::contracts::IDelay;

/// Minimal proxy creation code preceding the master copy address
pub const PROXY_PREFIX: [u8; 19] = hex!("602d8060093d393df3363d3d373d3d3d363d73");
/// Minimal proxy creation code following the master copy address
pub const PROXY_SUFFIX: [u8; 15] = hex!("5af43d82803e903d91602b57fd5bf3");

/// Encodes `setUp(abi.encode(owner, avatar, target, cooldown, expiration))`
/// for a Delay modifier guarding `safe` with no expiration.
pub fn encode_delay_setup(safe: Address, cooldown: u64) -> Bytes {
    let params = (safe, safe, safe, U256::from(cooldown), U256::ZERO).abi_encode_params();
    Bytes::from(
        IDelay::setUpCall {
            initParams: params.into(),
        }
        .abi_encode(),
    )
}

/// Creation code of a minimal proxy pointing at `master_copy`
pub fn proxy_init_code(master_copy: Address) -> Bytes {
    let mut code = Vec::with_capacity(PROXY_PREFIX.len() + 20 + PROXY_SUFFIX.len());
    code.extend_from_slice(&PROXY_PREFIX);
    code.extend_from_slice(master_copy.as_slice());
    code.extend_from_slice(&PROXY_SUFFIX);
    Bytes::from(code)
}

/// Salt the factory derives from the initializer and user nonce
pub fn module_salt(initializer: &[u8], salt_nonce: U256) -> B256 {
    let mut salt_input = [0u8; 64];
    salt_input[..32].copy_from_slice(keccak256(initializer).as_slice());
    salt_input[32..].copy_from_slice(&salt_nonce.to_be_bytes::<32>());
    keccak256(salt_input)
}

/// Computes the address a module proxy will be deployed at
pub fn compute_module_address(
    factory: Address,
    master_copy: Address,
    initializer: &[u8],
    salt_nonce: U256,
) -> Address {
    let salt = module_salt(initializer, salt_nonce);
    let init_code_hash = keccak256(proxy_init_code(master_copy));

    let mut create2_input = Vec::with_capacity(1 + 20 + 32 + 32);
    create2_input.push(0xff);
    create2_input.extend_from_slice(factory.as_slice());
    create2_input.extend_from_slice(salt.as_slice());
    create2_input.extend_from_slice(init_code_hash.as_slice());

    Address::from_slice(&keccak256(&create2_input)[12..])
}
