//! Collaborator interfaces between the registry, its hosting forwarding
//! proxy, and the role-caller modules.
//!
//! Role-caller modules (the voting and authority contracts) are opaque to
//! the core: their entire contract with it is the caller identity they
//! present and the operations below.

use crate::roles::Role;
use soroban_sdk::{Address, Env, Symbol, Val, Vec};

/// Surface of a forwarding proxy as driven by the implementation it hosts.
///
/// `write_address` / `write_bool` are the proxy's storage arena: typed cells
/// that only the current implementation may write, so registry state kept
/// there survives implementation swaps.
#[soroban_sdk::contractclient(name = "ForwardingProxyClient")]
pub trait ForwardingProxyInterface {
    fn upgrade(env: Env, caller: Address, new_implementation: Address);
    fn set_upgrade_authority(env: Env, caller: Address, new_authority: Address);
    fn implementation(env: Env) -> Address;
    fn version(env: Env) -> u32;
    fn forward(env: Env, function: Symbol, args: Vec<Val>) -> Val;
    fn write_address(env: Env, caller: Address, key: Symbol, value: Address);
    fn read_address(env: Env, key: Symbol) -> Option<Address>;
    fn write_bool(env: Env, caller: Address, key: Symbol, value: bool);
    fn read_bool(env: Env, key: Symbol) -> bool;
}

/// Implementation-lifecycle surface a running registry drives on its
/// successor during a self-upgrade: the successor adopts the shared arena
/// before the proxy's pointer moves to it.
#[soroban_sdk::contractclient(name = "RegistryLifecycleClient")]
pub trait RegistryLifecycleInterface {
    fn bind(env: Env, caller: Address, arena: Address);
}

/// Registry surface consumed by role-caller modules.
///
/// A module wishing to change a role address must be reachable as the
/// caller currently stored in the `VotingToChangeProxy` slot and invoke
/// `set_role_address`; the reads let a module discover its current peers.
#[soroban_sdk::contractclient(name = "RoleRegistryClient")]
pub trait RoleRegistryInterface {
    fn set_role_address(env: Env, caller: Address, role: Role, new_address: Address);
    fn get_role_address(env: Env, role: Role) -> Option<Address>;
    fn get_keys_manager(env: Env) -> Option<Address>;
    fn get_voting_to_change_keys(env: Env) -> Option<Address>;
    fn get_voting_min_threshold(env: Env) -> Option<Address>;
    fn get_voting_to_change_proxy(env: Env) -> Option<Address>;
    fn get_ballots_storage(env: Env) -> Option<Address>;
    fn get_validator_metadata(env: Env) -> Option<Address>;
    fn get_consensus_membership(env: Env) -> Option<Address>;
    fn is_bootstrapped(env: Env) -> bool;
}
