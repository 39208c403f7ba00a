//! # Network Registry Contract
//!
//! The central directory of a permissioned network: a role-indexed address
//! table naming which concrete module is currently authoritative for each
//! function area (key management, the voting modules, ballot storage,
//! validator metadata, consensus membership, and the registry itself).
//!
//! ## Features
//!
//! - One-time bootstrap populating every role slot atomically
//! - A single gated mutation entry point for all subsequent address changes
//! - Self-referential authorization: the gatekeeper is itself a row in the
//!   table it gates, so rotating it is an ordinary table write
//! - Self-upgrade: replacing the registry's own implementation through its
//!   hosting forwarding proxy, with the table surviving the swap
//!
//! ## Storage model
//!
//! All logical state (bootstrapped flag, bootstrap authority, role table)
//! lives in the storage arena of the hosting forwarding proxy, not in this
//! contract. This implementation keeps only the arena pointer locally. A
//! replacement implementation adopts the accumulated state by calling
//! `bind` before the proxy's pointer is moved to it.
//!
//! ## Security
//!
//! - `bootstrap` is callable once, by the bootstrap authority only
//! - `set_role_address` accepts exactly one caller: the address currently
//!   stored in the `VotingToChangeProxy` slot
//! - Arena writes are rejected by the proxy unless this contract is its
//!   current implementation

#![no_std]
use soroban_sdk::{contract, contractimpl, contracttype, symbol_short, Address, Env, Symbol};

use concord_common::interfaces::{ForwardingProxyClient, RegistryLifecycleClient};
use concord_common::roles::Role;


#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Hosting forwarding proxy whose storage arena holds all registry state
    Arena,
}

// Arena cell keys. Append-only: a future implementation may add cells but
// must never repurpose an existing key.
const CELL_BOOTSTRAPPED: Symbol = symbol_short!("booted");
const CELL_BOOTSTRAP_AUTHORITY: Symbol = symbol_short!("boot_auth");
const CELL_KEYS_MANAGER: Symbol = symbol_short!("keys_mgr");
const CELL_VOTING_TO_CHANGE_KEYS: Symbol = symbol_short!("vote_keys");
const CELL_VOTING_TO_CHANGE_MIN_THRESHOLD: Symbol = symbol_short!("vote_thr");
const CELL_VOTING_TO_CHANGE_PROXY: Symbol = symbol_short!("vote_prox");
const CELL_BALLOTS_STORAGE: Symbol = symbol_short!("ballots");
const CELL_VALIDATOR_METADATA: Symbol = symbol_short!("val_meta");
const CELL_CONSENSUS_MEMBERSHIP: Symbol = symbol_short!("consensus");

const TOPIC_BOOTSTRAPPED: Symbol = symbol_short!("bootstrap");
const TOPIC_ROLE_CHANGED: Symbol = symbol_short!("role_chg");

/// Emitted once, on successful bootstrap. Field order is part of the
/// compatibility surface for off-chain monitors.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BootstrappedEvent {
    pub keys_manager: Address,
    pub voting_to_change_keys: Address,
    pub voting_to_change_min_threshold: Address,
    pub voting_to_change_proxy: Address,
    pub ballots_storage: Address,
    pub validator_metadata: Address,
}

/// Emitted on every ordinary role overwrite. Self-upgrades are recorded by
/// the hosting proxy's `Upgraded` event instead.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoleAddressChangedEvent {
    pub role: Role,
    pub old_address: Address,
    pub new_address: Address,
}

fn arena(env: &Env) -> Address {
    env.storage()
        .instance()
        .get(&DataKey::Arena)
        .expect("not initialized")
}

fn role_key(role: &Role) -> Symbol {
    match role {
        Role::KeysManager => CELL_KEYS_MANAGER,
        Role::VotingToChangeKeys => CELL_VOTING_TO_CHANGE_KEYS,
        Role::VotingToChangeMinThreshold => CELL_VOTING_TO_CHANGE_MIN_THRESHOLD,
        Role::VotingToChangeProxy => CELL_VOTING_TO_CHANGE_PROXY,
        Role::BallotsStorage => CELL_BALLOTS_STORAGE,
        Role::ValidatorMetadata => CELL_VALIDATOR_METADATA,
        Role::ConsensusMembership => CELL_CONSENSUS_MEMBERSHIP,
        Role::SelfImplementation => panic!("self implementation has no table slot"),
    }
}

fn read_cell(env: &Env, key: Symbol) -> Option<Address> {
    let arena = arena(env);
    ForwardingProxyClient::new(env, &arena).read_address(&key)
}

fn write_cell(env: &Env, key: Symbol, value: &Address) {
    let arena = arena(env);
    ForwardingProxyClient::new(env, &arena).write_address(
        &env.current_contract_address(),
        &key,
        value,
    );
}

fn is_booted(env: &Env) -> bool {
    let arena = arena(env);
    ForwardingProxyClient::new(env, &arena).read_bool(&CELL_BOOTSTRAPPED)
}

fn require_mutation_authority(env: &Env, caller: &Address) {
    caller.require_auth();
    let authority = read_cell(env, CELL_VOTING_TO_CHANGE_PROXY).expect("not bootstrapped");
    assert!(
        *caller == authority,
        "caller is not the voting-to-change-proxy"
    );
}

#[contract]
pub struct RegistryContract;

#[contractimpl]
impl RegistryContract {
    // ── Initialization ──────────────────────────────────────────────

    /// Constructor-time setup against a fresh arena: records the arena
    /// pointer and writes the bootstrap authority and consensus-membership
    /// cells. The arena's write gate is the authorization here: the call
    /// only succeeds while this contract is the proxy's current
    /// implementation. Deploy the proxy and run this call in the same
    /// transaction; an instance left uninitialized can be claimed through
    /// any proxy that names it as implementation.
    pub fn initialize(
        env: Env,
        arena: Address,
        bootstrap_authority: Address,
        consensus_membership: Address,
    ) {
        if env.storage().instance().has(&DataKey::Arena) {
            panic!("already initialized");
        }
        let proxy = ForwardingProxyClient::new(&env, &arena);
        assert!(
            proxy.read_address(&CELL_BOOTSTRAP_AUTHORITY).is_none(),
            "arena already holds registry state"
        );
        env.storage().instance().set(&DataKey::Arena, &arena);

        let this = env.current_contract_address();
        proxy.write_address(&this, &CELL_BOOTSTRAP_AUTHORITY, &bootstrap_authority);
        proxy.write_address(&this, &CELL_CONSENSUS_MEMBERSHIP, &consensus_membership);
    }

    /// Adopt an arena that already holds registry state. The outgoing
    /// implementation drives this during a self-upgrade, immediately before
    /// the proxy's pointer moves, so the accumulated table is inherited
    /// rather than re-created. Only the arena's current implementation is
    /// accepted as caller; a third party cannot claim a freshly deployed
    /// replacement for a foreign arena first. Re-binding to the same arena
    /// is a no-op, which lets a rollback swap reinstate a previous
    /// implementation.
    pub fn bind(env: Env, caller: Address, arena: Address) {
        caller.require_auth();
        let proxy = ForwardingProxyClient::new(&env, &arena);
        assert!(
            caller == proxy.implementation(),
            "caller is not the implementation"
        );

        let bound: Option<Address> = env.storage().instance().get(&DataKey::Arena);
        if let Some(bound) = bound {
            assert!(bound == arena, "already bound to a different arena");
            return;
        }
        assert!(
            proxy.read_address(&CELL_BOOTSTRAP_AUTHORITY).is_some(),
            "arena holds no registry state"
        );
        env.storage().instance().set(&DataKey::Arena, &arena);
    }

    // ── Bootstrap ───────────────────────────────────────────────────

    /// One-time population of the role table. Only the bootstrap authority
    /// may call it, and only the first call succeeds. Every observer after
    /// the commit sees a fully populated table.
    ///
    /// The bootstrap authority is trusted to supply valid module addresses;
    /// unlike `set_role_address`, no target validation happens here.
    pub fn bootstrap(
        env: Env,
        caller: Address,
        keys_manager: Address,
        voting_to_change_keys: Address,
        voting_to_change_min_threshold: Address,
        voting_to_change_proxy: Address,
        ballots_storage: Address,
        validator_metadata: Address,
    ) {
        caller.require_auth();
        let authority = read_cell(&env, CELL_BOOTSTRAP_AUTHORITY).expect("not initialized");
        assert!(caller == authority, "caller is not the bootstrap authority");
        assert!(!is_booted(&env), "already bootstrapped");

        write_cell(&env, CELL_KEYS_MANAGER, &keys_manager);
        write_cell(&env, CELL_VOTING_TO_CHANGE_KEYS, &voting_to_change_keys);
        write_cell(
            &env,
            CELL_VOTING_TO_CHANGE_MIN_THRESHOLD,
            &voting_to_change_min_threshold,
        );
        write_cell(&env, CELL_VOTING_TO_CHANGE_PROXY, &voting_to_change_proxy);
        write_cell(&env, CELL_BALLOTS_STORAGE, &ballots_storage);
        write_cell(&env, CELL_VALIDATOR_METADATA, &validator_metadata);

        let arena = arena(&env);
        ForwardingProxyClient::new(&env, &arena).write_bool(
            &env.current_contract_address(),
            &CELL_BOOTSTRAPPED,
            &true,
        );

        let event = BootstrappedEvent {
            keys_manager,
            voting_to_change_keys,
            voting_to_change_min_threshold,
            voting_to_change_proxy,
            ballots_storage,
            validator_metadata,
        };
        env.events().publish((TOPIC_BOOTSTRAPPED,), event);
    }

    // ── Mutation ────────────────────────────────────────────────────

    /// The single mutation entry point for every role after bootstrap. The
    /// only accepted caller is the address currently stored in the
    /// `VotingToChangeProxy` slot, including when that very slot is being
    /// rotated, which changes the accepted caller for the next call.
    ///
    /// `SelfImplementation` does not write a table slot: it binds the
    /// incoming implementation to the arena, drives the hosting proxy's
    /// `upgrade`, and hands the proxy's upgrade authority over, all in one
    /// invocation, so the registry keeps governing its own arena across
    /// swaps and no half-swapped state is ever observable.
    pub fn set_role_address(env: Env, caller: Address, role: Role, new_address: Address) {
        assert!(is_booted(&env), "not bootstrapped");
        require_mutation_authority(&env, &caller);

        match role {
            Role::SelfImplementation => {
                let arena = arena(&env);
                let proxy = ForwardingProxyClient::new(&env, &arena);
                let this = env.current_contract_address();
                RegistryLifecycleClient::new(&env, &new_address).bind(&this, &arena);
                proxy.upgrade(&this, &new_address);
                proxy.set_upgrade_authority(&this, &new_address);
            }
            _ => {
                let key = role_key(&role);
                let old_address = read_cell(&env, key.clone()).expect("role not set");
                assert!(new_address != old_address, "new address equals current");
                write_cell(&env, key, &new_address);

                let event = RoleAddressChangedEvent {
                    role,
                    old_address,
                    new_address,
                };
                env.events().publish((TOPIC_ROLE_CHANGED,), event);
            }
        }
    }

    // ── Reads ───────────────────────────────────────────────────────

    /// Current address for a role, `None` while unset. For
    /// `SelfImplementation` this reports the hosting proxy's current
    /// implementation.
    pub fn get_role_address(env: Env, role: Role) -> Option<Address> {
        match role {
            Role::SelfImplementation => {
                let arena = arena(&env);
                Some(ForwardingProxyClient::new(&env, &arena).implementation())
            }
            _ => read_cell(&env, role_key(&role)),
        }
    }

    pub fn get_keys_manager(env: Env) -> Option<Address> {
        read_cell(&env, CELL_KEYS_MANAGER)
    }

    pub fn get_voting_to_change_keys(env: Env) -> Option<Address> {
        read_cell(&env, CELL_VOTING_TO_CHANGE_KEYS)
    }

    pub fn get_voting_min_threshold(env: Env) -> Option<Address> {
        read_cell(&env, CELL_VOTING_TO_CHANGE_MIN_THRESHOLD)
    }

    pub fn get_voting_to_change_proxy(env: Env) -> Option<Address> {
        read_cell(&env, CELL_VOTING_TO_CHANGE_PROXY)
    }

    pub fn get_ballots_storage(env: Env) -> Option<Address> {
        read_cell(&env, CELL_BALLOTS_STORAGE)
    }

    pub fn get_validator_metadata(env: Env) -> Option<Address> {
        read_cell(&env, CELL_VALIDATOR_METADATA)
    }

    pub fn get_consensus_membership(env: Env) -> Option<Address> {
        read_cell(&env, CELL_CONSENSUS_MEMBERSHIP)
    }

    pub fn get_bootstrap_authority(env: Env) -> Option<Address> {
        read_cell(&env, CELL_BOOTSTRAP_AUTHORITY)
    }

    pub fn is_bootstrapped(env: Env) -> bool {
        is_booted(&env)
    }

    /// The hosting forwarding proxy.
    pub fn get_arena(env: Env) -> Address {
        arena(&env)
    }
}
