//! # Forwarding Proxy Contract
//!
//! A stable-address shell for a replaceable implementation. The shell keeps
//! three management fields (upgrade authority, implementation pointer,
//! version counter) plus a persistent storage arena of typed cells, and
//! delegates behavior to whichever implementation the pointer currently
//! names.
//!
//! ## Upgrade model
//!
//! ```text
//! [deployed: impl I1, version 0] --upgrade(I2)--> [impl I2, version 1] --...
//! ```
//!
//! `upgrade` is gated by a single authority address fixed at deployment and
//! reassignable only by itself. The version counter moves strictly forward,
//! by exactly 1 per successful upgrade.
//!
//! ## Storage arena
//!
//! Long-lived state of the hosted module lives in the proxy's own storage,
//! not the implementation's, so it is retained across upgrades. The arena
//! cells are writable only by the current implementation; reads are public.
//! A swapped-out implementation loses write access the moment the pointer
//! moves.
//!
//! Schema compatibility of arena cells across implementation versions is a
//! convention the implementations must uphold (append-only evolution);
//! nothing here checks it.
//!
//! ## Dispatch
//!
//! `forward` dispatches an arbitrary operation to the current
//! implementation. The host forbids re-entry, so an implementation that
//! reads or writes its own hosting proxy's arena must be invoked directly
//! at the address returned by `implementation()`, not through `forward`.

#![no_std]
use soroban_sdk::{
    contract, contractimpl, contracttype, symbol_short, Address, Env, Symbol, Val, Vec,
};


/// Storage keys. Management fields are instance state; arena cells are
/// persistent so they outlive any one implementation.
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Sole address allowed to call `upgrade` and `set_upgrade_authority`
    UpgradeAuthority,
    /// Current implementation contract
    Implementation,
    /// Count of successful upgrades
    Version,
    /// Arena: address-typed cell
    AddressCell(Symbol),
    /// Arena: bool-typed cell
    BoolCell(Symbol),
}

const TOPIC_UPGRADED: Symbol = symbol_short!("upgraded");
const TOPIC_AUTHORITY_HANDOFF: Symbol = symbol_short!("auth_chg");

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UpgradedEvent {
    pub old_implementation: Address,
    pub new_implementation: Address,
    pub version: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuthorityHandoffEvent {
    pub old_authority: Address,
    pub new_authority: Address,
}

fn get_implementation(env: &Env) -> Address {
    env.storage()
        .instance()
        .get(&DataKey::Implementation)
        .expect("not initialized")
}

fn get_version(env: &Env) -> u32 {
    env.storage().instance().get(&DataKey::Version).unwrap_or(0)
}

fn get_upgrade_authority(env: &Env) -> Address {
    env.storage()
        .instance()
        .get(&DataKey::UpgradeAuthority)
        .expect("not initialized")
}

fn require_upgrade_authority(env: &Env, caller: &Address) {
    caller.require_auth();
    let authority = get_upgrade_authority(env);
    assert!(*caller == authority, "caller is not the upgrade authority");
}

fn require_implementation(env: &Env, caller: &Address) {
    caller.require_auth();
    let implementation = get_implementation(env);
    assert!(*caller == implementation, "caller is not the implementation");
}

#[contract]
pub struct ForwardingProxyContract;

#[contractimpl]
impl ForwardingProxyContract {
    // ── Management ──────────────────────────────────────────────────

    /// Deploy-time setup. The upgrade authority is fixed here; for a module
    /// proxy it is typically the registry, for the registry's own proxy an
    /// operator address that later hands control to the registry via
    /// `set_upgrade_authority`.
    pub fn initialize(env: Env, upgrade_authority: Address, implementation: Address) {
        if env.storage().instance().has(&DataKey::Implementation) {
            panic!("already initialized");
        }
        env.storage()
            .instance()
            .set(&DataKey::UpgradeAuthority, &upgrade_authority);
        env.storage()
            .instance()
            .set(&DataKey::Implementation, &implementation);
        env.storage().instance().set(&DataKey::Version, &0u32);
    }

    /// Swap the implementation pointer. Only the upgrade authority may call
    /// this, and the new implementation must differ from the current one.
    /// Arena cells are untouched, which is the whole point.
    pub fn upgrade(env: Env, caller: Address, new_implementation: Address) {
        require_upgrade_authority(&env, &caller);

        let old_implementation = get_implementation(&env);
        assert!(
            new_implementation != old_implementation,
            "new implementation equals current"
        );

        let version = get_version(&env) + 1;
        env.storage()
            .instance()
            .set(&DataKey::Implementation, &new_implementation);
        env.storage().instance().set(&DataKey::Version, &version);

        let event = UpgradedEvent {
            old_implementation,
            new_implementation,
            version,
        };
        env.events().publish((TOPIC_UPGRADED,), event);
    }

    /// Hand control of this proxy to a new authority. Gated by the current
    /// authority.
    pub fn set_upgrade_authority(env: Env, caller: Address, new_authority: Address) {
        require_upgrade_authority(&env, &caller);

        let old_authority = get_upgrade_authority(&env);
        env.storage()
            .instance()
            .set(&DataKey::UpgradeAuthority, &new_authority);

        let event = AuthorityHandoffEvent {
            old_authority,
            new_authority,
        };
        env.events().publish((TOPIC_AUTHORITY_HANDOFF,), event);
    }

    // ── Reads ───────────────────────────────────────────────────────

    pub fn implementation(env: Env) -> Address {
        get_implementation(&env)
    }

    pub fn version(env: Env) -> u32 {
        get_version(&env)
    }

    pub fn upgrade_authority(env: Env) -> Address {
        get_upgrade_authority(&env)
    }

    // ── Dispatch ────────────────────────────────────────────────────

    /// Forward an operation not part of the management API to the current
    /// implementation, opaquely. The result is whatever the implementation
    /// returns. Must not be used for operations that call back into this
    /// proxy (the host rejects re-entry).
    pub fn forward(env: Env, function: Symbol, args: Vec<Val>) -> Val {
        let implementation = get_implementation(&env);
        env.invoke_contract::<Val>(&implementation, &function, args)
    }

    // ── Storage arena ───────────────────────────────────────────────

    /// Write an address cell. Only the current implementation may write.
    pub fn write_address(env: Env, caller: Address, key: Symbol, value: Address) {
        require_implementation(&env, &caller);
        env.storage()
            .persistent()
            .set(&DataKey::AddressCell(key), &value);
    }

    pub fn read_address(env: Env, key: Symbol) -> Option<Address> {
        env.storage().persistent().get(&DataKey::AddressCell(key))
    }

    /// Write a bool cell. Only the current implementation may write.
    pub fn write_bool(env: Env, caller: Address, key: Symbol, value: bool) {
        require_implementation(&env, &caller);
        env.storage()
            .persistent()
            .set(&DataKey::BoolCell(key), &value);
    }

    pub fn read_bool(env: Env, key: Symbol) -> bool {
        env.storage()
            .persistent()
            .get(&DataKey::BoolCell(key))
            .unwrap_or(false)
    }
}
