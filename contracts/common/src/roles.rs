use soroban_sdk::contracttype;

/// Named slots in the network registry.
///
/// Each slot identifies which concrete module address is currently
/// authoritative for a function area. Every slot except
/// `SelfImplementation` maps to an address cell in the registry's table;
/// `SelfImplementation` addresses the registry's own running implementation
/// behind its hosting forwarding proxy.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Role {
    /// Validator key management module
    KeysManager,
    /// Ballot module for validator key changes
    VotingToChangeKeys,
    /// Ballot module for quorum threshold changes
    VotingToChangeMinThreshold,
    /// Ballot module for registry address changes; the sole caller accepted
    /// by the registry's mutation entry point
    VotingToChangeProxy,
    /// Ballot persistence module
    BallotsStorage,
    /// The registry's own implementation behind its hosting proxy
    SelfImplementation,
    /// Authoritative validator-membership source
    ConsensusMembership,
    /// Validator metadata module
    ValidatorMetadata,
}
