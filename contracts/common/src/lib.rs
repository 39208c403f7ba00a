//! Shared role definitions, collaborator interfaces, and workspace-level
//! security invariant tests for Concord contracts.

#![cfg_attr(not(test), no_std)]

pub mod interfaces;

pub mod roles;
