//! Rebalance pipeline for LSD basket tokens.
//!
//! This crate wires the collaborators into one run:
//! - Operator counts and validator distributions per pool
//! - Decentralization weights and target units
//! - One market snapshot per run
//! - Auction parameters for every component

/// Prelude module for convenient imports.
pub mod prelude;

/// Pool to operator-label mapping.
pub mod composition;
/// Auction and statistics settings.
pub mod config;
/// Market state of a run.
pub mod snapshot;
/// Auction derivation and orchestration.
pub mod strategy;
