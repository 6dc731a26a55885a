//! Jetton Minter - a TUI for minting additional supply of a TON jetton.
//!
//! This library provides:
//! - The mint action controller and its collaborator traits
//! - Exact decimal amounts and fixed-point conversion
//! - TON address parsing and the jetton token context
//! - Indexer, wallet bridge and store implementations

pub mod config;
pub mod domain;
pub mod infra;
