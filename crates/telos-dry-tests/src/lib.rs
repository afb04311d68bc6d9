// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared planning domains and fixtures for telos crates.
#![forbid(unsafe_code)]
//!
//! # Modules
//!
//! - [`blocks`] - Blocks world: take/put/stack/unstack, coherence rules,
//!   initial situations and goals
//! - [`lamp`] - Two-action domain whose plan needs an ordering constraint
//! - [`replay`] - Executes a returned plan step by step against a situation

pub mod blocks;
pub mod lamp;
pub mod replay;

pub use blocks::{all_actions, blocks_rules};
pub use replay::{replay, ReplayError};
