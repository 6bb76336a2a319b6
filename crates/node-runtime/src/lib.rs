//! # Node Runtime Library
//!
//! Builds a complete Agri-Custody ledger node from a [`NodeConfig`]. The
//! `custody-node` binary in `main.rs` is a thin shell around [`LedgerNode`].
//!
//! ## Architectural Patterns
//!
//! - **Hexagonal Architecture**: each subsystem is constructed with its
//!   in-memory store adapter and receives its peers as read-only ports
//! - **Single commit order**: every mutation runs under one commit mutex
//! - **Outbox**: every committed provenance entry is published on the
//!   shared event bus

#![allow(clippy::type_complexity)]

pub mod container;
pub mod errors;

pub use container::{ConfigError, LedgerNode, NodeConfig};
pub use errors::{NodeError, NodeResult};
