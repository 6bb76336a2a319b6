//! # Agri-Custody Test Suite
//!
//! Scenarios that cross subsystem boundaries, run against a fully wired
//! [`LedgerNode`](node_runtime::LedgerNode) on a manual clock.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── harness.rs      # Node + clock + registered cast of actors
//!     ├── identity.rs     # Registration, standing, license uniqueness
//!     ├── custody.rs      # Stage journeys, alerts, bulk queries
//!     ├── marketplace.rs  # Offer lifecycle and expiry
//!     ├── logistics.rs    # Shipments and custody handover
//!     ├── provenance.rs   # Chains, tamper detection, tokens, uploads
//!     ├── events.rs       # Outbox and subscriptions
//!     └── properties.rs   # proptest invariants
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p ac-tests
//! cargo test -p ac-tests integration::logistics::
//! ```

pub mod integration;
