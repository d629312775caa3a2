//! Safety Module - The Oracle That Certifies Grants
//!
//! # Overview
//!
//! A pure decision layer over ledger snapshots: given a candidate state,
//! does an order exist in which every process can run to completion?
//! The allocation service asks this question with the tentative grant
//! already applied to a detached snapshot and commits only on a positive
//! verdict, so the live ledger never holds an uncertified state.
//!
//! # Module Structure
//!
//! ```text
//! domain/safety/
//! ├── oracle.rs   find_safe_sequence, is_safe, SafeSequence
//! ├── proof.rs    Kani proof harnesses
//! └── mod.rs      This file
//! ```
//!
//! # TLA+ Correspondence
//!
//! ```tla
//! Safe == Reclaim(available, {}) = Processes
//! ```
//!
//! See `specs/tla/Banker.tla` and the `Reclaim` operator documented in
//! [`oracle`].

pub mod oracle;

#[cfg(kani)]
mod proof;

pub use oracle::{find_safe_sequence, is_safe, SafeSequence};
