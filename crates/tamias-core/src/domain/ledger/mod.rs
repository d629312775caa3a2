//! Ledger Module - Authoritative Resource Accounting
//!
//! # Overview
//!
//! This module owns every count in the system: the Available vector, the
//! Maximum claim matrix, the Allocated matrix, and the derived Need
//! cache. It is specified in `specs/tla/Banker.tla` and realized over a
//! swappable storage backend.
//!
//! # Module Structure
//!
//! ```text
//! domain/ledger/
//! ├── types.rs                ProcessId, ResourceId, Units, errors
//! ├── backend.rs              LedgerBackend + ConfigurableBackend traits
//! ├── production_backend.rs   Heap arenas, runtime dimensions
//! ├── verification_backend.rs Fixed arrays, Kani-bounded
//! ├── engine.rs               Ledger<B>: validation + primitives
//! ├── snapshot.rs             LedgerSnapshot: oracle input + diagnostics
//! ├── proofs.rs               Kani proof harnesses
//! └── mod.rs                  This file
//! ```
//!
//! # TLA+ Correspondence
//!
//! | TLA+ Construct | Rust Implementation |
//! |----------------------|----------------------------------|
//! | `Processes` constant | `num_processes` dimension |
//! | `Resources` constant | `num_resources` dimension |
//! | `Capacity` constant | `capacities` argument to `new` |
//! | `Maximum` constant | backend maximum cells |
//! | `available` variable | backend available cells |
//! | `allocated` variable | backend allocated cells |
//! | `Need(p)` operator | backend need cells (cached) |
//! | `Init` action | `Ledger::new()` |
//!
//! # Design Philosophy
//!
//! The ledger never decides; it only accounts. Whether a request should
//! be granted is the allocation service's question (answered by the
//! safety oracle); whether the books balance afterwards is the ledger's
//! guarantee. Keeping decision and accounting apart is what lets the
//! verification backend replay the exact same bookkeeping under Kani.

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Module Declarations
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub mod backend;
pub mod engine;
pub mod production_backend;
pub mod snapshot;
pub mod types;
pub mod verification_backend;

#[cfg(kani)]
mod proofs;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Public Re-exports (Flattened API)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

// Types
pub use types::{ConfigError, ProcessId, RequestError, ResourceId, Units};

// Backend abstraction
pub use backend::{ConfigurableBackend, LedgerBackend};

// Backend implementations
pub use production_backend::ProductionBackend;
pub use verification_backend::{VerificationBackend, MAX_PROCESSES, MAX_RESOURCES};

// Engine and snapshot
pub use engine::Ledger;
pub use snapshot::LedgerSnapshot;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Type Aliases for Convenience
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Ledger over heap arenas with runtime dimensions
pub type ProductionLedger = Ledger<ProductionBackend>;

/// Ledger over fixed arrays, bounded for model checking
pub type VerificationLedger = Ledger<VerificationBackend>;

#[cfg(all(test, not(kani)))]
mod tests {
    use super::*;

    #[test]
    fn test_types_are_exported() {
        let _p = ProcessId::new(0);
        let _r = ResourceId::new(0);
        let _units: Units = 3;
    }

    #[test]
    fn test_aliases_construct() {
        let production = ProductionLedger::new(
            ProductionBackend::new(1, 1),
            &[1],
            &[[1]],
            &[[0]],
        );
        assert!(production.is_ok());

        let verification = VerificationLedger::new(
            VerificationBackend::with_dims(1, 1),
            &[1],
            &[[1]],
            &[[0]],
        );
        assert!(verification.is_ok());
    }
}
