//! Ledger Backend Abstraction Layer
//!
//! # Design Philosophy
//!
//! This trait gives the ledger a **compile-time polymorphic storage layer**,
//! so the same bookkeeping logic runs against a heap-allocated production
//! arena or a stack-allocated verification arena with zero dispatch
//! overhead.
//!
//! # TLA+ Correspondence
//! ```tla
//! VARIABLES available, allocated
//! CONSTANT  Maximum
//! ```
//!
//! The backend stores these state variables (plus the incrementally
//! maintained `need` cache) while remaining implementation-agnostic.

use super::types::{ProcessId, ResourceId, Units};

/// Backend abstraction for ledger state storage
///
/// # Static Dispatch
///
/// `Ledger<ProductionBackend>` monomorphizes every cell access down to a
/// direct arena index. No vtable is involved; the backend choice is a
/// compile-time decision.
///
/// # Index Contract
///
/// The ledger validates every identifier before it reaches the backend,
/// so out-of-range access is inert rather than fatal: reads return 0 and
/// writes are ignored. Implementations must not panic on any input.
///
/// # TLA+ State Variables
/// - Available vector: `available[r]`
/// - Claim ceiling: `Maximum[p][r]` (constant after initialization)
/// - Current holdings: `allocated[p][r]`
/// - Remaining claim: `Need(p)[r]`, cached rather than recomputed
pub trait LedgerBackend {
    /// Number of processes this backend stores rows for
    fn num_processes(&self) -> usize;

    /// Number of resource types this backend stores columns for
    fn num_resources(&self) -> usize;

    /// Read the unreserved instance count for a resource type
    ///
    /// # TLA+ Correspondence
    /// ```tla
    /// available[r]
    /// ```
    fn available(&self, resource: ResourceId) -> Units;

    /// Overwrite the unreserved instance count for a resource type
    ///
    /// # TLA+ Correspondence
    /// ```tla
    /// available' = [available EXCEPT ![r] = units]
    /// ```
    fn set_available(&mut self, resource: ResourceId, units: Units);

    /// Read a process's declared maximum claim for a resource type
    ///
    /// # TLA+ Correspondence
    /// ```tla
    /// Maximum[p][r]
    /// ```
    fn maximum(&self, process: ProcessId, resource: ResourceId) -> Units;

    /// Write a maximum-claim cell
    ///
    /// Only called while populating a new ledger; `Maximum` is immutable
    /// once construction completes.
    fn set_maximum(&mut self, process: ProcessId, resource: ResourceId, units: Units);

    /// Read a process's current holdings of a resource type
    ///
    /// # TLA+ Correspondence
    /// ```tla
    /// allocated[p][r]
    /// ```
    fn allocated(&self, process: ProcessId, resource: ResourceId) -> Units;

    /// Overwrite a holdings cell
    ///
    /// # TLA+ Correspondence
    /// ```tla
    /// allocated' = [allocated EXCEPT ![p][r] = units]
    /// ```
    fn set_allocated(&mut self, process: ProcessId, resource: ResourceId, units: Units);

    /// Read a process's remaining claim for a resource type
    ///
    /// # TLA+ Correspondence
    /// ```tla
    /// Need(p)[r]
    /// ```
    fn need(&self, process: ProcessId, resource: ResourceId) -> Units;

    /// Overwrite a remaining-claim cell
    ///
    /// The ledger keeps this cache equal to `Maximum - allocated` on every
    /// mutation; the backend just stores what it is told.
    fn set_need(&mut self, process: ProcessId, resource: ResourceId, units: Units);
}

/// Helper trait for backends constructed from dimensions alone
pub trait ConfigurableBackend: LedgerBackend + Sized {
    /// Create a zeroed backend sized for the given population and catalog
    fn with_dims(num_processes: usize, num_resources: usize) -> Self;
}

#[cfg(all(test, not(kani)))]
mod tests {
    use super::*;

    /// Shared contract test run against each backend implementation
    pub(crate) fn backend_contract<B: LedgerBackend>(backend: &mut B) {
        let p0 = ProcessId::new(0);
        let r0 = ResourceId::new(0);

        assert_eq!(backend.available(r0), 0);
        backend.set_available(r0, 7);
        assert_eq!(backend.available(r0), 7);

        backend.set_maximum(p0, r0, 5);
        backend.set_allocated(p0, r0, 2);
        backend.set_need(p0, r0, 3);
        assert_eq!(backend.maximum(p0, r0), 5);
        assert_eq!(backend.allocated(p0, r0), 2);
        assert_eq!(backend.need(p0, r0), 3);

        // Out-of-range access is inert
        let far_p = ProcessId::new(backend.num_processes());
        let far_r = ResourceId::new(backend.num_resources());
        assert_eq!(backend.available(far_r), 0);
        assert_eq!(backend.allocated(far_p, r0), 0);
        backend.set_available(far_r, 99);
        backend.set_allocated(far_p, r0, 99);
        assert_eq!(backend.allocated(p0, r0), 2);
    }

    #[test]
    fn test_production_contract() {
        let mut backend =
            crate::domain::ledger::ProductionBackend::with_dims(3, 2);
        backend_contract(&mut backend);
    }

    #[test]
    fn test_verification_contract() {
        let mut backend =
            crate::domain::ledger::VerificationBackend::with_dims(3, 2);
        backend_contract(&mut backend);
    }
}
