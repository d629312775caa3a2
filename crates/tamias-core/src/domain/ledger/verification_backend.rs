//! Verification Ledger Backend - Bounded for Model Checking
//!
//! # The Bounded-State Strategy
//!
//! Kani explores every reachable state of a proof harness, so this
//! backend keeps the state space finite and small:
//!
//! ## What We Eliminated
//! - ❌ Heap allocation → unbounded state space
//! - ❌ Locks → Kani cannot model OS primitives
//! - ❌ Dynamic dimensions → symbolic sizes explode the search
//!
//! ## What We Use Instead
//! - ✅ Fixed-size arrays → bounded, stack-resident state
//! - ✅ Plain `&mut self` mutation → no interior mutability to model
//! - ✅ Direct indexing → trivially trackable by symbolic execution
//!
//! # Memory Layout
//!
//! ```text
//! VerificationBackend (on stack, ~208 bytes)
//! ├─ available: [Units; 3]        (12 bytes)
//! ├─ maximum:   [[Units; 3]; 5]   (60 bytes)
//! ├─ allocated: [[Units; 3]; 5]   (60 bytes)
//! ├─ need:      [[Units; 3]; 5]   (60 bytes)
//! ├─ num_processes: usize          (8 bytes)
//! └─ num_resources: usize          (8 bytes)
//! ```
//!
//! The bounds fit the classic five-process, three-resource textbook
//! instance, so integration tests can replay it on this backend and
//! check parity with the production arena.

use super::backend::{ConfigurableBackend, LedgerBackend};
use super::types::{ProcessId, ResourceId, Units};

/// Maximum processes in verification mode (must stay small for Kani)
pub const MAX_PROCESSES: usize = 5;

/// Maximum resource types in verification mode
pub const MAX_RESOURCES: usize = 3;

/// Stack-resident ledger storage with compile-time bounds
pub struct VerificationBackend {
    /// Unreserved instances per resource type
    available: [Units; MAX_RESOURCES],

    /// Declared claim ceiling
    maximum: [[Units; MAX_RESOURCES]; MAX_PROCESSES],

    /// Current holdings
    allocated: [[Units; MAX_RESOURCES]; MAX_PROCESSES],

    /// Remaining claim cache
    need: [[Units; MAX_RESOURCES]; MAX_PROCESSES],

    /// Active population (≤ MAX_PROCESSES)
    num_processes: usize,

    /// Active catalog size (≤ MAX_RESOURCES)
    num_resources: usize,
}

impl VerificationBackend {
    /// Create a zeroed backend using the full compile-time bounds
    pub const fn new() -> Self {
        Self {
            available: [0; MAX_RESOURCES],
            maximum: [[0; MAX_RESOURCES]; MAX_PROCESSES],
            allocated: [[0; MAX_RESOURCES]; MAX_PROCESSES],
            need: [[0; MAX_RESOURCES]; MAX_PROCESSES],
            num_processes: MAX_PROCESSES,
            num_resources: MAX_RESOURCES,
        }
    }

    /// Whether the pair addresses an active cell
    #[inline]
    fn in_range(&self, process: ProcessId, resource: ResourceId) -> bool {
        process.as_usize() < self.num_processes && resource.as_usize() < self.num_resources
    }
}

impl Default for VerificationBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerBackend for VerificationBackend {
    fn num_processes(&self) -> usize {
        self.num_processes
    }

    fn num_resources(&self) -> usize {
        self.num_resources
    }

    fn available(&self, resource: ResourceId) -> Units {
        if resource.as_usize() >= self.num_resources {
            return 0;
        }
        self.available[resource.as_usize()]
    }

    fn set_available(&mut self, resource: ResourceId, units: Units) {
        if resource.as_usize() >= self.num_resources {
            return;
        }
        self.available[resource.as_usize()] = units;
    }

    fn maximum(&self, process: ProcessId, resource: ResourceId) -> Units {
        if !self.in_range(process, resource) {
            return 0;
        }
        self.maximum[process.as_usize()][resource.as_usize()]
    }

    fn set_maximum(&mut self, process: ProcessId, resource: ResourceId, units: Units) {
        if !self.in_range(process, resource) {
            return;
        }
        self.maximum[process.as_usize()][resource.as_usize()] = units;
    }

    fn allocated(&self, process: ProcessId, resource: ResourceId) -> Units {
        if !self.in_range(process, resource) {
            return 0;
        }
        self.allocated[process.as_usize()][resource.as_usize()]
    }

    fn set_allocated(&mut self, process: ProcessId, resource: ResourceId, units: Units) {
        if !self.in_range(process, resource) {
            return;
        }
        self.allocated[process.as_usize()][resource.as_usize()] = units;
    }

    fn need(&self, process: ProcessId, resource: ResourceId) -> Units {
        if !self.in_range(process, resource) {
            return 0;
        }
        self.need[process.as_usize()][resource.as_usize()]
    }

    fn set_need(&mut self, process: ProcessId, resource: ResourceId, units: Units) {
        if !self.in_range(process, resource) {
            return;
        }
        self.need[process.as_usize()][resource.as_usize()] = units;
    }
}

impl ConfigurableBackend for VerificationBackend {
    fn with_dims(num_processes: usize, num_resources: usize) -> Self {
        assert!(
            num_processes <= MAX_PROCESSES,
            "Verification mode supports max {} processes",
            MAX_PROCESSES
        );
        assert!(
            num_resources <= MAX_RESOURCES,
            "Verification mode supports max {} resource types",
            MAX_RESOURCES
        );

        let mut backend = Self::new();
        backend.num_processes = num_processes;
        backend.num_resources = num_resources;
        backend
    }
}

#[cfg(all(test, not(kani)))]
mod tests {
    use super::*;

    #[test]
    fn test_verification_roundtrip() {
        let mut backend = VerificationBackend::new();

        backend.set_available(ResourceId::new(1), 5);
        assert_eq!(backend.available(ResourceId::new(1)), 5);

        let p2 = ProcessId::new(2);
        let r0 = ResourceId::new(0);
        backend.set_maximum(p2, r0, 9);
        backend.set_allocated(p2, r0, 3);
        backend.set_need(p2, r0, 6);
        assert_eq!(backend.maximum(p2, r0), 9);
        assert_eq!(backend.allocated(p2, r0), 3);
        assert_eq!(backend.need(p2, r0), 6);
    }

    #[test]
    fn test_trimmed_dims_mask_cells() {
        let mut backend = VerificationBackend::with_dims(2, 2);
        assert_eq!(backend.num_processes(), 2);
        assert_eq!(backend.num_resources(), 2);

        // Cells past the active dims behave as absent even though the
        // arrays physically extend to the compile-time bounds.
        backend.set_allocated(ProcessId::new(4), ResourceId::new(0), 7);
        assert_eq!(backend.allocated(ProcessId::new(4), ResourceId::new(0)), 0);
        backend.set_available(ResourceId::new(2), 7);
        assert_eq!(backend.available(ResourceId::new(2)), 0);
    }

    #[test]
    #[should_panic(expected = "supports max")]
    fn test_dims_beyond_bounds_panic() {
        let _ = VerificationBackend::with_dims(MAX_PROCESSES + 1, 1);
    }
}
