//! Production Ledger Backend - Heap Arenas
//!
//! # Design Philosophy
//!
//! Production workloads pick their population and catalog sizes at
//! runtime, so this backend allocates once on the heap and never again:
//! four row-major `Box<[Units]>` arenas, sized P×R (or R) at
//! construction. A boxed slice cannot grow, which enforces the
//! fixed-dimensions rule at the type level rather than by convention.
//!
//! # Memory Layout
//!
//! ```text
//! ProductionBackend (one allocation per arena)
//! ├─ available: [r0, r1, .., rR-1]
//! ├─ maximum:   [p0r0, p0r1, .., p0rR-1, p1r0, ..]   (row-major)
//! ├─ allocated: [ ..same shape.. ]
//! └─ need:      [ ..same shape.. ]
//! ```
//!
//! Mutation goes through `&mut self` only; the concurrency story lives a
//! layer up, behind the allocation service's mutex.

use super::backend::{ConfigurableBackend, LedgerBackend};
use super::types::{ProcessId, ResourceId, Units};

/// Heap-backed ledger storage with runtime dimensions
#[derive(Debug)]
pub struct ProductionBackend {
    /// Process population (row count)
    num_processes: usize,

    /// Resource catalog size (column count)
    num_resources: usize,

    /// Unreserved instances per resource type
    available: Box<[Units]>,

    /// Declared claim ceiling, row-major P×R
    maximum: Box<[Units]>,

    /// Current holdings, row-major P×R
    allocated: Box<[Units]>,

    /// Remaining claim cache, row-major P×R
    need: Box<[Units]>,
}

impl ProductionBackend {
    /// Create a zeroed backend for the given dimensions
    pub fn new(num_processes: usize, num_resources: usize) -> Self {
        let cells = num_processes * num_resources;
        Self {
            num_processes,
            num_resources,
            available: vec![0; num_resources].into_boxed_slice(),
            maximum: vec![0; cells].into_boxed_slice(),
            allocated: vec![0; cells].into_boxed_slice(),
            need: vec![0; cells].into_boxed_slice(),
        }
    }

    /// Row-major cell index, `None` when out of range
    #[inline]
    fn cell(&self, process: ProcessId, resource: ResourceId) -> Option<usize> {
        let p = process.as_usize();
        let r = resource.as_usize();
        if p >= self.num_processes || r >= self.num_resources {
            return None;
        }
        Some(p * self.num_resources + r)
    }
}

impl LedgerBackend for ProductionBackend {
    fn num_processes(&self) -> usize {
        self.num_processes
    }

    fn num_resources(&self) -> usize {
        self.num_resources
    }

    fn available(&self, resource: ResourceId) -> Units {
        self.available.get(resource.as_usize()).copied().unwrap_or(0)
    }

    fn set_available(&mut self, resource: ResourceId, units: Units) {
        if let Some(cell) = self.available.get_mut(resource.as_usize()) {
            *cell = units;
        }
    }

    fn maximum(&self, process: ProcessId, resource: ResourceId) -> Units {
        self.cell(process, resource).map_or(0, |i| self.maximum[i])
    }

    fn set_maximum(&mut self, process: ProcessId, resource: ResourceId, units: Units) {
        if let Some(i) = self.cell(process, resource) {
            self.maximum[i] = units;
        }
    }

    fn allocated(&self, process: ProcessId, resource: ResourceId) -> Units {
        self.cell(process, resource).map_or(0, |i| self.allocated[i])
    }

    fn set_allocated(&mut self, process: ProcessId, resource: ResourceId, units: Units) {
        if let Some(i) = self.cell(process, resource) {
            self.allocated[i] = units;
        }
    }

    fn need(&self, process: ProcessId, resource: ResourceId) -> Units {
        self.cell(process, resource).map_or(0, |i| self.need[i])
    }

    fn set_need(&mut self, process: ProcessId, resource: ResourceId, units: Units) {
        if let Some(i) = self.cell(process, resource) {
            self.need[i] = units;
        }
    }
}

impl ConfigurableBackend for ProductionBackend {
    fn with_dims(num_processes: usize, num_resources: usize) -> Self {
        Self::new(num_processes, num_resources)
    }
}
