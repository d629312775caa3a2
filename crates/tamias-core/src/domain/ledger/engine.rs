//! Ledger Engine - Authoritative Counts over a Storage Backend
//!
//! # Overview
//!
//! `Ledger<B>` owns the four structures of the data model: the Available
//! vector, the immutable Maximum matrix, the Allocated matrix, and the
//! incrementally maintained Need cache. It validates construction input,
//! derives Available and Need, and exposes the narrow mutation
//! primitives the allocation service builds its protocol on.
//!
//! The engine itself is single-threaded by construction: mutation takes
//! `&mut self`, and the allocation service wraps the whole ledger in one
//! mutex. Nothing here locks.
//!
//! # TLA+ Correspondence
//!
//! ```tla
//! Init ==
//!     /\ allocated = InitialAllocated
//!     /\ available = [r \in Resources |->
//!                       Capacity[r] - ColumnSum(InitialAllocated, Processes, r)]
//! ```
//!
//! See `specs/tla/Banker.tla`.

use super::backend::LedgerBackend;
use super::snapshot::LedgerSnapshot;
use super::types::{ConfigError, ProcessId, ResourceId, Units};

/// The authoritative resource-allocation state
///
/// # Construction
///
/// Built once from declared capacities plus the Maximum and initial
/// Allocated matrices; Available and Need are derived, never supplied.
/// A ledger that constructs successfully satisfies conservation, the
/// claim bound, and need consistency, and keeps satisfying them at every
/// quiescent point thereafter.
///
/// # Teardown
///
/// Dropping the ledger releases its backing storage. Ownership makes
/// use-after-teardown unrepresentable; no explicit destroy call exists.
///
/// # Example
///
/// ```rust
/// use tamias_core::domain::ledger::{Ledger, ProductionBackend};
///
/// let backend = ProductionBackend::new(2, 2);
/// let ledger = Ledger::new(
///     backend,
///     &[3, 2],              // declared capacity per resource type
///     &[[2, 1], [1, 2]],    // maximum claims
///     &[[1, 0], [0, 1]],    // initial allocations
/// )
/// .unwrap();
///
/// assert_eq!(ledger.available(tamias_core::ResourceId::new(0)), 2);
/// ```
#[derive(Debug)]
pub struct Ledger<B: LedgerBackend> {
    backend: B,
}

impl<B: LedgerBackend> Ledger<B> {
    /// Validate configuration and derive the initial state
    ///
    /// # Arguments
    /// - `backend`: zeroed storage whose dimensions fix P and R
    /// - `capacities`: total instances per resource type, each ≥ 1
    /// - `maximum`: P rows of R declared claim ceilings
    /// - `initial_allocated`: P rows of R starting holdings
    ///
    /// # Errors
    ///
    /// Returns the first violated [`ConfigError`] kind: degenerate
    /// dimensions, shape mismatches against the backend, an initial
    /// allocation above its claim ceiling, or a resource column whose
    /// initial allocations exceed the declared capacity.
    pub fn new<Row: AsRef<[Units]>>(
        mut backend: B,
        capacities: &[Units],
        maximum: &[Row],
        initial_allocated: &[Row],
    ) -> Result<Self, ConfigError> {
        let num_processes = backend.num_processes();
        let num_resources = backend.num_resources();

        if num_processes == 0 {
            return Err(ConfigError::ZeroProcesses);
        }
        if num_resources == 0 {
            return Err(ConfigError::ZeroResources);
        }
        if capacities.len() != num_resources {
            return Err(ConfigError::CapacityCountMismatch {
                expected: num_resources,
                actual: capacities.len(),
            });
        }
        for (r, &capacity) in capacities.iter().enumerate() {
            if capacity == 0 {
                return Err(ConfigError::ZeroCapacity { resource: ResourceId::new(r) });
            }
        }
        check_shape("maximum", maximum, num_processes, num_resources)?;
        check_shape("allocated", initial_allocated, num_processes, num_resources)?;

        for p in 0..num_processes {
            let max_row = maximum[p].as_ref();
            let alloc_row = initial_allocated[p].as_ref();
            for r in 0..num_resources {
                if alloc_row[r] > max_row[r] {
                    return Err(ConfigError::ClaimExceeded {
                        process: ProcessId::new(p),
                        resource: ResourceId::new(r),
                        allocated: alloc_row[r],
                        maximum: max_row[r],
                    });
                }
            }
        }

        for (r, &capacity) in capacities.iter().enumerate() {
            let column: u64 = initial_allocated
                .iter()
                .map(|row| u64::from(row.as_ref()[r]))
                .sum();
            if column > u64::from(capacity) {
                return Err(ConfigError::OverSubscribed {
                    resource: ResourceId::new(r),
                    capacity,
                    allocated: column.min(u64::from(Units::MAX)) as Units,
                });
            }
            // Fits in Units: column ≤ capacity
            backend.set_available(ResourceId::new(r), capacity - column as Units);
        }

        for p in 0..num_processes {
            let process = ProcessId::new(p);
            let max_row = maximum[p].as_ref();
            let alloc_row = initial_allocated[p].as_ref();
            for r in 0..num_resources {
                let resource = ResourceId::new(r);
                backend.set_maximum(process, resource, max_row[r]);
                backend.set_allocated(process, resource, alloc_row[r]);
                backend.set_need(process, resource, max_row[r] - alloc_row[r]);
            }
        }

        Ok(Self { backend })
    }

    /// Process population
    pub fn num_processes(&self) -> usize {
        self.backend.num_processes()
    }

    /// Resource catalog size
    pub fn num_resources(&self) -> usize {
        self.backend.num_resources()
    }

    /// Unreserved instances of a resource type
    pub fn available(&self, resource: ResourceId) -> Units {
        self.backend.available(resource)
    }

    /// Declared claim ceiling for a (process, resource) pair
    pub fn maximum(&self, process: ProcessId, resource: ResourceId) -> Units {
        self.backend.maximum(process, resource)
    }

    /// Current holdings for a (process, resource) pair
    pub fn allocated(&self, process: ProcessId, resource: ResourceId) -> Units {
        self.backend.allocated(process, resource)
    }

    /// Remaining claim for a (process, resource) pair
    pub fn need(&self, process: ProcessId, resource: ResourceId) -> Units {
        self.backend.need(process, resource)
    }

    /// Owned copy of the full state for oracles and diagnostics
    pub fn snapshot(&self) -> LedgerSnapshot {
        let num_processes = self.num_processes();
        let num_resources = self.num_resources();

        let available = (0..num_resources)
            .map(|r| self.backend.available(ResourceId::new(r)))
            .collect();

        let mut maximum = Vec::with_capacity(num_processes);
        let mut allocated = Vec::with_capacity(num_processes);
        let mut need = Vec::with_capacity(num_processes);
        for p in 0..num_processes {
            let process = ProcessId::new(p);
            let mut max_row = Vec::with_capacity(num_resources);
            let mut alloc_row = Vec::with_capacity(num_resources);
            let mut need_row = Vec::with_capacity(num_resources);
            for r in 0..num_resources {
                let resource = ResourceId::new(r);
                max_row.push(self.backend.maximum(process, resource));
                alloc_row.push(self.backend.allocated(process, resource));
                need_row.push(self.backend.need(process, resource));
            }
            maximum.push(max_row);
            allocated.push(alloc_row);
            need.push(need_row);
        }

        LedgerSnapshot::assemble(available, maximum, allocated, need)
    }

    /// Commit a certified grant
    ///
    /// Callers (the allocation service) have already validated the
    /// indices, the claim bound, availability, and the safety verdict;
    /// the three cell updates cannot underflow.
    pub(crate) fn commit_grant(&mut self, process: ProcessId, resource: ResourceId, units: Units) {
        let available = self.backend.available(resource);
        let allocated = self.backend.allocated(process, resource);
        let need = self.backend.need(process, resource);
        debug_assert!(units <= available && units <= need);

        self.backend.set_available(resource, available - units);
        self.backend.set_allocated(process, resource, allocated + units);
        self.backend.set_need(process, resource, need - units);
    }

    /// Return up to `units` of a holding to the pool, clamped to what is
    /// actually held; reports the units freed
    pub(crate) fn apply_release(
        &mut self,
        process: ProcessId,
        resource: ResourceId,
        units: Units,
    ) -> Units {
        let held = self.backend.allocated(process, resource);
        let freed = units.min(held);
        if freed == 0 {
            return 0;
        }

        self.backend.set_allocated(process, resource, held - freed);
        self.backend
            .set_available(resource, self.backend.available(resource) + freed);
        self.backend
            .set_need(process, resource, self.backend.need(process, resource) + freed);
        freed
    }

    /// Return a process's entire holdings row to the pool
    pub(crate) fn apply_release_all(&mut self, process: ProcessId) {
        for r in 0..self.num_resources() {
            let resource = ResourceId::new(r);
            let held = self.backend.allocated(process, resource);
            if held == 0 {
                continue;
            }
            self.backend.set_allocated(process, resource, 0);
            self.backend
                .set_available(resource, self.backend.available(resource) + held);
            self.backend
                .set_need(process, resource, self.backend.need(process, resource) + held);
        }
    }
}

/// Shape check shared by the two claim matrices
fn check_shape<Row: AsRef<[Units]>>(
    matrix: &'static str,
    rows: &[Row],
    num_processes: usize,
    num_resources: usize,
) -> Result<(), ConfigError> {
    if rows.len() != num_processes {
        return Err(ConfigError::RowCountMismatch {
            matrix,
            expected: num_processes,
            actual: rows.len(),
        });
    }
    for (p, row) in rows.iter().enumerate() {
        let width = row.as_ref().len();
        if width != num_resources {
            return Err(ConfigError::RowWidthMismatch {
                matrix,
                process: ProcessId::new(p),
                expected: num_resources,
                actual: width,
            });
        }
    }
    Ok(())
}
