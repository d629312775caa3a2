//! Ledger Snapshot - Read-only State for Oracles and Diagnostics
//!
//! A snapshot is an owned copy of the four ledger structures, detached
//! from the live ledger and its lock. Two consumers rely on it:
//!
//! - the safety oracle, which simulates finish orders over a candidate
//!   snapshot without ever touching live state, and
//! - diagnostics, which render or serialize the state table for humans
//!   and tools.
//!
//! Snapshots are only produced by the ledger, which guarantees that all
//! rows share the catalog width and that the data-model invariants held
//! at the instant of capture.

use std::fmt;

use serde::Serialize;

use super::types::{ProcessId, ResourceId, Units};

/// Owned copy of Available, Maximum, Allocated and Need
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerSnapshot {
    /// Unreserved instances per resource type
    available: Vec<Units>,

    /// Declared claim ceiling per process
    maximum: Vec<Vec<Units>>,

    /// Current holdings per process
    allocated: Vec<Vec<Units>>,

    /// Remaining claim per process
    need: Vec<Vec<Units>>,
}

impl LedgerSnapshot {
    /// Assemble a snapshot from already-copied structures
    ///
    /// Callers must supply rectangular matrices whose width matches the
    /// available vector; the ledger is the only producer.
    pub(crate) fn assemble(
        available: Vec<Units>,
        maximum: Vec<Vec<Units>>,
        allocated: Vec<Vec<Units>>,
        need: Vec<Vec<Units>>,
    ) -> Self {
        Self { available, maximum, allocated, need }
    }

    /// Process population captured in this snapshot
    pub fn num_processes(&self) -> usize {
        self.allocated.len()
    }

    /// Resource catalog size captured in this snapshot
    pub fn num_resources(&self) -> usize {
        self.available.len()
    }

    /// Unreserved instances per resource type
    pub fn available(&self) -> &[Units] {
        &self.available
    }

    /// A process's declared maximum row (empty when out of range)
    pub fn maximum_of(&self, process: ProcessId) -> &[Units] {
        self.maximum.get(process.as_usize()).map_or(&[], Vec::as_slice)
    }

    /// A process's current holdings row (empty when out of range)
    pub fn allocated_of(&self, process: ProcessId) -> &[Units] {
        self.allocated.get(process.as_usize()).map_or(&[], Vec::as_slice)
    }

    /// A process's remaining claim row (empty when out of range)
    pub fn need_of(&self, process: ProcessId) -> &[Units] {
        self.need.get(process.as_usize()).map_or(&[], Vec::as_slice)
    }

    /// Copy of this snapshot with a candidate grant applied
    ///
    /// The caller has already validated that the grant fits within the
    /// process's remaining claim and the available pool, so the three
    /// cell updates cannot underflow.
    pub(crate) fn with_grant(
        mut self,
        process: ProcessId,
        resource: ResourceId,
        units: Units,
    ) -> Self {
        let p = process.as_usize();
        let r = resource.as_usize();
        self.available[r] -= units;
        self.allocated[p][r] += units;
        self.need[p][r] -= units;
        self
    }
}

/// One labeled matrix block of the diagnostics table
fn write_matrix(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    num_resources: usize,
    rows: &[Vec<Units>],
) -> fmt::Result {
    writeln!(f, "{}:", title)?;
    write!(f, "    ")?;
    for r in 0..num_resources {
        write!(f, "{:>6}", ResourceId::new(r))?;
    }
    writeln!(f)?;
    for (p, row) in rows.iter().enumerate() {
        write!(f, "{:<4}", ProcessId::new(p))?;
        for units in row {
            write!(f, "{:>6}", units)?;
        }
        writeln!(f)?;
    }
    Ok(())
}

impl fmt::Display for LedgerSnapshot {
    /// Render the state table: available vector, then the three
    /// per-process matrices
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Available:")?;
        write!(f, "    ")?;
        for r in 0..self.num_resources() {
            write!(f, "{:>6}", ResourceId::new(r))?;
        }
        writeln!(f)?;
        write!(f, "    ")?;
        for units in &self.available {
            write!(f, "{:>6}", units)?;
        }
        writeln!(f)?;
        writeln!(f)?;

        write_matrix(f, "Maximum", self.num_resources(), &self.maximum)?;
        writeln!(f)?;
        write_matrix(f, "Allocated", self.num_resources(), &self.allocated)?;
        writeln!(f)?;
        write_matrix(f, "Need", self.num_resources(), &self.need)
    }
}

#[cfg(all(test, not(kani)))]
mod tests {
    use super::*;

    fn sample() -> LedgerSnapshot {
        LedgerSnapshot::assemble(
            vec![3, 2],
            vec![vec![7, 5], vec![3, 2]],
            vec![vec![1, 0], vec![2, 1]],
            vec![vec![6, 5], vec![1, 1]],
        )
    }

    #[test]
    fn test_accessors() {
        let snap = sample();
        assert_eq!(snap.num_processes(), 2);
        assert_eq!(snap.num_resources(), 2);
        assert_eq!(snap.available(), &[3, 2]);
        assert_eq!(snap.need_of(ProcessId::new(1)), &[1, 1]);
        assert_eq!(snap.need_of(ProcessId::new(9)), &[] as &[Units]);
    }

    #[test]
    fn test_with_grant_applies_delta() {
        let granted = sample().with_grant(ProcessId::new(0), ResourceId::new(0), 2);
        assert_eq!(granted.available(), &[1, 2]);
        assert_eq!(granted.allocated_of(ProcessId::new(0)), &[3, 0]);
        assert_eq!(granted.need_of(ProcessId::new(0)), &[4, 5]);
        // Untouched rows stay equal
        assert_eq!(granted.allocated_of(ProcessId::new(1)), &[2, 1]);
    }

    #[test]
    fn test_display_contains_all_blocks() {
        let table = sample().to_string();
        assert!(table.contains("Available:"));
        assert!(table.contains("Maximum:"));
        assert!(table.contains("Allocated:"));
        assert!(table.contains("Need:"));
        assert!(table.contains("p0"));
        assert!(table.contains("r1"));
    }
}
