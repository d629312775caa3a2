//! Safety Oracle - Safe-Sequence Simulation
//!
//! # Overview
//!
//! The oracle answers one question about a candidate state: can all
//! processes finish in some order without the pool ever going negative?
//! It simulates the optimistic schedule, repeatedly "executing" any
//! process whose remaining claim fits the working pool and reclaiming
//! its holdings, and reports the finish order it found.
//!
//! The oracle is pure. It reads a detached [`LedgerSnapshot`] and never
//! touches live ledger state; the allocation service feeds it candidate
//! snapshots with a tentative grant already applied and commits only on
//! a positive verdict.
//!
//! # TLA+ Correspondence
//!
//! ```tla
//! RECURSIVE Reclaim(_, _)
//! Reclaim(work, done) ==
//!     LET eligible == {p \in Processes \ done :
//!                        \A r \in Resources : Need(p)[r] <= work[r]}
//!     IN  IF eligible = {} THEN done
//!         ELSE LET p == Min(eligible)
//!              IN Reclaim([r \in Resources |-> work[r] + allocated[p][r]],
//!                         done \cup {p})
//!
//! Safe == Reclaim(available, {}) = Processes
//! ```
//!
//! See `specs/tla/Banker.tla`.
//!
//! # Determinism
//!
//! Passes scan processes in ascending index order and execute an
//! eligible process immediately, so whenever several processes could
//! finish, the lowest index goes first. A given snapshot always yields
//! the identical sequence.
//!
//! # Complexity
//!
//! O(P²·R) worst case: each pass finishes at least one process or
//! terminates the search, and a pass costs O(P·R).

use std::fmt;

use crate::domain::ledger::{LedgerSnapshot, ProcessId, Units};

/// A certified finish order covering every process
///
/// Existence is what certifies a grant; the particular order is only
/// reported for diagnostics and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeSequence(Vec<ProcessId>);

impl SafeSequence {
    /// The finish order, first to last
    pub fn order(&self) -> &[ProcessId] {
        &self.0
    }

    /// Number of processes in the sequence (always the full population)
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the degenerate empty population (never produced by a
    /// constructed ledger, which requires P ≥ 1)
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SafeSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, p) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", p)?;
        }
        Ok(())
    }
}

/// Search for a finish order covering all processes
///
/// Returns `None` when no order exists, meaning the snapshot is unsafe:
/// from this state some set of processes could block each other forever
/// if their future requests go to their declared maximums.
///
/// # Algorithm
///
/// 1. Copy Available into a working pool; mark all processes unfinished.
/// 2. Scan processes in ascending index order. Any unfinished process
///    whose Need row fits the pool "executes": its Allocated row is
///    reclaimed into the pool and it is appended to the sequence.
/// 3. Repeat until everyone finished (safe) or a full pass makes no
///    progress (unsafe).
///
/// # Example
///
/// ```rust
/// use tamias_core::domain::ledger::{Ledger, ProductionBackend};
/// use tamias_core::domain::safety::find_safe_sequence;
///
/// let ledger = Ledger::new(
///     ProductionBackend::new(2, 1),
///     &[2],
///     &[[1], [2]],
///     &[[1], [0]],
/// )
/// .unwrap();
///
/// let sequence = find_safe_sequence(&ledger.snapshot()).unwrap();
/// let order: Vec<usize> = sequence.order().iter().map(|p| p.as_usize()).collect();
/// assert_eq!(order, vec![0, 1]);
/// ```
pub fn find_safe_sequence(snapshot: &LedgerSnapshot) -> Option<SafeSequence> {
    let num_processes = snapshot.num_processes();

    let mut work: Vec<Units> = snapshot.available().to_vec();
    let mut finished = vec![false; num_processes];
    let mut order = Vec::with_capacity(num_processes);

    while order.len() < num_processes {
        let mut progressed = false;

        for p in 0..num_processes {
            if finished[p] {
                continue;
            }
            let process = ProcessId::new(p);
            let need = snapshot.need_of(process);
            if need.iter().zip(work.iter()).all(|(n, w)| n <= w) {
                // Execute: the process runs to completion and returns
                // everything it holds to the pool.
                for (w, held) in work.iter_mut().zip(snapshot.allocated_of(process)) {
                    *w += held;
                }
                finished[p] = true;
                order.push(process);
                progressed = true;
            }
        }

        if !progressed {
            return None;
        }
    }

    Some(SafeSequence(order))
}

/// Whether a finish order exists for the snapshot
pub fn is_safe(snapshot: &LedgerSnapshot) -> bool {
    find_safe_sequence(snapshot).is_some()
}

#[cfg(all(test, not(kani)))]
mod tests {
    use super::*;
    use crate::domain::ledger::{Ledger, ProductionBackend, ResourceId};

    fn textbook_snapshot() -> LedgerSnapshot {
        Ledger::new(
            ProductionBackend::new(5, 3),
            &[10, 5, 7],
            &[[7, 5, 3], [3, 2, 2], [9, 0, 2], [2, 2, 2], [4, 3, 3]],
            &[[0, 1, 0], [2, 0, 0], [3, 0, 2], [2, 1, 1], [0, 0, 2]],
        )
        .unwrap()
        .snapshot()
    }

    fn order_of(sequence: &SafeSequence) -> Vec<usize> {
        sequence.order().iter().map(|p| p.as_usize()).collect()
    }

    #[test]
    fn test_textbook_sequence() {
        let sequence = find_safe_sequence(&textbook_snapshot()).unwrap();
        assert_eq!(order_of(&sequence), vec![1, 3, 4, 0, 2]);
    }

    #[test]
    fn test_deterministic_across_calls() {
        let snapshot = textbook_snapshot();
        let first = find_safe_sequence(&snapshot).unwrap();
        for _ in 0..10 {
            assert_eq!(find_safe_sequence(&snapshot).unwrap(), first);
        }
    }

    #[test]
    fn test_unsafe_state_returns_none() {
        // Two processes each hold one unit and need one more, but the
        // pool is empty: neither can ever finish.
        let snapshot = Ledger::new(
            ProductionBackend::new(2, 1),
            &[2],
            &[[2], [2]],
            &[[1], [1]],
        )
        .unwrap()
        .snapshot();

        assert!(find_safe_sequence(&snapshot).is_none());
        assert!(!is_safe(&snapshot));
    }

    #[test]
    fn test_unsafe_candidate_rejected_after_grant() {
        let ledger = Ledger::new(
            ProductionBackend::new(5, 3),
            &[10, 5, 7],
            &[[7, 5, 3], [3, 2, 2], [9, 0, 2], [2, 2, 2], [4, 3, 3]],
            &[[0, 1, 0], [3, 0, 0], [3, 0, 2], [2, 1, 1], [0, 0, 2]],
        )
        .unwrap();
        assert_eq!(ledger.available(ResourceId::new(0)), 2);

        // Within claim and availability, yet no finish order exists.
        let candidate = ledger
            .snapshot()
            .with_grant(ProcessId::new(4), ResourceId::new(1), 3);
        assert!(find_safe_sequence(&candidate).is_none());

        // One unit less keeps a finish order alive.
        let candidate = ledger
            .snapshot()
            .with_grant(ProcessId::new(4), ResourceId::new(1), 2);
        assert_eq!(
            order_of(&find_safe_sequence(&candidate).unwrap()),
            vec![3, 4, 1, 2, 0]
        );
    }

    #[test]
    fn test_zero_need_finishes_immediately() {
        // A process needing nothing always finishes first, regardless
        // of how empty the pool is.
        let snapshot = Ledger::new(
            ProductionBackend::new(2, 1),
            &[1],
            &[[1], [1]],
            &[[1], [0]],
        )
        .unwrap()
        .snapshot();

        let sequence = find_safe_sequence(&snapshot).unwrap();
        assert_eq!(order_of(&sequence), vec![0, 1]);
    }

    #[test]
    fn test_sequence_display() {
        let sequence = find_safe_sequence(&textbook_snapshot()).unwrap();
        assert_eq!(sequence.to_string(), "p1 -> p3 -> p4 -> p0 -> p2");
    }
}
