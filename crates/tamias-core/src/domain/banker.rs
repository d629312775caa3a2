//! Allocation Service - The Request/Release Protocol
//!
//! # Design Philosophy
//!
//! This module composes the ledger and the safety oracle into the one
//! protocol callers see, while keeping the pieces honest:
//!
//! - **One lock, whole ledger**: the oracle's verdict is only valid
//!   against the exact state it examined, so validate, check and commit
//!   run as a single critical section. Per-process or per-resource locks
//!   would let a concurrent mutation slip between check and commit.
//! - **No rollback path**: the tentative grant is applied to a detached
//!   candidate snapshot, never to the live ledger. A negative verdict
//!   simply drops the candidate; the live state was never touched.
//! - **No queuing**: a rejected request returns immediately. Waiting,
//!   retry and backoff belong to the caller.
//!
//! # Architecture
//!
//! ```text
//! Banker<B>
//!   ├─ ledger: Mutex<Ledger<B>>      (the only shared mutable state)
//!   └─ request() ── Validate ─> CandidateSnapshot ─> Oracle ─> Commit
//! ```
//!
//! # TLA+ Correspondence
//!
//! ```tla
//! Request(p, r, n) ==
//!     /\ n <= Need(p)[r]
//!     /\ n <= available[r]
//!     /\ SafeAfterGrant(p, r, n)
//!     /\ allocated' = [allocated EXCEPT ![p][r] = @ + n]
//!     /\ available' = [available EXCEPT ![r] = @ - n]
//! ```
//!
//! See `specs/tla/Banker.tla`.

use parking_lot::Mutex;

use super::ledger::{
    Ledger, LedgerBackend, LedgerSnapshot, ProcessId, RequestError, ResourceId, Units,
};
use super::safety::{find_safe_sequence, SafeSequence};

/// Deadlock-avoiding allocation service over a ledger
///
/// # Concurrency
///
/// `Banker` is `Sync`: harnesses share one instance across OS threads
/// (typically behind an `Arc`) and call the protocol concurrently. Every
/// call is synchronous, runs to completion, and holds the ledger lock
/// for its own duration only; no call ever blocks waiting for another
/// process to release.
///
/// # Teardown
///
/// Dropping the service drops the ledger and its backing storage.
/// Ownership rules make every use-after-teardown a compile error.
#[derive(Debug)]
pub struct Banker<B: LedgerBackend> {
    /// The authoritative state, behind the single coarse lock
    ledger: Mutex<Ledger<B>>,

    /// Population size, immutable after construction; lets the
    /// process-index check run without taking the lock
    num_processes: usize,

    /// Catalog size, immutable after construction
    num_resources: usize,
}

impl<B: LedgerBackend> Banker<B> {
    /// Wrap a constructed ledger in the allocation protocol
    pub fn new(ledger: Ledger<B>) -> Self {
        let num_processes = ledger.num_processes();
        let num_resources = ledger.num_resources();
        Self {
            ledger: Mutex::new(ledger),
            num_processes,
            num_resources,
        }
    }

    /// Process population
    pub fn num_processes(&self) -> usize {
        self.num_processes
    }

    /// Resource catalog size
    pub fn num_resources(&self) -> usize {
        self.num_resources
    }

    /// Request `units` of one resource type for one process
    ///
    /// Validation order is part of the contract; the first violated
    /// condition is reported:
    ///
    /// 1. `InvalidProcess`: pure argument check, before the lock.
    /// 2. `InvalidResource`: under the lock.
    /// 3. `ExceedsMaxClaim`: request larger than the remaining claim.
    /// 4. `InsufficientAvailable`: request larger than the free pool.
    /// 5. `WouldCauseUnsafeState`: no finish order would survive the
    ///    grant. The live ledger is untouched; only the candidate
    ///    snapshot ever held the rejected state.
    ///
    /// On success the grant is committed and every data-model invariant
    /// holds at the quiescent point after the call.
    pub fn request(
        &self,
        process: ProcessId,
        resource: ResourceId,
        units: Units,
    ) -> Result<(), RequestError> {
        if process.as_usize() >= self.num_processes {
            return Err(RequestError::InvalidProcess(process));
        }

        let mut ledger = self.ledger.lock();

        if resource.as_usize() >= ledger.num_resources() {
            return Err(RequestError::InvalidResource(resource));
        }
        let need = ledger.need(process, resource);
        if units > need {
            return Err(RequestError::ExceedsMaxClaim {
                process,
                resource,
                requested: units,
                need,
            });
        }
        let available = ledger.available(resource);
        if units > available {
            return Err(RequestError::InsufficientAvailable {
                resource,
                requested: units,
                available,
            });
        }

        let candidate = ledger.snapshot().with_grant(process, resource, units);
        if find_safe_sequence(&candidate).is_none() {
            return Err(RequestError::WouldCauseUnsafeState {
                process,
                resource,
                requested: units,
            });
        }

        ledger.commit_grant(process, resource, units);
        Ok(())
    }

    /// Return up to `units` of one holding to the pool
    ///
    /// Over-release clamps to what is actually held; asking to free more
    /// than held is not an error. Reports the units actually freed.
    /// Releasing only moves the state toward safety, so the oracle is
    /// never consulted.
    pub fn release(
        &self,
        process: ProcessId,
        resource: ResourceId,
        units: Units,
    ) -> Result<Units, RequestError> {
        let mut ledger = self.ledger.lock();

        if process.as_usize() >= ledger.num_processes() {
            return Err(RequestError::InvalidProcess(process));
        }
        if resource.as_usize() >= ledger.num_resources() {
            return Err(RequestError::InvalidResource(resource));
        }

        Ok(ledger.apply_release(process, resource, units))
    }

    /// Return a process's entire holdings to the pool
    ///
    /// Models process termination or abort. Never consults the oracle.
    pub fn release_all(&self, process: ProcessId) -> Result<(), RequestError> {
        if process.as_usize() >= self.num_processes {
            return Err(RequestError::InvalidProcess(process));
        }

        let mut ledger = self.ledger.lock();
        ledger.apply_release_all(process);
        Ok(())
    }

    /// Owned copy of the current state for diagnostics and analysis
    pub fn snapshot(&self) -> LedgerSnapshot {
        self.ledger.lock().snapshot()
    }

    /// Finish order for the current state, if one exists
    ///
    /// A constructed ledger can still be unsafe (construction validates
    /// the data model, not safety); harnesses typically check this once
    /// before driving requests.
    pub fn find_safe_sequence(&self) -> Option<SafeSequence> {
        find_safe_sequence(&self.snapshot())
    }

    /// Whether the current state admits any finish order
    pub fn is_safe(&self) -> bool {
        self.find_safe_sequence().is_some()
    }
}
