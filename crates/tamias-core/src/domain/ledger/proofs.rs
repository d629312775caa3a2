//! Kani Formal Verification Proofs - Ledger Laws
//!
//! All harnesses run on `VerificationBackend`: fixed stack arrays, no
//! heap in the state, no locks. Dimensions are concrete and tiny so the
//! state space stays tractable; the interesting inputs (unit counts) are
//! symbolic.

#![cfg(kani)]

use super::backend::ConfigurableBackend;
use super::engine::Ledger;
use super::types::{ConfigError, ProcessId, ResourceId, Units};
use super::verification_backend::VerificationBackend;

/// Two processes, one resource type, capacity 4
fn small_ledger() -> Ledger<VerificationBackend> {
    let backend = VerificationBackend::with_dims(2, 1);
    Ledger::new(backend, &[4], &[[3], [2]], &[[1], [1]]).unwrap()
}

fn column_sum(ledger: &Ledger<VerificationBackend>, resource: ResourceId) -> Units {
    let mut sum = 0;
    for p in 0..ledger.num_processes() {
        sum += ledger.allocated(ProcessId::new(p), resource);
    }
    sum
}

/// C-001: a committed grant moves units, it never creates or destroys them
#[kani::proof]
#[kani::unwind(8)]
fn proof_grant_preserves_conservation() {
    let mut ledger = small_ledger();
    let p0 = ProcessId::new(0);
    let r0 = ResourceId::new(0);

    let units: Units = kani::any();
    kani::assume(units <= ledger.need(p0, r0));
    kani::assume(units <= ledger.available(r0));

    ledger.commit_grant(p0, r0, units);

    kani::assert(
        ledger.available(r0) + column_sum(&ledger, r0) == 4,
        "Grant must conserve total units",
    );
}

/// C-003: need stays maximum minus allocated through a grant
#[kani::proof]
#[kani::unwind(8)]
fn proof_grant_keeps_need_consistent() {
    let mut ledger = small_ledger();
    let p1 = ProcessId::new(1);
    let r0 = ResourceId::new(0);

    let units: Units = kani::any();
    kani::assume(units <= ledger.need(p1, r0));
    kani::assume(units <= ledger.available(r0));

    ledger.commit_grant(p1, r0, units);

    kani::assert(
        ledger.need(p1, r0) == ledger.maximum(p1, r0) - ledger.allocated(p1, r0),
        "Need must equal maximum minus allocated",
    );
    kani::assert(
        ledger.allocated(p1, r0) <= ledger.maximum(p1, r0),
        "Holdings must never exceed the declared claim",
    );
}

/// Release clamps to the held amount for ANY requested count
#[kani::proof]
#[kani::unwind(8)]
fn proof_release_clamps_and_conserves() {
    let mut ledger = small_ledger();
    let p0 = ProcessId::new(0);
    let r0 = ResourceId::new(0);

    let held_before = ledger.allocated(p0, r0);
    let available_before = ledger.available(r0);

    let units: Units = kani::any();
    let freed = ledger.apply_release(p0, r0, units);

    kani::assert(freed <= held_before, "Freed units must clamp to holdings");
    kani::assert(
        ledger.allocated(p0, r0) == held_before - freed,
        "Holdings must drop by exactly the freed amount",
    );
    kani::assert(
        ledger.available(r0) == available_before + freed,
        "The pool must grow by exactly the freed amount",
    );
    kani::assert(
        ledger.available(r0) + column_sum(&ledger, r0) == 4,
        "Release must conserve total units",
    );
}

/// Releasing everything restores the full claim for the process
#[kani::proof]
#[kani::unwind(8)]
fn proof_release_all_restores_claim() {
    let mut ledger = small_ledger();
    let p1 = ProcessId::new(1);
    let r0 = ResourceId::new(0);

    ledger.apply_release_all(p1);

    kani::assert(ledger.allocated(p1, r0) == 0, "Row must be zeroed");
    kani::assert(
        ledger.need(p1, r0) == ledger.maximum(p1, r0),
        "Need must rewind to the declared claim",
    );
    kani::assert(
        ledger.available(r0) + column_sum(&ledger, r0) == 4,
        "Release-all must conserve total units",
    );
}

/// Construction refuses any initial allocation above its claim ceiling
#[kani::proof]
#[kani::unwind(8)]
fn proof_construction_rejects_overclaim() {
    let capacity: Units = kani::any();
    let maximum: Units = kani::any();
    let allocated: Units = kani::any();
    kani::assume(capacity >= 1);
    kani::assume(allocated > maximum);

    let backend = VerificationBackend::with_dims(1, 1);
    let result = Ledger::new(backend, &[capacity], &[[maximum]], &[[allocated]]);

    match result {
        Err(ConfigError::ClaimExceeded { .. }) => {}
        _ => kani::assert(false, "Over-claim must be the reported violation"),
    }
}

/// A successfully constructed ledger satisfies every ledger law
#[kani::proof]
#[kani::unwind(8)]
fn proof_construction_establishes_laws() {
    let capacity: Units = kani::any();
    let max0: Units = kani::any();
    let alloc0: Units = kani::any();
    kani::assume(capacity >= 1 && capacity <= 8);
    kani::assume(max0 <= capacity);
    kani::assume(alloc0 <= max0);

    let backend = VerificationBackend::with_dims(1, 1);
    let ledger = match Ledger::new(backend, &[capacity], &[[max0]], &[[alloc0]]) {
        Ok(ledger) => ledger,
        Err(_) => return,
    };

    let p0 = ProcessId::new(0);
    let r0 = ResourceId::new(0);
    kani::assert(
        ledger.available(r0) == capacity - alloc0,
        "Available must be derived, not supplied",
    );
    kani::assert(
        ledger.need(p0, r0) == max0 - alloc0,
        "Need must be derived, not supplied",
    );
}
