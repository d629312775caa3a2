//! Kani Formal Verification Proofs - Safety Laws
//!
//! The oracle is a pure function of a snapshot, which makes it the
//! easiest part of the crate to verify: no locks, no interior
//! mutability, just bounded loops over tiny concrete dimensions.

#![cfg(kani)]

use super::oracle::find_safe_sequence;
use crate::domain::ledger::{
    ConfigurableBackend, Ledger, ProcessId, Units, VerificationBackend,
};

/// S-002: the verdict and the order are a pure function of the state
#[kani::proof]
#[kani::unwind(8)]
fn proof_oracle_is_deterministic() {
    let backend = VerificationBackend::with_dims(2, 1);
    let ledger = Ledger::new(backend, &[4], &[[3], [2]], &[[1], [1]]).unwrap();
    let snapshot = ledger.snapshot();

    let first = find_safe_sequence(&snapshot);
    let second = find_safe_sequence(&snapshot);

    match (first, second) {
        (Some(a), Some(b)) => kani::assert(a.order() == b.order(), "Order must be stable"),
        (None, None) => {}
        _ => kani::assert(false, "Verdict must be stable"),
    }
}

/// A positive verdict names every process exactly once
#[kani::proof]
#[kani::unwind(8)]
fn proof_sequence_is_a_permutation() {
    let backend = VerificationBackend::with_dims(2, 1);
    let ledger = Ledger::new(backend, &[4], &[[3], [2]], &[[1], [1]]).unwrap();

    let sequence = find_safe_sequence(&ledger.snapshot());
    kani::assume(sequence.is_some());
    let sequence = sequence.unwrap();

    kani::assert(sequence.len() == 2, "Every process must appear");
    let mut seen = [false; 2];
    for process in sequence.order() {
        kani::assert(process.as_usize() < 2, "Entries must be in range");
        kani::assert(!seen[process.as_usize()], "No process may repeat");
        seen[process.as_usize()] = true;
    }
}

/// One process alone can always finish: need never exceeds the pool
#[kani::proof]
#[kani::unwind(8)]
fn proof_single_process_always_safe() {
    let capacity: Units = kani::any();
    let maximum: Units = kani::any();
    let allocated: Units = kani::any();
    kani::assume(capacity >= 1 && capacity <= 8);
    kani::assume(maximum <= capacity);
    kani::assume(allocated <= maximum);

    let backend = VerificationBackend::with_dims(1, 1);
    let ledger = Ledger::new(backend, &[capacity], &[[maximum]], &[[allocated]]).unwrap();

    kani::assert(
        find_safe_sequence(&ledger.snapshot()).is_some(),
        "A lone process under its claim ceiling must be safe",
    );
}

/// The classic mutually starved pair has no finish order
#[kani::proof]
#[kani::unwind(8)]
fn proof_starved_pair_is_unsafe() {
    let backend = VerificationBackend::with_dims(2, 1);
    let ledger = Ledger::new(backend, &[2], &[[2], [2]], &[[1], [1]]).unwrap();

    kani::assert(
        find_safe_sequence(&ledger.snapshot()).is_none(),
        "Both processes need the unit the other holds",
    );
}

/// A process with zero remaining need can finish immediately
#[kani::proof]
#[kani::unwind(8)]
fn proof_zero_need_heads_the_sequence() {
    let backend = VerificationBackend::with_dims(2, 1);
    // p0 already holds its whole claim; p1 is starved until p0 finishes.
    let ledger = Ledger::new(backend, &[2], &[[2], [2]], &[[2], [0]]).unwrap();

    let sequence = find_safe_sequence(&ledger.snapshot());
    match sequence {
        Some(sequence) => {
            kani::assert(
                sequence.order()[0] == ProcessId::new(0),
                "The finished process must reclaim first",
            );
        }
        None => kani::assert(false, "The state must be safe"),
    }
}
