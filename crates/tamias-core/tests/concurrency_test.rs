//! Concurrency Tests - One Lock, Many Callers
//!
//! The service holds the whole ledger behind a single mutex, so every
//! snapshot is a quiescent point and the ledger laws must hold in each
//! one, no matter how many threads hammer the protocol. The dining
//! philosophers run here too: with claims declared up front, the banker
//! refuses the fork grab that would complete the circular wait, so every
//! philosopher finishes without any deadlock detection machinery.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use tamias_core::domain::*;

#[test]
fn test_service_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ProductionBanker>();
    assert_send_sync::<VerificationBanker>();
}

#[test]
fn test_storm_preserves_conservation_at_every_snapshot() {
    const THREADS: usize = 4;
    const ROUNDS: usize = 300;
    const CAPACITIES: [Units; 3] = [6, 6, 6];

    let mut builder = BankerBuilder::new().capacities(&CAPACITIES);
    for _ in 0..THREADS {
        builder = builder.process(&[3, 3, 3], &[0, 0, 0]);
    }
    let banker = Arc::new(builder.build().unwrap());

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let banker = Arc::clone(&banker);
            thread::spawn(move || {
                let process = ProcessId::new(t);
                for round in 0..ROUNDS {
                    let resource = ResourceId::new(round % CAPACITIES.len());
                    // Rejections are part of normal operation here; the
                    // storm only cares that state stays lawful.
                    let _ = banker.request(process, resource, 1);
                    if round % 7 == 0 {
                        banker.release_all(process).unwrap();
                    }
                }
                banker.release_all(process).unwrap();
            })
        })
        .collect();

    // Observe mid-storm: every snapshot is taken under the lock, so
    // conservation must hold in each one.
    for _ in 0..100 {
        let snapshot = banker.snapshot();
        for (r, &capacity) in CAPACITIES.iter().enumerate() {
            let held: Units = (0..THREADS)
                .map(|p| snapshot.allocated_of(ProcessId::new(p))[r])
                .sum();
            assert_eq!(snapshot.available()[r] + held, capacity);
        }
        thread::yield_now();
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(banker.snapshot().available(), &CAPACITIES);
    assert!(banker.is_safe());
}

#[test]
fn test_rejected_threads_never_corrupt_state() {
    // Two processes fight over a pool their combined claims oversubscribe
    // threefold; most requests bounce.
    let banker = Arc::new(
        BankerBuilder::new()
            .capacities(&[2])
            .process(&[2], &[0])
            .process(&[2], &[0])
            .build()
            .unwrap(),
    );

    let handles: Vec<_> = (0..2)
        .map(|t| {
            let banker = Arc::clone(&banker);
            thread::spawn(move || {
                let process = ProcessId::new(t);
                for _ in 0..200 {
                    if banker.request(process, ResourceId::new(0), 2).is_ok() {
                        assert_eq!(banker.release(process, ResourceId::new(0), 2), Ok(2));
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(banker.snapshot().available(), &[2]);
    assert!(banker.is_safe());
}

mod dining_philosophers {
    use super::*;

    const SEATS: usize = 5;
    const MEALS: usize = 3;

    /// Spin until the banker certifies the grab
    fn acquire(banker: &ProductionBanker, process: ProcessId, fork: ResourceId) {
        loop {
            match banker.request(process, fork, 1) {
                Ok(()) => return,
                Err(RequestError::InsufficientAvailable { .. })
                | Err(RequestError::WouldCauseUnsafeState { .. }) => thread::yield_now(),
                Err(err) => panic!("philosopher hit an argument error: {err}"),
            }
        }
    }

    #[test]
    fn test_all_philosophers_eat_and_finish() {
        let mut builder = BankerBuilder::new().capacities(&[1; SEATS]);
        for seat in 0..SEATS {
            let mut claim = [0; SEATS];
            claim[seat] = 1;
            claim[(seat + 1) % SEATS] = 1;
            builder = builder.process(&claim, &[0; SEATS]);
        }
        let banker = Arc::new(builder.build().unwrap());
        let meals = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..SEATS)
            .map(|seat| {
                let banker = Arc::clone(&banker);
                let meals = Arc::clone(&meals);
                thread::spawn(move || {
                    let process = ProcessId::new(seat);
                    let left = ResourceId::new(seat);
                    let right = ResourceId::new((seat + 1) % SEATS);
                    for _ in 0..MEALS {
                        acquire(&banker, process, left);
                        acquire(&banker, process, right);
                        meals.fetch_add(1, Ordering::Relaxed);
                        assert_eq!(banker.release(process, left, 1), Ok(1));
                        assert_eq!(banker.release(process, right, 1), Ok(1));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(meals.load(Ordering::Relaxed), SEATS * MEALS);
        assert_eq!(banker.snapshot().available(), &[1; SEATS]);
        assert!(banker.is_safe());
    }
}
