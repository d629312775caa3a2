//! Property tests: any random operation sequence keeps the ledger lawful.
//!
//! Lawful means conservation holds per resource, holdings never exceed
//! declared claims, need stays maximum minus allocated, and the state
//! remains safe, since it starts safe and every grant is certified.

use proptest::prelude::*;
use tamias_core::domain::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Raw (process, resource, units, is_request) material; indices are
/// reduced modulo slightly-too-large bounds so out-of-range calls get
/// exercised alongside valid ones.
type RawOp = (usize, usize, Units, bool);

/// Generate capacities plus raw per-process claim material.
fn arb_instance() -> impl Strategy<Value = (Vec<Units>, Vec<Vec<Units>>)> {
    (1usize..5, 1usize..4).prop_flat_map(|(processes, resources)| {
        (
            prop::collection::vec(1u32..8, resources),
            prop::collection::vec(prop::collection::vec(0u32..8, resources), processes),
        )
    })
}

fn arb_ops() -> impl Strategy<Value = Vec<RawOp>> {
    prop::collection::vec((0usize..8, 0usize..8, 0u32..8, any::<bool>()), 0..50)
}

/// Assemble a banker with all-zero starting holdings; claims are clamped
/// to capacity so construction always succeeds.
fn build(capacities: &[Units], raw_claims: &[Vec<Units>]) -> ProductionBanker {
    let mut builder = BankerBuilder::new().capacities(capacities);
    for row in raw_claims {
        let claim: Vec<Units> = row
            .iter()
            .zip(capacities)
            .map(|(&raw, &capacity)| raw % (capacity + 1))
            .collect();
        builder = builder.process(&claim, &vec![0; capacities.len()]);
    }
    builder.build().unwrap()
}

fn drive(banker: &ProductionBanker, ops: &[RawOp]) {
    let processes = banker.num_processes();
    let resources = banker.num_resources();
    for &(p_raw, r_raw, units, is_request) in ops {
        let process = ProcessId::new(p_raw % (processes + 1));
        let resource = ResourceId::new(r_raw % (resources + 1));
        if is_request {
            let _ = banker.request(process, resource, units);
        } else {
            let _ = banker.release(process, resource, units);
        }
    }
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Conservation, the claim ceiling and need consistency survive any
    /// operation sequence, and the state never leaves the safe region.
    #[test]
    fn ledger_stays_lawful_under_arbitrary_operations(
        (capacities, raw_claims) in arb_instance(),
        ops in arb_ops(),
    ) {
        let banker = build(&capacities, &raw_claims);
        drive(&banker, &ops);

        let snapshot = banker.snapshot();
        for (r, &capacity) in capacities.iter().enumerate() {
            let held: Units = (0..snapshot.num_processes())
                .map(|p| snapshot.allocated_of(ProcessId::new(p))[r])
                .sum();
            prop_assert_eq!(snapshot.available()[r] + held, capacity);
        }
        for p in 0..snapshot.num_processes() {
            let process = ProcessId::new(p);
            let maximum = snapshot.maximum_of(process);
            let allocated = snapshot.allocated_of(process);
            let need = snapshot.need_of(process);
            for r in 0..snapshot.num_resources() {
                prop_assert!(allocated[r] <= maximum[r]);
                prop_assert_eq!(need[r], maximum[r] - allocated[r]);
            }
        }
        prop_assert!(banker.is_safe());
    }

    /// Release frees at most what is held and at most what was asked.
    #[test]
    fn release_clamps_to_holdings(
        (capacities, raw_claims) in arb_instance(),
        ops in arb_ops(),
        p_raw in 0usize..8,
        r_raw in 0usize..8,
        units in 0u32..16,
    ) {
        let banker = build(&capacities, &raw_claims);
        drive(&banker, &ops);

        let process = ProcessId::new(p_raw % banker.num_processes());
        let resource = ResourceId::new(r_raw % banker.num_resources());
        let held_before = banker.snapshot().allocated_of(process)[resource.as_usize()];

        let freed = banker.release(process, resource, units).unwrap();

        prop_assert!(freed <= held_before);
        prop_assert!(freed <= units);
        prop_assert_eq!(
            banker.snapshot().allocated_of(process)[resource.as_usize()],
            held_before - freed
        );
    }

    /// The oracle's order is stable and actually executable: replaying it
    /// reclaims every unit back to the declared capacities.
    #[test]
    fn safe_sequence_is_stable_and_executable(
        (capacities, raw_claims) in arb_instance(),
        ops in arb_ops(),
    ) {
        let banker = build(&capacities, &raw_claims);
        drive(&banker, &ops);

        let first = banker.find_safe_sequence();
        let second = banker.find_safe_sequence();
        prop_assert_eq!(
            first.as_ref().map(|s| s.order().to_vec()),
            second.as_ref().map(|s| s.order().to_vec())
        );

        let sequence = first.unwrap();
        let snapshot = banker.snapshot();
        let mut work: Vec<Units> = snapshot.available().to_vec();
        for process in sequence.order() {
            let need = snapshot.need_of(*process);
            prop_assert!(need.iter().zip(&work).all(|(n, w)| n <= w));
            for (w, held) in work.iter_mut().zip(snapshot.allocated_of(*process)) {
                *w += held;
            }
        }
        prop_assert_eq!(work, capacities);
    }

    /// A rejected request is a true no-op on the ledger.
    #[test]
    fn rejection_leaves_state_identical(
        (capacities, raw_claims) in arb_instance(),
        ops in arb_ops(),
        p_raw in 0usize..8,
        r_raw in 0usize..8,
        units in 0u32..16,
    ) {
        let banker = build(&capacities, &raw_claims);
        drive(&banker, &ops);

        let before = banker.snapshot();
        let process = ProcessId::new(p_raw % (banker.num_processes() + 1));
        let resource = ResourceId::new(r_raw % (banker.num_resources() + 1));
        if banker.request(process, resource, units).is_err() {
            prop_assert_eq!(banker.snapshot(), before);
        }
    }
}
