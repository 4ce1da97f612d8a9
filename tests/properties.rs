//! Property-based tests for lineup bookkeeping and percentile reduction.

use proptest::prelude::*;

use voyager::data::{CrewId, CrewRecord, Roster, SkillTotals, SKILL_COUNT};
use voyager::optimizer::{Lineup, Seat, SEAT_COUNT};
use voyager::voyage::{quick_estimate, refill_cost, ExtendResult, Rng};

fn roster_strategy() -> impl Strategy<Value = Roster> {
    prop::collection::vec(prop::array::uniform6(0..5000u32), 1..20).prop_map(|skills| {
        skills
            .into_iter()
            .enumerate()
            .map(|(id, values)| CrewRecord::new(id as u64, format!("crew {id}"), SkillTotals::new(values)))
            .collect()
    })
}

/// (seat index, crew id, vacate instead of assign)
fn ops_strategy() -> impl Strategy<Value = Vec<(usize, u64, bool)>> {
    prop::collection::vec((0..SEAT_COUNT, 0..24u64, prop::bool::weighted(0.2)), 0..60)
}

fn expected_totals(lineup: &Lineup<'_>, roster: &Roster) -> [u32; SKILL_COUNT] {
    let mut totals = [0u32; SKILL_COUNT];
    for id in lineup.assigned() {
        let record = roster.get(id).expect("seated crew is in the roster");
        for (slot, value) in totals.iter_mut().zip(record.skills.values()) {
            *slot += value;
        }
    }
    totals
}

fn sorted_times() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0..40.0f64, 1..400).prop_map(|mut times| {
        times.sort_by(f64::total_cmp);
        times
    })
}

proptest! {
    // 1. No crew member ever holds two seats, and totals track the seated crew
    #[test]
    fn lineup_stays_consistent(roster in roster_strategy(), ops in ops_strategy()) {
        let mut lineup = Lineup::new(&roster);
        for (seat_index, crew, vacate) in ops {
            let seat = Seat::ALL[seat_index];
            if vacate {
                lineup.vacate(seat);
            } else {
                let known = roster.get(CrewId(crew)).is_some();
                prop_assert_eq!(lineup.assign(seat, CrewId(crew)).is_ok(), known);
                if known {
                    prop_assert_eq!(lineup.occupant(seat), Some(CrewId(crew)));
                }
            }

            let mut seated: Vec<CrewId> = lineup.assigned().collect();
            let count = seated.len();
            seated.sort_by_key(|id| id.0);
            seated.dedup();
            prop_assert_eq!(seated.len(), count);
            prop_assert_eq!(lineup.skill_totals().values(), expected_totals(&lineup, &roster));
        }
    }

    // 2. Percentiles of an ascending sample are ordered
    #[test]
    fn percentiles_ordered(times in sorted_times()) {
        let result = ExtendResult::from_sorted(0, &times, 0);
        prop_assert!(result.safer_result <= result.safe_result);
        prop_assert!(result.safe_result <= result.result);
        prop_assert!(result.checkpoint_chance >= 1 && result.checkpoint_chance <= 100);
        prop_assert_eq!(result.last_checkpoint % 2, 0);
        prop_assert_eq!(result.samples, times.len());
    }

    // 3. Quick estimates are ordered by confidence
    #[test]
    fn quick_estimate_ordered(skills in prop::array::uniform6(1..20000u32), pool in 1..5000u32) {
        let estimate = quick_estimate(skills, pool).expect("positive inputs");
        prop_assert!(estimate.safer_result <= estimate.safe_result);
        prop_assert!(estimate.safe_result <= estimate.result);
    }

    // 4. Refill cost never decreases with voyage length
    #[test]
    fn refill_cost_monotone(a in 0.0..50.0f64, b in 0.0..50.0f64) {
        let (short, long) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(refill_cost(short) <= refill_cost(long));
    }

    // 5. Rolls stay in the half-open range
    #[test]
    fn roll_in_half_open_range(seed in any::<u64>(), lo in 0..10_000u64, width in 1..5_000u64) {
        let mut rng = Rng::new(seed);
        let roll = rng.range(lo, lo + width);
        prop_assert!(roll >= lo && roll < lo + width);
    }
}
