use serde::Serialize;

use crate::data::{CrewId, SkillTotals};
use crate::optimizer::lineup::SeatAssignment;
use crate::optimizer::strategy::Strategy;
use crate::voyage::{ExtendResult, VoyageEstimate};

/// Serializable view of one strategy's lineup and its simulated voyage.
#[derive(Debug, Clone, Serialize)]
pub struct LineupSummary {
    pub strategy: Strategy,
    pub seats: Vec<SeatAssignment>,
    pub skill_totals: SkillTotals,
    pub voyage_score: u64,
    pub estimate: VoyageEstimate,
}

impl LineupSummary {
    pub fn median_hours(&self) -> f64 {
        self.estimate.median_hours()
    }

    pub fn crew(&self) -> impl Iterator<Item = CrewId> + '_ {
        self.seats.iter().filter_map(|row| row.crew)
    }
}

/// Strategy that could not fill every seat from the roster.
#[derive(Debug, Clone, Serialize)]
pub struct UnsatisfiedStrategy {
    pub strategy: Strategy,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StrategyComparison {
    pub ranked: Vec<LineupSummary>,
    pub unsatisfiable: Vec<UnsatisfiedStrategy>,
}

impl StrategyComparison {
    pub fn best(&self) -> Option<&LineupSummary> {
        self.ranked.first()
    }
}

/// Longest median first, then the 90% and 99% times; remaining ties fall
/// back to the weighted voyage score.
pub fn rank_lineups(mut summaries: Vec<LineupSummary>) -> Vec<LineupSummary> {
    summaries.sort_by(|left, right| {
        let (l, r) = (times(left), times(right));
        r.0.total_cmp(&l.0)
            .then_with(|| r.1.total_cmp(&l.1))
            .then_with(|| r.2.total_cmp(&l.2))
            .then_with(|| right.voyage_score.cmp(&left.voyage_score))
    });
    summaries
}

fn times(summary: &LineupSummary) -> (f64, f64, f64) {
    summary
        .estimate
        .first_leg()
        .map_or((0.0, 0.0, 0.0), |leg: &ExtendResult| {
            (leg.result, leg.safe_result, leg.safer_result)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(strategy: Strategy, times: [f64; 3], score: u64) -> LineupSummary {
        let [result, safe_result, safer_result] = times;
        LineupSummary {
            strategy,
            seats: Vec::new(),
            skill_totals: SkillTotals::default(),
            voyage_score: score,
            estimate: VoyageEstimate {
                extends: vec![ExtendResult {
                    extend: 0,
                    result,
                    safe_result,
                    safer_result,
                    last_checkpoint: 0,
                    checkpoint_chance: 100,
                    refill_cost: 0,
                    samples: 100,
                }],
                long_voyage_refill_cost: 0,
                long_voyage_refills: 0,
                trials: 100,
                non_convergent: 0,
            },
        }
    }

    #[test]
    fn ranks_by_median_then_safe_times() {
        let ranked = rank_lineups(vec![
            summary(Strategy::SkillMax, [8.0, 7.0, 6.0], 10),
            summary(Strategy::VoyTotal, [9.0, 7.0, 6.0], 10),
            summary(Strategy::PriSec, [8.0, 7.5, 6.0], 10),
            summary(Strategy::VoyTotalWeighted, [8.0, 7.5, 6.0], 20),
        ]);
        let order: Vec<Strategy> = ranked.iter().map(|s| s.strategy).collect();
        assert_eq!(
            order,
            vec![
                Strategy::VoyTotal,
                Strategy::VoyTotalWeighted,
                Strategy::PriSec,
                Strategy::SkillMax
            ]
        );
    }
}
