//! Trial batches for progress reporting. Each batch still runs its trials in
//! parallel; see [crate::voyage::ExtendAggregator::run_with_progress].

use std::ops::Range;

/// Splits trial indices `0..total` into at most `num_batches` contiguous
/// ranges. Sizes differ by at most one, larger ranges first.
///
/// # Example
/// ```
/// # use voyager::parallel::batch_ranges;
/// assert_eq!(batch_ranges(10, 3), vec![0..4, 4..7, 7..10]);
/// ```
pub fn batch_ranges(total: usize, num_batches: usize) -> Vec<Range<usize>> {
    let batches = num_batches.min(total);
    if batches == 0 {
        return Vec::new();
    }
    let (base, remainder) = (total / batches, total % batches);
    (0..batches)
        .scan(0, |start, batch| {
            let end = *start + base + usize::from(batch < remainder);
            let range = *start..end;
            *start = end;
            Some(range)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_split() {
        assert_eq!(batch_ranges(200, 4), vec![0..50, 50..100, 100..150, 150..200]);
    }

    #[test]
    fn more_batches_than_trials() {
        assert_eq!(batch_ranges(3, 10), vec![0..1, 1..2, 2..3]);
    }

    #[test]
    fn nothing_to_split() {
        assert!(batch_ranges(0, 5).is_empty());
        assert!(batch_ranges(10, 0).is_empty());
    }

    #[test]
    fn ranges_cover_every_trial_once() {
        let ranges = batch_ranges(5003, 40);
        assert_eq!(ranges.len(), 40);
        assert_eq!(ranges.first().map(|r| r.start), Some(0));
        assert_eq!(ranges.last().map(|r| r.end), Some(5003));
        assert!(ranges.windows(2).all(|pair| pair[0].end == pair[1].start));
    }
}
