//! Fast PRNG for voyage trials. Uses SplitMix64 for throughput and good statistical quality.
//! Deterministic: same seed produces the same sequence. Not cryptographically secure.

const SPLITMIX64_GOLDEN: u64 = 0x9e3779b97f4a7c15;
const SPLITMIX64_M1: u64 = 0xbf58476d1ce4e5b9;
const SPLITMIX64_M2: u64 = 0x94d049bb133111eb;

#[derive(Debug, Clone, Copy)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Independent stream for trial `index` of a run seeded with `base_seed`.
    pub fn for_trial(base_seed: u64, index: u64) -> Self {
        Self::new(mix(base_seed ^ mix(index.wrapping_add(SPLITMIX64_GOLDEN))))
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(SPLITMIX64_GOLDEN);
        mix(self.state)
    }

    /// Uniform in `[0, 1)` from the top 53 bits.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Uniform integer in `[0, bound)`. `bound` must be non-zero.
    #[inline]
    pub fn below(&mut self, bound: u64) -> u64 {
        debug_assert!(bound > 0);
        ((u128::from(self.next_u64()) * u128::from(bound)) >> 64) as u64
    }

    /// Uniform integer in the half-open range `[lo, hi)`; returns `lo` when the range is empty.
    #[inline]
    pub fn range(&mut self, lo: u64, hi: u64) -> u64 {
        if hi <= lo {
            lo
        } else {
            lo + self.below(hi - lo)
        }
    }
}

#[inline]
fn mix(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(SPLITMIX64_M1);
    z = (z ^ (z >> 27)).wrapping_mul(SPLITMIX64_M2);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splitmix64_deterministic() {
        let mut a = Rng::new(7);
        let mut b = Rng::new(7);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn trial_streams_differ() {
        let mut a = Rng::for_trial(42, 0);
        let mut b = Rng::for_trial(42, 1);
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn range_is_half_open() {
        let mut rng = Rng::new(3);
        let mut saw_low = false;
        for _ in 0..10_000 {
            let roll = rng.range(10, 13);
            assert!((10..13).contains(&roll), "roll {roll} outside [10, 13)");
            saw_low |= roll == 10;
        }
        assert!(saw_low);
        assert_eq!(rng.range(5, 5), 5);
    }

    #[test]
    fn next_f64_in_unit_interval() {
        let mut rng = Rng::new(11);
        for _ in 0..10_000 {
            let x = rng.next_f64();
            assert!((0.0..1.0).contains(&x));
        }
    }
}
