pub mod config;
pub mod estimate;
pub mod monte_carlo;
pub mod rng;
pub mod simulator;

pub use config::{SimulationConfig, DEFAULT_EXTENDS, DEFAULT_SIMS, DEFAULT_START_POOL, MIN_SIMS};
pub use estimate::{quick_estimate, QuickEstimate};
pub use monte_carlo::{estimate_voyage, ExtendAggregator, ExtendResult, VoyageEstimate};
pub use rng::Rng;
pub use simulator::{
    refill_cost, LongVoyage, TrialOutcome, VoyageSimulator, VoyageTrial, MAX_EXTENDS, MAX_TICKS,
    TICKS_PER_HOUR,
};

/// Formats fractional hours as `"{h}h {m}m"`.
pub fn format_duration(hours: f64) -> String {
    let whole = hours.floor();
    let minutes = ((hours - whole) * 60.0).floor();
    format!("{}h {}m", whole as u64, minutes as u64)
}
