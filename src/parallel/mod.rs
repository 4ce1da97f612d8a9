pub mod batch;
pub mod cancel;
pub mod pool;

pub use batch::batch_ranges;
pub use cancel::CancellationToken;
pub use pool::WorkerPool;
