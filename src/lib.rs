pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod optimizer;
pub mod parallel;
pub mod voyage;

pub use error::VoyageError;
