pub mod context_compressor;
pub mod token_estimator;

pub use context_compressor::{CompressionOutcome, ContextCompressor};
pub use token_estimator::TokenEstimator;
