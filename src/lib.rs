pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod i18n;
pub mod llm;
pub mod session;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use engine::workflow::{RunOutcome, launch, run};
pub use error::EngineError;
