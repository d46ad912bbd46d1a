pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod progress;
pub mod protocol;
pub mod scanner;
pub mod session;
pub mod storage;

pub use config::AppConfig;
pub use engine::DedupEngine;
pub use error::Error;
pub use progress::{ProgressReporter, SilentReporter};
