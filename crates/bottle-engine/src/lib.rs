pub mod build;
pub mod config;
pub mod run;
pub mod types;

pub use build::{build_bottle, build_bottle_with_id};
pub use config::{BuildConfig, ConfigError, MaterialConfig, ThreadPolicy};
pub use run::{failure_message, run_script};
pub use types::*;
