//! Fixed-format RPG to fully-free conversion driver
//!
//! A library for converting legacy fixed-format RPG source members to
//! fully-free syntax by driving the ACVTRPGFRE command on a remote IBM i
//! system. Handles member discovery, object type resolution, command
//! assembly, result classification and conversion list bookkeeping.

pub mod models;
pub mod error;
pub mod config;
pub mod gateway;
pub mod session;
pub mod resolver;
pub mod command;
pub mod classifier;
pub mod orchestrator;
pub mod store;
pub mod progress;
pub mod report;
pub mod utils;
pub mod cli;

pub use config::Config;
pub use error::{Error, Result};
pub use models::{CommandParams, ConversionList, ConversionTarget, SourceMember};
pub use orchestrator::{convert_list, run_batch, BatchOptions, BatchRun};
pub use session::Session;

/// Main entry point for converting a target without prompts or progress
/// output. Loads the persisted parameters, connects, and runs the batch.
pub async fn convert_target(config: Config, target: &ConversionTarget) -> Result<BatchRun> {
    let mut session = Session::connect(config)?;
    let params = session.store().params()?;
    run_batch(&mut session, target, &params, &BatchOptions::default()).await
}
