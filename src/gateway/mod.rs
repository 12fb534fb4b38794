//! Remote execution gateway

mod http;

pub use http::HttpGateway;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::CommandResult;

/// Executes commands and SQL queries on the remote system.
///
/// The orchestrator only ever talks to this trait, so tests can substitute
/// a scripted implementation for the HTTP one.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Run one CL command string, capturing exit code and output streams.
    async fn run_command(&self, command: &str) -> Result<CommandResult>;

    /// Run one SQL statement, returning the result rows as JSON objects.
    async fn query(&self, sql: &str) -> Result<Vec<serde_json::Value>>;
}
