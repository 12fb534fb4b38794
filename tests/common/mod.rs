//! Scripted gateway and fixtures shared by the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use std::path::Path;
use std::sync::Mutex;

use rpgfree::error::{Error, Result};
use rpgfree::gateway::Gateway;
use rpgfree::models::CommandResult;
use rpgfree::Config;

/// Gateway whose responses are scripted by substring. The first scripted
/// entry whose needle appears in the incoming command or SQL wins, so
/// register specific needles before generic ones. Every call is recorded.
pub struct MockGateway {
    commands: Vec<(String, CommandResult)>,
    queries: Vec<(String, Vec<serde_json::Value>)>,
    calls: Mutex<Vec<String>>,
}

impl MockGateway {
    pub fn new() -> MockGateway {
        MockGateway {
            commands: Vec::new(),
            queries: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn on_command(mut self, needle: &str, result: CommandResult) -> Self {
        self.commands.push((needle.to_string(), result));
        self
    }

    pub fn on_query(mut self, needle: &str, rows: Vec<serde_json::Value>) -> Self {
        self.queries.push((needle.to_string(), rows));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_matching(&self, needle: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.contains(needle))
            .count()
    }

    pub fn call_containing(&self, needle: &str) -> Option<String> {
        self.calls().into_iter().find(|call| call.contains(needle))
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn run_command(&self, command: &str) -> Result<CommandResult> {
        self.calls.lock().unwrap().push(command.to_string());
        for (needle, result) in &self.commands {
            if command.contains(needle) {
                return Ok(result.clone());
            }
        }
        Err(Error::GatewayResponse(format!(
            "unscripted command: {command}"
        )))
    }

    async fn query(&self, sql: &str) -> Result<Vec<serde_json::Value>> {
        self.calls.lock().unwrap().push(sql.to_string());
        for (needle, rows) in &self.queries {
            if sql.contains(needle) {
                return Ok(rows.clone());
            }
        }
        Err(Error::GatewayResponse(format!("unscripted query: {sql}")))
    }
}

pub fn ok_result(stdout: &str, stderr: &str) -> CommandResult {
    CommandResult {
        code: 0,
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
    }
}

pub fn failed_result(code: i32, stderr: &str) -> CommandResult {
    CommandResult {
        code,
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}

/// Configuration pointing the settings store into a scratch directory,
/// with a one-library search path for object type resolution.
pub fn test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.settings_file = dir.join("settings.json");
    config.connection.library_list = vec!["PRODLIB".to_string()];
    config
}
