//! HTTP transport for the remote execution service

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::Gateway;
use crate::error::{Error, Result};
use crate::models::CommandResult;

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    rows: Vec<serde_json::Value>,
}

/// Gateway speaking to the remote execution service over JSON/HTTP.
///
/// `POST {base}/command` runs a CL command, `POST {base}/query` runs SQL.
/// No request timeout is set: a conversion of a large member can legitimately
/// run for minutes and the remote side enforces its own job limits.
pub struct HttpGateway {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpGateway {
    pub fn new(base_url: &str, token: Option<&str>) -> Result<HttpGateway> {
        let client = Client::builder().build()?;
        Ok(HttpGateway {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(str::to_string),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, body: serde_json::Value) -> Result<T> {
        let mut request = self.client.post(self.endpoint(path)).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::GatewayStatus {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|err| Error::GatewayResponse(format!("{err} in: {text}")))
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn run_command(&self, command: &str) -> Result<CommandResult> {
        debug!(command, "running remote command");
        self.post("command", json!({ "command": command })).await
    }

    async fn query(&self, sql: &str) -> Result<Vec<serde_json::Value>> {
        debug!(sql, "running remote query");
        let response: QueryResponse = self.post("query", json!({ "sql": sql })).await?;
        Ok(response.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_creation() {
        let gateway = HttpGateway::new("http://dev400:8022/", None);
        assert!(gateway.is_ok());
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let gateway = HttpGateway::new("http://dev400:8022/", Some("secret")).unwrap();
        assert_eq!(gateway.endpoint("command"), "http://dev400:8022/command");
        assert_eq!(gateway.endpoint("query"), "http://dev400:8022/query");
    }
}
