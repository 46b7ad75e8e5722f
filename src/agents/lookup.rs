//! Remote Agent Definitions
//!
//! Information Hiding:
//! - HTTP client and JSON decoding hidden behind a single fetch call
//! - No retry or caching; failures go straight to the caller

use super::Agent;
use crate::error::Result;
use reqwest::Client;

pub struct AgentLookup {
    client: Client,
}

impl AgentLookup {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// GET `url` and decode the body as an `Agent`
    pub async fn fetch_agent_definition(&self, url: &str) -> Result<Agent> {
        tracing::info!("Fetching agent definition from: {}", url);

        let agent = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<Agent>()
            .await?;

        tracing::debug!("Fetched agent with role '{}'", agent.role);
        Ok(agent)
    }
}

impl Default for AgentLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_agent_definition() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/agent.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "role": "Tester",
                "goal": "Verify components",
                "backstory": "Ensures code quality",
            })))
            .mount(&server)
            .await;

        let lookup = AgentLookup::new();
        let agent = lookup
            .fetch_agent_definition(&format!("{}/agent.json", server.uri()))
            .await
            .unwrap();

        assert_eq!(agent.role, "Tester");
        assert_eq!(agent.goal, "Verify components");
        assert!(!agent.allow_code_execution);
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = AgentLookup::new()
            .fetch_agent_definition(&format!("{}/missing.json", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Http(_)));
    }

    #[tokio::test]
    async fn test_malformed_definition_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "role": "Only role" })))
            .mount(&server)
            .await;

        let err = AgentLookup::new()
            .fetch_agent_definition(&server.uri())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Http(_)));
    }
}
