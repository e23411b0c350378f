// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Blocking REST client for the project API.
//!
//! Calls block the current thread, so the viewer only issues them from
//! worker threads (see [`crate::io::worker`]).

use crate::error::{ApiError, ErrorBody};
use crate::models::project::{Project, ProjectId, ProjectPatch};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Operations the viewer needs from the project API.
pub trait ProjectApi: Send + Sync {
    fn list_projects(&self) -> Result<Vec<Project>, ApiError>;

    fn get_project(&self, id: ProjectId) -> Result<Project, ApiError>;

    fn update_project(&self, id: ProjectId, patch: &ProjectPatch) -> Result<Project, ApiError>;
}

/// HTTP implementation of [`ProjectApi`].
pub struct ApiClient {
    base_url: String,
    agent: ureq::Agent,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl ProjectApi for ApiClient {
    fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        read_json(self.agent.get(&self.url("/api/projects")).call())
    }

    fn get_project(&self, id: ProjectId) -> Result<Project, ApiError> {
        read_json(self.agent.get(&self.url(&format!("/api/projects/{}", id))).call())
    }

    fn update_project(&self, id: ProjectId, patch: &ProjectPatch) -> Result<Project, ApiError> {
        let url = self.url(&format!("/api/projects/{}", id));
        read_json(self.agent.request("PATCH", &url).send_json(patch))
    }
}

/// Turn a ureq outcome into a decoded body or an [`ApiError`].
fn read_json<T: DeserializeOwned>(outcome: Result<ureq::Response, ureq::Error>) -> Result<T, ApiError> {
    match outcome {
        Ok(response) => response
            .into_json::<T>()
            .map_err(|e| ApiError::Decode(e.to_string())),
        Err(ureq::Error::Status(status, response)) => {
            let message = response
                .into_json::<ErrorBody>()
                .map(|body| body.message)
                .unwrap_or_else(|_| format!("HTTP {}", status));
            Err(ApiError::from_status(status, message))
        }
        Err(ureq::Error::Transport(transport)) => Err(ApiError::Transport(transport.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_ignored() {
        let client = ApiClient::new("http://localhost:5174/");
        assert_eq!(client.url("/api/projects"), "http://localhost:5174/api/projects");
    }

    #[test]
    fn test_unreachable_server_is_transport_error() {
        // Port 9 (discard) is closed on loopback in test environments.
        let client = ApiClient::new("http://127.0.0.1:9");
        assert!(matches!(client.list_projects(), Err(ApiError::Transport(_))));
    }
}
