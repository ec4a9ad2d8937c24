//! HTTP implementation of the `BoxApi` port.
//!
//! Endpoints take the form `{base}/{token}/v1.0/{resource}[/{id}]`. The token
//! is part of the path, so URLs are never logged or included in errors.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder};

use crate::application::ports::BoxApi;
use crate::domain::{ApiResponse, BoxId, CreateSpec, JiffyError, Transition};

pub const API_VERSION: &str = "v1.0";

/// Per-request budget, connection included.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub struct HttpBoxApi {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpBoxApi {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("jiffyi/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn url(&self, resource: &str, id: Option<BoxId>) -> String {
        let mut url = format!("{}/{}/{API_VERSION}/{resource}", self.base_url, self.token);
        if let Some(id) = id {
            url.push('/');
            url.push_str(&id.to_string());
        }
        url
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> Result<ApiResponse> {
        tracing::debug!(request = what, "calling JiffyBox API");
        let response = request
            .send()
            .await
            .map_err(|e| JiffyError::Transport(e.without_url().to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| JiffyError::Transport(e.without_url().to_string()))?;
        tracing::trace!(request = what, %status, body = %body, "API reply");
        if !status.is_success() {
            return Err(JiffyError::Api {
                status: status.as_u16(),
                body,
            }
            .into());
        }
        let reply = serde_json::from_str(&body).map_err(|e| {
            JiffyError::UnexpectedResponse(format!("{what}: reply is not JSON ({e})"))
        })?;
        Ok(reply)
    }
}

impl BoxApi for HttpBoxApi {
    async fn list_boxes(&self) -> Result<ApiResponse> {
        self.send(self.client.get(self.url("jiffyBoxes", None)), "list boxes")
            .await
    }

    async fn get_box(&self, id: BoxId) -> Result<ApiResponse> {
        self.send(self.client.get(self.url("jiffyBoxes", Some(id))), "read box")
            .await
    }

    async fn create_box(&self, spec: &CreateSpec) -> Result<ApiResponse> {
        let request = self
            .client
            .post(self.url("jiffyBoxes", None))
            .form(&spec.form_fields());
        self.send(request, "create box").await
    }

    async fn transition_box(&self, id: BoxId, action: Transition) -> Result<ApiResponse> {
        let request = self
            .client
            .put(self.url("jiffyBoxes", Some(id)))
            .form(&[("status", action.as_str())]);
        self.send(request, "transition box").await
    }

    async fn delete_box(&self, id: BoxId) -> Result<ApiResponse> {
        self.send(self.client.delete(self.url("jiffyBoxes", Some(id))), "delete box")
            .await
    }

    async fn list_plans(&self) -> Result<ApiResponse> {
        self.send(self.client.get(self.url("plans", None)), "list plans")
            .await
    }

    async fn list_distributions(&self) -> Result<ApiResponse> {
        self.send(self.client.get(self.url("distributions", None)), "list distributions")
            .await
    }
}
