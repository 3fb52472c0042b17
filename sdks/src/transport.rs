// Copyright (c) 2026 Ernest contributors
// SPDX-License-Identifier: AGPL-3.0

//! Single-shot HTTP transport used by [`crate::Manager`].

use async_trait::async_trait;
use reqwest::{Client, Method};
use std::time::Duration;
use tracing::debug;

use crate::error::ManagerError;

/// One request against the API, relative to the transport's base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
    pub token: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            token: None,
        }
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach a bearer token. Empty tokens are not sent.
    pub fn bearer(mut self, token: &str) -> Self {
        if !token.is_empty() {
            self.token = Some(token.to_string());
        }
        self
    }
}

/// Status code and body of a response, whatever the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue the request. Only failures to obtain a response are errors here;
    /// status classification belongs to the caller.
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ManagerError>;
}

/// [`Transport`] backed by a reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ManagerError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ManagerError::Connection(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ManagerError> {
        let url = format!("{}{}", self.base_url, request.path);

        let mut req = self.client.request(request.method.clone(), &url);
        if let Some(token) = &request.token {
            req = req.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            req = req.json(body);
        }

        let response = req
            .send()
            .await
            .map_err(|e| ManagerError::Connection(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ManagerError::Connection(format!("Failed to read response body: {}", e)))?;

        debug!(method = %request.method, path = %request.path, status, "API request completed");

        Ok(RawResponse { status, body })
    }
}
