// Copyright (c) 2026 Ernest contributors
// SPDX-License-Identifier: AGPL-3.0

//! The `Manager`: one method per remote operation of the Ernest API.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{check_status, ManagerError};
use crate::transport::{ApiRequest, HttpTransport, Transport};
use crate::types::{
    Build, BuildStatus, Datacenter, Group, Logger, LoggerType, LoginResponse, NewUser, Service,
    User,
};

/// Characters left as-is in a path segment (RFC 3986 unreserved).
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Request timeout applied when the caller does not choose one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// What the monitor command should do for a service.
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorTarget {
    /// The service already finished building; there is nothing to stream.
    AlreadyDone(Service),
    /// The service is still being worked on; stream events for `build_id`.
    Stream { service: Service, build_id: String },
}

/// Client for the Ernest API.
///
/// Holds no session state: the token is passed on every call, so a single
/// `Manager` may be shared between tasks.
#[derive(Clone)]
pub struct Manager {
    transport: Arc<dyn Transport>,
}

impl Manager {
    /// Create a manager for `base_url` with [`DEFAULT_TIMEOUT`].
    pub fn new(base_url: impl Into<String>) -> Result<Self, ManagerError> {
        Self::with_timeout(base_url, Some(DEFAULT_TIMEOUT))
    }

    /// Create a manager with an explicit request timeout (`None` disables it).
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ManagerError> {
        let transport = HttpTransport::new(base_url, timeout)?;
        Ok(Self::with_transport(Arc::new(transport)))
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    async fn execute(&self, request: ApiRequest) -> Result<String, ManagerError> {
        let path = request.path.clone();
        let response = self.transport.send(request).await?;
        check_status(response.status, response.body, &path)
    }

    async fn fetch<T>(&self, request: ApiRequest) -> Result<T, ManagerError>
    where
        T: DeserializeOwned + Default,
    {
        let path = request.path.clone();
        let body = self.execute(request).await?;
        decode(&body, &path)
    }

    /// Authenticate and obtain a session token.
    ///
    /// The server answers a successful login with `{"token": "..."}`.
    pub async fn login(&self, user: &str, password: &str) -> Result<LoginResponse, ManagerError> {
        #[derive(Deserialize)]
        struct TokenBody {
            #[serde(default)]
            token: String,
        }

        let request = ApiRequest::new(Method::POST, "/session/").json(serde_json::json!({
            "user_name": user,
            "user_password": password,
        }));
        let body = self.execute(request).await?;

        let parsed: TokenBody = serde_json::from_str(&body).map_err(|e| {
            ManagerError::Protocol(format!("Failed to parse login response: {}", e))
        })?;
        if parsed.token.is_empty() {
            return Err(ManagerError::Protocol(
                "Login response did not include a token".to_string(),
            ));
        }

        info!(user, "Logged in");
        Ok(LoginResponse {
            body,
            token: parsed.token,
        })
    }

    pub async fn logout(&self, token: &str) -> Result<(), ManagerError> {
        self.execute(ApiRequest::new(Method::DELETE, "/session/").bearer(token))
            .await?;
        Ok(())
    }

    pub async fn destroy(&self, token: &str, name: &str) -> Result<(), ManagerError> {
        let path = format!("/services/{}", segment(name)?);
        self.execute(ApiRequest::new(Method::DELETE, path).bearer(token))
            .await?;
        info!(service = name, "Destroy requested");
        Ok(())
    }

    pub async fn reset_service(&self, token: &str, name: &str) -> Result<(), ManagerError> {
        let path = format!("/services/{}/reset/", segment(name)?);
        self.execute(ApiRequest::new(Method::POST, path).bearer(token))
            .await?;
        Ok(())
    }

    pub async fn service_status(&self, token: &str, name: &str) -> Result<Service, ManagerError> {
        let path = format!("/services/{}", segment(name)?);
        self.fetch(ApiRequest::new(Method::GET, path).bearer(token))
            .await
    }

    pub async fn service_build_status(
        &self,
        token: &str,
        name: &str,
        build_id: &str,
    ) -> Result<Build, ManagerError> {
        let path = format!(
            "/services/{}/builds/{}",
            segment(name)?,
            segment(build_id)?
        );
        self.fetch(ApiRequest::new(Method::GET, path).bearer(token))
            .await
    }

    pub async fn list_datacenters(&self, token: &str) -> Result<Vec<Datacenter>, ManagerError> {
        self.fetch(ApiRequest::new(Method::GET, "/datacenters/").bearer(token))
            .await
    }

    pub async fn list_services(&self, token: &str) -> Result<Vec<Service>, ManagerError> {
        self.fetch(ApiRequest::new(Method::GET, "/services/").bearer(token))
            .await
    }

    pub async fn list_builds(&self, token: &str, name: &str) -> Result<Vec<Build>, ManagerError> {
        let path = format!("/services/{}/builds/", segment(name)?);
        self.fetch(ApiRequest::new(Method::GET, path).bearer(token))
            .await
    }

    pub async fn list_users(&self, token: &str) -> Result<Vec<User>, ManagerError> {
        self.fetch(ApiRequest::new(Method::GET, "/users/").bearer(token))
            .await
    }

    pub async fn list_groups(&self, token: &str) -> Result<Vec<Group>, ManagerError> {
        self.fetch(ApiRequest::new(Method::GET, "/clients/").bearer(token))
            .await
    }

    pub async fn create_user(&self, token: &str, user: &NewUser) -> Result<(), ManagerError> {
        let body = serde_json::to_value(user)
            .map_err(|e| ManagerError::InvalidRequest(format!("Failed to encode user: {}", e)))?;
        self.execute(
            ApiRequest::new(Method::POST, "/clients/")
                .bearer(token)
                .json(body),
        )
        .await?;
        info!(user = %user.user, "User created");
        Ok(())
    }

    pub async fn list_loggers(&self, token: &str) -> Result<Vec<Logger>, ManagerError> {
        self.fetch(ApiRequest::new(Method::GET, "/loggers/").bearer(token))
            .await
    }

    /// Create or replace the logger of `logger`'s type.
    pub async fn set_logger(&self, token: &str, logger: &Logger) -> Result<(), ManagerError> {
        let body = serde_json::to_value(logger)
            .map_err(|e| ManagerError::InvalidRequest(format!("Failed to encode logger: {}", e)))?;
        self.execute(
            ApiRequest::new(Method::POST, "/loggers/")
                .bearer(token)
                .json(body),
        )
        .await?;
        Ok(())
    }

    pub async fn delete_logger(
        &self,
        token: &str,
        logger_type: LoggerType,
    ) -> Result<(), ManagerError> {
        let path = format!("/loggers/{}", logger_type);
        self.execute(
            ApiRequest::new(Method::DELETE, path)
                .bearer(token)
                .json(serde_json::json!({ "type": logger_type })),
        )
        .await?;
        Ok(())
    }

    /// Look up a service and decide whether its build still needs monitoring.
    pub async fn resolve_monitor_target(
        &self,
        token: &str,
        name: &str,
    ) -> Result<MonitorTarget, ManagerError> {
        let service = self.service_status(token, name).await?;

        if service.status == BuildStatus::Done {
            debug!(service = name, "Service already built, nothing to monitor");
            return Ok(MonitorTarget::AlreadyDone(service));
        }

        let build_id = service
            .build_id()
            .map(str::to_string)
            .ok_or_else(|| {
                ManagerError::InvalidRequest(format!(
                    "Service '{}' has no build identifier (id: '{}')",
                    name, service.id
                ))
            })?;

        Ok(MonitorTarget::Stream { service, build_id })
    }
}

/// Percent-encode one caller-supplied path segment.
///
/// Dot segments are rejected because URL normalization would collapse them.
fn segment(value: &str) -> Result<String, ManagerError> {
    if value.is_empty() || value == "." || value == ".." {
        return Err(ManagerError::InvalidRequest(format!(
            "Invalid name '{}' in request path",
            value
        )));
    }
    Ok(utf8_percent_encode(value, SEGMENT).to_string())
}

/// Decode a structured body. Empty bodies decode to the type's default.
fn decode<T>(body: &str, path: &str) -> Result<T, ManagerError>
where
    T: DeserializeOwned + Default,
{
    if body.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(body)
        .map_err(|e| ManagerError::Protocol(format!("Unexpected response from {}: {}", path, e)))
}
