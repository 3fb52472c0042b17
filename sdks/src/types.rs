// Copyright (c) 2026 Ernest contributors
// SPDX-License-Identifier: AGPL-3.0
//! Types
//!
//! Domain records exchanged with the Ernest API. All of them are owned by the
//! backend; the client only decodes what a single response carries.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Environment used for rollbar loggers when none is given.
pub const DEFAULT_ROLLBAR_ENVIRONMENT: &str = "development";

/// Connection details the CLI hands to the core on every call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub url: String,
    pub token: String,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }
}

/// Lifecycle state reported for services and builds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BuildStatus {
    #[default]
    Unknown,
    InProgress,
    Done,
    Errored,
    Other(String),
}

impl BuildStatus {
    /// No further progress events are expected once a build reaches this state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BuildStatus::Done | BuildStatus::Errored)
    }

    pub fn as_str(&self) -> &str {
        match self {
            BuildStatus::Unknown => "",
            BuildStatus::InProgress => "in_progress",
            BuildStatus::Done => "done",
            BuildStatus::Errored => "errored",
            BuildStatus::Other(s) => s,
        }
    }
}

impl From<String> for BuildStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "" => BuildStatus::Unknown,
            "in_progress" => BuildStatus::InProgress,
            "done" => BuildStatus::Done,
            "errored" => BuildStatus::Errored,
            _ => BuildStatus::Other(value),
        }
    }
}

impl From<BuildStatus> for String {
    fn from(value: BuildStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildStatus::Unknown => f.write_str("unknown"),
            other => f.write_str(other.as_str()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Service {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: BuildStatus,
    /// Fields the client does not interpret (datacenter, endpoint, version...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Service {
    /// The build identifier embedded in the service id (`<name>-<build>`).
    pub fn build_id(&self) -> Option<&str> {
        self.id.rsplit('-').next().filter(|segment| !segment.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Build {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub status: BuildStatus,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Opaque JSON object passed through to the CLI untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(pub Map<String, Value>);

impl Record {
    /// Render a field for display. Strings are returned unquoted.
    pub fn field(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

pub type User = Record;
pub type Group = Record;
pub type Datacenter = Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggerType {
    Basic,
    Logstash,
    Rollbar,
}

impl LoggerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoggerType::Basic => "basic",
            LoggerType::Logstash => "logstash",
            LoggerType::Rollbar => "rollbar",
        }
    }
}

impl fmt::Display for LoggerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A backend log sink. The server keeps at most one logger per type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Logger {
    Basic {
        #[serde(default)]
        logfile: String,
    },
    Logstash {
        #[serde(default)]
        hostname: String,
        #[serde(default)]
        port: u16,
        #[serde(default)]
        timeout: u32,
    },
    Rollbar {
        #[serde(default)]
        token: String,
        #[serde(default)]
        environment: String,
    },
}

impl Logger {
    /// Rollbar logger; an absent or empty environment becomes `development`.
    pub fn rollbar(token: impl Into<String>, environment: Option<String>) -> Self {
        let environment = environment
            .filter(|env| !env.is_empty())
            .unwrap_or_else(|| DEFAULT_ROLLBAR_ENVIRONMENT.to_string());
        Logger::Rollbar {
            token: token.into(),
            environment,
        }
    }

    pub fn logger_type(&self) -> LoggerType {
        match self {
            Logger::Basic { .. } => LoggerType::Basic,
            Logger::Logstash { .. } => LoggerType::Logstash,
            Logger::Rollbar { .. } => LoggerType::Rollbar,
        }
    }
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    /// Raw response body as returned by the server.
    pub body: String,
    pub token: String,
}

/// Payload for creating a user account; authorized by an administrator's credentials.
#[derive(Clone, Default, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    #[serde(rename = "user_name")]
    pub user: String,
    #[serde(rename = "user_password")]
    pub password: String,
    pub admin_user: String,
    pub admin_password: String,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("user", &self.user)
            .field("admin_user", &self.admin_user)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_id_is_last_hyphen_segment() {
        let service = Service {
            id: "my_service-1234567890".into(),
            ..Default::default()
        };
        assert_eq!(service.build_id(), Some("1234567890"));

        let nested = Service {
            id: "my-long-service-42".into(),
            ..Default::default()
        };
        assert_eq!(nested.build_id(), Some("42"));
    }

    #[test]
    fn test_build_id_missing() {
        assert_eq!(Service::default().build_id(), None);
        let trailing = Service {
            id: "broken-".into(),
            ..Default::default()
        };
        assert_eq!(trailing.build_id(), None);
    }

    #[test]
    fn test_status_wire_values() {
        let service: Service =
            serde_json::from_value(json!({"id": "a-1", "name": "a", "status": "done"})).unwrap();
        assert_eq!(service.status, BuildStatus::Done);
        assert!(service.status.is_terminal());

        let build: Build = serde_json::from_value(json!({"id": "1", "status": "syncing"})).unwrap();
        assert_eq!(build.status, BuildStatus::Other("syncing".into()));
        assert!(!build.status.is_terminal());
        assert_eq!(serde_json::to_value(&build.status).unwrap(), json!("syncing"));
    }

    #[test]
    fn test_service_keeps_unknown_fields() {
        let service: Service = serde_json::from_value(json!({
            "id": "web-7",
            "name": "web",
            "status": "in_progress",
            "endpoint": "10.0.0.1"
        }))
        .unwrap();
        assert_eq!(service.status, BuildStatus::InProgress);
        assert_eq!(service.extra.get("endpoint"), Some(&json!("10.0.0.1")));
    }

    #[test]
    fn test_logger_is_tagged_by_type() {
        let logger = Logger::Logstash {
            hostname: "10.50.1.1".into(),
            port: 5000,
            timeout: 50000,
        };
        assert_eq!(
            serde_json::to_value(&logger).unwrap(),
            json!({"type": "logstash", "hostname": "10.50.1.1", "port": 5000, "timeout": 50000})
        );

        let parsed: Logger =
            serde_json::from_value(json!({"type": "basic", "logfile": "/tmp/ernest.log"})).unwrap();
        assert_eq!(parsed.logger_type(), LoggerType::Basic);
    }

    #[test]
    fn test_rollbar_environment_defaults_to_development() {
        assert_eq!(
            Logger::rollbar("tok", None),
            Logger::Rollbar {
                token: "tok".into(),
                environment: "development".into()
            }
        );
        assert_eq!(
            Logger::rollbar("tok", Some(String::new())),
            Logger::rollbar("tok", None)
        );
        assert!(matches!(
            Logger::rollbar("tok", Some("production".into())),
            Logger::Rollbar { environment, .. } if environment == "production"
        ));
    }

    #[test]
    fn test_new_user_wire_names_and_redacted_debug() {
        let user = NewUser {
            name: "Jane".into(),
            email: "jane@example.com".into(),
            user: "jane".into(),
            password: "secret".into(),
            admin_user: "admin".into(),
            admin_password: "hunter2".into(),
        };
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["user_name"], "jane");
        assert_eq!(value["user_password"], "secret");
        assert!(!format!("{:?}", user).contains("hunter2"));
    }

    #[test]
    fn test_record_field_rendering() {
        let record: Record = serde_json::from_value(json!({"id": 3, "name": "dev", "x": null})).unwrap();
        assert_eq!(record.field("id").as_deref(), Some("3"));
        assert_eq!(record.field("name").as_deref(), Some("dev"));
        assert_eq!(record.field("x"), None);
        assert_eq!(record.field("missing"), None);
    }
}
