// Copyright (c) 2026 Ernest contributors
// SPDX-License-Identifier: AGPL-3.0

//! CLI-level failures and their process exit statuses.

use ernest_sdk::ManagerError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("You're not allowed to perform this action, please log in")]
    NotLoggedIn,

    #[error("You're already logged out")]
    AlreadyLoggedOut,

    #[error("No target configured, run `ernest target <url>` first")]
    MissingUrl,

    #[error("{0}")]
    Invalid(String),

    #[error("Build failed: {0}")]
    BuildFailed(String),

    #[error("Lost connection to the build event stream")]
    Disconnected,

    #[error("Monitoring interrupted")]
    Interrupted,
}

/// Exit status for a failed command.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(err) = err.downcast_ref::<ManagerError>() {
        return match err {
            ManagerError::Auth(_) => 2,
            ManagerError::NotFound(_) => 3,
            ManagerError::Api { .. } => 4,
            ManagerError::Connection(_) => 5,
            ManagerError::Protocol(_) => 6,
            ManagerError::InvalidRequest(_) => 1,
        };
    }
    if let Some(err) = err.downcast_ref::<CliError>() {
        return match err {
            CliError::BuildFailed(_) => 7,
            CliError::Disconnected => 8,
            CliError::Interrupted => 130,
            _ => 1,
        };
    }
    1
}
