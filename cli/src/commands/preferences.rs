// Copyright (c) 2026 Ernest contributors
// SPDX-License-Identifier: AGPL-3.0

//! Logger preference commands
//!
//! Commands: logger list, logger add, logger delete

use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use colored::Colorize;
use ernest_sdk::{Logger, LoggerType};

use super::AuthorizedSession;
use crate::error::CliError;
use crate::output;

#[derive(Subcommand)]
pub enum PreferencesCommand {
    /// Setup logger preferences
    Logger {
        #[command(subcommand)]
        command: LoggerCommand,
    },
}

#[derive(Subcommand)]
pub enum LoggerCommand {
    /// List active loggers
    List,

    /// Create or update a logger based on its type
    Add(LoggerArgs),

    /// Delete a logger based on its type
    Delete {
        #[arg(value_enum, value_name = "TYPE")]
        kind: LoggerKind,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LoggerKind {
    Basic,
    Logstash,
    Rollbar,
}

impl From<LoggerKind> for LoggerType {
    fn from(kind: LoggerKind) -> Self {
        match kind {
            LoggerKind::Basic => LoggerType::Basic,
            LoggerKind::Logstash => LoggerType::Logstash,
            LoggerKind::Rollbar => LoggerType::Rollbar,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct LoggerArgs {
    #[arg(value_enum, value_name = "TYPE")]
    pub kind: LoggerKind,

    /// Path of the logging file (basic)
    #[arg(long)]
    pub logfile: Option<String>,

    /// Logstash hostname
    #[arg(long)]
    pub hostname: Option<String>,

    /// Logstash port
    #[arg(long)]
    pub port: Option<u16>,

    /// Logstash timeout
    #[arg(long)]
    pub timeout: Option<u32>,

    /// Rollbar token
    #[arg(long)]
    pub token: Option<String>,

    /// Rollbar environment (default: development)
    #[arg(long)]
    pub env: Option<String>,
}

impl LoggerArgs {
    /// Validate the flags required by the logger type and build the logger.
    pub fn into_logger(self) -> Result<Logger, CliError> {
        fn required<T>(value: Option<T>, message: &str) -> Result<T, CliError> {
            value.ok_or_else(|| CliError::Invalid(message.to_string()))
        }

        let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());
        let non_zero_port = |value: Option<u16>| value.filter(|v| *v != 0);
        let non_zero_timeout = |value: Option<u32>| value.filter(|v| *v != 0);

        match self.kind {
            LoggerKind::Basic => Ok(Logger::Basic {
                logfile: required(
                    non_empty(self.logfile),
                    "You should specify a logfile with --logfile flag",
                )?,
            }),
            LoggerKind::Logstash => Ok(Logger::Logstash {
                hostname: required(
                    non_empty(self.hostname),
                    "You should specify a logstash hostname with --hostname flag",
                )?,
                port: required(
                    non_zero_port(self.port),
                    "You should specify a logstash port with --port flag",
                )?,
                timeout: required(
                    non_zero_timeout(self.timeout),
                    "You should specify a logstash timeout with --timeout flag",
                )?,
            }),
            LoggerKind::Rollbar => {
                let token = required(
                    non_empty(self.token),
                    "You should specify a rollbar token with --token flag",
                )?;
                Ok(Logger::rollbar(token, self.env))
            }
        }
    }
}

pub async fn handle_command(command: PreferencesCommand, session: &AuthorizedSession) -> Result<()> {
    match command {
        PreferencesCommand::Logger { command } => match command {
            LoggerCommand::List => {
                let loggers = session.manager.list_loggers(&session.token).await?;
                output::print_loggers(&loggers);
                Ok(())
            }
            LoggerCommand::Add(args) => {
                let logger = args.into_logger()?;
                session.manager.set_logger(&session.token, &logger).await?;
                println!("{}", "Logger successfully set up".green());
                Ok(())
            }
            LoggerCommand::Delete { kind } => {
                session
                    .manager
                    .delete_logger(&session.token, kind.into())
                    .await?;
                println!("{}", "Logger successfully deleted".green());
                Ok(())
            }
        },
    }
}
