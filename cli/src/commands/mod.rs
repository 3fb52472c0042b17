// Copyright (c) 2026 Ernest contributors
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the Ernest CLI
//!
//! Every command that talks to the API on behalf of a user goes through
//! [`Context::authorize`], the single login check in front of the `Manager`.

pub mod datacenter;
pub mod docs;
pub mod group;
pub mod monitor;
pub mod preferences;
pub mod service;
pub mod session;
pub mod user;

use anyhow::Result;
use clap::Subcommand;
use ernest_sdk::Manager;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::Config;
use crate::error::CliError;

pub use self::datacenter::DatacenterCommand;
pub use self::group::GroupCommand;
pub use self::preferences::PreferencesCommand;
pub use self::service::ServiceCommand;
pub use self::user::UserCommand;

#[derive(Subcommand)]
pub enum Command {
    /// Configure the Ernest server to target
    Target {
        /// Server URL, e.g. https://ernest.example.com
        #[arg(value_name = "URL")]
        url: String,
    },

    /// Show the current target and login state
    Info,

    /// Log in to the targeted server
    Login(session::LoginArgs),

    /// Clear local authentication credentials
    Logout,

    /// Open the documentation in the default browser
    Docs,

    #[command(flatten)]
    Remote(RemoteCommand),
}

/// Commands that require a logged-in session.
#[derive(Subcommand)]
pub enum RemoteCommand {
    /// Datacenter operations
    Datacenter {
        #[command(subcommand)]
        command: DatacenterCommand,
    },

    /// Service operations
    Service {
        #[command(subcommand)]
        command: ServiceCommand,
    },

    /// Monitor a service while it is being built
    #[command(alias = "m")]
    Monitor {
        /// Service name
        #[arg(value_name = "SERVICE")]
        name: String,
    },

    /// User administration
    User {
        #[command(subcommand)]
        command: UserCommand,
    },

    /// Group administration
    Group {
        #[command(subcommand)]
        command: GroupCommand,
    },

    /// Ernest preferences
    Preferences {
        #[command(subcommand)]
        command: PreferencesCommand,
    },
}

/// Per-invocation state: the loaded config plus command-line overrides.
pub struct Context {
    pub config: Config,
    pub config_path: PathBuf,
    pub url_override: Option<String>,
    pub timeout: Option<Duration>,
}

/// A session that passed the login check.
pub struct AuthorizedSession {
    pub manager: Manager,
    pub url: String,
    pub token: String,
}

impl Context {
    pub fn load(
        config_path: Option<PathBuf>,
        url_override: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let config_path = Config::resolve_path(config_path);
        let config = Config::load(&config_path)?;
        Ok(Self {
            config,
            config_path,
            url_override: url_override.filter(|url| !url.is_empty()),
            timeout,
        })
    }

    pub fn url(&self) -> Result<String, CliError> {
        let url = self
            .url_override
            .clone()
            .unwrap_or_else(|| self.config.url.clone());
        if url.is_empty() {
            return Err(CliError::MissingUrl);
        }
        Ok(url)
    }

    pub fn manager(&self) -> Result<Manager> {
        let url = self.url()?;
        Ok(Manager::with_timeout(url, self.timeout)?)
    }

    /// Require a stored token and a target before any authenticated call.
    pub fn authorize(&self) -> Result<AuthorizedSession> {
        let session = self.config.session();
        if !session.is_authenticated() {
            return Err(CliError::NotLoggedIn.into());
        }

        let url = self.url()?;
        let manager = Manager::with_timeout(url.clone(), self.timeout)?;
        Ok(AuthorizedSession {
            manager,
            url,
            token: session.token,
        })
    }

    pub fn save(&self) -> Result<()> {
        self.config.save(&self.config_path)
    }
}

pub async fn dispatch(command: Command, mut ctx: Context) -> Result<()> {
    match command {
        Command::Target { url } => session::target(&mut ctx, &url),
        Command::Info => session::info(&ctx),
        Command::Login(args) => session::login(&mut ctx, args).await,
        Command::Logout => session::logout(&mut ctx).await,
        Command::Docs => docs::docs(),
        Command::Remote(command) => {
            let session = ctx.authorize()?;
            dispatch_remote(command, &session).await
        }
    }
}

async fn dispatch_remote(command: RemoteCommand, session: &AuthorizedSession) -> Result<()> {
    match command {
        RemoteCommand::Datacenter { command } => datacenter::handle_command(command, session).await,
        RemoteCommand::Service { command } => service::handle_command(command, session).await,
        RemoteCommand::Monitor { name } => monitor::monitor_service(&name, session).await,
        RemoteCommand::User { command } => user::handle_command(command, session).await,
        RemoteCommand::Group { command } => group::handle_command(command, session).await,
        RemoteCommand::Preferences { command } => {
            preferences::handle_command(command, session).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: Command,
    }

    fn context(token: &str, url: &str) -> Context {
        Context {
            config: Config {
                url: url.into(),
                token: token.into(),
                user: String::new(),
            },
            config_path: PathBuf::from("/nonexistent/config.yaml"),
            url_override: None,
            timeout: None,
        }
    }

    #[test]
    fn test_guard_rejects_missing_token() {
        let err = context("", "http://localhost:8080").authorize().err().unwrap();
        assert!(matches!(err.downcast_ref::<CliError>(), Some(CliError::NotLoggedIn)));
    }

    #[test]
    fn test_guard_rejects_missing_url() {
        let err = context("token", "").authorize().err().unwrap();
        assert!(matches!(err.downcast_ref::<CliError>(), Some(CliError::MissingUrl)));
    }

    #[test]
    fn test_guard_accepts_session() {
        let session = context("token", "http://localhost:8080").authorize().unwrap();
        assert_eq!(session.token, "token");
        assert_eq!(session.url, "http://localhost:8080");
    }

    #[test]
    fn test_url_override_wins() {
        let mut ctx = context("token", "http://stored");
        ctx.url_override = Some("http://override".into());
        assert_eq!(ctx.url().unwrap(), "http://override");
    }

    #[tokio::test]
    async fn test_remote_command_without_login_makes_no_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/services/")
            .expect(0)
            .create_async()
            .await;

        let cli = TestCli::try_parse_from(["ernest", "service", "list"]).unwrap();
        let result = dispatch(cli.command, context("", &server.url())).await;

        let err = result.unwrap_err();
        assert!(matches!(err.downcast_ref::<CliError>(), Some(CliError::NotLoggedIn)));
        mock.assert_async().await;
    }

    #[test]
    fn test_parse_flattened_commands() {
        let cli = TestCli::try_parse_from(["ernest", "m", "my_service"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Remote(RemoteCommand::Monitor { name }) if name == "my_service"
        ));

        let cli = TestCli::try_parse_from(["ernest", "target", "http://localhost"]).unwrap();
        assert!(matches!(cli.command, Command::Target { .. }));

        let cli = TestCli::try_parse_from(["ernest", "docs"]).unwrap();
        assert!(matches!(cli.command, Command::Docs));
    }
}
