// Copyright (c) 2026 Ernest contributors
// SPDX-License-Identifier: AGPL-3.0

//! Service operations commands
//!
//! Commands: list, info, builds, build, destroy, reset

use anyhow::{Context as _, Result};
use clap::Subcommand;
use colored::Colorize;

use ernest_sdk::{ManagerError, MonitorTarget};

use super::{monitor, AuthorizedSession};
use crate::output;

#[derive(Subcommand)]
pub enum ServiceCommand {
    /// List services
    List,

    /// Show the current status of a service
    Info {
        /// Service name
        #[arg(value_name = "SERVICE")]
        name: String,
    },

    /// List the builds of a service
    Builds {
        /// Service name
        #[arg(value_name = "SERVICE")]
        name: String,
    },

    /// Show the status of one build of a service
    Build {
        /// Service name
        #[arg(value_name = "SERVICE")]
        name: String,

        /// Build identifier
        #[arg(value_name = "BUILD_ID")]
        build_id: String,
    },

    /// Destroy a service
    Destroy {
        /// Service name
        #[arg(value_name = "SERVICE")]
        name: String,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,

        /// Follow the destroy build until it finishes
        #[arg(long, overrides_with = "no_monitor")]
        monitor: bool,

        /// Return as soon as the destroy is accepted (default)
        #[arg(long, overrides_with = "monitor")]
        no_monitor: bool,
    },

    /// Reset an in-progress service so it can be rebuilt
    Reset {
        /// Service name
        #[arg(value_name = "SERVICE")]
        name: String,
    },
}

pub async fn handle_command(command: ServiceCommand, session: &AuthorizedSession) -> Result<()> {
    match command {
        ServiceCommand::List => list(session).await,
        ServiceCommand::Info { name } => info(&name, session).await,
        ServiceCommand::Builds { name } => builds(&name, session).await,
        ServiceCommand::Build { name, build_id } => build(&name, &build_id, session).await,
        ServiceCommand::Destroy {
            name,
            yes,
            monitor,
            no_monitor,
        } => destroy(&name, yes, monitor && !no_monitor, session).await,
        ServiceCommand::Reset { name } => reset(&name, session).await,
    }
}

async fn list(session: &AuthorizedSession) -> Result<()> {
    let services = session.manager.list_services(&session.token).await?;
    output::print_services(&services);
    Ok(())
}

async fn info(name: &str, session: &AuthorizedSession) -> Result<()> {
    let service = session.manager.service_status(&session.token, name).await?;
    output::print_service(&service);
    Ok(())
}

async fn builds(name: &str, session: &AuthorizedSession) -> Result<()> {
    let builds = session.manager.list_builds(&session.token, name).await?;
    output::print_builds(&builds);
    Ok(())
}

async fn build(name: &str, build_id: &str, session: &AuthorizedSession) -> Result<()> {
    let build = session
        .manager
        .service_build_status(&session.token, name, build_id)
        .await?;
    output::print_build(&build);
    Ok(())
}

async fn destroy(name: &str, yes: bool, follow: bool, session: &AuthorizedSession) -> Result<()> {
    if !yes {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(format!("Do you really want to destroy the service {}?", name))
            .default(false)
            .interact()
            .context("Failed to read confirmation")?;
        if !confirmed {
            println!("{}", "Aborted".yellow());
            return Ok(());
        }
    }

    session.manager.destroy(&session.token, name).await?;
    if !follow {
        println!("{}", format!("✓ Service {} destroy requested", name).green());
        println!("Run `ernest monitor {}` to follow its progress", name);
        return Ok(());
    }

    let destroyed = format!("✓ Service {} destroyed", name);
    match session
        .manager
        .resolve_monitor_target(&session.token, name)
        .await
    {
        Ok(MonitorTarget::Stream { build_id, .. }) => {
            monitor::follow_build(&build_id, session, &destroyed).await
        }
        // Nothing left to follow: the destroy already completed.
        Ok(MonitorTarget::AlreadyDone(_)) | Err(ManagerError::NotFound(_)) => {
            println!("{}", destroyed.green());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn reset(name: &str, session: &AuthorizedSession) -> Result<()> {
    session.manager.reset_service(&session.token, name).await?;
    println!("{}", format!("✓ Service {} has been reset", name).green());
    Ok(())
}
