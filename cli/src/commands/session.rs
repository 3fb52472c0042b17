// Copyright (c) 2026 Ernest contributors
// SPDX-License-Identifier: AGPL-3.0

//! Target, info, login and logout.

use anyhow::{Context as _, Result};
use clap::Args;
use colored::Colorize;
use tracing::warn;

use super::Context;
use crate::error::CliError;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// User name (prompted when omitted)
    #[arg(short, long, env = "ERNEST_USER")]
    pub user: Option<String>,

    /// Password (prompted when omitted)
    #[arg(short, long)]
    pub password: Option<String>,
}

pub fn target(ctx: &mut Context, url: &str) -> Result<()> {
    let url = url.trim().trim_end_matches('/');
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(CliError::Invalid(format!(
            "Invalid target '{}': expected an http:// or https:// URL",
            url
        ))
        .into());
    }

    ctx.config.url = url.to_string();
    ctx.save()?;

    println!("{}", format!("Target set to {}", url).green());
    Ok(())
}

pub fn info(ctx: &Context) -> Result<()> {
    let url = ctx.url().unwrap_or_default();

    println!("{}", "Ernest:".bold());
    if url.is_empty() {
        println!("  Target: {}", "(not set)".dimmed());
    } else {
        println!("  Target: {}", url);
    }
    if ctx.config.session().is_authenticated() {
        println!("  User: {}", ctx.config.user);
        println!("  Session: {}", "logged in".green());
    } else {
        println!("  Session: {}", "logged out".yellow());
    }
    println!("  Config: {}", ctx.config_path.display());

    Ok(())
}

pub async fn login(ctx: &mut Context, args: LoginArgs) -> Result<()> {
    let manager = ctx.manager()?;

    let user = match args.user {
        Some(user) => user,
        None => dialoguer::Input::<String>::new()
            .with_prompt("Username")
            .interact_text()
            .context("Failed to read username")?,
    };
    let password = match args.password {
        Some(password) => password,
        None => dialoguer::Password::new()
            .with_prompt("Password")
            .interact()
            .context("Failed to read password")?,
    };

    let response = manager.login(&user, &password).await?;

    ctx.config.token = response.token;
    ctx.config.user = user.clone();
    ctx.save()?;

    println!("{}", format!("Welcome back {}", user).green());
    Ok(())
}

pub async fn logout(ctx: &mut Context) -> Result<()> {
    let session = ctx.authorize().map_err(|err| {
        if matches!(err.downcast_ref::<CliError>(), Some(CliError::NotLoggedIn)) {
            CliError::AlreadyLoggedOut.into()
        } else {
            err
        }
    })?;

    // The local session is cleared even if the server rejects the call.
    if let Err(e) = session.manager.logout(&session.token).await {
        warn!(error = %e, "Server-side logout failed");
        eprintln!("{}", format!("Warning: server logout failed: {}", e).yellow());
    }

    ctx.config.token.clear();
    ctx.config.user.clear();
    ctx.save()?;

    println!("{}", "Bye.".green());
    Ok(())
}
