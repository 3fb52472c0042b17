// Copyright (c) 2026 Ernest contributors
// SPDX-License-Identifier: AGPL-3.0

//! User administration commands

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use ernest_sdk::NewUser;

use super::AuthorizedSession;
use crate::output;

#[derive(Subcommand)]
pub enum UserCommand {
    /// List users
    List,

    /// Create a user (requires administrator credentials)
    Create(CreateUserArgs),
}

#[derive(Args, Debug)]
pub struct CreateUserArgs {
    /// Login name of the new user
    #[arg(value_name = "USER")]
    pub user: String,

    /// Email address of the new user
    #[arg(long)]
    pub email: String,

    /// Display name (defaults to the login name)
    #[arg(long)]
    pub name: Option<String>,

    /// Password of the new user (prompted when omitted)
    #[arg(long)]
    pub password: Option<String>,

    /// Administrator user name
    #[arg(long)]
    pub admin_user: String,

    /// Administrator password (prompted when omitted)
    #[arg(long)]
    pub admin_password: Option<String>,
}

pub async fn handle_command(command: UserCommand, session: &AuthorizedSession) -> Result<()> {
    match command {
        UserCommand::List => {
            let users = session.manager.list_users(&session.token).await?;
            output::print_records("users", &users, &["id", "user_name", "group_name"]);
            Ok(())
        }
        UserCommand::Create(args) => create(args, session).await,
    }
}

async fn create(args: CreateUserArgs, session: &AuthorizedSession) -> Result<()> {
    let password = match args.password {
        Some(password) => password,
        None => prompt_password(&format!("Password for {}", args.user), true)?,
    };
    let admin_password = match args.admin_password {
        Some(password) => password,
        None => prompt_password(&format!("Password for {}", args.admin_user), false)?,
    };

    let user = NewUser {
        name: args.name.unwrap_or_else(|| args.user.clone()),
        email: args.email,
        user: args.user,
        password,
        admin_user: args.admin_user,
        admin_password,
    };

    session.manager.create_user(&session.token, &user).await?;
    println!("{}", format!("✓ User {} created", user.user).green());
    Ok(())
}

fn prompt_password(prompt: &str, confirm: bool) -> Result<String> {
    let mut input = dialoguer::Password::new().with_prompt(prompt);
    if confirm {
        input = input.with_confirmation("Repeat password", "Passwords do not match");
    }
    input.interact().context("Failed to read password")
}
