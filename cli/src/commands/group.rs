// Copyright (c) 2026 Ernest contributors
// SPDX-License-Identifier: AGPL-3.0

use anyhow::Result;
use clap::Subcommand;

use super::AuthorizedSession;
use crate::output;

#[derive(Subcommand)]
pub enum GroupCommand {
    /// List groups
    List,
}

pub async fn handle_command(command: GroupCommand, session: &AuthorizedSession) -> Result<()> {
    match command {
        GroupCommand::List => {
            let groups = session.manager.list_groups(&session.token).await?;
            output::print_records("groups", &groups, &["id", "name"]);
            Ok(())
        }
    }
}
