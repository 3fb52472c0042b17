// Copyright (c) 2026 Ernest contributors
// SPDX-License-Identifier: AGPL-3.0

use anyhow::Result;
use clap::Subcommand;

use super::AuthorizedSession;
use crate::output;

#[derive(Subcommand)]
pub enum DatacenterCommand {
    /// List available datacenters
    List,
}

pub async fn handle_command(command: DatacenterCommand, session: &AuthorizedSession) -> Result<()> {
    match command {
        DatacenterCommand::List => {
            let datacenters = session.manager.list_datacenters(&session.token).await?;
            output::print_records("datacenters", &datacenters, &["name", "type", "region"]);
            Ok(())
        }
    }
}
