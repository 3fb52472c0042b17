// Copyright (c) 2026 Ernest contributors
// SPDX-License-Identifier: AGPL-3.0

//! `ernest docs`: open the documentation in the default browser.

use anyhow::Result;
use colored::Colorize;
use std::fmt::Display;
use tracing::warn;

pub const DOCS_URL: &str = "http://ernest.io/documentation/";

pub fn docs() -> Result<()> {
    open_docs(|url| opener::open_browser(url))
}

/// A browser that fails to start is not an error; the URL is printed instead.
fn open_docs<F, E>(open: F) -> Result<()>
where
    F: FnOnce(&str) -> Result<(), E>,
    E: Display,
{
    if let Err(e) = open(DOCS_URL) {
        warn!(error = %e, "Failed to launch browser");
        println!(
            "{}",
            format!("Could not open a browser. The documentation is at {}", DOCS_URL).yellow()
        );
    }
    Ok(())
}
