// Copyright (c) 2026 Ernest contributors
// SPDX-License-Identifier: AGPL-3.0
//! Ernest CLI library - exposes testable components
//!
//! # Architecture
//!
//! - **Layer:** Interface / Presentation Layer
//! - **Purpose:** Argument parsing, session persistence and rendering around
//!   the `ernest_sdk` core

pub mod commands;
pub mod config;
pub mod error;
pub mod output;
