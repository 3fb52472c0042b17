// Copyright (c) 2026 Ernest contributors
// SPDX-License-Identifier: AGPL-3.0

//! Ernest Rust SDK
//!
//! Client side of the Ernest orchestration API: the [`Manager`] issues one
//! request per remote operation and maps responses onto [`ManagerError`];
//! the [`Monitor`] follows a build's event stream until it ends.

pub mod client;
pub mod error;
pub mod events;
pub mod monitor;
pub mod transport;
pub mod types;

pub use client::{Manager, MonitorTarget, DEFAULT_TIMEOUT};
pub use error::ManagerError;
pub use events::{BuildEvent, EventDecoder, EventTooLarge, MAX_EVENT_SIZE};
pub use monitor::{Monitor, MonitorOutcome, MonitorState};
pub use transport::{ApiRequest, HttpTransport, RawResponse, Transport};
pub use types::*;
