// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// gapview: Core types, result envelopes and error definitions shared across
// all crates.

pub mod config;
pub mod error;
pub mod mime;
pub mod result;
pub mod status;

pub use config::BridgeConfig;
pub use error::{GapviewError, Result};
pub use result::{Payload, PluginResult};
pub use status::Status;
