// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Collaborators handed to every handler at construction.

use std::sync::Arc;

use tokio::runtime::Handle;
use uuid::Uuid;

use gapview_bridge::{IsolatedStorage, PlatformBridge};
use gapview_core::BridgeConfig;

/// Everything a handler may need from the bridge session.
///
/// All fields are cheaply cloneable so handlers can move them into
/// continuations that outlive the invoking call.
#[derive(Clone)]
pub struct ServiceContext {
    pub bridge: Arc<dyn PlatformBridge>,
    pub storage: Arc<dyn IsolatedStorage>,
    pub config: BridgeConfig,
    /// Identity established before dispatch begins.
    pub device_id: Uuid,
    /// Runtime on which native completions are awaited.
    pub runtime: Handle,
}
