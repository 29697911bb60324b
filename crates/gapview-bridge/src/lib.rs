// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! gapview: Native capability bridge abstractions.
//!
//! Defines the traits a command handler uses to reach the device (camera
//! activity, media library, isolated storage) plus the implementations that
//! ship with the crate: a stub for builds without a native capture stack, an
//! in-memory bridge for headless hosts and tests, and a directory-backed
//! isolated store.

pub mod memory;
pub mod storage;
pub mod stub;
pub mod traits;

use std::sync::Arc;

pub use traits::{
    IsolatedStorage, NativeCamera, NativeMediaLibrary, PhotoReply, PhotoResult, Picture,
    PlatformBridge, TaskResult,
};

/// Retrieves the bridge implementation for the target operating system.
///
/// Hosts embedding a real capture activity construct their own
/// `PlatformBridge` and hand it to the session directly; this is the
/// fallback used by the headless host.
pub fn platform_bridge() -> Arc<dyn PlatformBridge> {
    Arc::new(stub::StubBridge)
}
