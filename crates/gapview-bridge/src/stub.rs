// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for desktop/CI builds where native device APIs are unavailable.
//
// Every capability returns `PlatformUnavailable`; handlers turn that into an
// ERROR result so the script is still answered.

use gapview_core::error::{GapviewError, Result};

use crate::traits::*;

/// No-op bridge returned on platforms without a native capture stack.
pub struct StubBridge;

impl PlatformBridge for StubBridge {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }
}

impl NativeCamera for StubBridge {
    fn show_camera(&self, _reply: PhotoReply) -> Result<()> {
        tracing::warn!("NativeCamera::show_camera called on stub bridge");
        Err(GapviewError::PlatformUnavailable)
    }
}

impl NativeMediaLibrary for StubBridge {
    fn save_picture(&self, _name: &str, _bytes: &[u8]) -> Result<Picture> {
        tracing::warn!("NativeMediaLibrary::save_picture called on stub bridge");
        Err(GapviewError::PlatformUnavailable)
    }
}
