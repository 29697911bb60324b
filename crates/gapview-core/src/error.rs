// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for gapview.

use thiserror::Error;

/// Top-level error type for all gapview operations.
///
/// Device-operation failures inside a handler never surface as this type on
/// the dispatch path: handlers turn them into result envelopes. What reaches
/// a caller as `GapviewError` is a host-side failure (storage, registration,
/// script invocation) or a contract violation.
#[derive(Debug, Error)]
pub enum GapviewError {
    // -- Dispatch --
    #[error("handler registration rejected: {0}")]
    Registration(String),

    #[error("result delivery for '{0}' has no callback id")]
    MissingCallbackId(String),

    #[error("bridge session has shut down")]
    SessionClosed,

    // -- Script engine --
    #[error("script invocation of '{function}' failed: {reason}")]
    ScriptInvocation { function: String, reason: String },

    // -- Media --
    #[error("image decoding failed: {0}")]
    ImageDecode(String),

    // -- Storage / persistence --
    #[error("file not found in isolated storage: {0}")]
    NotFound(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, GapviewError>;
