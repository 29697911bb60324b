// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Capture session state machine.
//
//   Idle -> AwaitingOptionsDecode -> LaunchingCapture -> AwaitingNativeResult
//        -> (LaunchingCapture | Flushing) -> Idle
//
// The machine is pure: it never touches the camera or the script. Each
// transition returns a `Step` telling the handler what to do next, and every
// path that leaves the machine hands back the callback context of the
// `captureImage` call that started it, exactly once.

use tracing::{debug, warn};

use gapview_core::{PluginResult, Status};

use crate::sink::CommandContext;

use super::media::{CAST_MEDIA_FILE, MediaFile};

/// Message delivered when the user cancels before capturing anything.
pub const CANCELED_MESSAGE: &str = "Canceled.";
/// Message delivered when the activity ends without an outcome.
pub const INCOMPLETE_MESSAGE: &str = "Did not complete!";
/// Message delivered when a completed capture cannot be stored.
pub const STORE_FAILED_MESSAGE: &str = "Error capturing image.";
/// Message delivered to an overlapping `captureImage` call.
pub const BUSY_MESSAGE: &str = "Capture already in progress.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    AwaitingOptionsDecode,
    LaunchingCapture,
    AwaitingNativeResult,
    Flushing,
}

/// What the handler must do after a transition.
pub enum Step {
    /// Launch the capture activity again for the same session.
    Relaunch,
    /// The session is over: deliver `result` through `ctx`.
    Finish {
        ctx: CommandContext,
        result: PluginResult,
    },
}

/// Accumulator for one capture session.
pub struct CaptureSession {
    state: CaptureState,
    files: Vec<MediaFile>,
    limit: u32,
    ctx: Option<CommandContext>,
}

impl Default for CaptureSession {
    fn default() -> Self {
        Self {
            state: CaptureState::Idle,
            files: Vec::new(),
            limit: 1,
            ctx: None,
        }
    }
}

impl CaptureSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Files accumulated so far in the current session.
    pub fn files(&self) -> &[MediaFile] {
        &self.files
    }

    /// Claim the machine for a new `captureImage` call.
    ///
    /// Overlapping sessions are rejected: the caller gets its context back
    /// and the in-flight session is left alone.
    pub fn begin(&mut self, ctx: CommandContext) -> Result<(), CommandContext> {
        if self.state != CaptureState::Idle {
            return Err(ctx);
        }
        self.ctx = Some(ctx);
        self.state = CaptureState::AwaitingOptionsDecode;
        Ok(())
    }

    /// Options decoded: clear stale files and get ready to launch.
    pub fn start(&mut self, limit: u32) {
        self.files.clear();
        self.limit = limit.max(1);
        self.state = CaptureState::LaunchingCapture;
    }

    /// The capture activity is on screen.
    pub fn launched(&mut self) {
        self.state = CaptureState::AwaitingNativeResult;
    }

    /// Options failed to decode. No activity was launched.
    pub fn reject_options(&mut self, message: String) -> Option<Step> {
        self.finish(PluginResult::with_message(Status::JsonException, message))
    }

    /// True while a launched activity owes this session an outcome.
    pub fn is_awaiting(&self) -> bool {
        self.ctx.is_some() && self.state == CaptureState::AwaitingNativeResult
    }

    /// A capture completed and was stored.
    pub fn on_captured(&mut self, file: MediaFile) -> Option<Step> {
        if !self.accepts_outcome("captured") {
            return None;
        }
        self.files.push(file);
        if self.files.len() < self.limit as usize {
            debug!(captured = self.files.len(), limit = self.limit, "relaunching capture");
            self.state = CaptureState::LaunchingCapture;
            return Some(Step::Relaunch);
        }
        self.flush()
    }

    /// The user cancelled: partial progress still counts as success.
    pub fn on_cancel(&mut self) -> Option<Step> {
        if !self.accepts_outcome("cancel") {
            return None;
        }
        self.flush_or_fail(CANCELED_MESSAGE)
    }

    /// The activity ended without an OK or Cancel outcome.
    pub fn on_incomplete(&mut self) -> Option<Step> {
        if !self.accepts_outcome("incomplete") {
            return None;
        }
        self.flush_or_fail(INCOMPLETE_MESSAGE)
    }

    /// The activity reported an error. Accumulated files are discarded,
    /// not flushed.
    pub fn on_native_error(&mut self, error: &str) -> Option<Step> {
        if !self.accepts_outcome("error") {
            return None;
        }
        if !self.files.is_empty() {
            warn!(
                discarded = self.files.len(),
                error,
                "capture activity failed, discarding accumulated files"
            );
        }
        self.finish(PluginResult::new(Status::Error))
    }

    /// Launching or storing failed: end the session with an error.
    pub fn fail(&mut self, message: impl Into<String>) -> Option<Step> {
        self.finish(PluginResult::error(message))
    }

    fn accepts_outcome(&self, outcome: &str) -> bool {
        let accepted = self.is_awaiting();
        if !accepted {
            debug!(outcome, state = ?self.state, "ignoring native outcome outside an awaited launch");
        }
        accepted
    }

    fn flush_or_fail(&mut self, message: &str) -> Option<Step> {
        if self.files.is_empty() {
            self.finish(PluginResult::error(message))
        } else {
            self.flush()
        }
    }

    fn flush(&mut self) -> Option<Step> {
        self.state = CaptureState::Flushing;
        let files = std::mem::take(&mut self.files);
        debug!(count = files.len(), "flushing captured files");
        let result = match PluginResult::list(Status::Ok, &files) {
            Ok(result) => result.with_cast(CAST_MEDIA_FILE),
            Err(e) => PluginResult::error(format!("{STORE_FAILED_MESSAGE} ({e})")),
        };
        self.finish(result)
    }

    /// Return to Idle and hand back the session's context. `None` when no
    /// session was active, so a stray completion cannot deliver twice.
    fn finish(&mut self, result: PluginResult) -> Option<Step> {
        self.state = CaptureState::Idle;
        self.files.clear();
        let ctx = self.ctx.take()?;
        Some(Step::Finish { ctx, result })
    }
}
