// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Capture service: take still images with the device camera and describe
// stored media files.
//
// `captureImage` returns as soon as the camera is on screen. Each native
// completion arrives on a oneshot reply awaited on the session runtime; the
// session lock is only held to advance the state machine, never while the
// camera is launched or a result is delivered.

pub mod media;
pub mod options;
pub mod session;

use std::io::Cursor;
use std::sync::{Arc, Mutex, MutexGuard};

use image::{ImageFormat, ImageReader};
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{debug, info, instrument, warn};

use gapview_bridge::{IsolatedStorage, PhotoResult, PlatformBridge, TaskResult};
use gapview_core::error::{GapviewError, Result};
use gapview_core::mime::{JPEG_MIME_TYPE, mime_type_for};
use gapview_core::{PluginResult, Status};

use crate::context::ServiceContext;
use crate::handler::{ActionTable, Command};
use crate::sink::CommandContext;

use media::{MediaFile, MediaFileData, file_name_of};
use options::{CaptureImageOptions, MediaFormatOptions};
use session::{BUSY_MESSAGE, CaptureSession, STORE_FAILED_MESSAGE, Step};

/// Message delivered when format data is requested for a missing or
/// unreadable file.
pub const FILE_NOT_FOUND_MESSAGE: &str = "File not found";

/// Handler instance for the `Capture` service.
pub struct Capture {
    shared: Arc<CaptureShared>,
}

/// State reachable from both the invoking call and native completions.
struct CaptureShared {
    bridge: Arc<dyn PlatformBridge>,
    storage: Arc<dyn IsolatedStorage>,
    runtime: Handle,
    folder: String,
    max_limit: u32,
    session: Mutex<CaptureSession>,
}

impl Command for Capture {
    const SERVICE: &'static str = "Capture";

    fn actions() -> ActionTable<Self> {
        ActionTable::new()
            .action("captureImage", Capture::capture_image)
            .action("getFormatData", Capture::get_format_data)
    }

    fn create(services: &ServiceContext) -> Self {
        Self {
            shared: Arc::new(CaptureShared {
                bridge: Arc::clone(&services.bridge),
                storage: Arc::clone(&services.storage),
                runtime: services.runtime.clone(),
                folder: services.config.capture_folder.clone(),
                max_limit: services.config.max_capture_limit,
                session: Mutex::new(CaptureSession::new()),
            }),
        }
    }
}

impl Capture {
    fn capture_image(&mut self, args: &str, ctx: CommandContext) {
        let step = {
            let mut session = self.shared.session();
            if let Err(ctx) = session.begin(ctx) {
                drop(session);
                warn!(callback_id = ctx.callback_id(), "capture requested while one is in flight");
                ctx.deliver(PluginResult::error(BUSY_MESSAGE));
                return;
            }
            match CaptureImageOptions::decode(args) {
                Ok(options) => {
                    if options.limit > i64::from(self.shared.max_limit) {
                        warn!(
                            requested = options.limit,
                            max = self.shared.max_limit,
                            "capture limit clamped"
                        );
                    }
                    let limit = options.effective_limit(self.shared.max_limit);
                    info!(limit, "starting capture session");
                    session.start(limit);
                    None
                }
                Err(e) => {
                    warn!(error = %e, "capture options did not decode");
                    session.reject_options(e.to_string())
                }
            }
        };
        match step {
            None => self.shared.launch(),
            step => self.shared.apply(step),
        }
    }

    #[instrument(skip(self, ctx), fields(callback_id = ctx.callback_id()))]
    fn get_format_data(&mut self, args: &str, ctx: CommandContext) {
        ctx.deliver(self.shared.format_data(args));
    }
}

impl CaptureShared {
    fn session(&self) -> MutexGuard<'_, CaptureSession> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Put the camera on screen and await its outcome on the runtime.
    fn launch(self: &Arc<Self>) {
        let (reply, outcome) = oneshot::channel();
        if let Err(e) = self.bridge.show_camera(reply) {
            warn!(error = %e, platform = self.bridge.platform_name(), "camera launch failed");
            let step = self.session().fail(e.to_string());
            self.apply(step);
            return;
        }
        self.session().launched();
        debug!("camera launched");

        let shared = Arc::clone(self);
        self.runtime.spawn(async move {
            // A reply dropped without an answer counts as an activity that
            // never completed.
            let result = outcome.await.unwrap_or_else(|_| PhotoResult::incomplete());
            shared.complete(result).await;
        });
    }

    /// Advance the session with one native outcome.
    async fn complete(self: &Arc<Self>, result: PhotoResult) {
        if !self.session().is_awaiting() {
            debug!("native outcome arrived with no capture session active");
            return;
        }
        if let Some(error) = result.error.as_deref() {
            let step = self.session().on_native_error(error);
            self.apply(step);
            return;
        }
        let step = match result.task_result {
            TaskResult::Ok => {
                let stored = self.store_off_runtime(result).await;
                self.settle(stored)
            }
            TaskResult::Cancel => self.session().on_cancel(),
            TaskResult::None => self.session().on_incomplete(),
        };
        self.apply(step);
    }

    /// Run the blocking store on the blocking pool.
    async fn store_off_runtime(self: &Arc<Self>, result: PhotoResult) -> Result<MediaFile> {
        let shared = Arc::clone(self);
        tokio::task::spawn_blocking(move || shared.store(&result))
            .await
            .map_err(|e| GapviewError::Bridge(format!("store task failed: {e}")))?
    }

    fn settle(&self, stored: Result<MediaFile>) -> Option<Step> {
        match stored {
            Ok(file) => self.session().on_captured(file),
            Err(e) => {
                warn!(error = %e, "captured image could not be stored");
                self.session().fail(STORE_FAILED_MESSAGE)
            }
        }
    }

    /// Save a captured image to the media library and the capture folder.
    fn store(&self, result: &PhotoResult) -> Result<MediaFile> {
        let file_name = file_name_of(&result.original_file_name);
        if file_name.is_empty() {
            return Err(GapviewError::Bridge("capture reported no file name".into()));
        }
        let picture = self.bridge.save_picture(file_name, &result.chosen_photo)?;
        let path = self
            .storage
            .save_in_folder(&self.folder, file_name, &result.chosen_photo)?;
        debug!(path = %path, size = picture.size, "captured image stored");
        Ok(MediaFile::new(&path, &picture))
    }

    fn apply(self: &Arc<Self>, step: Option<Step>) {
        match step {
            Some(Step::Relaunch) => self.launch(),
            Some(Step::Finish { ctx, result }) => {
                info!(status = %result.status(), callback_id = ctx.callback_id(), "capture session finished");
                ctx.deliver(result);
            }
            None => debug!("native outcome arrived with no capture session active"),
        }
    }

    fn format_data(&self, args: &str) -> PluginResult {
        if args.trim().is_empty() {
            return PluginResult::new(Status::JsonException);
        }
        let options = match MediaFormatOptions::decode(args) {
            Ok(options) => options,
            Err(e) => return PluginResult::with_message(Status::JsonException, e.to_string()),
        };
        if options.full_path.is_empty() {
            return PluginResult::new(Status::JsonException);
        }

        let mime_type = options
            .mime_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| mime_type_for(&options.full_path));
        if mime_type != JPEG_MIME_TYPE {
            debug!(mime_type, "format data requested for unsupported type");
            return PluginResult::new(Status::Error);
        }

        match self.jpeg_dimensions(&options.full_path) {
            Ok((width, height)) => {
                match PluginResult::object(Status::Ok, &MediaFileData::still_image(width, height)) {
                    Ok(result) => result,
                    Err(e) => PluginResult::error(e.to_string()),
                }
            }
            Err(e) => {
                debug!(path = %options.full_path, error = %e, "format data unavailable");
                PluginResult::error(FILE_NOT_FOUND_MESSAGE)
            }
        }
    }

    fn jpeg_dimensions(&self, path: &str) -> Result<(u32, u32)> {
        let bytes = self.storage.read_file(path)?;
        ImageReader::with_format(Cursor::new(bytes), ImageFormat::Jpeg)
            .into_dimensions()
            .map_err(|e| GapviewError::ImageDecode(e.to_string()))
    }
}
