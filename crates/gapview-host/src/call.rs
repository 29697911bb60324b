// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Inbound command envelope.
//
// Wire shape: `Service/action/callbackId/args`. Everything after the third
// separator is the argument payload, untouched, so payloads may themselves
// contain `/`. Anything else arriving on the channel (typically error text
// forwarded by the page's `window.onerror`) is not a command.

use gapview_commands::is_identifier;

const SEPARATOR: char = '/';

/// One decoded invocation from script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandCall {
    pub service: String,
    pub action: String,
    /// Empty when the script expects no callback.
    pub callback_id: String,
    /// Raw argument payload; decoded by the action itself.
    pub args: String,
}

impl CommandCall {
    /// Decode `raw`, or `None` when it is not command-shaped.
    ///
    /// Never fails on a malformed payload: argument decoding belongs to the
    /// action so its errors can be reported against the right callback id.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut fields = raw.splitn(4, SEPARATOR);
        let service = fields.next()?;
        let action = fields.next()?;
        let callback_id = fields.next()?;
        let args = fields.next().unwrap_or_default();

        if !is_identifier(service) || !is_identifier(action) {
            return None;
        }

        Some(Self {
            service: service.to_string(),
            action: action.to_string(),
            callback_id: callback_id.to_string(),
            args: args.to_string(),
        })
    }
}
