// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Result status taxonomy shared with the script side.
//
// The integer codes are a wire contract: the script-side result function
// switches on them, so the numbering must never change.

use std::fmt;

/// Status carried by every result envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    NoResult,
    /// Operation succeeded.
    Ok,
    /// Requested service name has no registered handler.
    ClassNotFound,
    IllegalAccess,
    Instantiation,
    MalformedUrl,
    IoException,
    /// Handler exists but does not recognise the action name.
    InvalidAction,
    /// Argument payload failed to decode into the action's schema.
    JsonException,
    /// Generic operation failure.
    Error,
}

impl Status {
    /// Every status, in wire-code order.
    pub const ALL: [Status; 10] = [
        Status::NoResult,
        Status::Ok,
        Status::ClassNotFound,
        Status::IllegalAccess,
        Status::Instantiation,
        Status::MalformedUrl,
        Status::IoException,
        Status::InvalidAction,
        Status::JsonException,
        Status::Error,
    ];

    /// Integer code sent to the script side.
    pub fn code(self) -> i32 {
        match self {
            Self::NoResult => 0,
            Self::Ok => 1,
            Self::ClassNotFound => 2,
            Self::IllegalAccess => 3,
            Self::Instantiation => 4,
            Self::MalformedUrl => 5,
            Self::IoException => 6,
            Self::InvalidAction => 7,
            Self::JsonException => 8,
            Self::Error => 9,
        }
    }

    /// Inverse of [`Status::code`].
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }

    /// Message used when an envelope carries no payload of its own.
    pub fn default_message(self) -> &'static str {
        match self {
            Self::NoResult => "No result",
            Self::Ok => "OK",
            Self::ClassNotFound => "Class not found",
            Self::IllegalAccess => "Illegal access",
            Self::Instantiation => "Instantiation error",
            Self::MalformedUrl => "Malformed url",
            Self::IoException => "IO error",
            Self::InvalidAction => "Invalid action",
            Self::JsonException => "JSON error",
            Self::Error => "Error",
        }
    }

    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
