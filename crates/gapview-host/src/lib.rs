// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! gapview: Host side of the script bridge.
//!
//! Parses inbound script messages, dispatches them through the service
//! registry, and pumps handler results back into the script engine on the
//! engine's own thread.

pub mod call;
pub mod dispatcher;
pub mod identity;
pub mod router;
pub mod session;

#[cfg(test)]
mod testing;

pub use call::CommandCall;
pub use dispatcher::{Dispatched, Dispatcher};
pub use router::{ScriptEngine, ScriptPump, WriterEngine};
pub use session::BridgeSession;
