// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DebugConsole service: script-side logging. Never answers.

use tracing::info;

use crate::context::ServiceContext;
use crate::handler::{ActionTable, Command};
use crate::sink::CommandContext;

pub struct DebugConsole;

impl Command for DebugConsole {
    const SERVICE: &'static str = "DebugConsole";

    fn actions() -> ActionTable<Self> {
        ActionTable::new().action("log", DebugConsole::log)
    }

    fn create(_services: &ServiceContext) -> Self {
        DebugConsole
    }
}

impl DebugConsole {
    fn log(&mut self, args: &str, ctx: CommandContext) {
        info!(target: "gapview::script", callback_id = ctx.callback_id(), "{args}");
    }
}
