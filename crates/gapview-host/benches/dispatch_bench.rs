// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the inbound parse path, the outbound envelope
// serialization, and a full dispatch-and-pump round trip.

use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use serde_json::json;

use gapview_bridge::memory::{MemoryBridge, MemoryStorage};
use gapview_core::{BridgeConfig, PluginResult, Status};
use gapview_host::{BridgeSession, CommandCall, ScriptEngine};

/// Engine that accepts every call and keeps nothing.
struct NullEngine;

impl ScriptEngine for NullEngine {
    fn invoke_script(&mut self, _function: &str, args: &[String]) -> gapview_core::Result<()> {
        black_box(args);
        Ok(())
    }
}

fn bench_parse(c: &mut Criterion) {
    let raw = r#"Capture/getFormatData/Capture12/{"fullPath":"CapturedImagesCache/WP_0001.jpg","type":"image/jpeg"}"#;
    c.bench_function("CommandCall::parse (command)", |b| {
        b.iter(|| {
            let call = CommandCall::parse(black_box(raw));
            assert!(call.is_some());
        });
    });

    let noise = "Uncaught ReferenceError: device is not defined at file:///www/index.html:12";
    c.bench_function("CommandCall::parse (diagnostic text)", |b| {
        b.iter(|| {
            assert!(CommandCall::parse(black_box(noise)).is_none());
        });
    });
}

fn bench_to_wire(c: &mut Criterion) {
    let files: Vec<_> = (0..10)
        .map(|n| {
            json!({
                "fileName": format!("WP_{n:04}.jpg"),
                "filePath": format!("CapturedImagesCache/WP_{n:04}.jpg"),
                "type": "image/jpeg",
                "lastModifiedDate": "2026-03-14T15:09:26+00:00",
                "size": 524_288
            })
        })
        .collect();
    let batch = PluginResult::list(Status::Ok, &files)
        .expect("list payload")
        .with_cast("navigator.device.capture._castMediaFile");

    c.bench_function("PluginResult::to_wire (10 media files)", |b| {
        b.iter(|| black_box(&batch).to_wire());
    });

    let status_only = PluginResult::new(Status::ClassNotFound);
    c.bench_function("PluginResult::to_wire (status only)", |b| {
        b.iter(|| black_box(&status_only).to_wire());
    });
}

fn bench_dispatch(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("runtime");
    let (bridge, _launches) = MemoryBridge::pair();
    let (mut session, mut pump) = BridgeSession::open(
        Arc::new(bridge),
        Arc::new(MemoryStorage::new()),
        BridgeConfig::default(),
        runtime.handle().clone(),
        NullEngine,
    )
    .expect("session");

    c.bench_function("dispatch + pump (Device/getDeviceInfo)", |b| {
        b.iter(|| {
            session
                .dispatch(black_box("Device/getDeviceInfo/Device1/"))
                .expect("dispatch");
            assert_eq!(pump.pump(), 1);
        });
    });
}

criterion_group!(benches, bench_parse, bench_to_wire, bench_dispatch);
criterion_main!(benches);
