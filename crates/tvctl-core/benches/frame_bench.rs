//! Criterion benchmarks for the tvctl wire codecs.
//!
//! Run with:
//! ```bash
//! cargo bench --package tvctl-core --bench frame_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;
use tvctl_core::{decode_frame, OutboundMessage, PointerEvent};

const RESPONSE: &str = r#"{"type":"response","id":"command_17","payload":{"returnValue":true,"volume":12,"muted":false,"scenario":"mastervolume_tv_speaker"}}"#;

fn bench_decode(c: &mut Criterion) {
    c.bench_function("decode_frame/response", |b| {
        b.iter(|| decode_frame(black_box(RESPONSE)).unwrap())
    });
    c.bench_function("decode_frame/malformed", |b| {
        b.iter(|| decode_frame(black_box("{\"id\":")).is_err())
    });
}

fn bench_encode(c: &mut Criterion) {
    c.bench_function("encode/register", |b| {
        b.iter(|| {
            OutboundMessage::register(Some(black_box("abc123").to_string()))
                .to_json()
                .unwrap()
        })
    });
    c.bench_function("encode/request", |b| {
        b.iter(|| {
            OutboundMessage::request("command_1", "ssap://audio/setVolume", json!({"volume": 7}))
                .to_json()
                .unwrap()
        })
    });
    c.bench_function("encode/pointer_move", |b| {
        let event = PointerEvent::Move { dx: 12, dy: -7, drag: false };
        b.iter(|| black_box(&event).encode())
    });
}

criterion_group!(benches, bench_decode, bench_encode);
criterion_main!(benches);
