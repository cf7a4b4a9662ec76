use criterion::{black_box, criterion_group, criterion_main, Criterion};

use lazyjson::Options;

const EVENT: &str = r#"{
    "timestamp": "2024-03-12T08:15:00Z",
    "level": "error",
    "message": "request failed",
    "tags": ["http", "upstream", "timeout"],
    "context": {
        "request_id": "b1946ac9-2b5a-4c3e-8e7a-0f1c2d3e4f5a",
        "retries": 3,
        "duration_ms": 1523.4,
        "upstream": "{\"host\":\"api.internal\",\"port\":443,\"healthy\":false}"
    },
    "stack": [
        {"fn": "handle_request", "line": 42},
        {"fn": "call_upstream", "line": 108},
        {"fn": "http_send", "line": 271}
    ]
}"#;

fn from_bytes(c: &mut Criterion) {
    let input = EVENT.as_bytes();
    c.bench_function("from_bytes", |b| {
        b.iter(|| lazyjson::from_bytes(black_box(input), Options::default()))
    });
}

fn get_path(c: &mut Criterion) {
    let node = lazyjson::from_bytes(EVENT.as_bytes(), Options::default());
    c.bench_function("get_path", |b| {
        b.iter(|| black_box(&node).get_path("context.upstream.port").as_i64().unwrap())
    });
}

fn array_for_each(c: &mut Criterion) {
    let node = lazyjson::from_bytes(EVENT.as_bytes(), Options::default());
    let stack = node.get("stack");
    c.bench_function("array_for_each", |b| {
        b.iter(|| {
            let mut lines = 0i64;
            black_box(&stack).array_for_each(|_, frame| {
                lines += frame.get("line").as_i64().unwrap_or(0);
                true
            });
            lines
        })
    });
}

fn decode_struct(c: &mut Criterion) {
    #[derive(Default)]
    struct Frame {
        func: String,
        line: i64,
    }

    impl lazyjson::Struct for Frame {
        fn fields() -> Vec<lazyjson::Field<Self>> {
            vec![
                lazyjson::Field::new("fn", |t, n| {
                    t.func = n.decode()?;
                    Ok(())
                }),
                lazyjson::Field::new("line", |t, n| {
                    t.line = n.decode()?;
                    Ok(())
                }),
            ]
        }
    }

    let node = lazyjson::from_bytes(EVENT.as_bytes(), Options::default());
    let frame = node.get_path("stack[0]");

    c.bench_function("decode_struct", |b| {
        b.iter(|| black_box(&frame).decode::<Frame>().unwrap())
    });
}

criterion_group!(benches, from_bytes, get_path, array_for_each, decode_struct);
criterion_main!(benches);
