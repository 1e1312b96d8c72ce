//! Benchmarks for logging through the facade
//!
//! Run with: cargo bench -p logfacade
//!
//! Compares structured and formatted logging, both for entries that are
//! filtered out and for entries written to an in-memory sink.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use logfacade::{default_config, fields, Environment, Level, Logger, MemorySink, Sink};

fn install_memory_handle(level: Level) -> MemorySink {
    let buffer = MemorySink::new();
    let config = default_config(Environment::Test)
        .with_level(level)
        .with_stacktrace_level(None);
    let logger = Logger::builder(config)
        .sink(Sink::memory(&buffer))
        .build()
        .expect("memory logger");
    logfacade::replace_handle(logger);
    buffer
}

// ============================================================================
// Filtered Entries
// ============================================================================

fn bench_filtered(c: &mut Criterion) {
    logfacade::set_environment(Environment::Test).expect("test environment");

    let mut group = c.benchmark_group("filtered");

    group.bench_function("debug_structured", |b| {
        let mut i = 0u64;
        b.iter(|| {
            i += 1;
            logfacade::debug("benchmark debug message", fields! { "iteration" => black_box(i) });
        })
    });

    group.bench_function("debug_formatted", |b| {
        let mut i = 0u64;
        b.iter(|| {
            i += 1;
            logfacade::debugf!("benchmark debug message {}", black_box(i));
        })
    });

    group.finish();
}

// ============================================================================
// Recorded Entries
// ============================================================================

fn bench_recorded(c: &mut Criterion) {
    let mut group = c.benchmark_group("recorded");

    let buffer = install_memory_handle(Level::Info);
    group.bench_function("info_structured", |b| {
        let mut i = 0u64;
        b.iter(|| {
            i += 1;
            logfacade::info("benchmark info message", fields! { "iteration" => black_box(i) });
            if i % 10_000 == 0 {
                buffer.clear();
            }
        })
    });

    group.bench_function("error_formatted", |b| {
        let mut i = 0u64;
        b.iter(|| {
            i += 1;
            logfacade::errorf!("benchmark error message {}", black_box(i));
            if i % 10_000 == 0 {
                buffer.clear();
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_filtered, bench_recorded);
criterion_main!(benches);
