//! Performance benchmarks for the seat coordinator.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use usher::{Engine, EngineConfig, SeatId, SubscriptionHandle};

fn create_engine(seats: usize) -> Engine {
    Engine::new(EngineConfig {
        seat_count: seats,
        ..Default::default()
    })
}

/// Benchmark a full acquire/release cycle on one seat.
fn bench_lock_cycle(c: &mut Criterion) {
    let engine = create_engine(50);
    engine.login("ada").unwrap();
    let conn = engine.connect();

    c.bench_function("lock_cycle", |b| {
        b.iter(|| {
            engine
                .acquire_lock(black_box(SeatId(7)), conn.connection, "ada")
                .unwrap();
            engine.release_lock(SeatId(7), conn.connection).unwrap();
        })
    });
}

/// Benchmark a book/release cycle on one seat.
fn bench_booking_cycle(c: &mut Criterion) {
    let engine = create_engine(50);
    engine.login("ada").unwrap();
    let conn = engine.connect();

    c.bench_function("booking_cycle", |b| {
        b.iter(|| {
            engine
                .book(black_box(SeatId(7)), conn.connection, "ada")
                .unwrap();
            engine.release_booking(SeatId(7), "ada").unwrap();
        })
    });
}

/// Benchmark snapshot projection at varying table sizes.
fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot");

    for seats in [50, 200, 1000] {
        group.bench_with_input(BenchmarkId::new("seats", seats), &seats, |b, &seats| {
            let engine = create_engine(seats);
            b.iter(|| black_box(engine.snapshot()))
        });
    }

    group.finish();
}

/// Benchmark broadcast fan-out with varying subscriber counts.
fn bench_broadcast(c: &mut Criterion) {
    let mut group = c.benchmark_group("broadcast");

    for subscribers in [1, 10, 100] {
        group.bench_with_input(
            BenchmarkId::new("subscribers", subscribers),
            &subscribers,
            |b, &subscribers| {
                let engine = create_engine(50);
                engine.login("ada").unwrap();
                let conn = engine.connect();
                let handles: Vec<SubscriptionHandle> =
                    (0..subscribers).map(|_| engine.connect()).collect();

                b.iter(|| {
                    engine
                        .acquire_lock(SeatId(1), conn.connection, "ada")
                        .unwrap();
                    engine.release_lock(SeatId(1), conn.connection).unwrap();
                    // Keep buffers drained so fan-out stays on the fast path.
                    for handle in &handles {
                        while handle.try_recv().is_ok() {}
                    }
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_lock_cycle,
    bench_booking_cycle,
    bench_snapshot,
    bench_broadcast
);
criterion_main!(benches);
