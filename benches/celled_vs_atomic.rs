use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use celled_counter::config::Config;
use celled_counter::counters::CelledCounter;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const NUM_THREADS: usize = 8;
const ITERATIONS_PER_THREAD: usize = 1_000_000;

fn bench_mark(c: &mut Criterion) {
    let mut group = c.benchmark_group("mark");

    group.bench_function(
        BenchmarkId::new(
            "CelledCounter (10 x 10s)",
            format!("{}threads x {}iter", NUM_THREADS, ITERATIONS_PER_THREAD),
        ),
        |b| {
            b.iter(|| {
                let counter = Arc::new(CelledCounter::new());
                let mut handles = vec![];

                for _ in 0..NUM_THREADS {
                    let counter_clone = Arc::clone(&counter);
                    let handle = thread::spawn(move || {
                        for _ in 0..ITERATIONS_PER_THREAD {
                            counter_clone.mark();
                        }
                    });
                    handles.push(handle);
                }

                for handle in handles {
                    handle.join().unwrap();
                }

                black_box(counter.in_flight())
            })
        },
    );

    // Slices short enough that producers keep racing to archive.
    group.bench_function(
        BenchmarkId::new(
            "CelledCounter (64 x 10us)",
            format!("{}threads x {}iter", NUM_THREADS, ITERATIONS_PER_THREAD),
        ),
        |b| {
            b.iter(|| {
                let config = Config::new()
                    .with_cell_count(64)
                    .with_slice_duration(Duration::from_micros(10));
                let counter = Arc::new(CelledCounter::with_config(config).unwrap());
                let mut handles = vec![];

                for _ in 0..NUM_THREADS {
                    let counter_clone = Arc::clone(&counter);
                    let handle = thread::spawn(move || {
                        for _ in 0..ITERATIONS_PER_THREAD {
                            counter_clone.mark();
                        }
                    });
                    handles.push(handle);
                }

                for handle in handles {
                    handle.join().unwrap();
                }

                black_box(counter.get_last(64))
            })
        },
    );

    group.bench_function(
        BenchmarkId::new(
            "AtomicI64 (single)",
            format!("{}threads x {}iter", NUM_THREADS, ITERATIONS_PER_THREAD),
        ),
        |b| {
            b.iter(|| {
                let counter = Arc::new(AtomicI64::new(0));
                let mut handles = vec![];

                for _ in 0..NUM_THREADS {
                    let counter_clone = Arc::clone(&counter);
                    let handle = thread::spawn(move || {
                        for _ in 0..ITERATIONS_PER_THREAD {
                            counter_clone.fetch_add(1, Ordering::Relaxed);
                        }
                    });
                    handles.push(handle);
                }

                for handle in handles {
                    handle.join().unwrap();
                }

                black_box(counter.load(Ordering::Relaxed))
            })
        },
    );

    group.finish();
}

criterion_group!(benches, bench_mark);
criterion_main!(benches);
