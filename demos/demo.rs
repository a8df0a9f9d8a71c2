//! Demo application showing a live rate trend from a celled counter.
//!
//! Run with:
//! ```bash
//! RUST_LOG=celled_counter=trace cargo run --example demo --features demo -- --help
//! ```

use celled_counter::config::Config;
use celled_counter::counters::CelledCounter;
use celled_counter::snapshot::History;
use clap::Parser;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Demo application for celled-counter - lock-free sliding window counts.
///
/// Producer threads mark events with a load that ramps up and down, while
/// the main thread prints the most recent slices after each one closes.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of cells of history to keep
    #[arg(short, long, default_value = "10")]
    cells: usize,

    /// Width of one cell in milliseconds
    #[arg(short, long, default_value = "250")]
    slice_ms: u64,

    /// Number of producer threads
    #[arg(short, long, default_value = "4")]
    threads: usize,

    /// How long to run, in milliseconds
    #[arg(short, long, default_value = "5000")]
    duration_ms: u64,

    /// Counter name shown in the output
    #[arg(long, default_value = "events")]
    name: String,
}

/// Spawns producers that mark with a periodically changing pause.
fn spawn_producers(
    counter: &Arc<CelledCounter>,
    stop: &Arc<AtomicBool>,
    num_threads: usize,
) -> Vec<thread::JoinHandle<u64>> {
    (0..num_threads)
        .map(|i| {
            let counter = Arc::clone(counter);
            let stop = Arc::clone(stop);
            thread::spawn(move || {
                let started = Instant::now();
                let mut marks = 0u64;
                while !stop.load(Ordering::Relaxed) {
                    counter.mark();
                    marks += 1;

                    // Vary the load over a two second cycle
                    let phase = (started.elapsed().as_millis() % 2000) as u64;
                    let pause = 20 + (i as u64 * 10) + phase / 10;
                    thread::sleep(Duration::from_micros(pause));
                }
                marks
            })
        })
        .collect()
}

/// Renders one line of the trend, newest cell first.
fn render(history: &History) -> String {
    let peak = history.cells().iter().copied().max().unwrap_or(0).max(1);
    let bars: String = history
        .cells()
        .iter()
        .map(|v| {
            const LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
            let level = (*v * (LEVELS.len() as i64 - 1) / peak) as usize;
            LEVELS[level.min(LEVELS.len() - 1)]
        })
        .collect();

    format!(
        "{:>10} {} {:>10.1}/s  {:?}",
        history.name(),
        bars,
        history.rate_per_second(),
        history.cells()
    )
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter(Some("demo"), log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    let name: &'static str = Box::leak(args.name.clone().into_boxed_str());

    let config = Config::new()
        .with_cell_count(args.cells)
        .with_slice_duration(Duration::from_millis(args.slice_ms));

    let counter = match CelledCounter::with_config(config) {
        Ok(counter) => Arc::new(counter.with_name(name)),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    log::info!(
        "running {} producers for {} ms ({} cells of {} ms)",
        args.threads,
        args.duration_ms,
        args.cells,
        args.slice_ms
    );

    let stop = Arc::new(AtomicBool::new(false));
    let producers = spawn_producers(&counter, &stop, args.threads);

    let deadline = Instant::now() + Duration::from_millis(args.duration_ms);
    while Instant::now() < deadline {
        thread::sleep(counter.slice_duration());
        println!("{}", render(&counter.snapshot(counter.cell_count())));
    }

    stop.store(true, Ordering::Relaxed);
    let produced: u64 = producers.into_iter().map(|h| h.join().unwrap_or(0)).sum();

    // Close the slice that was open when the producers stopped
    thread::sleep(counter.slice_duration());
    println!("{}", render(&counter.snapshot(counter.cell_count())));

    log::info!(
        "produced {} marks over {} archived slices",
        produced,
        counter.archived_slices()
    );
}
