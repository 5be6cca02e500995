//! Simple profiling counters using thread-local storage
//!
//! Move selections, leaf evaluation, BFS sweeps and move application are timed without
//! changing any function signature. Worker threads merge into global atomics.
//! Enable with environment variable: TRON_PROFILE=1

use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

thread_local! {
    static SEARCH_TIME: RefCell<u64> = RefCell::new(0);
    static SEARCH_COUNT: RefCell<usize> = RefCell::new(0);

    static EVAL_TIME: RefCell<u64> = RefCell::new(0);
    static EVAL_COUNT: RefCell<usize> = RefCell::new(0);

    static BFS_TIME: RefCell<u64> = RefCell::new(0);
    static BFS_COUNT: RefCell<usize> = RefCell::new(0);

    static APPLY_MOVE_TIME: RefCell<u64> = RefCell::new(0);
    static APPLY_MOVE_COUNT: RefCell<usize> = RefCell::new(0);
}

// Global aggregators
static GLOBAL_SEARCH_TIME: AtomicU64 = AtomicU64::new(0);
static GLOBAL_SEARCH_COUNT: AtomicUsize = AtomicUsize::new(0);
static GLOBAL_EVAL_TIME: AtomicU64 = AtomicU64::new(0);
static GLOBAL_EVAL_COUNT: AtomicUsize = AtomicUsize::new(0);
static GLOBAL_BFS_TIME: AtomicU64 = AtomicU64::new(0);
static GLOBAL_BFS_COUNT: AtomicUsize = AtomicUsize::new(0);
static GLOBAL_APPLY_MOVE_TIME: AtomicU64 = AtomicU64::new(0);
static GLOBAL_APPLY_MOVE_COUNT: AtomicUsize = AtomicUsize::new(0);

#[inline]
pub fn is_profiling_enabled() -> bool {
    std::env::var("TRON_PROFILE").is_ok()
}

/// Profiled section. Categories: "search" (one per move selection), "eval", "bfs", "apply_move".
pub struct ProfileGuard {
    start: Instant,
    category: &'static str,
}

impl ProfileGuard {
    pub fn new(category: &'static str) -> Option<Self> {
        if is_profiling_enabled() {
            Some(ProfileGuard {
                start: Instant::now(),
                category,
            })
        } else {
            None
        }
    }
}

impl Drop for ProfileGuard {
    fn drop(&mut self) {
        let elapsed_ns = self.start.elapsed().as_nanos() as u64;

        match self.category {
            "search" => {
                SEARCH_TIME.with(|t| *t.borrow_mut() += elapsed_ns);
                SEARCH_COUNT.with(|c| *c.borrow_mut() += 1);
            }
            "eval" => {
                EVAL_TIME.with(|t| *t.borrow_mut() += elapsed_ns);
                EVAL_COUNT.with(|c| *c.borrow_mut() += 1);
            }
            "bfs" => {
                BFS_TIME.with(|t| *t.borrow_mut() += elapsed_ns);
                BFS_COUNT.with(|c| *c.borrow_mut() += 1);
            }
            "apply_move" => {
                APPLY_MOVE_TIME.with(|t| *t.borrow_mut() += elapsed_ns);
                APPLY_MOVE_COUNT.with(|c| *c.borrow_mut() += 1);
            }
            _ => {}
        }
    }
}

fn drain(local: &'static std::thread::LocalKey<RefCell<u64>>, global: &AtomicU64) {
    local.with(|t| {
        global.fetch_add(*t.borrow(), Ordering::Relaxed);
        *t.borrow_mut() = 0;
    });
}

fn drain_count(local: &'static std::thread::LocalKey<RefCell<usize>>, global: &AtomicUsize) {
    local.with(|c| {
        global.fetch_add(*c.borrow(), Ordering::Relaxed);
        *c.borrow_mut() = 0;
    });
}

/// Folds this thread's counters into the global totals
pub fn merge_thread_local() {
    if !is_profiling_enabled() {
        return;
    }

    drain(&SEARCH_TIME, &GLOBAL_SEARCH_TIME);
    drain_count(&SEARCH_COUNT, &GLOBAL_SEARCH_COUNT);
    drain(&EVAL_TIME, &GLOBAL_EVAL_TIME);
    drain_count(&EVAL_COUNT, &GLOBAL_EVAL_COUNT);
    drain(&BFS_TIME, &GLOBAL_BFS_TIME);
    drain_count(&BFS_COUNT, &GLOBAL_BFS_COUNT);
    drain(&APPLY_MOVE_TIME, &GLOBAL_APPLY_MOVE_TIME);
    drain_count(&APPLY_MOVE_COUNT, &GLOBAL_APPLY_MOVE_COUNT);
}

fn print_line(label: &str, time_ns: u64, count: usize, total_ns: u64) {
    let ms = time_ns as f64 / 1_000_000.0;
    let pct = if total_ns > 0 { 100.0 * time_ns as f64 / total_ns as f64 } else { 0.0 };
    let avg_us = if count > 0 { time_ns as f64 / (count * 1000) as f64 } else { 0.0 };
    eprintln!(
        "  {:<12} {:.2}ms ({:.1}%) - {} calls, {:.2}µs avg",
        label, ms, pct, count, avg_us
    );
}

pub fn print_report(total_time_ms: u64) {
    if !is_profiling_enabled() {
        return;
    }

    let total_ns = total_time_ms * 1_000_000;

    eprintln!("\n═══════════════════════════════════════════════════════════");
    eprintln!("                 PERFORMANCE PROFILE");
    eprintln!("═══════════════════════════════════════════════════════════");
    eprintln!("Total Time: {}ms\n", total_time_ms);

    // One entry per move selection, inclusive of the whole tree below it
    print_line(
        "Move select:",
        GLOBAL_SEARCH_TIME.load(Ordering::Relaxed),
        GLOBAL_SEARCH_COUNT.load(Ordering::Relaxed),
        total_ns,
    );
    print_line(
        "Evaluation:",
        GLOBAL_EVAL_TIME.load(Ordering::Relaxed),
        GLOBAL_EVAL_COUNT.load(Ordering::Relaxed),
        total_ns,
    );
    print_line(
        "BFS sweeps:",
        GLOBAL_BFS_TIME.load(Ordering::Relaxed),
        GLOBAL_BFS_COUNT.load(Ordering::Relaxed),
        total_ns,
    );
    print_line(
        "Apply Move:",
        GLOBAL_APPLY_MOVE_TIME.load(Ordering::Relaxed),
        GLOBAL_APPLY_MOVE_COUNT.load(Ordering::Relaxed),
        total_ns,
    );

    eprintln!("═══════════════════════════════════════════════════════════\n");
}

/// This thread's pending count for a category, before merging
#[cfg(test)]
pub(crate) fn thread_local_count(category: &str) -> usize {
    match category {
        "search" => SEARCH_COUNT.with(|c| *c.borrow()),
        "eval" => EVAL_COUNT.with(|c| *c.borrow()),
        "bfs" => BFS_COUNT.with(|c| *c.borrow()),
        "apply_move" => APPLY_MOVE_COUNT.with(|c| *c.borrow()),
        _ => 0,
    }
}

#[macro_export]
macro_rules! profile {
    ($category:expr, $code:block) => {{
        let _guard = $crate::simple_profiler::ProfileGuard::new($category);
        $code
    }};
}
