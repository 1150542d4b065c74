//! Real-world scenario benchmarks.
//!
//! Full renders as the CLI and editor perform them, one per key press.

mod kick;

pub use kick::bench_kick;
