//! Progress output on stdout

use std::path::Path;
use std::time::{Duration, Instant};

use crate::executor::Summary;

/// Progress printer; prints nothing in quiet mode
pub struct Progress {
    quiet: bool,
    start_time: Instant,
}

impl Progress {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            start_time: Instant::now(),
        }
    }

    pub fn print_setup(&self, target: &Path, processors: usize, solvers: usize, seed: u64) {
        if self.quiet {
            return;
        }
        println!("Writing to '{}'", target.display());
        println!("Using {} processors", processors);
        println!("{} profilers created (seed {})", solvers, seed);
    }

    pub fn print_start(&self, sizes: usize, inputs_per_size: usize, runs_per_input: usize) {
        if self.quiet {
            return;
        }
        println!(
            "Starting profiling on {} inputs, each {} times per profiler.",
            sizes * inputs_per_size,
            runs_per_input
        );
    }

    pub fn size_done(&self, cols: usize) {
        if self.quiet {
            return;
        }
        println!(
            "Inputs of size {} done ({} elapsed).",
            cols,
            format_duration(self.start_time.elapsed())
        );
    }

    pub fn print_summary(&self, summary: &Summary) {
        if self.quiet {
            return;
        }
        println!();
        println!("--- Summary ---");
        println!("Inputs: {}", summary.inputs);
        println!("Timed solves: {}", summary.solves);
        println!(
            "Elapsed wall-clock time: {}",
            format_duration(self.start_time.elapsed())
        );
    }
}

/// Format a Duration for display
fn format_duration(d: Duration) -> String {
    let micros = d.as_micros();
    if micros < 1000 {
        format!("{}µs", micros)
    } else if micros < 1_000_000 {
        format!("{:.2}ms", micros as f64 / 1000.0)
    } else if micros < 60_000_000 {
        format!("{:.2}s", micros as f64 / 1_000_000.0)
    } else {
        let secs = d.as_secs();
        format!("{}m{:02}s", secs / 60, secs % 60)
    }
}
