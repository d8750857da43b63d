//! Stage timing for packaging runs.

use std::time::{Duration, Instant};
use tracing::info;

/// Measures one packaging step and logs its duration when finished.
///
/// Dropping a timer without calling [`Timer::finish`] logs nothing, so a
/// step that fails is not reported as completed.
#[derive(Debug)]
pub struct Timer {
    step: String,
    start: Instant,
}

impl Timer {
    pub fn start(step: &str) -> Self {
        Self {
            step: step.to_string(),
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Log the elapsed time and return it.
    pub fn finish(self) -> Duration {
        let elapsed = self.elapsed();
        info!(
            step = %self.step,
            elapsed = %format_duration(elapsed),
            "step finished"
        );
        elapsed
    }
}

/// `0.4s`, `12.0s`, `2.5m`
pub fn format_duration(elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if secs >= 60.0 {
        format!("{:.1}m", secs / 60.0)
    } else {
        format!("{:.1}s", secs)
    }
}
