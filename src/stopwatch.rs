//! Per-label wall-clock aggregates
//!
//! Each label accumulates a call count and total duration; `report` renders
//! them as a table (label | calls | total | avg) in microseconds.

use std::fmt::Write;
use std::time::{Duration, Instant};

struct Aggregate {
    label: &'static str,
    calls: u64,
    total: Duration,
}

#[derive(Default)]
pub struct Stopwatch {
    entries: Vec<Aggregate>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` and charge its wall time to `label`
    pub fn time<R>(&mut self, label: &'static str, f: impl FnOnce() -> R) -> R {
        let then = Instant::now();
        let result = f();
        self.record(label, then.elapsed());
        result
    }

    pub fn record(&mut self, label: &'static str, elapsed: Duration) {
        match self.entries.iter_mut().find(|e| e.label == label) {
            Some(entry) => {
                entry.calls += 1;
                entry.total += elapsed;
            },
            None => self.entries.push(Aggregate {
                label,
                calls: 1,
                total: elapsed,
            }),
        }
    }

    pub fn calls(&self, label: &str) -> u64 {
        self.entry(label).map_or(0, |e| e.calls)
    }

    pub fn total(&self, label: &str) -> Duration {
        self.entry(label).map_or(Duration::ZERO, |e| e.total)
    }

    fn entry(&self, label: &str) -> Option<&Aggregate> {
        self.entries.iter().find(|e| e.label == label)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn report(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:>15} | {:>8} | {:>17} | {:>15}",
            "label", "calls", "total time", "avg"
        );
        for e in &self.entries {
            let total_us = e.total.as_micros();
            let avg_us = total_us / u128::from(e.calls.max(1));
            let _ = writeln!(
                out,
                "{:>15} | {:>8} | {:>17} | {:>15}",
                e.label,
                e.calls,
                format!("{} us", group_thousands(total_us)),
                format!("{} us", group_thousands(avg_us))
            );
        }
        out
    }

    /// Log the report at info level, one line per row
    pub fn log_report(&self) {
        if self.is_empty() {
            return;
        }
        for line in self.report().lines() {
            log::info!("{}", line);
        }
    }
}

/// `1234567` -> `"1 234 567"`
fn group_thousands(n: u128) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1 000");
        assert_eq!(group_thousands(1234567), "1 234 567");
    }

    #[test]
    fn test_aggregates_per_label() {
        let mut sw = Stopwatch::new();
        sw.record("render", Duration::from_micros(1500));
        sw.record("render", Duration::from_micros(500));
        sw.record("update", Duration::from_micros(10));
        assert_eq!(sw.calls("render"), 2);
        assert_eq!(sw.total("render"), Duration::from_micros(2000));
        assert_eq!(sw.calls("update"), 1);
        assert_eq!(sw.calls("missing"), 0);

        let report = sw.report();
        assert_eq!(report.lines().count(), 3);
        assert!(report.contains("2 000 us"));
        assert!(report.contains("1 000 us"));
    }

    #[test]
    fn test_time_returns_closure_result() {
        let mut sw = Stopwatch::new();
        let v = sw.time("work", || 6 * 7);
        assert_eq!(v, 42);
        assert_eq!(sw.calls("work"), 1);
    }
}
