//! Time utilities: clocks, elapsed computations, parsing second ranges, formatting.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Local};

/// Source of "now". Production code uses [`SystemClock`].
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Local> {
        (**self).now()
    }
}

/// Seconds from `start` to `now`, never negative.
pub fn elapsed_seconds(start: DateTime<Local>, now: DateTime<Local>) -> f64 {
    let millis = (now - start).num_milliseconds();
    (millis as f64 / 1000.0).max(0.0)
}

/// `12.5` → `00:00:12.500`, `75` → `00:01:15`
pub fn format_elapsed(secs: f64) -> String {
    let sign = if secs < 0.0 { "-" } else { "" };
    let s = secs.abs();
    let whole = s.trunc() as u64;
    let frac = s - whole as f64;
    let (h, m, sec) = (whole / 3600, (whole % 3600) / 60, whole % 60);

    if frac > 0.0005 {
        format!("{sign}{h:02}:{m:02}:{:06.3}", sec as f64 + frac)
    } else {
        format!("{sign}{h:02}:{m:02}:{sec:02}")
    }
}

pub fn parse_seconds(s: &str) -> AppResult<f64> {
    let v: f64 = s
        .trim()
        .parse()
        .map_err(|_| AppError::InvalidRange(format!("not a number of seconds: '{s}'")))?;

    if !v.is_finite() || v < 0.0 {
        return Err(AppError::InvalidRange(format!(
            "seconds must be a finite value ≥ 0: '{s}'"
        )));
    }
    Ok(v)
}

/// Parse `START:END` (seconds) with `START ≤ END`.
pub fn parse_seconds_range(s: &str) -> AppResult<(f64, f64)> {
    let (a, b) = s
        .split_once(':')
        .ok_or_else(|| AppError::InvalidRange(format!("expected START:END, got '{s}'")))?;

    let start = parse_seconds(a)?;
    let end = parse_seconds(b)?;

    if end < start {
        return Err(AppError::InvalidRange(format!(
            "end {end} is before start {start}"
        )));
    }
    Ok((start, end))
}
