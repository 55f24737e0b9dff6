// Wall clock and CPU stopwatch shared by the demos.
// CPU time is user + system time of the whole process, read from procfs;
// it is None where procfs is unavailable.

use std::time::{Duration, Instant};

use serde::{Serialize, Serializer};

#[derive(Clone, Copy, Debug, Serialize)]
pub struct Timing {
    #[serde(rename = "wall_secs", serialize_with = "secs")]
    pub wall: Duration,
    #[serde(rename = "cpu_secs", serialize_with = "opt_secs")]
    pub cpu: Option<Duration>,
}

/// Run `f` once and report how long it took.
pub fn measure<T>(f: impl FnOnce() -> T) -> (T, Timing) {
    let cpu_start = process_cpu_time();
    let start = Instant::now();
    let value = f();
    let wall = start.elapsed();
    let cpu = match (cpu_start, process_cpu_time()) {
        (Some(a), Some(b)) => Some(b.saturating_sub(a)),
        _ => None,
    };
    (value, Timing { wall, cpu })
}

/// Kernel clock ticks per second for `/proc/<pid>/stat` times (USER_HZ).
const CLOCK_TICKS_PER_SEC: u64 = 100;

/// User + system CPU time of the whole process, all threads included.
pub fn process_cpu_time() -> Option<Duration> {
    let raw = std::fs::read_to_string("/proc/self/stat").ok()?;
    parse_stat(&raw)
}

fn parse_stat(raw: &str) -> Option<Duration> {
    // comm may contain spaces or parens, so count fields from the last ')'
    let rest = &raw[raw.rfind(')')? + 1..];
    let mut fields = rest.split_whitespace();
    // rest starts at field 3 (state); utime and stime are fields 14 and 15
    let utime: u64 = fields.nth(11)?.parse().ok()?;
    let stime: u64 = fields.next()?.parse().ok()?;
    let ticks = utime.checked_add(stime)?;
    Some(Duration::from_millis(ticks.checked_mul(1000)? / CLOCK_TICKS_PER_SEC))
}

pub(crate) fn secs<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

pub(crate) fn opt_secs<S: Serializer>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
    match d {
        Some(d) => s.serialize_some(&d.as_secs_f64()),
        None => s.serialize_none(),
    }
}
