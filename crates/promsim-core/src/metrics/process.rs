//! Process metrics read from procfs on every scrape.
//!
//! Values that cannot be read (no `/proc`, unexpected format) are left out of
//! the output. `process_start_time_seconds` is always present: it falls back to
//! the time the collector was created.

use std::fmt::Write;
use std::fs;

use super::text::{format_float, write_header};
use super::unix_now;

/// Clock ticks per second as exposed to userspace by Linux (`USER_HZ`).
const USER_HZ: f64 = 100.0;

const VIRTUAL_MEMORY: &str = "process_virtual_memory_bytes";
const RESIDENT_MEMORY: &str = "process_resident_memory_bytes";
const START_TIME: &str = "process_start_time_seconds";
const CPU_SECONDS: &str = "process_cpu_seconds_total";
const OPEN_FDS: &str = "process_open_fds";
const MAX_FDS: &str = "process_max_fds";

/// Every family name this collector may write.
pub const PROCESS_METRIC_NAMES: [&str; 6] = [
    VIRTUAL_MEMORY,
    RESIDENT_MEMORY,
    START_TIME,
    CPU_SECONDS,
    OPEN_FDS,
    MAX_FDS,
];

pub struct ProcessCollector {
    created: f64,
}

impl Default for ProcessCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessCollector {
    pub fn new() -> Self {
        Self { created: unix_now() }
    }

    pub(crate) fn render(&self, out: &mut String) {
        let stat = fs::read_to_string("/proc/self/stat")
            .ok()
            .and_then(|s| parse_stat(&s));

        if let Some(st) = &stat {
            write_gauge(out, VIRTUAL_MEMORY, "Virtual memory size in bytes.", st.vsize as f64);
        }
        if let Some(rss) = fs::read_to_string("/proc/self/status")
            .ok()
            .and_then(|s| parse_status_kb(&s, "VmRSS:"))
        {
            let bytes = (rss * 1024) as f64;
            write_gauge(out, RESIDENT_MEMORY, "Resident memory size in bytes.", bytes);
        }

        let boot = fs::read_to_string("/proc/stat")
            .ok()
            .and_then(|s| parse_btime(&s));
        let start = match (&stat, boot) {
            (Some(st), Some(btime)) => btime as f64 + st.starttime as f64 / USER_HZ,
            _ => self.created,
        };
        write_gauge(
            out,
            START_TIME,
            "Start time of the process since unix epoch in seconds.",
            start,
        );

        if let Some(st) = &stat {
            let cpu = (st.utime + st.stime) as f64 / USER_HZ;
            write_header(
                out,
                CPU_SECONDS,
                "Total user and system CPU time spent in seconds.",
                "counter",
            );
            let _ = writeln!(out, "{} {}", CPU_SECONDS, format_float(cpu));
        }

        if let Ok(dir) = fs::read_dir("/proc/self/fd") {
            write_gauge(out, OPEN_FDS, "Number of open file descriptors.", dir.count() as f64);
        }
        if let Some(max) = fs::read_to_string("/proc/self/limits")
            .ok()
            .and_then(|s| parse_max_open_files(&s))
        {
            write_gauge(out, MAX_FDS, "Maximum number of open file descriptors.", max as f64);
        }
    }
}

fn write_gauge(out: &mut String, name: &str, help: &str, v: f64) {
    write_header(out, name, help, "gauge");
    let _ = writeln!(out, "{} {}", name, format_float(v));
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ProcStat {
    pub utime: u64,
    pub stime: u64,
    pub starttime: u64,
    pub vsize: u64,
}

/// Parse `/proc/self/stat`. The command name may contain spaces and parens,
/// so fields are counted from the last `)`.
pub(crate) fn parse_stat(s: &str) -> Option<ProcStat> {
    let rest = &s[s.rfind(')')? + 1..];
    let fields: Vec<&str> = rest.split_whitespace().collect();
    // fields[0] is field 3 (state) in proc(5) numbering
    let field = |n: usize| fields.get(n - 3)?.parse::<u64>().ok();
    Some(ProcStat {
        utime: field(14)?,
        stime: field(15)?,
        starttime: field(22)?,
        vsize: field(23)?,
    })
}

/// Value of a `Key:   123 kB` line from `/proc/self/status`.
pub(crate) fn parse_status_kb(s: &str, key: &str) -> Option<u64> {
    s.lines()
        .find_map(|l| l.strip_prefix(key))?
        .split_whitespace()
        .next()?
        .parse()
        .ok()
}

pub(crate) fn parse_btime(s: &str) -> Option<u64> {
    s.lines()
        .find_map(|l| l.strip_prefix("btime "))?
        .trim()
        .parse()
        .ok()
}

/// Soft limit from the `Max open files` row; `None` when unlimited.
pub(crate) fn parse_max_open_files(s: &str) -> Option<u64> {
    s.lines()
        .find_map(|l| l.strip_prefix("Max open files"))?
        .split_whitespace()
        .next()?
        .parse()
        .ok()
}
