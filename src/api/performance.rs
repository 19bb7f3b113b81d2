//! Process metrics for the performance endpoint

use serde::Serialize;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

static STARTED: OnceLock<Instant> = OnceLock::new();

/// Record the process start; later calls are no-ops
pub fn mark_start() {
    STARTED.get_or_init(Instant::now);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceSnapshot {
    /// Uptime as `HH:MM:SS.mmm`
    pub time: String,
    /// Resident memory, e.g. `"12.34 MB"`
    pub memory: Option<String>,
    pub threads: Option<u32>,
}

pub fn snapshot() -> PerformanceSnapshot {
    let uptime = STARTED.get_or_init(Instant::now).elapsed();
    let (memory_kb, threads) = match std::fs::read_to_string("/proc/self/status") {
        Ok(status) => parse_status(&status),
        Err(err) => {
            log::debug!("Process status unavailable: {}", err);
            (None, None)
        }
    };

    PerformanceSnapshot {
        time: format_uptime(uptime),
        memory: memory_kb.map(|kb| format!("{:.2} MB", kb as f64 / 1024.0)),
        threads,
    }
}

fn format_uptime(uptime: Duration) -> String {
    let total_ms = uptime.as_millis();
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms / 60_000) % 60;
    let seconds = (total_ms / 1_000) % 60;
    let millis = total_ms % 1_000;
    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
}

/// Pull `VmRSS` (kB) and `Threads` out of a `/proc/<pid>/status` listing
fn parse_status(status: &str) -> (Option<u64>, Option<u32>) {
    let mut rss_kb = None;
    let mut threads = None;
    for line in status.lines() {
        if let Some(rest) = line.strip_prefix("VmRSS:") {
            rss_kb = rest.split_whitespace().next().and_then(|v| v.parse().ok());
        } else if let Some(rest) = line.strip_prefix("Threads:") {
            threads = rest.trim().parse().ok();
        }
    }
    (rss_kb, threads)
}
