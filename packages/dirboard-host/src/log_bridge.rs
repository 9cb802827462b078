/// Host logging: env_logger on stderr, plus a bounded ring of the
/// workspace's own records for `GET /logs` and `GET /logs/stream`.
///
/// Only records whose target starts with `dirboard` enter the ring, so
/// axum, hyper and notify chatter stays on stderr.
use std::collections::VecDeque;
use std::sync::{Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

use log::{Log, Metadata, Record, SetLoggerError};
use serde::Serialize;
use tokio::sync::broadcast;

const RING_CAPACITY: usize = 500;
const RING_TARGET_PREFIX: &str = "dirboard";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub timestamp_ms: u64,
    pub level: String,
    pub target: String,
    pub message: String,
}

impl LogEntry {
    fn from_record(record: &Record<'_>) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default(),
            level: record.level().to_string(),
            target: record.target().to_string(),
            message: record.args().to_string(),
        }
    }
}

pub struct LogRing {
    capacity: usize,
    entries: Mutex<VecDeque<LogEntry>>,
    live: broadcast::Sender<LogEntry>,
}

impl LogRing {
    pub fn new(capacity: usize) -> Self {
        let (live, _) = broadcast::channel(64);
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            live,
        }
    }

    fn accepts(target: &str) -> bool {
        target.starts_with(RING_TARGET_PREFIX)
    }

    pub fn record(&self, entry: LogEntry) {
        if !Self::accepts(&entry.target) {
            return;
        }
        if let Ok(mut entries) = self.entries.lock() {
            if entries.len() == self.capacity {
                entries.pop_front();
            }
            entries.push_back(entry.clone());
        }
        let _ = self.live.send(entry);
    }

    /// Oldest first; at most the `limit` newest entries when given.
    pub fn recent(&self, limit: Option<usize>) -> Vec<LogEntry> {
        let Ok(entries) = self.entries.lock() else {
            return Vec::new();
        };
        let skip = limit.map_or(0, |limit| entries.len().saturating_sub(limit));
        entries.iter().skip(skip).cloned().collect()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.live.subscribe()
    }
}

fn ring() -> &'static LogRing {
    static RING: OnceLock<LogRing> = OnceLock::new();
    RING.get_or_init(|| LogRing::new(RING_CAPACITY))
}

struct RingLogger {
    stderr: env_logger::Logger,
}

impl Log for RingLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.stderr.enabled(metadata)
    }

    fn log(&self, record: &Record<'_>) {
        if !self.stderr.matches(record) {
            return;
        }
        self.stderr.log(record);
        ring().record(LogEntry::from_record(record));
    }

    fn flush(&self) {
        self.stderr.flush();
    }
}

/// Install the logger. `RUST_LOG` overrides the default `info` filter.
pub fn init() -> Result<(), SetLoggerError> {
    let env = env_logger::Env::default().default_filter_or("info");
    let stderr = env_logger::Builder::from_env(env).build();
    let max_level = stderr.filter();
    log::set_logger(Box::leak(Box::new(RingLogger { stderr })))?;
    log::set_max_level(max_level);
    Ok(())
}

pub fn recent(limit: Option<usize>) -> Vec<LogEntry> {
    ring().recent(limit)
}

pub fn subscribe() -> broadcast::Receiver<LogEntry> {
    ring().subscribe()
}
