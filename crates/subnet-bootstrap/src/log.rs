use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::{
    collections::VecDeque,
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicU8, AtomicU64, AtomicUsize, Ordering},
    },
};

///
/// Level
///

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug, // least severe
    Info,
    Ok,
    Warn,
    Error, // most severe
}

impl Level {
    const fn to_u8(self) -> u8 {
        match self {
            Self::Debug => 0,
            Self::Info => 1,
            Self::Ok => 2,
            Self::Warn => 3,
            Self::Error => 4,
        }
    }
}

///
/// Topic
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
#[remain::sorted]
pub enum Topic {
    Account,
    Bootstrap,
    Call,
    Code,
    Config,
    Deploy,
    Disk,
    Upgrade,
    Validator,
    Worker,
}

#[macro_export]
macro_rules! log {
    // =========================================
    // (1) With topic (normal + trailing comma)
    // =========================================
    ($topic:expr, $level:ident, $fmt:expr $(, $arg:expr)* $(,)?) => {{
        $crate::log!(@inner Some(&$topic.to_string()), $crate::log::Level::$level, $fmt $(, $arg)*);
    }};

    // =========================================
    // (2) No topic (normal + trailing comma)
    // =========================================
    ($level:ident, $fmt:expr $(, $arg:expr)* $(,)?) => {{
        $crate::log!(@inner None::<&str>, $crate::log::Level::$level, $fmt $(, $arg)*);
    }};

    // =========================================
    // INTERNAL
    // =========================================
    (@inner $topic:expr, $level:expr, $fmt:expr $(, $arg:expr)*) => {{
        let level = $level;
        let topic_opt: Option<&str> = $topic;

        if $crate::log::__enabled(level) {
            let message = format!($fmt $(, $arg)*);
            let crate_name = env!("CARGO_PKG_NAME");

            $crate::log::__append(crate_name, topic_opt, level, &message);

            let final_msg = if let Some(t) = topic_opt {
                format!("[{t}] {message}")
            } else {
                message
            };

            let (color, reset) = match level {
                $crate::log::Level::Ok    => ("\x1b[32m", "\x1b[0m"),
                $crate::log::Level::Info  => ("\x1b[34m", "\x1b[0m"),
                $crate::log::Level::Warn  => ("\x1b[33m", "\x1b[0m"),
                $crate::log::Level::Error => ("\x1b[31m", "\x1b[0m"),
                $crate::log::Level::Debug => ("", ""),
            };

            let label = format!("{color}{:^5}{reset}", level.to_string().to_uppercase());
            eprintln!("{label}| {final_msg}");
        }
    }};
}

///
/// LogEntry
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct LogEntry {
    pub seq: u64,
    pub crate_name: String,
    pub topic: Option<String>,
    pub level: Level,
    pub message: String,
}

//
// LOG_BUFFER
//
// Bounded ring of recent entries; the oldest entry is evicted first.
//

static LOG_BUFFER: Mutex<VecDeque<LogEntry>> = Mutex::new(VecDeque::new());
static MIN_LEVEL: AtomicU8 = AtomicU8::new(0);
static MAX_ENTRIES: AtomicUsize = AtomicUsize::new(10_000);
static NEXT_SEQ: AtomicU64 = AtomicU64::new(0);

///
/// LogBuffer
/// Read-side access to the in-process log ring.
///

pub struct LogBuffer;

impl LogBuffer {
    /// Apply a minimum level and ring capacity.
    pub fn configure(min_level: Level, max_entries: usize) {
        MIN_LEVEL.store(min_level.to_u8(), Ordering::Relaxed);
        MAX_ENTRIES.store(max_entries, Ordering::Relaxed);
    }

    /// Copy of the buffered entries, oldest first.
    #[must_use]
    pub fn snapshot() -> Vec<LogEntry> {
        LOG_BUFFER
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// Entries recorded under `topic`, oldest first.
    #[must_use]
    pub fn by_topic(topic: Topic) -> Vec<LogEntry> {
        let topic = topic.to_string();

        Self::snapshot()
            .into_iter()
            .filter(|e| e.topic.as_deref() == Some(topic.as_str()))
            .collect()
    }

    pub fn clear() {
        LOG_BUFFER
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

///
/// Helpers
///

#[doc(hidden)]
#[must_use]
pub fn __enabled(level: Level) -> bool {
    level.to_u8() >= MIN_LEVEL.load(Ordering::Relaxed)
}

#[doc(hidden)]
pub fn __append(crate_name: &str, topic: Option<&str>, level: Level, message: &str) {
    let max = MAX_ENTRIES.load(Ordering::Relaxed);
    if max == 0 {
        return;
    }

    let entry = LogEntry {
        seq: NEXT_SEQ.fetch_add(1, Ordering::Relaxed),
        crate_name: crate_name.to_string(),
        topic: topic.map(str::to_string),
        level,
        message: message.to_string(),
    };

    let mut buf = LOG_BUFFER.lock().unwrap_or_else(PoisonError::into_inner);
    while buf.len() >= max {
        buf.pop_front();
    }
    buf.push_back(entry);
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered_by_severity() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Warn < Level::Error);
        assert_eq!(Level::Ok.to_string(), "Ok");
    }

    #[test]
    fn appended_entries_are_tagged_with_topic() {
        crate::log!(Topic::Config, Warn, "unit-test marker {}", 17);

        let found = LogBuffer::by_topic(Topic::Config)
            .into_iter()
            .any(|e| e.message == "unit-test marker 17" && e.level == Level::Warn);

        assert!(found, "log entry should be buffered under its topic");
    }
}
