//! Operator status text queue
//!
//! Collects the leveled diagnostic messages the navigator core emits
//! ("RTL: climb to 60 m ...") until the telemetry link drains them as
//! MAVLink STATUSTEXT. Nothing in the core reads these back; they are
//! purely observational.
//!
//! - Fixed-capacity queue (16 messages), oldest dropped when full
//! - Messages longer than 200 bytes are truncated on a char boundary
//! - Zero heap allocations

use core::fmt::{self, Write};
use heapless::{Deque, String};

/// Maximum message length in bytes
pub const MAX_MESSAGE_LEN: usize = 200;

/// Queue capacity
pub const QUEUE_CAPACITY: usize = 16;

/// Message severity (values match MAV_SEVERITY)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Severity {
    Emergency = 0,
    Alert = 1,
    Critical = 2,
    Error = 3,
    Warning = 4,
    Notice = 5,
    Info = 6,
    Debug = 7,
}

impl Severity {
    /// Return variant name as a static string (usable with defmt on embedded)
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Emergency => "EMERGENCY",
            Severity::Alert => "ALERT",
            Severity::Critical => "CRITICAL",
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Notice => "NOTICE",
            Severity::Info => "INFO",
            Severity::Debug => "DEBUG",
        }
    }
}

/// Queued status message
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub severity: Severity,
    pub text: String<MAX_MESSAGE_LEN>,
}

/// Bounded queue of pending status messages
pub struct StatusNotifier {
    queue: Deque<StatusMessage, QUEUE_CAPACITY>,
    dropped_count: u32,
}

impl StatusNotifier {
    /// Create an empty notifier (const for static initialization)
    pub const fn new() -> Self {
        Self {
            queue: Deque::new(),
            dropped_count: 0,
        }
    }

    /// Enqueue a message with the given severity
    ///
    /// If the queue is full the oldest message is dropped and counted.
    pub fn enqueue(&mut self, severity: Severity, text: &str) {
        let text = truncate(text, MAX_MESSAGE_LEN);

        let mut message = StatusMessage {
            severity,
            text: String::new(),
        };
        // Cannot fail: truncated to capacity above
        let _ = message.text.push_str(text);

        if self.queue.is_full() {
            self.queue.pop_front();
            self.dropped_count += 1;
            log_warn!("status queue full, dropped {} messages", self.dropped_count);
        }

        if self.queue.push_back(message).is_err() {
            self.dropped_count += 1;
        }
    }

    /// Take the oldest pending message
    pub fn pop(&mut self) -> Option<StatusMessage> {
        self.queue.pop_front()
    }

    /// Most recently queued message
    pub fn last(&self) -> Option<&StatusMessage> {
        self.queue.back()
    }

    /// Iterate pending messages, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &StatusMessage> {
        self.queue.iter()
    }

    /// Number of pending messages
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Messages lost to queue overflow since creation
    pub fn dropped_count(&self) -> u32 {
        self.dropped_count
    }

    /// Discard all pending messages
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

impl Default for StatusNotifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Render format arguments into a status text buffer
///
/// Output that does not fit is cut at the buffer capacity.
pub fn format_text(args: fmt::Arguments<'_>) -> String<MAX_MESSAGE_LEN> {
    let mut text = String::new();
    let _ = text.write_fmt(args);
    text
}

/// Cut `text` to at most `max` bytes without splitting a UTF-8 sequence
fn truncate(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
