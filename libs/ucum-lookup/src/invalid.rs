use std::collections::HashSet;
use std::sync::Mutex;

/// Insertion-ordered, duplicate-free record of inputs that resolution could
/// not repair. Append-only for the process lifetime; safe to share across
/// threads.
#[derive(Debug, Default)]
pub struct InvalidCodeLog {
    inner: Mutex<LogInner>,
}

#[derive(Debug, Default)]
struct LogInner {
    seen: HashSet<String>,
    order: Vec<String>,
}

impl InvalidCodeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failed input. Returns `true` if it was not seen before.
    pub fn record(&self, raw: &str) -> bool {
        let mut inner = self.lock();
        if inner.seen.contains(raw) {
            return false;
        }
        inner.seen.insert(raw.to_string());
        inner.order.push(raw.to_string());
        true
    }

    /// Ordered copy of every distinct failed input, first-seen first.
    pub fn snapshot(&self) -> Vec<String> {
        self.lock().order.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().order.is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LogInner> {
        // A poisoned log only means a panicking thread held the guard; the
        // data is still a consistent ordered set.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
