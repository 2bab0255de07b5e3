//! # Write Debouncer
//!
//! Best-effort coalescing of rapid repeated operations.
//!
//! ## Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Debounce Window (per key)                            │
//! │                                                                         │
//! │  t=0ms    run("save:INV-1", op_a)  ── sleeps until t=300ms             │
//! │  t=50ms   run("save:INV-1", op_b)  ── supersedes op_a                  │
//! │                                                                         │
//! │  t=300ms  op_a wakes, sees it was superseded → returns None            │
//! │           (op_a's closure NEVER executes)                              │
//! │  t=350ms  op_b wakes, still current → executes, returns Some(result)   │
//! │                                                                         │
//! │  Different keys never interact.                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This reduces - but does not eliminate - write interleaving for
//! rapid-fire UI-triggered saves. Once an operation starts executing it is
//! not cancellable; a caller may abandon the future but the write runs to
//! completion or failure on its own.
//!
//! Like the read cache, this is an explicit context object owned by the
//! store, not a module-level pending-operation map.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

/// Default delay before a debounced operation fires.
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

/// Coalesces rapid repeated calls keyed by an operation identifier.
pub struct Debouncer {
    window: Duration,
    generations: Mutex<HashMap<String, u64>>,
}

impl Debouncer {
    /// Creates a debouncer with a fixed window. A zero window still yields
    /// once to the scheduler, so a strictly-later duplicate can supersede.
    pub fn new(window: Duration) -> Self {
        Debouncer {
            window,
            generations: Mutex::new(HashMap::new()),
        }
    }

    /// Runs `op` after the window, unless a later call with the same key
    /// arrives first - then this call is cancelled and returns `None`
    /// without ever executing `op`.
    pub async fn run<F, Fut, T>(&self, key: &str, op: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let my_generation = self.bump(key);
        tokio::time::sleep(self.window).await;
        if self.current(key) != my_generation {
            return None; // superseded while waiting
        }
        Some(op().await)
    }

    fn bump(&self, key: &str) -> u64 {
        let mut generations = self.generations.lock().unwrap_or_else(|e| e.into_inner());
        let counter = generations.entry(key.to_string()).or_insert(0);
        *counter += 1;
        *counter
    }

    fn current(&self, key: &str) -> u64 {
        let generations = self.generations.lock().unwrap_or_else(|e| e.into_inner());
        generations.get(key).copied().unwrap_or(0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_single_call_executes() {
        let debouncer = Debouncer::new(Duration::from_millis(10));
        let result = debouncer.run("op", || async { 42 }).await;
        assert_eq!(result, Some(42));
    }

    #[tokio::test]
    async fn test_rapid_duplicate_supersedes_pending_call() {
        let debouncer = Arc::new(Debouncer::new(Duration::from_millis(50)));
        let executions = Arc::new(AtomicU32::new(0));

        let first = {
            let debouncer = Arc::clone(&debouncer);
            let executions = Arc::clone(&executions);
            tokio::spawn(async move {
                debouncer
                    .run("save", || async {
                        executions.fetch_add(1, Ordering::SeqCst);
                        "first"
                    })
                    .await
            })
        };

        // Arrive inside the first call's window
        tokio::time::sleep(Duration::from_millis(10)).await;
        let second = debouncer
            .run("save", || async {
                executions.fetch_add(1, Ordering::SeqCst);
                "second"
            })
            .await;

        assert_eq!(first.await.unwrap(), None);
        assert_eq!(second, Some("second"));
        // The superseded closure never ran
        assert_eq!(executions.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_distinct_keys_do_not_interact() {
        let debouncer = Debouncer::new(Duration::from_millis(10));
        let a = debouncer.run("save:A", || async { 1 });
        let b = debouncer.run("save:B", || async { 2 });
        let (a, b) = tokio::join!(a, b);
        assert_eq!(a, Some(1));
        assert_eq!(b, Some(2));
    }
}
