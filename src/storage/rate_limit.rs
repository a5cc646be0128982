use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, instrument};

use crate::error::Result;
use crate::storage::{lock, KeyValueStore};

/// Key guarding event creation and edits.
pub const CREATE_EVENT_RATE_LIMIT_KEY: &str = "createUpdateEvent";
pub const CREATE_EVENT_RATE_LIMIT_WINDOW: Duration = Duration::minutes(5);
pub const CREATE_EVENT_RATE_LIMIT: u32 = 5;

/// Fixed-window operation counter kept in a [`KeyValueStore`].
///
/// Checks through one limiter are serialised. Separate limiters over the
/// same store do not coordinate with each other.
#[derive(Debug)]
pub struct RateLimiter<S> {
    store: S,
    guard: Mutex<()>,
}

impl<S: KeyValueStore> RateLimiter<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            guard: Mutex::new(()),
        }
    }

    /// Record one operation under `key` if fewer than `limit` happened in the
    /// current window. Returns whether the operation may proceed.
    pub fn check_and_consume(&self, key: &str, window: Duration, limit: u32) -> Result<bool> {
        self.check_and_consume_at(key, window, limit, Utc::now())
    }

    #[instrument(skip(self))]
    pub fn check_and_consume_at(
        &self,
        key: &str,
        window: Duration,
        limit: u32,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let _guard = lock(&self.guard);
        let count_key = format!("{key}:operationCount");
        let timestamp_key = format!("{key}:lastOperationTimestamp");

        let window_start = self
            .store
            .get(&timestamp_key)
            .and_then(|t| t.parse::<i64>().ok());
        let elapsed = window_start.map(|start| now.timestamp_millis() - start);

        let mut count = match elapsed {
            Some(ms) if ms < window.num_milliseconds() => self
                .store
                .get(&count_key)
                .and_then(|c| c.parse::<u32>().ok())
                .unwrap_or(0),
            _ => {
                debug!("starting new rate limit window");
                self.store.set(&count_key, "0")?;
                self.store
                    .set(&timestamp_key, &now.timestamp_millis().to_string())?;
                0
            }
        };

        if count >= limit {
            debug!(count, "rate limit reached");
            return Ok(false);
        }

        count += 1;
        self.store.set(&count_key, &count.to_string())?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::fixtures::at;
    use crate::storage::MemoryStore;

    #[test]
    fn test_admits_exactly_limit_per_window() {
        let limiter = RateLimiter::new(MemoryStore::new());
        let now = at("2024-01-01");

        for i in 0..CREATE_EVENT_RATE_LIMIT {
            let t = now + Duration::seconds(i64::from(i));
            assert!(limiter
                .check_and_consume_at(
                    CREATE_EVENT_RATE_LIMIT_KEY,
                    CREATE_EVENT_RATE_LIMIT_WINDOW,
                    CREATE_EVENT_RATE_LIMIT,
                    t
                )
                .unwrap());
        }
        assert!(!limiter
            .check_and_consume_at(
                CREATE_EVENT_RATE_LIMIT_KEY,
                CREATE_EVENT_RATE_LIMIT_WINDOW,
                CREATE_EVENT_RATE_LIMIT,
                now + Duration::minutes(4)
            )
            .unwrap());
    }

    #[test]
    fn test_resets_after_window() {
        let store = Arc::new(MemoryStore::new());
        let limiter = RateLimiter::new(Arc::clone(&store));
        let now = at("2024-01-01");
        let window = Duration::minutes(1);

        assert!(limiter.check_and_consume_at("k", window, 1, now).unwrap());
        assert!(!limiter.check_and_consume_at("k", window, 1, now).unwrap());
        assert_eq!(store.get("k:operationCount").as_deref(), Some("1"));

        let later = now + window;
        assert!(limiter.check_and_consume_at("k", window, 1, later).unwrap());
        assert_eq!(
            store.get("k:lastOperationTimestamp"),
            Some(later.timestamp_millis().to_string())
        );
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = RateLimiter::new(MemoryStore::new());
        let now = at("2024-01-01");
        let window = Duration::minutes(1);

        assert!(limiter.check_and_consume_at("a", window, 1, now).unwrap());
        assert!(limiter.check_and_consume_at("b", window, 1, now).unwrap());
        assert!(!limiter.check_and_consume_at("a", window, 1, now).unwrap());
    }

    #[test]
    fn test_zero_limit_always_refuses() {
        let limiter = RateLimiter::new(MemoryStore::new());
        assert!(!limiter
            .check_and_consume("k", Duration::minutes(1), 0)
            .unwrap());
    }

    #[test]
    fn test_concurrent_callers_share_the_limit() {
        let limiter = RateLimiter::new(Arc::new(MemoryStore::new()));
        let now = at("2024-01-01");
        let window = Duration::minutes(5);
        let admitted = std::sync::atomic::AtomicU32::new(0);

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..50 {
                        if limiter.check_and_consume_at("k", window, 5, now).unwrap() {
                            admitted.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                        }
                    }
                });
            }
        });

        assert_eq!(admitted.into_inner(), 5);
    }
}
