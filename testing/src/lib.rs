//! # Todolist Testing
//!
//! Testing utilities and helpers for the todolist reducer architecture.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - A Given-When-Then harness for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use todolist_testing::{test_clock, MemoryStorage, ScriptedConfirm};
//!
//! let storage = Arc::new(MemoryStorage::new());
//! let env = TodoEnvironment::new(Arc::new(test_clock()), storage.clone());
//! ```

use chrono::{DateTime, Duration, Utc};
use todolist_core::environment::{Clock, Confirm, Storage, StorageError};


/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, Confirm, DateTime, Duration, Storage, StorageError, Utc};
    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Mutex, PoisonError};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use todolist_testing::mocks::FixedClock;
    /// use todolist_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that advances by a fixed step every time it is read
    #[derive(Debug)]
    pub struct SteppingClock {
        next: Mutex<DateTime<Utc>>,
        step: Duration,
    }

    impl SteppingClock {
        /// Start at `start`, advancing by `step` after each reading
        #[must_use]
        pub const fn new(start: DateTime<Utc>, step: Duration) -> Self {
            Self {
                next: Mutex::new(start),
                step,
            }
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let mut next = self.next.lock().unwrap_or_else(PoisonError::into_inner);
            let now = *next;
            *next = now + self.step;
            now
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::<Utc>::UNIX_EPOCH + Duration::milliseconds(1_735_689_600_000))
    }

    /// In-memory key-value store standing in for browser local storage
    ///
    /// Writes can be made to fail to exercise storage error propagation.
    #[derive(Debug, Default)]
    pub struct MemoryStorage {
        items: Mutex<HashMap<String, String>>,
        fail_writes: AtomicBool,
        writes: Mutex<usize>,
    }

    impl MemoryStorage {
        /// Create an empty store
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a store pre-populated with one entry
        #[must_use]
        pub fn with_item(key: &str, value: &str) -> Self {
            let storage = Self::default();
            storage
                .items
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(key.to_string(), value.to_string());
            storage
        }

        /// Make every subsequent write fail (or succeed again)
        pub fn set_fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        /// Raw value currently stored under `key`
        #[must_use]
        pub fn raw(&self, key: &str) -> Option<String> {
            self.items
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get(key)
                .cloned()
        }

        /// Number of successful writes so far
        #[must_use]
        pub fn write_count(&self) -> usize {
            *self.writes.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    impl Storage for MemoryStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            let items = self
                .items
                .lock()
                .map_err(|e| StorageError::Unavailable(e.to_string()))?;
            Ok(items.get(key).cloned())
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StorageError::Unavailable("quota exceeded".to_string()));
            }
            self.items
                .lock()
                .map_err(|e| StorageError::Unavailable(e.to_string()))?
                .insert(key.to_string(), value.to_string());
            *self.writes.lock().unwrap_or_else(PoisonError::into_inner) += 1;
            Ok(())
        }
    }

    /// Confirmation that replays scripted answers and records every prompt
    ///
    /// Once the script runs out every further prompt is declined.
    #[derive(Debug, Default)]
    pub struct ScriptedConfirm {
        answers: Mutex<VecDeque<bool>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedConfirm {
        /// Create a confirmation that answers with `answers` in order
        #[must_use]
        pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
            Self {
                answers: Mutex::new(answers.into_iter().collect()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        /// Messages the user was asked so far
        #[must_use]
        pub fn prompts(&self) -> Vec<String> {
            self.prompts
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }
    }

    impl Confirm for ScriptedConfirm {
        fn confirm(&self, message: &str) -> bool {
            self.prompts
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(message.to_string());
            self.answers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front()
                .unwrap_or(false)
        }
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, MemoryStorage, ScriptedConfirm, SteppingClock, test_clock};
pub use reducer_test::{assertions, ReducerTest};
