//! # Todolist Core
//!
//! Core traits and types for the todolist reducer architecture.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state owned by a store
//! - **Action**: All possible inputs to a reducer (commands and the results fed back by effects)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected host capabilities (clock, durable storage, confirmation)
//!
//! The reducer never touches storage directly. It returns [`effect::Effect`]
//! values that the runtime executes, so the whole domain can be driven in
//! tests with in-memory environment implementations.
//!
//! ## Example
//!
//! ```ignore
//! use todolist_core::{effect::Effect, reducer::Reducer, SmallVec};
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = CounterEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
//!         action: CounterAction,
//!         _env: &CounterEnvironment,
//!     ) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         state.count += 1;
//!         SmallVec::new()
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{smallvec, SmallVec};

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects are values returned by reducers. The runtime executes them in
/// order and feeds any resulting action back into the reducer.
pub mod effect {
    use super::environment::StorageError;
    use std::future::Future;
    use std::pin::Pin;
    use thiserror::Error;

    /// Errors raised while an effect runs
    #[derive(Error, Debug)]
    pub enum EffectError {
        /// The durable storage rejected a read or write
        #[error(transparent)]
        Storage(#[from] StorageError),

        /// State could not be encoded for storage
        #[error("failed to serialize state: {0}")]
        Serialization(#[from] serde_json::Error),
    }

    /// Output of an [`Effect::Future`]: an optional follow-up action
    pub type EffectResult<Action> = Result<Option<Action>, EffectError>;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects one after another, stopping at the first failure
        Sequential(Vec<Effect<Action>>),

        /// Arbitrary async computation
        ///
        /// If it resolves to `Ok(Some(action))`, the action is fed back into the reducer.
        Future(Pin<Box<dyn Future<Output = EffectResult<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Returns `true` for [`Effect::None`] and for empty chains
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Sequential(effects) => effects.iter().all(Effect::is_none),
                Effect::Future(_) => false,
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// Everything the host provides (time, the durable key-value store, the
/// yes/no prompt) is abstracted behind a trait and injected via the
/// Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};
    use thiserror::Error;

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Errors from a durable key-value store
    #[derive(Error, Debug)]
    pub enum StorageError {
        /// The backing medium could not be read or written
        #[error("storage I/O failed: {0}")]
        Io(#[from] std::io::Error),

        /// A stored value exists but cannot be decoded
        #[error("stored value for key {key:?} is malformed: {source}")]
        Malformed {
            /// Key whose value failed to decode
            key: String,
            /// Decoder error
            #[source]
            source: serde_json::Error,
        },

        /// The store is unusable (for example a poisoned lock or a simulated quota failure)
        #[error("storage unavailable: {0}")]
        Unavailable(String),
    }

    /// Durable string key-value store, the shape of a browser's local storage
    ///
    /// Reads and writes are synchronous and complete before returning.
    pub trait Storage: Send + Sync {
        /// Read the value stored under `key`
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if the backing medium cannot be read.
        /// A missing key is `Ok(None)`, not an error.
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

        /// Replace the value stored under `key`
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if the write cannot be completed.
        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    }

    /// Blocking yes/no confirmation supplied by the host
    pub trait Confirm: Send + Sync {
        /// Ask the user `message`; `true` means they affirmed
        fn confirm(&self, message: &str) -> bool;
    }

    /// Confirmation that always answers the same way
    #[derive(Debug, Clone, Copy)]
    pub struct AlwaysConfirm(pub bool);

    impl Confirm for AlwaysConfirm {
        fn confirm(&self, _message: &str) -> bool {
            self.0
        }
    }
}
