//! # Todolist Runtime
//!
//! Runtime implementation for the todolist reducer architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that owns state and executes effects
//! - **Effect Executor**: Runs effect descriptions and feeds actions back to the reducer
//!
//! Effects are run to completion inside [`store::Store::send`]. When `send`
//! returns, every write an action caused has already reached durable storage,
//! and any failure is returned to the caller instead of being retried.
//!
//! ## Example
//!
//! ```ignore
//! use todolist_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething).await?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use todolist_core::{effect::Effect, reducer::Reducer};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;
    use todolist_core::effect::EffectError;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// An effect execution failed
        ///
        /// Execution of the remaining effects for the action is abandoned.
        #[error("Effect execution failed: {0}")]
        EffectFailed(#[from] EffectError),
    }
}

pub use error::StoreError;
pub use store::Store;

/// Store module - The runtime for reducers
pub mod store {
    use super::{Arc, Effect, Reducer, RwLock, StoreError};
    use futures::future::{BoxFuture, FutureExt};
    use std::time::Instant;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock`)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
            }
        }

        /// Send an action to the store
        ///
        /// Runs the reducer under the state write lock, releases the lock,
        /// then executes the returned effects in order. Actions produced by
        /// effects are sent back through the store before this call returns.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::EffectFailed`] if any effect fails. State
        /// changes the reducer already made are kept.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<(), StoreError> {
            tracing::debug!("Processing action");
            metrics::counter!("store.actions.total").increment(1);

            let effects = {
                let mut state = self.state.write().await;
                tracing::trace!("Acquired write lock on state");

                let start = Instant::now();
                let effects = self.reducer.reduce(&mut *state, action, &self.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());

                tracing::trace!("Reducer completed, returned {} effects", effects.len());
                effects
            };

            for effect in effects {
                self.execute_effect(effect).await?;
            }

            Ok(())
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let task_count = store.state(|s| s.tasks.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Access the injected environment
        #[must_use]
        pub const fn environment(&self) -> &E {
            &self.environment
        }

        fn execute_effect(&self, effect: Effect<A>) -> BoxFuture<'_, Result<(), StoreError>> {
            async move {
                match effect {
                    Effect::None => Ok(()),
                    Effect::Sequential(effects) => {
                        for effect in effects {
                            self.execute_effect(effect).await?;
                        }
                        Ok(())
                    },
                    Effect::Future(fut) => match fut.await {
                        Ok(Some(action)) => {
                            tracing::trace!("Effect produced an action, feeding back");
                            self.send(action).await
                        },
                        Ok(None) => Ok(()),
                        Err(error) => {
                            tracing::error!(error = %error, "Effect failed");
                            metrics::counter!("store.effects.failed").increment(1);
                            Err(StoreError::EffectFailed(error))
                        },
                    },
                }
            }
            .boxed()
        }
    }
}
