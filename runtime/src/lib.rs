//! # Tasklist Runtime
//!
//! The Store runtime that hosts a reducer.
//!
//! ## Core Components
//!
//! - **Store**: Owns the single current state value and applies actions to it
//! - **Feedback Loop**: Actions returned as [`Effect::Dispatch`] are reduced
//!   before the originating `send` returns
//!
//! ## Example
//!
//! ```ignore
//! use tasklist_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething).await?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use std::collections::VecDeque;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tasklist_core::{effect::Effect, reducer::Reducer};
use tokio::sync::RwLock;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// Returned when `send()` is called after `shutdown()`.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// A single `send` produced more feedback actions than allowed
        ///
        /// The state is left as it was before the `send`.
        #[error("Feedback limit of {0} actions exceeded")]
        FeedbackLimit(usize),
    }
}

pub use error::StoreError;
pub use store::Store;

/// Store configuration
///
/// # Example
///
/// ```
/// use tasklist_runtime::StoreConfig;
///
/// let config = StoreConfig::default().with_max_feedback_actions(8);
/// assert_eq!(config.max_feedback_actions, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Maximum number of actions fed back by effects during one `send`
    pub max_feedback_actions: usize,
}

impl StoreConfig {
    /// Set the feedback limit
    #[must_use]
    pub const fn with_max_feedback_actions(mut self, max: usize) -> Self {
        self.max_feedback_actions = max;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_feedback_actions: 64,
        }
    }
}

/// Flattens an effect into the queue of actions still to reduce
fn enqueue<A>(effect: Effect<A>, queue: &mut VecDeque<A>) {
    match effect {
        Effect::None => {},
        Effect::Dispatch(action) => queue.push_back(*action),
        Effect::Sequential(effects) => {
            for effect in effects {
                enqueue(effect, queue);
            }
        },
    }
}

/// Store module - the runtime that hosts a reducer
pub mod store {
    use super::{
        enqueue, Arc, AtomicBool, Ordering, PhantomData, Reducer, RwLock, StoreConfig, StoreError,
        VecDeque,
    };

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock`, one writer at a time)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Feedback actions returned as effects
    ///
    /// Every `send` is applied to completion before the next one starts.
    /// The reducer runs against a copy of the current state, and the copy
    /// replaces the current value only once every feedback action has been
    /// reduced, so readers never observe a half-applied `send`.
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
        reducer: Arc<R>,
        environment: Arc<E>,
        config: StoreConfig,
        shutdown: Arc<AtomicBool>,
        _action: PhantomData<fn(A)>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
        S: Clone,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new store with custom configuration
        #[must_use]
        pub fn with_config(initial_state: S, reducer: R, environment: E, config: StoreConfig) -> Self {
            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                config,
                shutdown: Arc::new(AtomicBool::new(false)),
                _action: PhantomData,
            }
        }

        /// Send an action to the store
        ///
        /// 1. Acquires the write lock on state
        /// 2. Reduces the action against a copy of the state
        /// 3. Reduces any actions fed back through effects, in order
        /// 4. Replaces the current state with the copy
        ///
        /// Returns the number of actions reduced (the sent action included).
        ///
        /// # Errors
        ///
        /// - [`StoreError::ShutdownInProgress`] if the store is shutting down
        /// - [`StoreError::FeedbackLimit`] if effects keep feeding actions back
        ///   beyond the configured limit; the state is left unchanged
        pub async fn send(&self, action: A) -> Result<usize, StoreError> {
            self.send_and_inspect(action, |_, _| ())
                .await
                .map(|(reduced, ())| reduced)
        }

        /// Send an action and inspect the transition it caused
        ///
        /// Works like [`send`](Self::send), but `f` is called with the state
        /// before and after the action while the write lock is still held,
        /// so no other `send` can slip in between the transition and what
        /// `f` reads from it.
        ///
        /// ```ignore
        /// let (_, added) = store
        ///     .send_and_inspect(action, |before, after| after.len() - before.len())
        ///     .await?;
        /// ```
        ///
        /// # Errors
        ///
        /// Same as [`send`](Self::send); `f` is not called on error.
        #[tracing::instrument(skip_all, name = "store_send")]
        pub async fn send_and_inspect<F, T>(&self, action: A, f: F) -> Result<(usize, T), StoreError>
        where
            F: FnOnce(&S, &S) -> T,
        {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            metrics::counter!("store.actions.total").increment(1);

            let mut current = self.state.write().await;
            tracing::trace!("Acquired write lock on state");

            let mut next = current.clone();
            let mut queue = VecDeque::from([action]);
            let mut reduced = 0_usize;

            while let Some(action) = queue.pop_front() {
                if reduced > self.config.max_feedback_actions {
                    tracing::warn!(
                        limit = self.config.max_feedback_actions,
                        "Feedback limit exceeded, discarding transition"
                    );
                    return Err(StoreError::FeedbackLimit(self.config.max_feedback_actions));
                }

                let span = tracing::debug_span!("reducer_execution", step = reduced);
                let _enter = span.enter();

                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut next, action, &*self.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());

                tracing::trace!("Reducer completed, returned {} effects", effects.len());
                for effect in effects {
                    enqueue(effect, &mut queue);
                }
                reduced += 1;
            }

            let inspected = f(&*current, &next);
            *current = next;
            tracing::debug!(reduced, "Action processing completed");

            Ok((reduced, inspected))
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

        /// Returns a copy of the current state value
        pub async fn snapshot(&self) -> S {
            self.state.read().await.clone()
        }

        /// Stop accepting actions
        ///
        /// Actions already holding the write lock finish normally. Every later
        /// `send` fails with [`StoreError::ShutdownInProgress`].
        pub fn shutdown(&self) {
            if !self.shutdown.swap(true, Ordering::AcqRel) {
                tracing::info!("Store shut down");
                metrics::counter!("store.shutdown.initiated").increment(1);
            }
        }

        /// Returns true once `shutdown()` has been called
        #[must_use]
        pub fn is_shut_down(&self) -> bool {
            self.shutdown.load(Ordering::Acquire)
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: Arc::clone(&self.reducer),
                environment: Arc::clone(&self.environment),
                config: self.config.clone(),
                shutdown: Arc::clone(&self.shutdown),
                _action: PhantomData,
            }
        }
    }
}
