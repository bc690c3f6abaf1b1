//! # Seatplan Runtime
//!
//! Runtime implementation for the seatplan reducer architecture.
//!
//! This crate provides the [`Store`], which owns the state, runs actions
//! through the reducer and executes the returned effects.
//!
//! The store is single-threaded and fully synchronous. Each call to
//! [`Store::send`] runs to completion, including every action fed back by
//! effects, before it returns. Later actions therefore always observe every
//! state change made by earlier ones.
//!
//! `Effect::Dispatch`, `Effect::Sequential` and the [`StoreConfig`] dispatch
//! limit serve reducers that feed actions back into the store. A reducer that
//! only publishes, like the seating reducer, never reaches that path.
//!
//! ## Example
//!
//! ```
//! use seatplan_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//! use seatplan_runtime::Store;
//!
//! #[derive(Debug, Clone)]
//! enum Action {
//!     Add(u32),
//!     Added(u32),
//! }
//!
//! struct Adder;
//!
//! impl Reducer for Adder {
//!     type State = u32;
//!     type Action = Action;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut u32, action: Action, _env: &()) -> SmallVec<[Effect<Action>; 4]> {
//!         match action {
//!             Action::Add(n) => {
//!                 *state += n;
//!                 smallvec![Effect::Publish(Action::Added(*state))]
//!             }
//!             Action::Added(_) => smallvec![Effect::None],
//!         }
//!     }
//! }
//!
//! let mut store = Store::new(0, Adder, ());
//! store.send(Action::Add(2)).unwrap();
//! assert_eq!(store.state(|s| *s), 2);
//! ```

use seatplan_core::{effect::Effect, reducer::Reducer};
use std::collections::VecDeque;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Effects kept dispatching actions past the configured limit
        ///
        /// Almost always a reducer that feeds an action back to itself
        /// unconditionally.
        #[error("Dispatch limit of {limit} actions exceeded while processing one send")]
        DispatchLimitExceeded {
            /// The configured limit
            limit: usize,
        },
    }
}

pub use error::StoreError;

/// Store configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Maximum number of actions reduced for a single `send`, including the
    /// action passed to `send` itself
    pub max_dispatch: usize,
}

impl StoreConfig {
    /// Create a new configuration
    #[must_use]
    pub const fn new(max_dispatch: usize) -> Self {
        Self { max_dispatch }
    }

    /// Set the dispatch limit
    #[must_use]
    pub const fn with_max_dispatch(mut self, max_dispatch: usize) -> Self {
        self.max_dispatch = max_dispatch;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { max_dispatch: 1024 }
    }
}

/// Observer callback receiving every published action
type Observer<A> = Box<dyn FnMut(&A)>;

/// Store module - the runtime coordinator
pub mod store {
    use super::{Effect, Observer, Reducer, StoreConfig, StoreError, VecDeque};

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (exclusively owned, one writer)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected policies)
    /// 4. Effect execution (feedback queue and observers)
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
        state: S,
        reducer: R,
        environment: E,
        config: StoreConfig,
        observers: Vec<Observer<A>>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        #[must_use]
        pub fn with_config(initial_state: S, reducer: R, environment: E, config: StoreConfig) -> Self {
            Self {
                state: initial_state,
                reducer,
                environment,
                config,
                observers: Vec::new(),
            }
        }

        /// Register an observer for published actions
        ///
        /// Observers run synchronously, in registration order, at the point
        /// the `Publish` effect executes.
        pub fn subscribe<F>(&mut self, observer: F)
        where
            F: FnMut(&A) + 'static,
        {
            self.observers.push(Box::new(observer));
        }

        /// Send an action through the reducer and run its effects to completion
        ///
        /// Dispatched actions are queued and reduced in FIFO order after the
        /// effects of the current action have been walked.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::DispatchLimitExceeded`] if more than
        /// `max_dispatch` actions are reduced for this send. State changes made
        /// before the limit was hit are kept.
        #[tracing::instrument(skip_all, name = "store_send")]
        pub fn send(&mut self, action: A) -> Result<(), StoreError> {
            let mut queue = VecDeque::from([action]);
            let mut reduced = 0_usize;

            while let Some(next) = queue.pop_front() {
                if reduced == self.config.max_dispatch {
                    tracing::error!(limit = self.config.max_dispatch, "dispatch limit exceeded");
                    return Err(StoreError::DispatchLimitExceeded {
                        limit: self.config.max_dispatch,
                    });
                }
                reduced += 1;

                let effects = self.reducer.reduce(&mut self.state, next, &self.environment);
                for effect in effects {
                    self.execute(effect, &mut queue);
                }
            }

            tracing::trace!(reduced, "send complete");
            Ok(())
        }

        fn execute(&mut self, effect: Effect<A>, queue: &mut VecDeque<A>) {
            match effect {
                Effect::None => {},
                Effect::Sequential(effects) => {
                    for effect in effects {
                        self.execute(effect, queue);
                    }
                },
                Effect::Dispatch(action) => queue.push_back(action),
                Effect::Publish(action) => {
                    for observer in &mut self.observers {
                        observer(&action);
                    }
                },
            }
        }

        /// Read state via a closure
        pub fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            f(&self.state)
        }

        /// The injected environment
        pub const fn environment(&self) -> &E {
            &self.environment
        }

        /// Consume the store and return the final state
        pub fn into_state(self) -> S {
            self.state
        }
    }
}

pub use store::Store;

#[cfg(test)]
mod tests {
    use super::*;
    use seatplan_core::{smallvec, SmallVec};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone)]
    struct TestState {
        value: i32,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum TestAction {
        Increment,
        Decrement,
        Announce,
        Announced(i32),
        IncrementTwiceThenDecrement,
        Loop,
    }

    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TestAction::Increment => {
                    state.value += 1;
                    smallvec![Effect::None]
                },
                TestAction::Decrement => {
                    state.value -= 1;
                    smallvec![Effect::None]
                },
                TestAction::Announce => {
                    smallvec![Effect::Publish(TestAction::Announced(state.value))]
                },
                TestAction::Announced(_) => smallvec![Effect::None],
                TestAction::IncrementTwiceThenDecrement => smallvec![Effect::chain(vec![
                    Effect::Dispatch(TestAction::Increment),
                    Effect::Dispatch(TestAction::Increment),
                    Effect::Dispatch(TestAction::Decrement),
                    Effect::Dispatch(TestAction::Announce),
                ])],
                TestAction::Loop => smallvec![Effect::Dispatch(TestAction::Loop)],
            }
        }
    }

    #[test]
    fn test_send_updates_state() {
        let mut store = Store::new(TestState { value: 0 }, TestReducer, ());

        assert!(store.send(TestAction::Increment).is_ok());
        assert!(store.send(TestAction::Increment).is_ok());
        assert!(store.send(TestAction::Decrement).is_ok());

        assert_eq!(store.state(|s| s.value), 1);
    }

    #[test]
    fn test_dispatched_actions_run_in_order_before_send_returns() {
        let published = Rc::new(RefCell::new(Vec::new()));
        let mut store = Store::new(TestState { value: 10 }, TestReducer, ());
        let sink = Rc::clone(&published);
        store.subscribe(move |action| sink.borrow_mut().push(action.clone()));

        assert!(store.send(TestAction::IncrementTwiceThenDecrement).is_ok());

        assert_eq!(store.state(|s| s.value), 11);
        assert_eq!(*published.borrow(), vec![TestAction::Announced(11)]);
    }

    #[test]
    fn test_observers_receive_published_actions_only() {
        let published = Rc::new(RefCell::new(Vec::new()));
        let mut store = Store::new(TestState { value: 3 }, TestReducer, ());
        let sink = Rc::clone(&published);
        store.subscribe(move |action| sink.borrow_mut().push(action.clone()));

        assert!(store.send(TestAction::Increment).is_ok());
        assert!(store.send(TestAction::Announce).is_ok());

        assert_eq!(*published.borrow(), vec![TestAction::Announced(4)]);
    }

    #[test]
    fn test_dispatch_limit_stops_feedback_loops() {
        let config = StoreConfig::default().with_max_dispatch(8);
        let mut store = Store::with_config(TestState { value: 0 }, TestReducer, (), config);

        assert_eq!(
            store.send(TestAction::Loop),
            Err(StoreError::DispatchLimitExceeded { limit: 8 })
        );

        // The store stays usable afterwards
        assert!(store.send(TestAction::Increment).is_ok());
        assert_eq!(store.into_state().value, 1);
    }

    proptest::proptest! {
        #[test]
        fn prop_sends_apply_in_order(ups in proptest::collection::vec(proptest::bool::ANY, 0..64)) {
            let mut store = Store::new(TestState { value: 0 }, TestReducer, ());
            let mut expected = 0;

            for up in ups {
                let action = if up { TestAction::Increment } else { TestAction::Decrement };
                expected += if up { 1 } else { -1 };
                proptest::prop_assert!(store.send(action).is_ok());
                proptest::prop_assert_eq!(store.state(|s| s.value), expected);
            }
        }

        #[test]
        fn prop_dispatch_limit_is_exact(limit in 1_usize..64) {
            let config = StoreConfig::new(limit);
            let mut store = Store::with_config(TestState { value: 0 }, TestReducer, (), config);

            // IncrementTwiceThenDecrement reduces five actions in total
            let result = store.send(TestAction::IncrementTwiceThenDecrement);
            proptest::prop_assert_eq!(result.is_ok(), limit >= 5);
        }
    }
}
