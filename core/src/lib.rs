//! # Seatplan Core
//!
//! Core traits and types for the seatplan reducer architecture.
//!
//! All seating logic is written as reducers: deterministic functions that
//! mutate state in place and describe follow-up work as effects instead of
//! performing it.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state owned by a single store
//! - **Action**: All possible inputs to a reducer (commands and events)
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Description of follow-up work (not execution)
//! - **Environment**: Injected policies and dependencies
//!
//! ## Example
//!
//! ```
//! use seatplan_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Debug, Default)]
//! struct TallyState {
//!     seen: usize,
//! }
//!
//! #[derive(Debug, Clone)]
//! enum TallyAction {
//!     Record,
//!     Recorded { seen: usize },
//! }
//!
//! struct TallyReducer;
//!
//! impl Reducer for TallyReducer {
//!     type State = TallyState;
//!     type Action = TallyAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut TallyState,
//!         action: TallyAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<TallyAction>; 4]> {
//!         match action {
//!             TallyAction::Record => {
//!                 state.seen += 1;
//!                 smallvec![Effect::Publish(TallyAction::Recorded { seen: state.seen })]
//!             }
//!             TallyAction::Recorded { .. } => smallvec![Effect::None],
//!         }
//!     }
//! }
//!
//! let mut state = TallyState::default();
//! let effects = TallyReducer.reduce(&mut state, TallyAction::Record, &());
//! assert_eq!(state.seen, 1);
//! assert_eq!(effects.len(), 1);
//! ```

pub use smallvec::{smallvec, SmallVec};

/// Reducer module - The core trait for business logic
///
/// Reducers are deterministic: the same state and action always produce the
/// same new state and the same effects. This is what makes seating output
/// reproducible from an input stream.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected policies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed by the store
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
/// Effects are values returned from reducers. The store decides how and when
/// to run them; a reducer never observes the outcome of its own effects
/// except through actions fed back into it.
pub mod effect {
    /// Effect type - describes follow-up work for the store
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects carry (feedback loop)
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects one after another, in order
        Sequential(Vec<Effect<Action>>),

        /// Feed an action back into the reducer
        Dispatch(Action),

        /// Hand an action to the store's observers without reducing it
        ///
        /// Used for records of facts that already happened (events).
        Publish(Action),
    }

    impl<Action> Effect<Action> {
        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Returns `true` if this effect does nothing, including an empty chain
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Sequential(effects) => effects.iter().all(Effect::is_none),
                Effect::Dispatch(_) | Effect::Publish(_) => false,
            }
        }

        /// Iterate over the actions this effect publishes, in execution order
        pub fn published(&self) -> Box<dyn Iterator<Item = &Action> + '_> {
            match self {
                Effect::Publish(action) => Box::new(std::iter::once(action)),
                Effect::Sequential(effects) => {
                    Box::new(effects.iter().flat_map(Effect::published))
                },
                Effect::None | Effect::Dispatch(_) => Box::new(std::iter::empty()),
            }
        }
    }
}
