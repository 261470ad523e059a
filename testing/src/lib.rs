//! # Tasklist Testing
//!
//! Testing utilities and helpers for the tasklist reducer architecture.
//!
//! This crate provides:
//! - [`ReducerTest`], a Given-When-Then harness for reducers
//! - Effect assertion helpers
//! - Property-based testing strategies and helpers
//! - Tracing setup for tests


/// Property-based testing utilities using proptest.
pub mod properties {
    use proptest::prelude::*;
    use tasklist_core::reducer::Reducer;

    /// Free-form text as a user would type it: letters, digits, punctuation
    /// and whitespace, possibly empty.
    pub fn typed_text() -> impl Strategy<Value = String> {
        "[ a-zA-Z0-9.,!?'\\t-]{0,24}"
    }

    /// Text that is non-empty after trimming, already trimmed.
    pub fn trimmed_text() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9][ a-zA-Z0-9.,!?'-]{0,22}[a-zA-Z0-9.!?]?".prop_map(|s| s.trim().to_string())
    }

    /// Reduces every action in order, discarding effects.
    pub fn reduce_all<R, I>(reducer: &R, mut state: R::State, actions: I, env: &R::Environment) -> R::State
    where
        R: Reducer,
        I: IntoIterator<Item = R::Action>,
    {
        for action in actions {
            let _effects = reducer.reduce(&mut state, action, env);
        }
        state
    }
}

/// Tracing setup for tests
pub mod tracing_setup {
    /// Install a test-friendly `fmt` subscriber honouring `RUST_LOG`.
    ///
    /// Safe to call from every test; only the first call installs anything.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "warn".into()),
            )
            .with_test_writer()
            .try_init();
    }
}

// Re-export commonly used items
pub use reducer_test::{assertions, ReducerTest};
pub use tracing_setup::init_test_tracing;

#[cfg(test)]
mod tests {
    use super::properties::{reduce_all, trimmed_text, typed_text};
    use proptest::prelude::*;
    use tasklist_core::{effect::Effect, reducer::Reducer, SmallVec};

    struct SumReducer;

    impl Reducer for SumReducer {
        type State = i64;
        type Action = i64;
        type Environment = ();

        fn reduce(&self, state: &mut i64, action: i64, _env: &()) -> SmallVec<[Effect<i64>; 4]> {
            *state += action;
            SmallVec::new()
        }
    }

    #[test]
    fn reduce_all_applies_in_order() {
        assert_eq!(reduce_all(&SumReducer, 1, [2, 3, -1], &()), 5);
    }

    proptest! {
        #[test]
        fn trimmed_text_is_trimmed_and_non_empty(text in trimmed_text()) {
            prop_assert!(!text.is_empty());
            prop_assert_eq!(text.trim(), text.as_str());
        }

        #[test]
        fn typed_text_is_short(text in typed_text()) {
            prop_assert!(text.chars().count() <= 24);
        }
    }
}
