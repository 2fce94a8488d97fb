//! Search state store and UI-flag derivation
//!
//! `SearchState` holds the authoritative mutable state behind a search
//! session; only the coordinator mutates it, through the transition methods
//! here. `derive_ui_flags` is the pure companion that maps a snapshot of that
//! state to the mutually exclusive presentation flags a consumer renders.

use crate::types::{LookupError, MatchedCandidate, UiFlags};

/// Authoritative per-session search state, owned by the coordinator.
#[derive(Debug, Default)]
pub struct SearchState {
    /// True only while an asynchronous lookup is unresolved; the synchronous
    /// path never passes through a visible loading state.
    pub loading: bool,
    pub error: Option<LookupError>,
    pub results: Vec<MatchedCandidate>,
    /// True once any search (sync or async) has completed for the current
    /// query lineage; cleared on reset.
    pub has_searched: bool,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full reset to the empty/below-threshold phase.
    pub fn reset(&mut self) {
        self.loading = false;
        self.error = None;
        self.results.clear();
        self.has_searched = false;
    }

    /// An async lookup was dispatched; set before the lookup is invoked.
    pub fn begin_lookup(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// A synchronous match completed. Loading is untouched: the static path
    /// never shows a spinner.
    pub fn finish_static(&mut self, results: Vec<MatchedCandidate>) {
        self.results = results;
        self.error = None;
        self.has_searched = true;
    }

    /// The current async lookup resolved successfully.
    pub fn finish_success(&mut self, results: Vec<MatchedCandidate>) {
        self.loading = false;
        self.error = None;
        self.results = results;
        self.has_searched = true;
    }

    /// The current async lookup rejected.
    pub fn finish_failure(&mut self, error: LookupError) {
        self.loading = false;
        self.error = Some(error);
        self.results.clear();
        self.has_searched = true;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

/// Inputs to the flag derivation, all measured in chars.
#[derive(Debug, Clone, Copy)]
pub struct FlagInputs {
    pub raw_len: usize,
    pub debounced_len: usize,
    pub min_len: usize,
    pub loading: bool,
    pub has_searched: bool,
    pub result_count: usize,
}

/// Derive the presentation flags from the current snapshot. First matching
/// rule wins, which keeps the flags mutually exclusive:
///
/// 1. instructions — not enough typed yet, regardless of anything else;
/// 2. debounce-waiting — enough typed but the delay has not elapsed, so no
///    loading/result state should be committed to (avoids flicker);
/// 3. no-results — a completed, legitimate search returned nothing;
/// 4. otherwise none (the consumer shows the spinner if loading, else
///    results).
pub fn derive_ui_flags(inputs: &FlagInputs) -> UiFlags {
    if inputs.raw_len < inputs.min_len {
        return UiFlags {
            show_instructions: true,
            ..UiFlags::default()
        };
    }
    if inputs.debounced_len < inputs.min_len && !inputs.loading && !inputs.has_searched {
        return UiFlags {
            show_debounce_waiting: true,
            ..UiFlags::default()
        };
    }
    if inputs.has_searched
        && !inputs.loading
        && inputs.result_count == 0
        && inputs.debounced_len >= inputs.min_len
    {
        return UiFlags {
            show_no_results: true,
            ..UiFlags::default()
        };
    }
    UiFlags::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Candidate;

    fn one_result() -> Vec<MatchedCandidate> {
        vec![MatchedCandidate::unhighlighted(Candidate::new("Custom 1"))]
    }

    #[test]
    fn reset_clears_everything() {
        let mut state = SearchState::new();
        state.begin_lookup();
        state.finish_failure(LookupError::Unknown);
        state.reset();

        assert!(!state.loading);
        assert!(state.error.is_none());
        assert!(state.results.is_empty());
        assert!(!state.has_searched);
    }

    #[test]
    fn begin_lookup_sets_loading_and_clears_error() {
        let mut state = SearchState::new();
        state.finish_failure(LookupError::from("Error"));
        state.begin_lookup();

        assert!(state.loading);
        assert!(state.error.is_none());
        // A fresh dispatch does not erase the previous results.
        assert!(state.has_searched);
    }

    #[test]
    fn static_path_never_loads() {
        let mut state = SearchState::new();
        state.finish_static(one_result());
        assert!(!state.loading);
        assert!(state.has_searched);
        assert_eq!(state.results.len(), 1);
    }

    #[test]
    fn failure_forces_results_empty() {
        let mut state = SearchState::new();
        state.begin_lookup();
        state.finish_success(one_result());
        state.begin_lookup();
        state.finish_failure(LookupError::from("Error"));

        assert!(!state.loading);
        assert_eq!(state.error, Some(LookupError::Message("Error".to_string())));
        assert!(state.results.is_empty());
        assert!(state.has_searched);
    }

    #[test]
    fn clear_error_leaves_results_alone() {
        let mut state = SearchState::new();
        state.finish_static(one_result());
        state.error = Some(LookupError::Unknown);
        state.clear_error();
        assert!(state.error.is_none());
        assert_eq!(state.results.len(), 1);
    }

    fn flags(
        raw_len: usize,
        debounced_len: usize,
        min_len: usize,
        loading: bool,
        has_searched: bool,
        result_count: usize,
    ) -> UiFlags {
        derive_ui_flags(&FlagInputs {
            raw_len,
            debounced_len,
            min_len,
            loading,
            has_searched,
            result_count,
        })
    }

    fn exclusive(flags: UiFlags) -> bool {
        [
            flags.show_instructions,
            flags.show_debounce_waiting,
            flags.show_no_results,
        ]
        .iter()
        .filter(|set| **set)
        .count()
            <= 1
    }

    #[test]
    fn instructions_take_precedence() {
        let derived = flags(0, 0, 1, false, false, 0);
        assert!(derived.show_instructions);
        assert!(!derived.show_debounce_waiting);
        assert!(!derived.show_no_results);

        // Even while loading or after a search, too-short raw input wins.
        assert!(flags(2, 3, 3, true, true, 5).show_instructions);
    }

    #[test]
    fn debounce_waiting_needs_enough_raw_but_short_debounced() {
        let derived = flags(3, 0, 1, false, false, 0);
        assert!(derived.show_debounce_waiting);

        // Once a search ran (or is running), waiting is no longer shown.
        assert!(!flags(3, 0, 1, true, false, 0).show_debounce_waiting);
        assert!(!flags(3, 0, 1, false, true, 0).show_debounce_waiting);
    }

    #[test]
    fn no_results_only_after_a_completed_search() {
        assert!(flags(3, 3, 1, false, true, 0).show_no_results);
        // Not while loading, not before any search, not with results.
        assert!(!flags(3, 3, 1, true, true, 0).show_no_results);
        assert!(!flags(3, 3, 1, false, false, 0).show_no_results);
        assert!(!flags(3, 3, 1, false, true, 2).show_no_results);
    }

    #[test]
    fn flags_are_mutually_exclusive_across_the_input_space() {
        for raw_len in 0..4 {
            for debounced_len in 0..4 {
                for min_len in 0..3 {
                    for loading in [false, true] {
                        for has_searched in [false, true] {
                            for result_count in [0, 2] {
                                let derived = flags(
                                    raw_len,
                                    debounced_len,
                                    min_len,
                                    loading,
                                    has_searched,
                                    result_count,
                                );
                                assert!(
                                    exclusive(derived),
                                    "multiple flags set for raw={raw_len} debounced={debounced_len} min={min_len} loading={loading} searched={has_searched} count={result_count}"
                                );
                            }
                        }
                    }
                }
            }
        }
    }
}
