//! Search coordination
//!
//! `SearchCoordinator` wires the debouncer, matcher, sequencer, and state
//! store into one poll-driven unit: the host feeds it raw query changes per
//! keystroke, calls `poll` from its event loop, and renders from `snapshot`.
//! Async lookups run on the ambient tokio runtime and report back over an
//! unbounded channel; stale responses are discarded at drain time.

use crate::debouncer::Debouncer;
use crate::matcher;
use crate::sequencer::{RequestId, RequestSequencer};
use crate::state::{derive_ui_flags, FlagInputs, SearchState};
use crate::types::{
    Candidate, CandidateSource, LookupError, MatchedCandidate, SearchConfig, Snapshot,
};
use tokio::sync::mpsc;

/// Completion of one dispatched lookup, tagged with the id captured at
/// dispatch so staleness can be judged when it is drained.
#[derive(Debug)]
struct LookupOutcome {
    request: RequestId,
    query: String,
    result: Result<Vec<Candidate>, LookupError>,
}

/// Debounced, race-safe search coordinator for one autocomplete session.
///
/// All state mutation happens inside `poll` (and the synchronous operations)
/// on the caller's task; spawned lookups only communicate through the outcome
/// channel, so no locking is involved.
///
/// `poll` must run inside a tokio runtime, since meeting the length threshold
/// with a lookup source spawns the lookup future.
pub struct SearchCoordinator {
    config: SearchConfig,
    raw_query: String,
    debouncer: Debouncer,
    sequencer: RequestSequencer,
    state: SearchState,
    /// `(debounced query, config generation)` last evaluated; suppresses
    /// redundant duplicate dispatch on re-evaluation.
    last_run: Option<(String, u64)>,
    /// Bumped when `configure` changes the source identity or the length
    /// threshold, forcing a re-evaluation with the unchanged debounced query.
    config_generation: u64,
    outcome_tx: mpsc::UnboundedSender<LookupOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<LookupOutcome>,
}

impl SearchCoordinator {
    pub fn new(config: SearchConfig) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            debouncer: Debouncer::new(config.debounce_delay),
            config,
            raw_query: String::new(),
            sequencer: RequestSequencer::new(),
            state: SearchState::new(),
            last_run: None,
            config_generation: 0,
            outcome_tx,
            outcome_rx,
        }
    }

    /// Replace the configuration. Swapping in a source with a different
    /// identity, or changing the length threshold, re-evaluates immediately
    /// against the unchanged debounced query; otherwise this is a no-op until
    /// the query changes.
    pub fn configure(&mut self, config: SearchConfig) {
        if !config.source.same_identity(&self.config.source)
            || config.min_search_length != self.config.min_search_length
        {
            self.config_generation += 1;
        }
        self.debouncer.set_delay(config.debounce_delay);
        self.config = config;
        self.evaluate();
    }

    /// Feed the latest raw query value (called per keystroke).
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.raw_query = query.into();
        self.debouncer.submit(self.raw_query.clone());
    }

    /// Drive the coordinator one tick: drain completed lookups, advance the
    /// debouncer, and run the transition for a newly settled query. Returns
    /// true if observable state changed, so hosts can re-render on demand.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            if self.apply_outcome(outcome) {
                changed = true;
            }
        }
        if self.debouncer.poll() {
            self.evaluate();
            changed = true;
        }
        changed
    }

    /// Observable state for rendering.
    pub fn snapshot(&self) -> Snapshot {
        let debounced = self.debouncer.value();
        let results = if debounced.is_empty() {
            self.config
                .initial_candidates
                .iter()
                .cloned()
                .map(MatchedCandidate::unhighlighted)
                .collect()
        } else {
            self.state.results.clone()
        };
        let flags = derive_ui_flags(&FlagInputs {
            raw_len: self.raw_query.chars().count(),
            debounced_len: debounced.chars().count(),
            min_len: self.config.min_search_length,
            loading: self.state.loading,
            has_searched: self.state.has_searched,
            result_count: self.state.results.len(),
        });
        Snapshot {
            raw_query: self.raw_query.clone(),
            debounced_query: debounced.to_string(),
            loading: self.state.loading,
            error: self.state.error.clone(),
            results,
            flags,
        }
    }

    /// Clear the error without touching results or loading.
    pub fn clear_error(&mut self) {
        self.state.clear_error();
    }

    /// Force an immediate reset to the empty state regardless of in-flight
    /// requests; their eventual resolutions become stale and are discarded.
    pub fn stop(&mut self) {
        log::debug!("stop: resetting search session");
        self.sequencer.invalidate();
        self.debouncer.reset();
        self.raw_query.clear();
        self.state.reset();
        self.last_run = Some((String::new(), self.config_generation));
    }

    /// No pending debounce and no unresolved lookup.
    pub fn is_idle(&self) -> bool {
        !self.state.loading && !self.debouncer.is_pending()
    }

    /// When the host should poll next to commit a pending debounce, if one
    /// is armed. Lookup completions still require polling on arrival.
    pub fn next_wakeup(&self) -> Option<std::time::Duration> {
        self.debouncer.time_until_ready()
    }

    /// Run the transition for the current `(debounced query, generation)`
    /// pair. Identical pair means nothing to do.
    fn evaluate(&mut self) {
        let debounced = self.debouncer.value().to_string();
        let key = (debounced.clone(), self.config_generation);
        if self.last_run.as_ref() == Some(&key) {
            return;
        }
        self.last_run = Some(key);

        if debounced.chars().count() < self.config.min_search_length {
            // Below threshold is a full reset, not an error; outstanding
            // lookups must not resurrect the old state.
            self.sequencer.invalidate();
            self.state.reset();
            return;
        }

        match &self.config.source {
            CandidateSource::Static(candidates) => {
                let results = matcher::match_candidates(&debounced, candidates);
                log::debug!(
                    "static match for {:?} produced {} results",
                    debounced,
                    results.len()
                );
                // A still-unresolved lookup from before a source swap must
                // not clobber this synchronous result.
                self.sequencer.invalidate();
                self.state.finish_static(results);
            }
            CandidateSource::Lookup(lookup) => {
                let request = self.sequencer.begin();
                self.state.begin_lookup();
                log::debug!("dispatching lookup {:?} for {:?}", request, debounced);
                let future = lookup(debounced.clone());
                let outcome_tx = self.outcome_tx.clone();
                tokio::spawn(async move {
                    let result = future.await;
                    let _ = outcome_tx.send(LookupOutcome {
                        request,
                        query: debounced,
                        result,
                    });
                });
            }
        }
    }

    /// Apply a drained lookup completion if it is still the latest dispatch.
    fn apply_outcome(&mut self, outcome: LookupOutcome) -> bool {
        if !self.sequencer.is_current(outcome.request) {
            log::debug!(
                "discarding stale lookup response for {:?}",
                outcome.query
            );
            return false;
        }
        match outcome.result {
            Ok(candidates) => {
                log::debug!(
                    "lookup for {:?} resolved with {} candidates",
                    outcome.query,
                    candidates.len()
                );
                let results = matcher::annotate(&outcome.query, candidates);
                self.state.finish_success(results);
            }
            Err(error) => {
                log::debug!("lookup for {:?} failed: {}", outcome.query, error);
                self.state.finish_failure(error);
            }
        }
        true
    }
}
