//! Debounced, race-safe asynchronous search coordination for
//! autocomplete-style inputs.
//!
//! Given a stream of raw query changes, [`SearchCoordinator`] decides when to
//! search, against which source (a static candidate list or an async lookup
//! function), and reconciles out-of-order responses into one consistent
//! snapshot: loading flag, results with highlight spans, error, and the
//! guidance flags an input control renders directly.
//!
//! ```no_run
//! use typeahead::{Candidate, CandidateSource, SearchConfig, SearchCoordinator};
//!
//! # async fn example() {
//! let mut coordinator = SearchCoordinator::new(SearchConfig {
//!     source: CandidateSource::Static(vec![
//!         Candidate::new("Custom 1"),
//!         Candidate::new("Custom 2"),
//!     ]),
//!     ..SearchConfig::default()
//! });
//!
//! // per keystroke:
//! coordinator.set_query("cus");
//! // per event-loop tick:
//! if coordinator.poll() {
//!     let snapshot = coordinator.snapshot();
//!     // render snapshot.results / snapshot.flags
//! }
//! # }
//! ```

pub mod coordinator;
pub mod debouncer;
pub mod matcher;
pub mod sequencer;
pub mod state;
pub mod types;

pub use coordinator::SearchCoordinator;
pub use debouncer::Debouncer;
pub use sequencer::{RequestId, RequestSequencer};
pub use state::{derive_ui_flags, FlagInputs, SearchState};
pub use types::*;
