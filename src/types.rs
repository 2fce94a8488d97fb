use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// A single selectable item a search can return.
///
/// Matching runs against `label`; `value` and `metadata` are carried through
/// untouched for the consumer. Identity is structural equality of the whole
/// object as supplied by the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub label: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub value: Value,
    #[serde(default, flatten)]
    pub metadata: serde_json::Map<String, Value>,
}

impl Candidate {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: Value::Null,
            metadata: serde_json::Map::new(),
        }
    }

    pub fn with_value(label: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            metadata: serde_json::Map::new(),
        }
    }
}

/// First match occurrence within a candidate label, as byte offsets,
/// for a renderer to emphasize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightSpan {
    pub start: usize,
    pub len: usize,
}

/// A candidate annotated with the span of the debounced query that matched it.
///
/// `highlight` is `None` when the label does not contain the query (possible
/// on the lookup path, whose output is trusted as already matched) or when the
/// candidate comes from the initial set shown for an empty query.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedCandidate {
    pub candidate: Candidate,
    pub highlight: Option<HighlightSpan>,
}

impl MatchedCandidate {
    pub fn unhighlighted(candidate: Candidate) -> Self {
        Self {
            candidate,
            highlight: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.candidate.label
    }
}

/// Failure reported by an asynchronous lookup.
///
/// Rejections carrying a message are normalized to `Message`; anything else
/// degrades to `Unknown` ("an error occurred, no message available").
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("{0}")]
    Message(String),
    #[error("search failed")]
    Unknown,
}

impl From<String> for LookupError {
    fn from(message: String) -> Self {
        LookupError::Message(message)
    }
}

impl From<&str> for LookupError {
    fn from(message: &str) -> Self {
        LookupError::Message(message.to_string())
    }
}

impl From<anyhow::Error> for LookupError {
    fn from(err: anyhow::Error) -> Self {
        LookupError::Message(err.to_string())
    }
}

/// Boxed future produced by a lookup function.
pub type LookupFuture = Pin<Box<dyn Future<Output = Result<Vec<Candidate>, LookupError>> + Send>>;

/// Caller-supplied asynchronous lookup.
pub type LookupFn = Arc<dyn Fn(String) -> LookupFuture + Send + Sync>;

/// Where candidates come from: a static list matched synchronously, or an
/// asynchronous lookup function invoked with the debounced query.
#[derive(Clone)]
pub enum CandidateSource {
    Static(Vec<Candidate>),
    Lookup(LookupFn),
}

impl CandidateSource {
    /// Wrap an async closure as a lookup source. The closure's error type is
    /// normalized into [`LookupError`].
    pub fn lookup<F, Fut, E>(f: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<Candidate>, E>> + Send + 'static,
        E: Into<LookupError>,
    {
        CandidateSource::Lookup(Arc::new(move |query| -> LookupFuture {
            let fut = f(query);
            Box::pin(async move { fut.await.map_err(Into::into) })
        }))
    }

    /// Whether two sources are the same for re-evaluation purposes: static
    /// lists compare structurally, lookup functions by pointer identity.
    pub(crate) fn same_identity(&self, other: &CandidateSource) -> bool {
        match (self, other) {
            (CandidateSource::Static(a), CandidateSource::Static(b)) => a == b,
            (CandidateSource::Lookup(a), CandidateSource::Lookup(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Default for CandidateSource {
    fn default() -> Self {
        CandidateSource::Static(Vec::new())
    }
}

impl fmt::Debug for CandidateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateSource::Static(candidates) => {
                f.debug_tuple("Static").field(&candidates.len()).finish()
            }
            CandidateSource::Lookup(_) => f.debug_tuple("Lookup").field(&"fn").finish(),
        }
    }
}

/// Coordinator configuration. Immutable per session until replaced through
/// `SearchCoordinator::configure`.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Trailing-edge debounce delay applied to raw query changes.
    pub debounce_delay: Duration,
    /// Minimum query length (in chars) before any search is dispatched.
    pub min_search_length: usize,
    /// Candidates shown while the debounced query is empty.
    pub initial_candidates: Vec<Candidate>,
    /// Candidate source driving the search.
    pub source: CandidateSource,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_delay: Duration::from_millis(500),
            min_search_length: 1,
            initial_candidates: Vec::new(),
            source: CandidateSource::default(),
        }
    }
}

/// Mutually exclusive presentation flags derived from the current snapshot.
/// At most one is true; priority is instructions, then debounce-waiting,
/// then no-results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UiFlags {
    /// User has not typed enough yet.
    pub show_instructions: bool,
    /// Enough typed, but the debounce delay has not elapsed; no commitment
    /// to a loading or result state should be rendered.
    pub show_debounce_waiting: bool,
    /// A completed, legitimate search returned nothing.
    pub show_no_results: bool,
}

/// Observable state the consumer renders from, assembled on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub raw_query: String,
    pub debounced_query: String,
    pub loading: bool,
    pub error: Option<LookupError>,
    /// Visible results: the initial candidate set while the debounced query
    /// is empty, the store's results otherwise.
    pub results: Vec<MatchedCandidate>,
    pub flags: UiFlags,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_error_normalizes_messages() {
        assert_eq!(
            LookupError::from("Error"),
            LookupError::Message("Error".to_string())
        );
        assert_eq!(
            LookupError::from(anyhow::anyhow!("backend down")),
            LookupError::Message("backend down".to_string())
        );
        assert_eq!(LookupError::Unknown.to_string(), "search failed");
    }

    #[test]
    fn static_source_identity_is_structural() {
        let a = CandidateSource::Static(vec![Candidate::new("one")]);
        let b = CandidateSource::Static(vec![Candidate::new("one")]);
        let c = CandidateSource::Static(vec![Candidate::new("two")]);
        assert!(a.same_identity(&b));
        assert!(!a.same_identity(&c));
    }

    #[test]
    fn lookup_source_identity_is_by_pointer() {
        let a = CandidateSource::lookup(|_query| async { Ok::<_, LookupError>(vec![]) });
        let b = CandidateSource::lookup(|_query| async { Ok::<_, LookupError>(vec![]) });
        assert!(a.same_identity(&a.clone()));
        assert!(!a.same_identity(&b));
        assert!(!a.same_identity(&CandidateSource::Static(vec![])));
    }

    #[test]
    fn candidate_serde_round_trip_keeps_metadata() {
        let json = r#"{"label":"Custom 1","value":7,"group":"custom"}"#;
        let candidate: Candidate = serde_json::from_str(json).unwrap();
        assert_eq!(candidate.label, "Custom 1");
        assert_eq!(candidate.value, Value::from(7));
        assert_eq!(candidate.metadata.get("group"), Some(&Value::from("custom")));

        let back = serde_json::to_value(&candidate).unwrap();
        assert_eq!(back["group"], Value::from("custom"));
    }
}
