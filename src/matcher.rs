//! Pure substring candidate matching
//!
//! Case-insensitive matching of a query against candidate labels, with the
//! first match occurrence reported as a highlight span. Deterministic and
//! side-effect free; the coordinator never calls it with an empty query.

use crate::types::{Candidate, HighlightSpan, MatchedCandidate};

/// Match `query` against the candidate labels.
///
/// Survivors are annotated with the first occurrence span and ranked by match
/// position ascending, so label-prefix matches come before mere containment.
/// The sort is stable: candidates matching at the same position keep their
/// source order.
pub fn match_candidates(query: &str, candidates: &[Candidate]) -> Vec<MatchedCandidate> {
    if query.is_empty() {
        return Vec::new();
    }

    let mut hits: Vec<MatchedCandidate> = candidates
        .iter()
        .filter_map(|candidate| {
            find_first_match(&candidate.label, query).map(|span| MatchedCandidate {
                candidate: candidate.clone(),
                highlight: Some(span),
            })
        })
        .collect();

    hits.sort_by_key(|hit| hit.highlight.map_or(usize::MAX, |span| span.start));
    hits
}

/// Annotate lookup results with highlight spans without re-filtering; the
/// lookup's output is trusted as already matched, so labels that do not
/// contain the query simply carry no span.
pub fn annotate(query: &str, candidates: Vec<Candidate>) -> Vec<MatchedCandidate> {
    candidates
        .into_iter()
        .map(|candidate| {
            let highlight = find_first_match(&candidate.label, query);
            MatchedCandidate {
                candidate,
                highlight,
            }
        })
        .collect()
}

/// Byte span of the first case-insensitive occurrence of `query` in `label`.
pub fn find_first_match(label: &str, query: &str) -> Option<HighlightSpan> {
    if query.is_empty() {
        return None;
    }
    for (start, _) in label.char_indices() {
        if let Some(len) = match_len_ignore_case(&label[start..], query) {
            return Some(HighlightSpan { start, len });
        }
    }
    None
}

/// Byte length of `haystack`'s prefix that case-insensitively equals
/// `needle`, or `None` if it does not match. Compares char by char so the
/// span stays valid even when lowercasing would change byte lengths.
fn match_len_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    let mut len = 0;
    let mut hay = haystack.chars();
    for needle_char in needle.chars() {
        let hay_char = hay.next()?;
        if !hay_char.to_lowercase().eq(needle_char.to_lowercase()) {
            return None;
        }
        len += hay_char.len_utf8();
    }
    Some(len)
}
