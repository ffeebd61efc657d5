//! Per-field textual relevance.
//!
//! A tie-break ladder rather than a ranking function: no tokenization, no
//! edit distance, no stemming. Scores are one of 0, 1, 60, 80 or 100.

/// Score for an empty query; lets unfiltered browsing pass the relevance gate.
pub const EMPTY_QUERY_SCORE: f64 = 1.0;
pub const EXACT_SCORE: f64 = 100.0;
pub const PREFIX_SCORE: f64 = 80.0;
pub const INFIX_SCORE: f64 = 60.0;
pub const NO_MATCH_SCORE: f64 = 0.0;

/// Lower-case and trim a raw user query.
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Score a single field against an already normalized query.
///
/// The haystack is lower-cased here; the query is expected to come from
/// [`normalize_query`].
pub fn score_field(haystack: &str, query: &str) -> f64 {
    if query.is_empty() {
        return EMPTY_QUERY_SCORE;
    }

    let haystack = haystack.to_lowercase();
    if !haystack.contains(query) {
        NO_MATCH_SCORE
    } else if haystack == query {
        EXACT_SCORE
    } else if haystack.starts_with(query) {
        PREFIX_SCORE
    } else {
        INFIX_SCORE
    }
}
