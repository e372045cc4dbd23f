/// Most suggestions a request ever returns.
pub const MAX_SUGGESTIONS: usize = 5;

/// Keep the first `max_count` candidates. Never reorders, never pads.
pub fn truncate(mut candidates: Vec<String>, max_count: usize) -> Vec<String> {
    candidates.truncate(max_count);
    candidates
}
