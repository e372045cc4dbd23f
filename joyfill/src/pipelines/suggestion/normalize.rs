/// Squeeze whitespace out of each candidate so it is one contiguous token.
///
/// Sub-word decoding can leave separators inside a word ("wonder ful"). Order is kept and
/// duplicates pass through. Candidates with nothing left are dropped.
pub fn normalize(candidates: Vec<String>) -> Vec<String> {
    candidates
        .into_iter()
        .map(|candidate| {
            if candidate.chars().any(char::is_whitespace) {
                candidate.chars().filter(|c| !c.is_whitespace()).collect()
            } else {
                candidate
            }
        })
        .filter(|candidate| !candidate.is_empty())
        .collect()
}
