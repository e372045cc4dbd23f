use crate::error::SuggestError;

/// Marks the word to fill in caller input. Case-sensitive.
pub const PLACEHOLDER: &str = "<blank>";

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Check that `text` has exactly one [`PLACEHOLDER`] with a word on at least one side.
///
/// Punctuation may sit between the word and the placeholder ("Hello, <blank>!").
///
/// # Errors
///
/// [`SuggestError::InvalidFormat`] with a message fit for the caller.
pub fn check(text: &str) -> Result<(), SuggestError> {
    let count = text.matches(PLACEHOLDER).count();
    if count == 0 {
        return Err(SuggestError::InvalidFormat(format!(
            "no {PLACEHOLDER} placeholder found; mark the word to fill with {PLACEHOLDER}"
        )));
    }
    if count > 1 {
        return Err(SuggestError::InvalidFormat(format!(
            "found {count} {PLACEHOLDER} placeholders, expected exactly one"
        )));
    }

    // Exactly one match, so the split always succeeds.
    let (before, after) = text.split_once(PLACEHOLDER).unwrap_or((text, ""));

    // The last word character before the marker is followed by non-word characters only,
    // and likewise the first one after it, so any word character is an adjacent word.
    if before.chars().any(is_word_char) || after.chars().any(is_word_char) {
        Ok(())
    } else {
        Err(SuggestError::InvalidFormat(format!(
            "{PLACEHOLDER} needs at least one word next to it"
        )))
    }
}

/// `true` when [`check`] accepts `text`.
pub fn validate(text: &str) -> bool {
    check(text).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_word_on_either_side() {
        assert!(validate("word <blank>"));
        assert!(validate("<blank> word"));
        assert!(validate("word <blank> word"));
        assert!(validate("Have a <blank> day."));
    }

    #[test]
    fn accepts_punctuation_between_word_and_placeholder() {
        assert!(validate("Hello, <blank>!"));
        assert!(validate("(<blank>) again"));
        assert!(validate("so<blank>"));
        assert!(validate("snake_case <blank>"));
    }

    #[test]
    fn rejects_missing_placeholder() {
        assert!(!validate("no placeholder here"));
        assert!(!validate(""));
        assert!(!validate("<BLANK> is case sensitive"));
        assert!(!validate("<blank is not closed"));
    }

    #[test]
    fn rejects_repeated_placeholder() {
        assert!(!validate("<blank> <blank> word"));
        assert!(!validate("a <blank> b <blank> c"));
        assert!(!validate("<blank><blank>"));
    }

    #[test]
    fn rejects_placeholder_without_neighbor() {
        assert!(!validate("<blank>"));
        assert!(!validate("   <blank>   "));
        assert!(!validate("... <blank> !!!"));
    }

    #[test]
    fn messages_name_the_problem() {
        let missing = check("nothing to fill").unwrap_err();
        assert!(missing.to_string().contains("no <blank>"));

        let repeated = check("<blank> <blank> word").unwrap_err();
        assert!(repeated.to_string().contains("found 2"));

        let lonely = check("<blank>").unwrap_err();
        assert!(lonely.to_string().contains("at least one word"));
        assert!(lonely.is_client_error());
    }
}
