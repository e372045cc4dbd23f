use super::validate::PLACEHOLDER;

/// Collapse whitespace runs to one space, trim, and swap the placeholder for `mask_token`.
///
/// Only the first placeholder is replaced. Callers validate beforehand so there is
/// exactly one.
pub fn normalize_and_mask(text: &str, mask_token: &str) -> String {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    normalized.replacen(PLACEHOLDER, mask_token, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swaps_placeholder_for_mask() {
        let masked = normalize_and_mask("word <blank> word", "[MASK]");
        assert_eq!(masked, "word [MASK] word");
        assert_eq!(masked.matches("[MASK]").count(), 1);
        assert!(!masked.contains(PLACEHOLDER));
    }

    #[test]
    fn collapses_and_trims_whitespace() {
        let masked = normalize_and_mask("  Have \t a\n\n<blank>   day.  ", "[MASK]");
        assert_eq!(masked, "Have a [MASK] day.");
    }

    #[test]
    fn keeps_punctuation_attached() {
        assert_eq!(normalize_and_mask("Hello,<blank>!", "<mask>"), "Hello,<mask>!");
    }
}
