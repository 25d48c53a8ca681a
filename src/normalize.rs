//! OCR text normalization
//!
//! Raw OCR output is noisy: stray punctuation from the plate frame, split
//! character groups, embedded line breaks. This module reduces it to a
//! canonical 6-character plate code, or the empty string when no valid code
//! can be extracted. A partially recognized plate is deliberately treated as
//! "no detection" rather than risking a false match at the gate.

/// Canonical plate code length.
pub const PLATE_LEN: usize = 6;

/// True when every character is an ASCII digit or uppercase letter.
/// Case-sensitive: lowercase is rejected, not folded.
pub fn valid_chars(token: &str) -> bool {
    token
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
}

/// Normalize raw OCR text into a plate code.
///
/// Tokens are split on spaces, stripped of embedded whitespace, and kept only
/// when they consist of `[0-9A-Z]` and are exactly 3 or 6 characters long
/// (plates print as two groups of three or one run of six). Surviving tokens
/// are concatenated in order; anything other than an exact 6-character result
/// collapses to the empty string.
pub fn normalize(raw: &str) -> String {
    let mut code = String::new();
    for token in raw.split(' ').filter(|t| !t.is_empty()) {
        let token: String = token.chars().filter(|c| !matches!(c, '\n' | '\r')).collect();
        if !valid_chars(&token) {
            continue;
        }
        if token.len() == 3 || token.len() == PLATE_LEN {
            code.push_str(&token);
        }
    }
    if code.len() == PLATE_LEN {
        code
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouped_plate_is_joined() {
        assert_eq!(normalize("YAH 088"), "YAH088");
    }

    #[test]
    fn single_run_is_kept() {
        assert_eq!(normalize("YAH088"), "YAH088");
    }

    #[test]
    fn punctuation_inside_a_token_rejects_it() {
        assert_eq!(normalize("YAH0#8"), "");
    }

    #[test]
    fn frame_noise_around_the_groups_is_dropped() {
        assert_eq!(normalize("| YAH 088 |b"), "YAH088");
    }

    #[test]
    fn wrong_total_length_collapses_to_empty() {
        // One valid group of three is only half a plate.
        assert_eq!(normalize("YAH"), "");
        // Three groups of three would make nine characters.
        assert_eq!(normalize("YAH 088 123"), "");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn embedded_newlines_are_stripped_before_validation() {
        assert_eq!(normalize("YAH\n 088"), "YAH088");
        assert_eq!(normalize("YAH088\n"), "YAH088");
    }

    #[test]
    fn consecutive_spaces_never_yield_tokens() {
        assert_eq!(normalize("  YAH   088  "), "YAH088");
    }

    #[test]
    fn lowercase_is_rejected_not_folded() {
        assert!(!valid_chars("YaH088"));
        assert_eq!(normalize("YaH088"), "");
    }

    #[test]
    fn valid_chars_accepts_exactly_digits_and_uppercase() {
        assert!(valid_chars("YAH088"));
        assert!(valid_chars("123456"));
        assert!(valid_chars(""));
        assert!(!valid_chars("YAH08#"));
        assert!(!valid_chars("YAH 08"));
    }

    #[test]
    fn token_of_unexpected_length_is_discarded() {
        // "AB" and "CDEF" are clean but neither 3 nor 6 long.
        assert_eq!(normalize("AB CDEF"), "");
        // A clean 6-token next to junk still wins.
        assert_eq!(normalize("ABC123 ~~"), "ABC123");
    }
}
