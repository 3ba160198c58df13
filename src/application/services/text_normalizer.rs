//! Text normalization for document embedding
//!
//! The assembled PDF uses a builtin font over a single-byte encoding, so
//! story text has to be reduced to Latin-1 before it is written. The
//! transform is lossy and one-way; the orchestrator applies it exactly
//! once, immediately before assembly.

use unicode_normalization::UnicodeNormalization;

/// Replacement for any scalar the target character set cannot represent
const REPLACEMENT: char = '?';

/// Reduce arbitrary Unicode text to the Latin-1 range.
///
/// Applies NFKD compatibility decomposition, then substitutes every scalar
/// above U+00FF with `?`. Total over all inputs: the output always encodes
/// cleanly into the restricted set.
pub fn normalize(text: &str) -> String {
    text.nfkd()
        .map(|c| if (c as u32) <= 0xFF { c } else { REPLACEMENT })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_latin1(s: &str) {
        assert!(
            s.chars().all(|c| (c as u32) <= 0xFF),
            "non-Latin-1 character survived normalization: {:?}",
            s
        );
    }

    #[test]
    fn test_ascii_passes_through() {
        assert_eq!(normalize("Eliana found a cave."), "Eliana found a cave.");
    }

    #[test]
    fn test_compatibility_decomposition() {
        // Ligature and fullwidth forms decompose to ASCII
        assert_eq!(normalize("ﬁre"), "fire");
        assert_eq!(normalize("Ｅliana"), "Eliana");
    }

    #[test]
    fn test_unrepresentable_scalars_are_replaced() {
        let out = normalize("dragon 🐉 flew");
        assert_latin1(&out);
        assert!(out.contains('?'));
    }

    #[test]
    fn test_total_over_arbitrary_inputs() {
        for input in ["", "こんにちは", "😀😀😀", "Ωμέγα", "café", "a\u{0301}", "\u{FFFF}"] {
            let out = normalize(input);
            assert_latin1(&out);
        }
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert_eq!(normalize(""), "");
    }
}
