//! Yes/no classification of verifier text.

/// Affirmative token in English.
const YES: &str = "yes";
/// Affirmative token in the product language, matched as a token prefix.
const HAI: &str = "はい";
/// Negations that settle the reply when they come first.
const NEGATIONS: [&str; 2] = ["no", "not"];
const IIE: &str = "いいえ";

/// Whether a verifier reply is affirmative.
///
/// The reply is split into whole tokens on anything that is not a letter or
/// digit, then compared case-insensitively. The first affirmative or negative
/// token decides; a reply with neither is not affirmative.
#[must_use]
pub fn is_affirmative(text: &str) -> bool {
    let normalized = text.to_lowercase();
    for token in normalized
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
    {
        if NEGATIONS.contains(&token) || token.starts_with(IIE) {
            return false;
        }
        if token == YES || token.starts_with(HAI) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affirmative_forms_are_recognized() {
        for reply in [
            "はい",
            "  はい。\n",
            "Yes",
            "YES.",
            " yes, it does",
            "Nonetheless, yes",
            "判定：はい",
        ] {
            assert!(is_affirmative(reply), "{reply:?} should be affirmative");
        }
    }

    #[test]
    fn test_negative_and_empty_replies_are_rejected() {
        for reply in ["いいえ", "No", "no, not yes", "", "   ", "maybe", "Not yet, yes later"] {
            assert!(!is_affirmative(reply), "{reply:?} should not be affirmative");
        }
    }

    #[test]
    fn test_yes_inside_other_words_does_not_count() {
        for reply in [
            "The figure has glowing eyes",
            "Eyes closed, hands raised",
            "yesterday's photo",
        ] {
            assert!(!is_affirmative(reply), "{reply:?} should not be affirmative");
        }
    }
}
