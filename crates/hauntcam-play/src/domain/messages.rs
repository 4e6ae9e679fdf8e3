//! Player-facing text.

/// Reply when the judge's verdict cannot be used.
pub const ACCUSATION_RETRY_MESSAGE: &str =
    "That doesn't quite add up. Look over the clues again and try another accusation.";

/// Reply for a correct accusation without an explanation.
pub const ACCUSATION_CORRECT_MESSAGE: &str =
    "Correct! You named the culprit and your reasoning holds.";

/// What happened in a turn, for message composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnEvent<'a> {
    /// Nothing is left to find.
    AllCleared {
        /// Whether the game ended with this turn.
        solved: bool,
    },
    /// An item was found this turn.
    Detected {
        /// Label of the found item.
        label: &'a str,
    },
    /// Nothing was found.
    NothingFound {
        /// Labels still to find.
        remaining: &'a [&'a str],
    },
}

/// Progress message for a turn.
#[must_use]
pub fn turn_message(event: TurnEvent<'_>) -> String {
    match event {
        TurnEvent::AllCleared { solved: true } => {
            "Every clue has been found. The ghost can finally rest.".to_owned()
        }
        TurnEvent::AllCleared { solved: false } => {
            "Every clue has been found. Name the culprit.".to_owned()
        }
        TurnEvent::Detected { label } => {
            format!("You found the {label}! The ghost is trying to tell you something...")
        }
        TurnEvent::NothingFound { remaining } => format!(
            "No clue this time. The ghost just stands there in sorrow. Still to find: {}.",
            remaining.join(", ")
        ),
    }
}

/// The explanation to show for an incorrect verdict.
///
/// Falls back to the retry message when the explanation is blank or names
/// the canonical suspect.
#[must_use]
pub fn guarded_explanation(explanation: &str, correct_suspect: &str) -> String {
    let explanation = explanation.trim();
    let suspect = correct_suspect.trim().to_lowercase();
    if explanation.is_empty()
        || (!suspect.is_empty() && explanation.to_lowercase().contains(&suspect))
    {
        ACCUSATION_RETRY_MESSAGE.to_owned()
    } else {
        explanation.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_message_branches_are_distinct() {
        let all = turn_message(TurnEvent::AllCleared { solved: false });
        let found = turn_message(TurnEvent::Detected { label: "cup" });
        let none = turn_message(TurnEvent::NothingFound {
            remaining: &["clock", "air conditioner"],
        });

        assert!(all.contains("Name the culprit"));
        assert!(found.contains("cup"));
        assert!(none.contains("clock, air conditioner"));
    }

    #[test]
    fn test_guarded_explanation_hides_the_culprit() {
        assert_eq!(
            guarded_explanation("It was not the gardener, think of the BUTLER.", "Butler"),
            ACCUSATION_RETRY_MESSAGE
        );
        assert_eq!(
            guarded_explanation("Your reasoning skips the cold tea.", "Butler"),
            "Your reasoning skips the cold tea."
        );
        assert_eq!(guarded_explanation("  ", "Butler"), ACCUSATION_RETRY_MESSAGE);
    }
}
