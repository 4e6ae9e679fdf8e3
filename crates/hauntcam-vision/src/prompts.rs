//! Prompt text for the generative calls.

use crate::domain::detection::Candidate;
use crate::domain::gesture::{GestureCue, PersonaSource};

/// Classifier prompt listing the remaining candidates.
#[must_use]
pub fn detection_prompt(candidates: &[Candidate]) -> String {
    let items = candidates
        .iter()
        .map(|candidate| format!("{} ({})", candidate.key, candidate.label))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "You judge what appears in a photograph.\n\
         Remaining items: {items}\n\
         Does the photo show any of these items? Answer with the single item you are most \
         confident about, using its key exactly as listed.\n\
         If none of them is visible, set detected_item to null.\n\
         Rate confidence as high, medium, low, or none and explain briefly."
    )
}

/// Compositing prompt for the ghost overlay.
#[must_use]
pub fn synthesis_prompt(persona: &PersonaSource, gesture: &GestureCue, hint: Option<&str>) -> String {
    let appearance = match persona {
        PersonaSource::Reference(_) => {
            "Composite the person in the attached reference image into the photo as the ghost."
                .to_owned()
        }
        PersonaSource::Description(text) => format!("Ghost appearance: {text}"),
    };
    let action = match gesture {
        GestureCue::Pointing { label } => format!("The ghost is pointing at the {label}."),
        GestureCue::Mourning => {
            "The ghost is only weeping, standing there in sorrow.".to_owned()
        }
    };
    let mut prompt = format!(
        "Add a ghost to this photo.\n{appearance}\nGhost behaviour: {action}\n\
         Keep the composition and mood of the original photo and blend a translucent ghost \
         in naturally."
    );
    if let Some(hint) = hint.filter(|hint| !hint.trim().is_empty()) {
        prompt.push_str("\nThe ghost's mood reflects this message: ");
        prompt.push_str(hint);
    }
    prompt
}

/// Verifier prompt asking whether an image meets `spec`.
#[must_use]
pub fn verification_prompt(spec: &str) -> String {
    format!(
        "Judge whether the image satisfies the following specification. \
         Answer only \"yes\" or \"no\".\n\nSpecification: {spec}"
    )
}

/// Portrait prompt for a persona avatar.
#[must_use]
pub fn avatar_prompt(description: &str) -> String {
    format!(
        "Draw a single full-body portrait of a ghost on a plain background, to be used as a \
         reference image. Appearance: {description}"
    )
}

/// Judge prompt for the final accusation.
#[must_use]
pub fn accusation_prompt(solution: &str, suspect: &str, reasoning: &str) -> String {
    format!(
        "You grade the final answer of a mystery game.\n\
         Canonical solution: {solution}\n\
         Named suspect: {suspect}\n\
         Player's reasoning: {reasoning}\n\n\
         The suspect must match the canonical culprit; a wrong suspect is always incorrect \
         regardless of the reasoning. The reasoning must point in the direction of the \
         solution but need not be verbatim.\n\
         Return correct as a boolean and a short explanation addressed to the player. \
         If the answer is incorrect, never reveal the culprit or the solution."
    )
}
