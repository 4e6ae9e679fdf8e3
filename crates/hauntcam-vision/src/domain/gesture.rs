//! What the ghost does and what it looks like.

use hauntcam_core::generative::ImageData;

/// Behaviour cue for the composited ghost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureCue {
    /// The ghost points at the item that was just found.
    Pointing {
        /// Label of the detected item.
        label: String,
    },
    /// Nothing was found; the ghost stands and mourns.
    Mourning,
}

impl GestureCue {
    /// Cue for a turn, given the label of the accepted detection.
    #[must_use]
    pub fn for_detection(label: Option<&str>) -> Self {
        match label {
            Some(label) => Self::Pointing {
                label: label.to_owned(),
            },
            None => Self::Mourning,
        }
    }

    /// Stable name stored with the photo.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pointing { .. } => "pointing",
            Self::Mourning => "mourning",
        }
    }
}

/// Appearance source for the ghost: a reference image or a description,
/// never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonaSource {
    /// Portrait to composite.
    Reference(ImageData),
    /// Free-text appearance.
    Description(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_follows_detection() {
        assert_eq!(
            GestureCue::for_detection(Some("cup")),
            GestureCue::Pointing {
                label: "cup".to_owned()
            }
        );
        assert_eq!(GestureCue::for_detection(None), GestureCue::Mourning);
        assert_eq!(GestureCue::Mourning.as_str(), "mourning");
    }
}
