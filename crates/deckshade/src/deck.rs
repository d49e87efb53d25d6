//! Deck manifests: the list of cards the gallery shows.
//!
//! A deck is either the built-in demo deck or a TOML manifest of `[[card]]`
//! tables. Manifests are validated before any window is opened so a broken
//! deck fails fast on the command line.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use effects::{Card, ImageSource};

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("failed to parse deck manifest: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid deck manifest: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize)]
pub struct DeckManifest {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(rename = "card", default)]
    cards: Vec<CardEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CardEntry {
    title: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    size: Option<String>,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    date: Option<String>,
    /// Image file relative to the manifest's directory.
    #[serde(default)]
    image: Option<PathBuf>,
    #[serde(default)]
    gradient: Option<GradientEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GradientEntry {
    top: [f32; 3],
    bottom: [f32; 3],
}

fn default_version() -> u32 {
    1
}

impl DeckManifest {
    pub fn from_toml_str(input: &str) -> Result<Self, DeckError> {
        let raw: DeckManifest = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    fn validate(&self) -> Result<(), DeckError> {
        if self.version != 1 {
            return Err(DeckError::Invalid(format!(
                "unsupported deck version {}; expected 1",
                self.version
            )));
        }
        if self.cards.is_empty() {
            return Err(DeckError::Invalid(
                "deck must contain at least one card".into(),
            ));
        }
        for (index, card) in self.cards.iter().enumerate() {
            if card.title.trim().is_empty() {
                return Err(DeckError::Invalid(format!(
                    "card {index} must have a non-empty title"
                )));
            }
            if card.image.is_some() && card.gradient.is_some() {
                return Err(DeckError::Invalid(format!(
                    "card {index} sets both image and gradient; pick one"
                )));
            }
        }
        Ok(())
    }

    /// Resolves manifest entries into cards. Relative image paths are taken
    /// from the manifest's directory.
    pub fn into_cards(self, base_dir: &Path) -> Vec<Card> {
        self.cards
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                let mut card = Card::new(index as u32, entry.title, entry.text);
                if let Some(size) = entry.size {
                    card.size_label = size;
                }
                if let Some(kind) = entry.kind {
                    card.kind_label = kind;
                }
                if let Some(date) = entry.date {
                    card.date_label = date;
                }
                if let Some(path) = entry.image {
                    let resolved = if path.is_absolute() {
                        path
                    } else {
                        base_dir.join(path)
                    };
                    card.image = ImageSource::Path(resolved);
                } else if let Some(gradient) = entry.gradient {
                    card.image = ImageSource::Gradient {
                        top: gradient.top,
                        bottom: gradient.bottom,
                    };
                }
                card
            })
            .collect()
    }
}

/// Demo deck used when no manifest is supplied.
pub fn builtin_deck() -> Vec<Card> {
    let cards = [
        (
            "Aurora Drift",
            "Layered ribbons of light over a midnight ridge",
            [0.10, 0.35, 0.45_f32],
            [0.02, 0.05, 0.18_f32],
        ),
        (
            "Tide Glass",
            "Long-exposure surf rendered as frosted glass",
            [0.25, 0.42, 0.50],
            [0.05, 0.10, 0.16],
        ),
        (
            "Ember Field",
            "Sparks drifting above a cooling lava plain",
            [0.55, 0.22, 0.08],
            [0.12, 0.03, 0.04],
        ),
        (
            "Paper Canyon",
            "Folded terraces of sun-bleached sandstone",
            [0.60, 0.48, 0.32],
            [0.18, 0.10, 0.08],
        ),
    ];
    cards
        .into_iter()
        .enumerate()
        .map(|(index, (title, text, top, bottom))| {
            Card::new(index as u32, title, text).with_image(ImageSource::Gradient { top, bottom })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_manifest() {
        let manifest = DeckManifest::from_toml_str(
            r#"
            [[card]]
            title = "Solo"
            "#,
        )
        .unwrap();
        let cards = manifest.into_cards(Path::new("/decks"));
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].title, "Solo");
        assert_eq!(cards[0].size_label, "1024x1024");
        assert!(matches!(cards[0].image, ImageSource::Gradient { .. }));
    }

    #[test]
    fn rejects_empty_deck() {
        let err = DeckManifest::from_toml_str("version = 1").unwrap_err();
        assert!(matches!(err, DeckError::Invalid(_)));
    }

    #[test]
    fn rejects_unsupported_version() {
        let err = DeckManifest::from_toml_str(
            r#"
            version = 2

            [[card]]
            title = "Future"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("version 2"));
    }

    #[test]
    fn rejects_conflicting_image_sources() {
        let err = DeckManifest::from_toml_str(
            r#"
            [[card]]
            title = "Both"
            image = "both.png"
            gradient = { top = [1.0, 0.0, 0.0], bottom = [0.0, 0.0, 0.0] }
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("both image and gradient"));
    }

    #[test]
    fn resolves_relative_image_paths() {
        let manifest = DeckManifest::from_toml_str(
            r#"
            [[card]]
            title = "Portrait"
            image = "images/portrait.png"
            "#,
        )
        .unwrap();
        let cards = manifest.into_cards(Path::new("/decks/demo"));
        assert_eq!(
            cards[0].image,
            ImageSource::Path(PathBuf::from("/decks/demo/images/portrait.png"))
        );
    }

    #[test]
    fn manifest_overrides_metadata_labels() {
        let manifest = DeckManifest::from_toml_str(
            r#"
            [[card]]
            title = "Labelled"
            size = "512x512"
            kind = "Restyle"
            date = "Yesterday 18:40"
            "#,
        )
        .unwrap();
        let cards = manifest.into_cards(Path::new("."));
        assert_eq!(cards[0].size_label, "512x512");
        assert_eq!(cards[0].kind_label, "Restyle");
        assert_eq!(cards[0].date_label, "Yesterday 18:40");
    }

    #[test]
    fn builtin_deck_has_unique_ids() {
        let deck = builtin_deck();
        assert!(!deck.is_empty());
        for (index, card) in deck.iter().enumerate() {
            assert_eq!(card.id, index as u32);
        }
    }
}
