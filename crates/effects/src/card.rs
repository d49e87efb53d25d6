use std::path::PathBuf;

/// Where a card's image pixels come from.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// Decode from a file on disk (PNG/JPEG). Falls back to a gradient with
    /// a warning if decoding fails.
    Path(PathBuf),
    /// Procedural vertical gradient, linear RGB corners.
    Gradient { top: [f32; 3], bottom: [f32; 3] },
}

/// One immutable gallery item, created once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: u32,
    pub title: String,
    pub text: String,
    /// Metadata lines shown in the overlay panel.
    pub size_label: String,
    pub kind_label: String,
    pub date_label: String,
    pub image: ImageSource,
}

impl Card {
    pub fn new(id: u32, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            text: text.into(),
            size_label: "1024x1024".to_string(),
            kind_label: "Upscale".to_string(),
            date_label: "Today 09:55".to_string(),
            image: ImageSource::Gradient {
                top: [0.18, 0.22, 0.45],
                bottom: [0.05, 0.05, 0.12],
            },
        }
    }

    pub fn with_image(mut self, image: ImageSource) -> Self {
        self.image = image;
        self
    }
}
