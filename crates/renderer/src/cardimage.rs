use std::path::Path;

use effects::{Card, ImageSource};

const GRADIENT_SIZE: u32 = 256;

/// Decoded RGBA pixels ready for texture upload.
pub(crate) struct CardPixels {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Resolves a card's image to pixels.
///
/// A path that fails to decode falls back to the builtin gradient with a
/// warning instead of aborting the gallery; a missing shader-input image is
/// a cosmetic problem, not a fatal one.
pub(crate) fn resolve_card_pixels(card: &Card) -> CardPixels {
    match &card.image {
        ImageSource::Path(path) => match decode_image(path) {
            Ok(pixels) => pixels,
            Err(error) => {
                tracing::warn!(
                    card = card.id,
                    path = %path.display(),
                    error = %error,
                    "failed to decode card image; using gradient fallback"
                );
                gradient_pixels([0.18, 0.22, 0.45], [0.05, 0.05, 0.12])
            }
        },
        ImageSource::Gradient { top, bottom } => gradient_pixels(*top, *bottom),
    }
}

fn decode_image(path: &Path) -> Result<CardPixels, image::ImageError> {
    let decoded = image::open(path)?.to_rgba8();
    let (width, height) = decoded.dimensions();
    Ok(CardPixels {
        data: decoded.into_raw(),
        width,
        height,
    })
}

fn gradient_pixels(top: [f32; 3], bottom: [f32; 3]) -> CardPixels {
    let size = GRADIENT_SIZE;
    let mut data = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        let t = y as f32 / (size - 1) as f32;
        let row = [
            top[0] + (bottom[0] - top[0]) * t,
            top[1] + (bottom[1] - top[1]) * t,
            top[2] + (bottom[2] - top[2]) * t,
        ];
        for x in 0..size {
            // Slight horizontal sheen so effect distortion stays visible.
            let sheen = 0.06 * (x as f32 / size as f32);
            data.push(channel_byte(row[0] + sheen));
            data.push(channel_byte(row[1] + sheen));
            data.push(channel_byte(row[2] + sheen));
            data.push(255);
        }
    }
    CardPixels {
        data,
        width: size,
        height: size,
    }
}

fn channel_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_fills_the_expected_buffer() {
        let pixels = gradient_pixels([1.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        assert_eq!(pixels.width, GRADIENT_SIZE);
        assert_eq!(pixels.height, GRADIENT_SIZE);
        assert_eq!(
            pixels.data.len(),
            (GRADIENT_SIZE * GRADIENT_SIZE * 4) as usize
        );
        // Top row is red, bottom row is blue.
        assert_eq!(pixels.data[0], 255);
        let last_row = ((GRADIENT_SIZE - 1) * GRADIENT_SIZE * 4) as usize;
        assert_eq!(pixels.data[last_row + 2], 255);
        assert_eq!(pixels.data[3], 255, "alpha is opaque");
    }

    #[test]
    fn missing_image_path_falls_back_to_gradient() {
        let card = Card::new(0, "Missing", "demo")
            .with_image(ImageSource::Path("/nonexistent/deckshade.png".into()));
        let pixels = resolve_card_pixels(&card);
        assert_eq!(pixels.width, GRADIENT_SIZE);
        assert!(!pixels.data.is_empty());
    }
}
