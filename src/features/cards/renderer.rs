//! Card compositing over bundled background art.
//!
//! CPU-bound; callers run [`CardRenderer::render`] inside `spawn_blocking`.

use anyhow::{anyhow, Context as _, Result};
use image::ImageOutputFormat;
use imageproc::drawing::draw_text_mut;
use rusttype::{point, Font, Scale};
use std::io::Cursor;
use std::path::PathBuf;

use super::CardColor;
use crate::core::response::truncate;

const WHITE: image::Rgba<u8> = image::Rgba([255, 255, 255, 255]);

/// Loads backgrounds and fonts from the asset directory and composites cards.
#[derive(Clone)]
pub struct CardRenderer {
    asset_dir: PathBuf,
}

impl CardRenderer {
    pub fn new(asset_dir: impl Into<PathBuf>) -> Self {
        CardRenderer {
            asset_dir: asset_dir.into(),
        }
    }

    fn load_font(&self, file: &str) -> Result<Font<'static>> {
        let path = self.asset_dir.join("fonts").join(file);
        let bytes = std::fs::read(&path)
            .with_context(|| format!("reading font {}", path.display()))?;
        Font::try_from_vec(bytes).ok_or_else(|| anyhow!("unsupported font file {file}"))
    }

    /// Composite a christmas card: recipient name centered above the middle,
    /// greeting centered below it, sender credit at a fixed offset. Returns
    /// PNG bytes ready for upload.
    pub fn render(&self, author: &str, recipient: &str, greeting: &str, color: CardColor) -> Result<Vec<u8>> {
        let background = self
            .asset_dir
            .join(format!("xmas_{}.png", color.as_str()));
        let mut img = image::open(&background)
            .with_context(|| format!("opening card background {}", background.display()))?
            .to_rgba8();
        let (width, height) = img.dimensions();

        let recipient_font = self.load_font("kids_year.ttf")?;
        let body_font = self.load_font("coolvetica.ttf")?;

        let recipient_scale = Scale::uniform(40.0);
        let author_scale = Scale::uniform(30.0);
        let greeting_scale = Scale::uniform(35.0);

        let author = truncate(&format!("@{author}"), 32);
        let recipient = truncate(&format!("@{recipient}"), 26);
        let greeting = format!("\u{201c}{greeting}\u{201d}");

        let recipient_width = text_width(&recipient_font, recipient_scale, &recipient);
        let greeting_width = text_width(&body_font, greeting_scale, &greeting);

        draw_text_mut(
            &mut img,
            WHITE,
            centered_x(width, recipient_width),
            height as i32 / 2 - 22,
            recipient_scale,
            &recipient_font,
            &recipient,
        );
        draw_text_mut(
            &mut img,
            WHITE,
            115,
            798,
            author_scale,
            &body_font,
            &author,
        );
        draw_text_mut(
            &mut img,
            WHITE,
            centered_x(width, greeting_width),
            height as i32 / 2 + 70,
            greeting_scale,
            &body_font,
            &greeting,
        );

        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)?;
        Ok(png)
    }
}

/// Advance width of `text` at `scale`, for horizontal centering.
fn text_width(font: &Font<'_>, scale: Scale, text: &str) -> f32 {
    font.layout(text, scale, point(0.0, 0.0))
        .map(|glyph| glyph.unpositioned().h_metrics().advance_width)
        .sum()
}

fn centered_x(canvas_width: u32, text_width: f32) -> i32 {
    ((canvas_width as f32 - text_width) / 2.0) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_x() {
        assert_eq!(centered_x(1000, 400.0), 300);
        assert_eq!(centered_x(100, 100.0), 0);
    }

    #[test]
    fn test_centered_x_wider_than_canvas_goes_negative() {
        // Overlong text bleeds evenly off both edges instead of clipping right
        assert_eq!(centered_x(100, 140.0), -20);
    }

    #[test]
    fn test_render_fails_cleanly_without_assets() {
        let renderer = CardRenderer::new("/nonexistent/assets");
        let err = renderer
            .render("sender", "receiver", "hi", CardColor::Blue)
            .unwrap_err();
        assert!(err.to_string().contains("card background"));
    }
}
