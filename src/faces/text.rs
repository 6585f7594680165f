use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};
use u8g2_fonts::{
    types::{FontColor, HorizontalAlignment, VerticalPosition},
    Error as FontError, FontRenderer,
};

/// Draws `text` with its top-left (or baseline-left) corner at `origin`.
/// Missing glyphs are skipped; only target errors propagate.
pub(crate) fn draw_text<T>(
    target: &mut T,
    font: &FontRenderer,
    text: &str,
    origin: Point,
    vertical: VerticalPosition,
    color: BinaryColor,
) -> Result<(), T::Error>
where
    T: DrawTarget<Color = BinaryColor>,
{
    match font.render_aligned(
        text,
        origin,
        vertical,
        HorizontalAlignment::Left,
        FontColor::Transparent(color),
        target,
    ) {
        Ok(_) => Ok(()),
        Err(FontError::DisplayError(err)) => Err(err),
        Err(FontError::GlyphNotFound(glyph)) => {
            log::debug!("face: text skipped missing_glyph={:?}", glyph);
            Ok(())
        }
        Err(FontError::BackgroundColorNotSupported) => {
            log::debug!("face: text skipped background not supported");
            Ok(())
        }
    }
}
