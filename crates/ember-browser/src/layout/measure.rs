//! Text measurement seam.

use crate::style::FontWeight;

/// Measures the rendered width of a word.
///
/// The renderer that draws the display list must supply the same
/// metrics it paints with; line breaking is only as exact as this.
pub trait TextMeasurer {
    /// Width in pixels of `text` at `font_size` and `weight`.
    fn measure_text(&self, text: &str, font_size: u16, weight: FontWeight) -> u32;
}

impl<M: TextMeasurer + ?Sized> TextMeasurer for &M {
    fn measure_text(&self, text: &str, font_size: u16, weight: FontWeight) -> u32 {
        (**self).measure_text(text, font_size, weight)
    }
}

/// Metrics of a fixed-advance bitmap face scaled to `font_size`.
///
/// Every character advances `ceil(font_size / 2)` pixels; the bold
/// face is emboldened by one pixel per glyph.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleTextMeasurer;

impl SimpleTextMeasurer {
    pub fn advance(font_size: u16, weight: FontWeight) -> u32 {
        let base = u32::from(font_size).div_ceil(2);
        match weight {
            FontWeight::Normal => base,
            FontWeight::Bold => base + 1,
        }
    }
}

impl TextMeasurer for SimpleTextMeasurer {
    fn measure_text(&self, text: &str, font_size: u16, weight: FontWeight) -> u32 {
        let chars = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
        chars.saturating_mul(Self::advance(font_size, weight))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_scales_with_length_and_size() {
        let m = SimpleTextMeasurer;
        assert_eq!(m.measure_text("Hello", 16, FontWeight::Normal), 40);
        assert_eq!(m.measure_text("Hello", 32, FontWeight::Normal), 80);
        assert_eq!(m.measure_text("", 16, FontWeight::Normal), 0);
    }

    #[test]
    fn odd_sizes_round_up() {
        assert_eq!(SimpleTextMeasurer::advance(15, FontWeight::Normal), 8);
    }

    #[test]
    fn bold_is_wider() {
        let m = SimpleTextMeasurer;
        assert_eq!(m.measure_text("Hi", 32, FontWeight::Bold), 34);
    }

    #[test]
    fn counts_chars_not_bytes() {
        let m = SimpleTextMeasurer;
        assert_eq!(m.measure_text("héllo", 16, FontWeight::Normal), 40);
    }
}
