use std::collections::HashMap;

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, Weight};

#[derive(Hash, PartialEq, Eq, Clone)]
struct MeasureKey {
    text: String,
    font_size_bits: u32,
    is_bold: bool,
}

/// Width and height a single line of text occupies when rendered.
pub trait TextMeasure {
    fn measure_text(&mut self, text: &str, font_size: f32, is_bold: bool) -> (f32, f32);
}

/// Shapes text with the system fonts.
pub struct CosmicTextMeasure {
    font_system: FontSystem,
    cache: HashMap<MeasureKey, (f32, f32)>,
}

impl CosmicTextMeasure {
    pub fn new() -> Self {
        Self {
            font_system: FontSystem::new(),
            cache: HashMap::new(),
        }
    }
}

impl Default for CosmicTextMeasure {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMeasure for CosmicTextMeasure {
    fn measure_text(&mut self, text: &str, font_size: f32, is_bold: bool) -> (f32, f32) {
        let key = MeasureKey {
            text: text.to_string(),
            font_size_bits: font_size.to_bits(),
            is_bold,
        };

        if let Some(cached) = self.cache.get(&key) {
            return *cached;
        }

        let line_height = font_size * 1.2;
        let mut buffer = Buffer::new(
            &mut self.font_system,
            Metrics {
                font_size,
                line_height,
            },
        );
        buffer.set_size(&mut self.font_system, None, None);

        let attrs = Attrs::new().family(Family::SansSerif).weight(if is_bold {
            Weight::BOLD
        } else {
            Weight::NORMAL
        });
        buffer.set_text(&mut self.font_system, text, &attrs, Shaping::Advanced, None);

        let mut width: f32 = 0.0;
        let mut height: f32 = 0.0;
        for run in buffer.layout_runs() {
            width = width.max(run.line_w);
            height += run.line_height;
        }
        // Empty text still occupies one line.
        let measured = (width, height.max(line_height));
        self.cache.insert(key, measured);
        measured
    }
}

/// Estimates text extents from the character count, without loading fonts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateMeasure;

impl TextMeasure for ApproximateMeasure {
    fn measure_text(&mut self, text: &str, font_size: f32, is_bold: bool) -> (f32, f32) {
        let advance = if is_bold { 0.62 } else { 0.55 };
        (
            text.chars().count() as f32 * font_size * advance,
            font_size * 1.2,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approximate_width_grows_with_text() {
        let mut m = ApproximateMeasure;
        let (short, h) = m.measure_text("0", 10.0, false);
        let (long, _) = m.measure_text("0+ 1+", 10.0, false);
        assert!(long > short);
        assert_eq!(h, 12.0);
        assert_eq!(m.measure_text("", 10.0, false).0, 0.0);
    }

    #[test]
    fn bold_is_wider() {
        let mut m = ApproximateMeasure;
        assert!(m.measure_text("Author", 14.0, true).0 > m.measure_text("Author", 14.0, false).0);
    }
}
