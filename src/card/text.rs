//! Measuring, shortening and escaping text.

use resvg::usvg::fontdb::{Database, Family, Query, Weight};
use swash::FontRef;

const ELLIPSIS: char = '…';
/// Average advance of a character relative to the font size, used when no font is available.
const FALLBACK_ADVANCE: f32 = 0.55;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

impl FontWeight {
    pub fn as_svg(&self) -> &'static str {
        match self {
            Self::Regular => "normal",
            Self::Bold => "bold",
        }
    }

    fn as_fontdb(&self) -> Weight {
        match self {
            Self::Regular => Weight::NORMAL,
            Self::Bold => Weight::BOLD,
        }
    }
}

/// A font file held in memory for measuring.
#[derive(Clone)]
struct FontFace {
    data: Vec<u8>,
    index: usize,
}

impl FontFace {
    fn from_data(data: &[u8], index: u32) -> Option<Self> {
        let index = index as usize;

        FontRef::from_index(data, index)?;

        Some(Self {
            data: data.to_vec(),
            index,
        })
    }

    fn measure(&self, text: &str, size: f32) -> Option<f32> {
        let font = FontRef::from_index(&self.data, self.index)?;
        let units_per_em = font.metrics(&[]).units_per_em.max(1);
        let scale = size / units_per_em as f32;
        let charmap = font.charmap();
        let glyph_metrics = font.glyph_metrics(&[]);
        let advance = text
            .chars()
            .map(|c| glyph_metrics.advance_width(charmap.map(c)))
            .sum::<f32>();

        Some(advance * scale)
    }
}

/// Measures rendered text widths using the same fonts the card is drawn with.
#[derive(Clone, Default)]
pub struct TextMeasurer {
    regular: Option<FontFace>,
    bold: Option<FontFace>,
}

impl std::fmt::Debug for TextMeasurer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextMeasurer")
            .field("regular", &self.regular.is_some())
            .field("bold", &self.bold.is_some())
            .finish()
    }
}

impl TextMeasurer {
    /// Picks faces for `family` (or the default sans-serif) from `fontdb`.
    pub fn from_database(fontdb: &Database, family: Option<&str>) -> Self {
        let mut families = Vec::with_capacity(2);

        if let Some(family) = family {
            families.push(Family::Name(family));
        }

        families.push(Family::SansSerif);

        let face = |weight: FontWeight| {
            let id = fontdb.query(&Query {
                families: &families,
                weight: weight.as_fontdb(),
                ..Query::default()
            })?;

            fontdb.with_face_data(id, FontFace::from_data).flatten()
        };

        Self {
            regular: face(FontWeight::Regular),
            bold: face(FontWeight::Bold),
        }
    }

    pub fn has_fonts(&self) -> bool {
        self.regular.is_some() || self.bold.is_some()
    }

    /// Width of `text` in pixels at `size`.
    pub fn measure(&self, text: &str, size: f32, weight: FontWeight) -> f32 {
        let face = match weight {
            FontWeight::Regular => self.regular.as_ref(),
            FontWeight::Bold => self.bold.as_ref().or(self.regular.as_ref()),
        };

        face
            .and_then(|face| face.measure(text, size))
            .unwrap_or_else(|| text.chars().count() as f32 * size * FALLBACK_ADVANCE)
    }
}

/// Shortens `text` to the longest prefix that, followed by an ellipsis, measures at most
/// `max_width`. Text that already fits is returned unchanged.
pub fn truncate_to_width<F>(text: &str, max_width: f32, measure: F) -> String
where
    F: Fn(&str) -> f32,
{
    if measure(text) <= max_width {
        return text.to_string();
    }

    let boundaries = text
        .char_indices()
        .map(|(i, _)| i)
        .collect::<Vec<_>>();
    let with_ellipsis = |chars: usize| {
        let end = boundaries.get(chars).copied().unwrap_or(text.len());
        let mut candidate = String::with_capacity(end + ELLIPSIS.len_utf8());

        candidate.push_str(&text[..end]);
        candidate.push(ELLIPSIS);
        candidate
    };
    // Binary search for the longest fitting prefix; widths grow with length.
    let (mut low, mut high) = (0, boundaries.len());

    while low < high {
        let mid = (low + high + 1) / 2;

        if measure(&with_ellipsis(mid)) <= max_width {
            low = mid;
        } else {
            high = mid - 1;
        }
    }

    with_ellipsis(low)
}

/// Limits `text` to `max_chars` characters, adding an ellipsis when anything was cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => {
            let mut truncated = text[..end].to_string();

            truncated.push(ELLIPSIS);
            truncated
        },
        None => text.to_string(),
    }
}

/// Escapes text for use in SVG content or attributes. Characters XML can't hold are dropped and
/// line breaks become spaces.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\t' | '\n' | '\r' => escaped.push(' '),
            c if c < ' ' => {},
            '\u{FFFE}' | '\u{FFFF}' => {},
            c => escaped.push(c),
        }
    }

    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    // Every character is 10px wide.
    fn fixed(text: &str) -> f32 {
        text.chars().count() as f32 * 10.0
    }

    #[test]
    fn short_text_is_unchanged() {
        assert_eq!(truncate_to_width("Gabe", 180.0, fixed), "Gabe");
        assert_eq!(truncate_to_width("", 180.0, fixed), "");
    }

    #[test]
    fn truncates_to_longest_fitting_prefix() {
        let name = "abcdefghijklmnopqrstuvwxyz";
        let truncated = truncate_to_width(name, 180.0, fixed);

        assert_eq!(truncated, "abcdefghijklmnopq…");
        assert!(fixed(&truncated) <= 180.0);
        // One more character would not fit.
        assert!(fixed("abcdefghijklmnopqr…") > 180.0);
    }

    #[test]
    fn truncates_multibyte_text() {
        let truncated = truncate_to_width("ガブガブガブガブ", 45.0, fixed);

        assert_eq!(truncated, "ガブガ…");
    }

    #[test]
    fn nothing_fits() {
        assert_eq!(truncate_to_width("abc", 5.0, fixed), "…");
    }

    #[test]
    fn truncates_by_character_count() {
        assert_eq!(truncate_chars("Bellevue, Washington, United States", 22), "Bellevue, Washington, …");
        assert_eq!(truncate_chars("Bellevue", 22), "Bellevue");
        assert_eq!(truncate_chars("0123456789012345678901", 22), "0123456789012345678901");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_xml("<b>\"Tom\" & 'Jerry'</b>"), "&lt;b&gt;&quot;Tom&quot; &amp; &apos;Jerry&apos;&lt;/b&gt;");
        assert_eq!(escape_xml("a\u{0}b\nc"), "ab c");
    }

    #[test]
    fn measures_without_fonts() {
        let measurer = TextMeasurer::default();

        assert!(!measurer.has_fonts());
        assert_eq!(measurer.measure("abcd", 20.0, FontWeight::Bold), 44.0);
    }
}
