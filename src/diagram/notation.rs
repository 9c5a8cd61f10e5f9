//! Cardinality notations and the label encoding used by BACH diagrams.
//!
//! A BACH label looks like `BACH:F:1+` or `BACH:T:0`: the `BACH:` marker
//! selects the notation, an `F:` anywhere in the text puts the cardinality on
//! the source end of the edge, and everything from the eighth UTF-16 code unit
//! on is the cardinality token. Any other label is a CHEN label whose whole text is
//! the token.

/// Substring that switches a label to BACH notation.
pub const BACH_MARKER: &str = "BACH:";
/// Substring that places a BACH cardinality on the source end.
pub const SOURCE_MARKER: &str = "F:";
/// Offset, in UTF-16 code units, at which the cardinality token starts in a
/// BACH label.
pub const CARDINALITY_OFFSET: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Notation {
    #[default]
    Chen,
    Bach,
}

/// Edge end a BACH cardinality belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Target,
}

/// Recognized cardinality tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// `0`
    Zero,
    /// `0+`
    ZeroOrMore,
    /// `1`
    One,
    /// `1+`
    OneOrMore,
}

impl Cardinality {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "0" => Some(Cardinality::Zero),
            "0+" => Some(Cardinality::ZeroOrMore),
            "1" => Some(Cardinality::One),
            "1+" => Some(Cardinality::OneOrMore),
            _ => None,
        }
    }

    /// Whether the "or more" chevron is drawn next to the circle.
    pub fn has_chevron(self) -> bool {
        matches!(self, Cardinality::ZeroOrMore | Cardinality::OneOrMore)
    }

    pub fn is_zero(self) -> bool {
        matches!(self, Cardinality::Zero | Cardinality::ZeroOrMore)
    }
}

/// A label's text split into notation, side and cardinality token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedLabel<'a> {
    pub notation: Notation,
    /// `None` for CHEN labels, which do not pick a side.
    pub side: Option<Side>,
    pub value: &'a str,
}

impl<'a> EncodedLabel<'a> {
    /// Parses `text`. `carried` is the notation already in effect for the
    /// edge: a blank label keeps an edge in BACH notation.
    pub fn parse(text: &'a str, carried: Notation) -> Self {
        let is_bach = text.contains(BACH_MARKER) || (text.is_empty() && carried == Notation::Bach);
        if !is_bach {
            return Self {
                notation: Notation::Chen,
                side: None,
                value: text,
            };
        }

        let side = if text.contains(SOURCE_MARKER) {
            Side::Source
        } else {
            Side::Target
        };
        let value = &text[token_start(text)..];

        Self {
            notation: Notation::Bach,
            side: Some(side),
            value,
        }
    }

}

/// Byte index of the character covering UTF-16 unit [`CARDINALITY_OFFSET`].
/// An astral character straddling the offset is kept whole, so the token
/// never matches a known cardinality.
fn token_start(text: &str) -> usize {
    let mut units = 0;
    for (i, c) in text.char_indices() {
        units += c.len_utf16();
        if units > CARDINALITY_OFFSET {
            return i;
        }
    }
    text.len()
}

/// True when the text carries the BACH marker itself (a blank label does not).
pub fn is_bach_label(text: &str) -> bool {
    text.contains(BACH_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_source_side_bach_label() {
        let label = EncodedLabel::parse("BACH:F:1+", Notation::Chen);
        assert_eq!(label.notation, Notation::Bach);
        assert_eq!(label.side, Some(Side::Source));
        assert_eq!(label.value, "1+");
        assert_eq!(Cardinality::from_token(label.value), Some(Cardinality::OneOrMore));
    }

    #[test]
    fn parses_target_side_bach_label() {
        let label = EncodedLabel::parse("BACH:T:0", Notation::Chen);
        assert_eq!(label.notation, Notation::Bach);
        assert_eq!(label.side, Some(Side::Target));
        assert_eq!(label.value, "0");
    }

    #[test]
    fn plain_text_is_chen() {
        let label = EncodedLabel::parse("0+", Notation::Chen);
        assert_eq!(label.notation, Notation::Chen);
        assert_eq!(label.side, None);
        assert_eq!(label.value, "0+");
    }

    #[test]
    fn plain_text_switches_bach_edge_back_to_chen() {
        let label = EncodedLabel::parse("1", Notation::Bach);
        assert_eq!(label.notation, Notation::Chen);
        assert_eq!(label.value, "1");
    }

    #[test]
    fn blank_label_carries_bach_forward() {
        let label = EncodedLabel::parse("", Notation::Bach);
        assert_eq!(label.notation, Notation::Bach);
        assert_eq!(label.side, Some(Side::Target));
        assert_eq!(label.value, "");
        assert_eq!(Cardinality::from_token(label.value), None);
    }

    #[test]
    fn blank_label_on_chen_edge_stays_chen() {
        let label = EncodedLabel::parse("", Notation::Chen);
        assert_eq!(label.notation, Notation::Chen);
        assert_eq!(label.value, "");
    }

    #[test]
    fn short_bach_label_yields_empty_token() {
        let label = EncodedLabel::parse("BACH:", Notation::Chen);
        assert_eq!(label.notation, Notation::Bach);
        assert_eq!(label.value, "");

        let label = EncodedLabel::parse("BACH:F:", Notation::Chen);
        assert_eq!(label.side, Some(Side::Source));
        assert_eq!(label.value, "");
    }

    #[test]
    fn offset_counts_utf16_units_not_bytes() {
        let label = EncodedLabel::parse("ÄBACH:x1", Notation::Chen);
        assert_eq!(label.notation, Notation::Bach);
        assert_eq!(label.value, "1");
    }

    #[test]
    fn astral_prefix_takes_two_offset_units() {
        // Counting chars would start the token at "+".
        let label = EncodedLabel::parse("😀BACH:1+", Notation::Chen);
        assert_eq!(label.value, "1+");
        assert_eq!(
            Cardinality::from_token(label.value),
            Some(Cardinality::OneOrMore)
        );
    }

    #[test]
    fn astral_char_straddling_offset_spoils_token() {
        let label = EncodedLabel::parse("BACH:F😀1", Notation::Chen);
        assert_eq!(label.side, Some(Side::Source));
        assert_eq!(label.value, "😀1");
        assert_eq!(Cardinality::from_token(label.value), None);
    }

    #[test]
    fn marker_may_appear_anywhere() {
        // The offset is fixed, so a prefixed marker shifts the token out of place.
        let label = EncodedLabel::parse("xBACH:F:1", Notation::Chen);
        assert_eq!(label.notation, Notation::Bach);
        assert_eq!(label.side, Some(Side::Source));
        assert_eq!(label.value, ":1");
        assert_eq!(Cardinality::from_token(label.value), None);
    }

    #[test]
    fn unknown_tokens_have_no_cardinality() {
        for token in ["", "2", "1..*", "0 +", "n", "+"] {
            assert_eq!(Cardinality::from_token(token), None, "token {:?}", token);
        }
    }

    #[test]
    fn only_four_tokens_are_recognized() {
        assert_eq!(Cardinality::from_token("0"), Some(Cardinality::Zero));
        assert_eq!(Cardinality::from_token("0+"), Some(Cardinality::ZeroOrMore));
        assert_eq!(Cardinality::from_token("1"), Some(Cardinality::One));
        assert_eq!(Cardinality::from_token("1+"), Some(Cardinality::OneOrMore));
    }

    #[test]
    fn is_bach_label_ignores_blank_text() {
        assert!(is_bach_label("BACH:T:1"));
        assert!(!is_bach_label(""));
        assert!(!is_bach_label("1+"));
    }
}
