//! Small helpers for writing SVG markup by hand.

use crate::diagram::Bounds;

/// XML 1.0 valid char ranges:
/// - 0x09, 0x0A, 0x0D
/// - 0x20..=0xD7FF
/// - 0xE000..=0xFFFD
/// - 0x10000..=0x10FFFF
fn is_valid_xml_char(c: char) -> bool {
    matches!(
        c as u32,
        0x09 | 0x0A | 0x0D | 0x20..=0xD7FF | 0xE000..=0xFFFD | 0x10000..=0x10FFFF
    )
}

/// Escapes text for element content or attribute values, dropping characters
/// XML cannot carry at all.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars().filter(|&c| is_valid_xml_char(c)) {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Formats a coordinate with at most two decimals and no trailing zeros.
pub fn fmt_num(value: f32) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let s = format!("{:.2}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

/// ` class="..."` built from the enabled entries, or nothing when none are.
pub fn class_attr(classes: &[(&str, bool)]) -> String {
    let enabled: Vec<&str> = classes
        .iter()
        .filter(|(_, on)| *on)
        .map(|(name, _)| *name)
        .collect();
    if enabled.is_empty() {
        String::new()
    } else {
        format!(r#" class="{}""#, enabled.join(" "))
    }
}

/// Wraps rendered content in a standalone `<svg>` document whose view box
/// covers `bounds` plus `padding` on every side.
pub fn document(inner: &str, bounds: &Bounds, padding: f32, background: &str) -> String {
    let x = bounds.x - padding;
    let y = bounds.y - padding;
    let width = (bounds.width + padding * 2.0).max(1.0);
    let height = (bounds.height + padding * 2.0).max(1.0);

    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="{x} {y} {w} {h}">
<rect x="{x}" y="{y}" width="{w}" height="{h}" fill="{bg}"/>
{inner}
</svg>"#,
        w = fmt_num(width),
        h = fmt_num(height),
        x = fmt_num(x),
        y = fmt_num(y),
        bg = escape_xml(background),
        inner = inner,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_invalid_control_chars() {
        assert_eq!(escape_xml("A\u{0007}B\u{000C}C"), "ABC");
    }

    #[test]
    fn keep_valid_whitespace_controls() {
        let s = "a\tb\nc\rd";
        assert_eq!(escape_xml(s), s);
    }

    #[test]
    fn escape_special_xml_chars() {
        assert_eq!(
            escape_xml(r#"<tag attr="x&y">'z'"#),
            "&lt;tag attr=&quot;x&amp;y&quot;&gt;&apos;z&apos;"
        );
    }

    #[test]
    fn numbers_drop_trailing_zeros() {
        assert_eq!(fmt_num(9.0), "9");
        assert_eq!(fmt_num(0.5), "0.5");
        assert_eq!(fmt_num(-12.345), "-12.35");
        assert_eq!(fmt_num(-0.001), "0");
        assert_eq!(fmt_num(100.0), "100");
        assert_eq!(fmt_num(f32::NAN), "NaN");
    }

    #[test]
    fn class_attr_lists_enabled_classes() {
        assert_eq!(
            class_attr(&[("sprotty-edge", true), ("mouseover", false), ("selected", true)]),
            r#" class="sprotty-edge selected""#
        );
        assert_eq!(class_attr(&[("mouseover", false)]), "");
    }

    #[test]
    fn document_pads_view_box() {
        let svg = document("<g/>", &Bounds::new(10.0, 20.0, 100.0, 50.0), 5.0, "#fff");
        assert!(svg.contains(r#"viewBox="5 15 110 60""#));
        assert!(svg.contains(r#"width="110" height="60""#));
        assert!(svg.contains("<g/>"));
    }
}
