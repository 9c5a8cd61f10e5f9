use super::geometry::Point;
use super::render::DiagramStyle;
use crate::svg::fmt_num;

/// Radius of the cardinality circle.
pub const GLYPH_RADIUS: f32 = 7.0;
/// "Or more" chevron, drawn pointing back along the edge.
pub const CHEVRON_PATH: &str = "M 7,-4 L 0,0 L 7,4 Z";
/// Arrow head of inheritance edges.
pub const ARROW_HEAD_PATH: &str = "M 6,-3 L 0,0 L 6,3 Z";
pub const EDGE_ARROW_CLASS: &str = "sprotty-edge-arrow";

/// Fill reference, resolved against a [`DiagramStyle`] when serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    /// Solid ink, used by "zero" cardinalities
    Ink,
    /// Theme accent, used by "one" cardinalities
    Accent,
}

/// `rotate(degrees pivot) translate(translate)`, in SVG application order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub rotate: f32,
    pub pivot: Point,
    pub translate: Point,
}

impl Transform {
    pub fn to_svg(&self) -> String {
        format!(
            "rotate({} {} {}) translate({} {})",
            fmt_num(self.rotate),
            fmt_num(self.pivot.x),
            fmt_num(self.pivot.y),
            fmt_num(self.translate.x),
            fmt_num(self.translate.y)
        )
    }
}

/// A declarative drawing instruction emitted by edge decorators
#[derive(Debug, Clone, PartialEq)]
pub enum Glyph {
    Circle {
        center: Point,
        radius: f32,
        fill: Fill,
    },
    Path {
        d: &'static str,
        class: &'static str,
        transform: Transform,
    },
}

impl Glyph {
    pub fn circle(center: Point, fill: Fill) -> Self {
        Glyph::Circle {
            center,
            radius: GLYPH_RADIUS,
            fill,
        }
    }

    pub fn arrow(d: &'static str, transform: Transform) -> Self {
        Glyph::Path {
            d,
            class: EDGE_ARROW_CLASS,
            transform,
        }
    }

    pub fn to_svg(&self, style: &DiagramStyle) -> String {
        match self {
            Glyph::Circle {
                center,
                radius,
                fill,
            } => format!(
                r#"<circle cx="{}" cy="{}" r="{}" stroke-width="1" fill="{}" />"#,
                fmt_num(center.x),
                fmt_num(center.y),
                fmt_num(*radius),
                style.resolve(*fill)
            ),
            Glyph::Path {
                d,
                class,
                transform,
            } => format!(
                r#"<path class="{}" d="{}" transform="{}" fill="{}" stroke="{}" />"#,
                class,
                d,
                transform.to_svg(),
                style.edge_stroke,
                style.edge_stroke
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_serializes_rotate_before_translate() {
        let t = Transform {
            rotate: 90.0,
            pivot: Point::new(1.0, 2.0),
            translate: Point::new(10.0, 2.0),
        };
        assert_eq!(t.to_svg(), "rotate(90 1 2) translate(10 2)");
    }

    #[test]
    fn circle_fill_resolves_against_style() {
        let style = DiagramStyle::default();
        let ink = Glyph::circle(Point::new(0.0, 0.0), Fill::Ink).to_svg(&style);
        let accent = Glyph::circle(Point::new(0.0, 0.0), Fill::Accent).to_svg(&style);

        assert!(ink.contains(r#"r="7""#));
        assert!(ink.contains(&format!(r#"fill="{}""#, style.glyph_ink)));
        assert!(accent.contains(&format!(r#"fill="{}""#, style.glyph_accent)));
        assert_ne!(style.glyph_ink, style.glyph_accent);
    }

    #[test]
    fn arrow_keeps_path_and_class() {
        let glyph = Glyph::arrow(
            CHEVRON_PATH,
            Transform {
                rotate: 0.0,
                pivot: Point::new(0.0, 0.0),
                translate: Point::new(9.0, 0.0),
            },
        );
        let svg = glyph.to_svg(&DiagramStyle::default());
        assert!(svg.contains(r#"class="sprotty-edge-arrow""#));
        assert!(svg.contains(r#"d="M 7,-4 L 0,0 L 7,4 Z""#));
        assert!(svg.contains(r#"transform="rotate(0 0 0) translate(9 0)""#));
    }
}
