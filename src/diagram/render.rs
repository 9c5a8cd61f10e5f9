use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use super::decorator::{EdgeDecorator, arrow_head};
use super::geometry::{Bounds, Point, Route};
use super::glyph::Fill;
use super::model::{Diagram, Edge, EdgeKind, Entity};
use super::notation::is_bach_label;
use super::router::route_edge;
use crate::error::Error;
use crate::fonts::TextMeasure;
use crate::svg::{class_attr, escape_xml, fmt_num};
use crate::theme::{Theme, pick_higher_contrast};

/// Height of the entity header; the attribute compartment starts below it.
const HEADER_HEIGHT: f32 = 38.0;
const CORNER_RADIUS: f32 = 5.0;
const EXPAND_BUTTON_SIZE: f32 = 16.0;
const EXPANDED_ICON: &str = "M18 15l-6-6-6 6";
const COLLAPSED_ICON: &str = "M6 9l6 6 6-6";
const DANGLING_MESSAGE: &str = "Cannot compute route";
const LABEL_GAP: f32 = 2.0;

/// Style configuration for diagram rendering
#[derive(Debug, Clone)]
pub struct DiagramStyle {
    pub entity_fill: String,
    pub entity_stroke: String,
    pub entity_text: String,
    pub edge_stroke: String,
    pub edge_text: String,
    pub label_background: String,
    /// Fill of "zero" cardinality circles
    pub glyph_ink: String,
    /// Fill of "one" cardinality circles
    pub glyph_accent: String,
    pub background: String,
    pub font_family: String,
    pub font_size: f32,
}

impl Default for DiagramStyle {
    fn default() -> Self {
        Self {
            entity_fill: "#f5f5f5".to_string(),
            entity_stroke: "#333333".to_string(),
            entity_text: "#333333".to_string(),
            edge_stroke: "#333333".to_string(),
            edge_text: "#666666".to_string(),
            label_background: "#ffffff".to_string(),
            glyph_ink: "black".to_string(),
            glyph_accent: "#0b216f".to_string(),
            background: "#ffffff".to_string(),
            font_family: "sans-serif".to_string(),
            font_size: 14.0,
        }
    }
}

impl DiagramStyle {
    pub fn from_theme(theme: &Theme) -> Self {
        let entity_fg = pick_higher_contrast(
            &theme.entity_fill_color,
            &theme.text_color,
            &theme.background_color,
        );
        // Black ink as long as it stays readable on the canvas.
        let ink = pick_higher_contrast(&theme.background_color, "#000000", &theme.text_color);

        Self {
            entity_fill: theme.entity_fill_color.clone(),
            entity_stroke: entity_fg.clone(),
            entity_text: entity_fg,
            edge_stroke: theme.edge_color.clone(),
            edge_text: theme.text_color.clone(),
            label_background: theme.background_color.clone(),
            glyph_ink: ink,
            glyph_accent: theme.accent_color.clone(),
            background: theme.background_color.clone(),
            font_family: theme.font_family.clone(),
            font_size: theme.font_size,
        }
    }

    pub fn resolve(&self, fill: Fill) -> &str {
        match fill {
            Fill::Ink => &self.glyph_ink,
            Fill::Accent => &self.glyph_accent,
        }
    }
}

/// SVG fragment of a whole diagram plus the area it covers
#[derive(Debug, Clone)]
pub struct RenderedDiagram {
    pub svg: String,
    pub bounds: Bounds,
}

/// Renders diagrams, keeping one [`EdgeDecorator`] per edge id so that the
/// cardinality notation of an edge carries over between passes.
pub struct Renderer<M: TextMeasure> {
    style: DiagramStyle,
    measure: M,
    decorators: HashMap<String, EdgeDecorator>,
}

impl<M: TextMeasure> Renderer<M> {
    pub fn new(style: DiagramStyle, measure: M) -> Self {
        Self {
            style,
            measure,
            decorators: HashMap::new(),
        }
    }

    pub fn style(&self) -> &DiagramStyle {
        &self.style
    }

    pub fn decorator(&self, edge_id: &str) -> Option<&EdgeDecorator> {
        self.decorators.get(edge_id)
    }

    pub fn render(&mut self, diagram: &Diagram) -> RenderedDiagram {
        // Decorators live only as long as their edge.
        let live: HashSet<&str> = diagram.edges().map(|e| e.id.as_str()).collect();
        self.decorators.retain(|id, _| live.contains(id.as_str()));

        let entities = diagram.entity_index();
        let mut svg = String::new();
        let mut bounds: Option<Bounds> = None;
        let mut grow = |b: Bounds| {
            bounds = Some(match bounds {
                Some(acc) => acc.union(&b),
                None => b,
            });
        };

        // Edges first so entity boxes cover the line ends.
        for edge in diagram.edges() {
            let points = route_edge(
                edge,
                entities.get(edge.source.as_str()).copied(),
                entities.get(edge.target.as_str()).copied(),
            );
            match Route::try_from(points) {
                Ok(route) => {
                    if let Some(b) = route.bounds() {
                        grow(b);
                    }
                    svg.push_str(&self.render_edge(edge, &route));
                }
                Err(err) => {
                    warn!(edge = %edge.id, %err, "{}", DANGLING_MESSAGE);
                    svg.push_str(&render_dangling_edge(edge, DANGLING_MESSAGE));
                }
            }
        }

        for entity in diagram.entities() {
            grow(entity.bounds);
            svg.push_str(&self.render_entity(entity));
        }

        RenderedDiagram {
            svg,
            bounds: bounds.unwrap_or_default(),
        }
    }

    fn render_edge(&mut self, edge: &Edge, route: &Route) -> String {
        let mut svg = format!(
            "<g{}>",
            class_attr(&[("sprotty-edge", true), ("mouseover", edge.hover)])
        );
        svg.push_str(&self.render_line(route));

        let show_labels = match edge.kind {
            EdgeKind::Relationship => {
                let glyphs = self
                    .decorators
                    .entry(edge.id.clone())
                    .or_default()
                    .decorate(route, &edge.children);
                debug!(edge = %edge.id, glyphs = glyphs.len(), "relationship decorated");
                for glyph in &glyphs {
                    svg.push_str(&glyph.to_svg(&self.style));
                }
                // BACH cardinalities are drawn as glyphs, not as text.
                !edge.labels().any(is_bach_label)
            }
            EdgeKind::Inheritance => {
                svg.push_str(&arrow_head(route).to_svg(&self.style));
                true
            }
        };

        if show_labels {
            svg.push_str(&self.render_labels(edge, route.midpoint()));
        }

        svg.push_str("</g>");
        svg
    }

    fn render_line(&self, route: &Route) -> String {
        let mut d = String::new();
        for (i, p) in route.points().iter().enumerate() {
            if i > 0 {
                d.push(' ');
            }
            d.push(if i == 0 { 'M' } else { 'L' });
            d.push_str(&format!(" {},{}", fmt_num(p.x), fmt_num(p.y)));
        }
        format!(
            r#"<path class="sprotty-edge-line" d="{}" fill="none" stroke="{}" stroke-width="1.5" />"#,
            d, self.style.edge_stroke
        )
    }

    /// Stacks the non-empty labels of an edge vertically, centred on `at`.
    fn render_labels(&mut self, edge: &Edge, at: Point) -> String {
        let font_size = self.style.font_size * 0.8;
        let measured: Vec<(&str, f32, f32)> = edge
            .labels()
            .filter(|text| !text.is_empty())
            .map(|text| {
                let (w, h) = self.measure.measure_text(text, font_size, false);
                (text, w, h)
            })
            .collect();

        let total = measured.iter().map(|(_, _, h)| h + LABEL_GAP).sum::<f32>() - LABEL_GAP;
        let mut top = at.y - total / 2.0;
        let mut svg = String::new();
        for (text, width, height) in measured {
            let center = Point::new(at.x, top + height / 2.0);
            svg.push_str(&self.render_label(text, center, width, height, font_size));
            top += height + LABEL_GAP;
        }
        svg
    }

    fn render_label(
        &self,
        text: &str,
        at: Point,
        width: f32,
        height: f32,
        font_size: f32,
    ) -> String {
        let pad = 3.0;

        format!(
            r#"<g class="sprotty-label"><rect x="{}" y="{}" width="{}" height="{}" rx="2" fill="{}" /><text x="{}" y="{}" font-family="{}" font-size="{}" fill="{}" text-anchor="middle" dominant-baseline="central">{}</text></g>"#,
            fmt_num(at.x - width / 2.0 - pad),
            fmt_num(at.y - height / 2.0),
            fmt_num(width + pad * 2.0),
            fmt_num(height),
            self.style.label_background,
            fmt_num(at.x),
            fmt_num(at.y),
            escape_xml(&self.style.font_family),
            fmt_num(font_size),
            self.style.edge_text,
            escape_xml(text)
        )
    }

    fn render_entity(&self, entity: &Entity) -> String {
        let b = &entity.bounds;
        let width = b.width.max(0.0);
        let height = b.height.max(0.0);
        let mut svg = format!(
            r#"<g class="sprotty-entity" transform="translate({}, {})">"#,
            fmt_num(b.x),
            fmt_num(b.y)
        );

        svg.push_str(&format!(
            r#"<rect{} x="0" y="0" rx="{r}" ry="{r}" width="{}" height="{}" fill="{}" stroke="{}" stroke-width="1.5" />"#,
            class_attr(&[
                ("sprotty-node", true),
                ("mouseover", entity.hover),
                ("selected", entity.selected),
            ]),
            fmt_num(width),
            fmt_num(height),
            self.style.entity_fill,
            self.style.entity_stroke,
            r = fmt_num(CORNER_RADIUS),
        ));

        svg.push_str(&format!(
            r#"<text x="{}" y="{}" font-family="{}" font-size="{}" fill="{}" text-anchor="middle" font-weight="bold">{}</text>"#,
            fmt_num(width / 2.0),
            fmt_num(HEADER_HEIGHT / 2.0 + self.style.font_size / 3.0),
            escape_xml(&self.style.font_family),
            fmt_num(self.style.font_size),
            self.style.entity_text,
            escape_xml(&entity.name)
        ));

        if entity.expanded && !entity.attributes.is_empty() {
            svg.push_str(&format!(
                r#"<path class="comp-separator" d="M 0,{h} L {},{h}" stroke="{}" stroke-width="1" />"#,
                fmt_num(width),
                self.style.entity_stroke,
                h = fmt_num(HEADER_HEIGHT),
            ));

            let attr_size = self.style.font_size * 0.9;
            let mut y = HEADER_HEIGHT + attr_size + 4.0;
            for attr in &entity.attributes {
                svg.push_str(&format!(
                    r#"<text x="8" y="{}" font-family="{}" font-size="{}" fill="{}">{}</text>"#,
                    fmt_num(y),
                    escape_xml(&self.style.font_family),
                    fmt_num(attr_size),
                    self.style.entity_text,
                    escape_xml(attr)
                ));
                y += self.style.font_size + 2.0;
            }
        }

        svg.push_str(&self.render_expand_button(entity));
        svg.push_str("</g>");
        svg
    }

    fn render_expand_button(&self, entity: &Entity) -> String {
        let icon = if entity.expanded {
            EXPANDED_ICON
        } else {
            COLLAPSED_ICON
        };
        let x = (entity.bounds.width - EXPAND_BUTTON_SIZE - 6.0).max(0.0);

        format!(
            r#"<g class="sprotty-button enabled" transform="translate({}, 6)"><rect x="0" y="0" width="{s}" height="{s}" opacity="0" /><svg width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="{}" stroke-width="2.5" stroke-linecap="butt" stroke-linejoin="bevel"><path d="{}" /></svg></g>"#,
            fmt_num(x),
            self.style.entity_stroke,
            icon,
            s = fmt_num(EXPAND_BUTTON_SIZE),
        )
    }
}

/// Fallback for an edge without a usable route.
fn render_dangling_edge(edge: &Edge, message: &str) -> String {
    format!(
        r#"<text class="sprotty-edge-dangling" data-edge="{}"><title>{}</title>?</text>"#,
        escape_xml(&edge.id),
        escape_xml(message)
    )
}

/// Parses a JSON diagram model and renders it.
pub fn render_diagram<M: TextMeasure>(
    source: &str,
    style: &DiagramStyle,
    measure: M,
) -> Result<RenderedDiagram, Error> {
    let diagram = Diagram::from_json(source)?;
    let mut renderer = Renderer::new(style.clone(), measure);
    Ok(renderer.render(&diagram))
}
