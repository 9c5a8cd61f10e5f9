use tracing::debug;

use super::geometry::{Point, Route, angle, offset_x};
use super::glyph::{ARROW_HEAD_PATH, CHEVRON_PATH, Fill, Glyph, Transform};
use super::model::EdgeChild;
use super::notation::{Cardinality, EncodedLabel, Notation, Side};

/// Cardinality classification of one edge.
///
/// Re-derived on every render pass from the edge's labels, starting from the
/// previous pass so that a blank label keeps a BACH edge in BACH notation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecoratorState {
    pub notation: Notation,
    pub cardinality: String,
    /// The cardinality applies to the source end of the edge.
    pub is_left: bool,
}

impl DecoratorState {
    fn apply_label(&mut self, text: &str) {
        let label = EncodedLabel::parse(text, self.notation);
        self.notation = label.notation;
        self.cardinality = label.value.to_string();
        // CHEN labels leave the side as it was.
        if let Some(side) = label.side {
            self.is_left = side == Side::Source;
        }
    }
}

/// Folds every label child over `previous`. Later labels overwrite earlier
/// ones; an edge without labels keeps `previous` as is.
pub fn classify<'a, I>(children: I, previous: &DecoratorState) -> DecoratorState
where
    I: IntoIterator<Item = &'a EdgeChild>,
{
    let mut state = previous.clone();
    for text in children.into_iter().filter_map(EdgeChild::text) {
        state.apply_label(text);
    }
    state
}

/// Glyphs for the classified cardinality. CHEN edges and unknown tokens get none.
pub fn decorate(route: &Route, state: &DecoratorState) -> Vec<Glyph> {
    if state.notation != Notation::Bach {
        return Vec::new();
    }
    let Some(cardinality) = Cardinality::from_token(&state.cardinality) else {
        return Vec::new();
    };

    let (anchor, reference) = if state.is_left {
        (route.source(), route.second())
    } else {
        (route.target(), route.next_to_last())
    };

    let fill = if cardinality.is_zero() {
        Fill::Ink
    } else {
        Fill::Accent
    };

    let mut glyphs = vec![Glyph::circle(anchor, fill)];
    if cardinality.has_chevron() {
        glyphs.push(Glyph::arrow(
            CHEVRON_PATH,
            Transform {
                rotate: angle(anchor, reference),
                pivot: anchor,
                translate: Point::new(offset_x(anchor.x), anchor.y),
            },
        ));
    }
    glyphs
}

/// Arrow head at the target end of an inheritance edge, pointing back along
/// the last segment.
pub fn arrow_head(route: &Route) -> Glyph {
    let tip = route.target();
    Glyph::arrow(
        ARROW_HEAD_PATH,
        Transform {
            rotate: angle(tip, route.next_to_last()),
            pivot: tip,
            translate: tip,
        },
    )
}

/// Per-edge decorator holding the sticky classification.
#[derive(Debug, Clone, Default)]
pub struct EdgeDecorator {
    state: DecoratorState,
}

impl EdgeDecorator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DecoratorState {
        &self.state
    }

    /// Reclassifies from the current children and stores the result.
    pub fn update(&mut self, children: &[EdgeChild]) -> &DecoratorState {
        self.state = classify(children, &self.state);
        &self.state
    }

    /// One render pass: reclassify, then emit glyphs for `route`.
    pub fn decorate(&mut self, route: &Route, children: &[EdgeChild]) -> Vec<Glyph> {
        self.update(children);
        debug!(
            notation = ?self.state.notation,
            cardinality = %self.state.cardinality,
            is_left = self.state.is_left,
            "decorating edge"
        );
        decorate(route, &self.state)
    }
}
