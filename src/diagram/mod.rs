//! ER diagram model, routing, cardinality decoration and SVG views.

mod decorator;
mod geometry;
mod glyph;
mod model;
mod notation;
mod render;
mod router;

pub use decorator::{DecoratorState, EdgeDecorator, arrow_head, classify, decorate};
pub use geometry::{Bounds, CHEVRON_OFFSET, Point, Route, angle, offset_x};
pub use glyph::{ARROW_HEAD_PATH, CHEVRON_PATH, Fill, GLYPH_RADIUS, Glyph, Transform};
pub use model::{Diagram, Edge, EdgeChild, EdgeKind, Element, Entity};
pub use notation::{Cardinality, EncodedLabel, Notation, Side, is_bach_label};
pub use render::{DiagramStyle, RenderedDiagram, Renderer, render_diagram};
pub use router::route_edge;
