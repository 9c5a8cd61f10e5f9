use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Horizontal distance between a glyph anchor and the chevron drawn next to it.
pub const CHEVRON_OFFSET: f32 = 9.0;

/// A coordinate in diagram space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned rectangle; `x`/`y` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn union(&self, other: &Bounds) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Self::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }

    /// Grows the rectangle so that it contains `p`. Non-finite points are ignored.
    pub fn include(&self, p: Point) -> Self {
        if !p.is_finite() {
            return *self;
        }
        self.union(&Bounds::new(p.x, p.y, 0.0, 0.0))
    }

    /// Point where the ray from the centre towards `toward` leaves the rectangle.
    pub fn boundary_point(&self, toward: Point) -> Point {
        let center = self.center();
        if toward == center {
            return center;
        }

        let theta = (toward.y - center.y).atan2(toward.x - center.x);
        let dx = theta.cos();
        let dy = theta.sin();
        let half_w = self.width.max(0.0) / 2.0;
        let half_h = self.height.max(0.0) / 2.0;

        let tx = if dx.abs() > 1e-5 {
            half_w / dx.abs()
        } else {
            f32::INFINITY
        };
        let ty = if dy.abs() > 1e-5 {
            half_h / dy.abs()
        } else {
            f32::INFINITY
        };
        let t = tx.min(ty);

        Point::new(center.x + dx * t, center.y + dy * t)
    }
}

/// Ordered points of a routed edge. Always holds at least two points.
#[derive(Debug, Clone, PartialEq)]
pub struct Route(Vec<Point>);

impl Route {
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    pub fn source(&self) -> Point {
        self.0[0]
    }

    pub fn target(&self) -> Point {
        self.0[self.0.len() - 1]
    }

    pub fn second(&self) -> Point {
        self.0[1]
    }

    pub fn next_to_last(&self) -> Point {
        self.0[self.0.len() - 2]
    }

    /// Point halfway along the polyline, measured by arc length.
    pub fn midpoint(&self) -> Point {
        let total: f32 = self.0.windows(2).map(|w| w[0].distance(w[1])).sum();
        if total.is_nan() || total <= 0.0 {
            return self.source();
        }

        let mut remaining = total / 2.0;
        for w in self.0.windows(2) {
            let len = w[0].distance(w[1]);
            if len >= remaining && len > 0.0 {
                let t = remaining / len;
                return Point::new(
                    w[0].x + (w[1].x - w[0].x) * t,
                    w[0].y + (w[1].y - w[0].y) * t,
                );
            }
            remaining -= len;
        }
        self.target()
    }

    /// Bounding box of the finite points, `None` when every point is NaN or infinite.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut finite = self.0.iter().copied().filter(|p| p.is_finite());
        let first = finite.next()?;
        Some(finite.fold(Bounds::new(first.x, first.y, 0.0, 0.0), |b, p| b.include(p)))
    }
}

impl TryFrom<Vec<Point>> for Route {
    type Error = Error;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        if points.len() < 2 {
            return Err(Error::ShortRoute { len: points.len() });
        }
        Ok(Self(points))
    }
}

/// Angle in degrees of the vector pointing from `from` to `to`.
pub fn angle(from: Point, to: Point) -> f32 {
    (to.y - from.y).atan2(to.x - from.x).to_degrees()
}

/// `x` shifted by [`CHEVRON_OFFSET`]; a NaN coordinate is returned untouched.
pub fn offset_x(x: f32) -> f32 {
    if x.is_nan() { x } else { x + CHEVRON_OFFSET }
}
