// MIT/Apache2 License

use crate::{Box2D, FillRule, Point2D, Polygon, Region, Span};
use lyon_path::{Path, Winding};

/// An arbitrary closed area, described by a path made of lines and bezier curves.
///
/// The path is flattened into a [`Polygon`] once, when the `Area` is created; containment tests and
/// rasterization run against that polygon. The original path is kept so that it can be drawn as an outline.
#[derive(Debug, Clone)]
pub struct Area {
    path: Path,
    polygon: Polygon,
}

impl Area {
    /// The maximum distance, in pixels, between a curve and the lines that approximate it.
    pub const DEFAULT_TOLERANCE: f32 = 0.1;

    /// Create an area from a path.
    #[must_use]
    pub fn new(path: Path, fill_rule: FillRule) -> Area {
        Area::with_tolerance(path, fill_rule, Area::DEFAULT_TOLERANCE)
    }

    /// Create an area from a path, flattening curves with the given tolerance.
    #[must_use]
    pub fn with_tolerance(path: Path, fill_rule: FillRule, tolerance: f32) -> Area {
        let polygon = Polygon::from_events_with_tolerance(path.iter(), tolerance, fill_rule);
        Area { path, polygon }
    }

    /// Create a polygonal area from its vertices.
    #[must_use]
    pub fn from_points(points: &[Point2D<f32>]) -> Area {
        let mut builder = Path::builder();
        if let Some((first, rest)) = points.split_first() {
            builder.begin(*first);
            for point in rest {
                builder.line_to(*point);
            }
            builder.close();
        }
        Area::new(builder.build(), FillRule::NonZero)
    }

    /// Create a rectangular area.
    #[must_use]
    pub fn rectangle(rect: Box2D<f32>) -> Area {
        let mut builder = Path::builder();
        builder.add_rectangle(&rect, Winding::Positive);
        Area::new(builder.build(), FillRule::NonZero)
    }

    /// Create a circular area.
    #[must_use]
    pub fn circle(center: Point2D<f32>, radius: f32) -> Area {
        let mut builder = Path::builder();
        builder.add_circle(center, radius, Winding::Positive);
        Area::new(builder.build(), FillRule::NonZero)
    }

    /// The path outlining this area.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The flattened polygon used for filling.
    #[must_use]
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }
}

impl From<Path> for Area {
    fn from(path: Path) -> Area {
        Area::new(path, FillRule::NonZero)
    }
}

impl Region for Area {
    fn bounds(&self) -> Option<Box2D<f32>> {
        self.polygon.bounds()
    }

    fn spans(&self, y: f32, spans: &mut Vec<Span>) {
        self.polygon.spans(y, spans);
    }
}
