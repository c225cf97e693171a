//               Copyright John Nunley, 2022.
// Distributed under the Boost Software License, Version 1.0.
//       (See accompanying file LICENSE or copy at
//         https://www.boost.org/LICENSE_1_0.txt)

use crate::{region::normalize, util::approx_eq, Box2D, FillRule, Point2D, Region, Span};
use lyon_geom::LineSegment;
use lyon_path::{iterator::PathIterator, PathEvent};
use ordered_float::OrderedFloat;
use tinyvec::TinyVec;

const MAX_POLYGON_STACK_SIZE: usize = 32;

/// One or more closed polygons.
///
/// Paths, point lists and other outlines are simplified into this type before they are filled. Every
/// sub-polygon is implicitly closed.
#[derive(Debug, Clone)]
pub struct Polygon {
    /// The edges for this polygon.
    edges: Vec<Edge>,
    /// How overlapping sub-polygons are filled.
    fill_rule: FillRule,
}

impl Default for Polygon {
    fn default() -> Self {
        Polygon::new(FillRule::NonZero)
    }
}

impl Polygon {
    /// Create a new polygon with no edges.
    #[must_use]
    pub fn new(fill_rule: FillRule) -> Self {
        Self {
            edges: Vec::new(),
            fill_rule,
        }
    }

    /// Create a polygon from a ring of points. The last point is connected back to the first.
    #[must_use]
    pub fn from_points(points: &[Point2D<f32>], fill_rule: FillRule) -> Self {
        let mut polygon = Self::new(fill_rule);
        if let (Some(first), Some(last)) = (points.first(), points.last()) {
            for pair in points.windows(2) {
                polygon.add_edge(pair[0], pair[1]);
            }
            polygon.add_edge(*last, *first);
        }
        polygon
    }

    /// Collect from a path event iterator with a given tolerance. Open sub-paths are closed.
    pub fn from_events_with_tolerance(
        iter: impl IntoIterator<Item = PathEvent>,
        tolerance: f32,
        fill_rule: FillRule,
    ) -> Self {
        let mut polygon = Self::new(fill_rule);
        for event in iter.into_iter().flattened(tolerance) {
            match event {
                PathEvent::Begin { .. } => {}
                PathEvent::Line { from, to } => polygon.add_edge(from, to),
                PathEvent::End { last, first, .. } => polygon.add_edge(last, first),
                ev => unreachable!("Flattened iterator should never yield {:?}", ev),
            }
        }
        polygon
    }

    /// Add an edge to this polygon.
    pub fn add_edge(&mut self, p1: Point2D<f32>, p2: Point2D<f32>) {
        // horizontal edges never cross a scanline
        if !approx_eq(p1.y, p2.y) {
            self.edges.push(Edge::new(p1, p2));
        }
    }

    /// The edges that make up this polygon.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The rule used to decide which areas are inside.
    #[must_use]
    pub fn fill_rule(&self) -> FillRule {
        self.fill_rule
    }

    #[inline]
    fn is_inside(&self, winding: i32) -> bool {
        match self.fill_rule {
            FillRule::NonZero => winding != 0,
            FillRule::EvenOdd => winding % 2 != 0,
        }
    }
}

impl Region for Polygon {
    fn bounds(&self) -> Option<Box2D<f32>> {
        let mut edges = self.edges.iter();
        let first = edges.next()?;
        let (from, to) = (first.line.from, first.line.to);
        let init = Box2D::new(
            Point2D::new(from.x.min(to.x), first.top),
            Point2D::new(from.x.max(to.x), first.bottom),
        );

        let bounds = edges.fold(init, |mut bounds, edge| {
            let (from, to) = (edge.line.from, edge.line.to);
            bounds.min.x = bounds.min.x.min(from.x).min(to.x);
            bounds.max.x = bounds.max.x.max(from.x).max(to.x);
            bounds.min.y = bounds.min.y.min(edge.top);
            bounds.max.y = bounds.max.y.max(edge.bottom);
            bounds
        });

        if bounds.is_empty() {
            None
        } else {
            Some(bounds)
        }
    }

    fn spans(&self, y: f32, spans: &mut Vec<Span>) {
        let mut crossings: TinyVec<[Crossing; MAX_POLYGON_STACK_SIZE]> = self
            .edges
            .iter()
            .filter(|edge| edge.crosses(y))
            .map(|edge| Crossing {
                x: OrderedFloat(edge.x_at(y)),
                winding: edge.direction.winding(),
            })
            .collect();
        crossings.sort_unstable();

        let mut found = Vec::new();
        let mut winding = 0;
        let mut start = 0.0;
        for crossing in crossings {
            let was_inside = self.is_inside(winding);
            winding += crossing.winding;
            match (was_inside, self.is_inside(winding)) {
                (false, true) => start = crossing.x.into_inner(),
                (true, false) => found.push(Span::new(start, crossing.x.into_inner())),
                _ => {}
            }
        }

        normalize(&mut found);
        spans.extend(found);
    }
}

/// Where an edge crosses a scanline.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
struct Crossing {
    x: OrderedFloat<f32>,
    winding: i32,
}

/// An edge in a `Polygon`.
#[derive(Debug, Copy, Clone)]
pub struct Edge {
    /// The line that this edge exists along.
    pub line: LineSegment<f32>,
    /// The highest point (lowest Y) on this edge.
    pub top: f32,
    /// The lowest point (highest Y) on this edge.
    pub bottom: f32,
    /// The direction this edge goes in.
    pub direction: Direction,
}

impl Edge {
    /// Create a new `Edge` from two points.
    #[must_use]
    pub fn new(p1: Point2D<f32>, p2: Point2D<f32>) -> Self {
        let (top, bottom, direction) = if p1.y < p2.y {
            (p1.y, p2.y, Direction::Forward)
        } else {
            (p2.y, p1.y, Direction::Backwards)
        };

        Self {
            line: LineSegment { from: p1, to: p2 },
            top,
            bottom,
            direction,
        }
    }

    /// Does this edge cross the scanline at `y`? The top is included and the bottom is not, so that a
    /// vertex shared by two edges is only counted once.
    #[must_use]
    #[inline]
    pub fn crosses(&self, y: f32) -> bool {
        y >= self.top && y < self.bottom
    }

    /// The X coordinate of this edge at the given Y coordinate.
    #[must_use]
    #[inline]
    pub fn x_at(&self, y: f32) -> f32 {
        let LineSegment { from, to } = self.line;
        from.x + (y - from.y) * (to.x - from.x) / (to.y - from.y)
    }
}

/// The direction that an `Edge` moves in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Direction {
    /// Downwards, towards larger Y.
    #[default]
    Forward,
    /// Upwards, towards smaller Y.
    Backwards,
}

impl Direction {
    /// The contribution of an edge going in this direction to the winding number.
    #[must_use]
    #[inline]
    pub fn winding(self) -> i32 {
        match self {
            Direction::Forward => 1,
            Direction::Backwards => -1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f32, y: f32) -> Point2D<f32> {
        Point2D::new(x, y)
    }

    fn spans_at(polygon: &Polygon, y: f32) -> Vec<Span> {
        let mut spans = vec![];
        polygon.spans(y, &mut spans);
        spans
    }

    #[test]
    fn triangle() {
        let triangle = Polygon::from_points(&[pt(0.0, 0.0), pt(10.0, 10.0), pt(0.0, 10.0)], FillRule::NonZero);
        assert_eq!(triangle.edges().len(), 2);
        assert_eq!(spans_at(&triangle, 5.0), vec![Span::new(0.0, 5.0)]);
        assert!(triangle.contains(pt(1.0, 9.0)));
        assert!(!triangle.contains(pt(9.0, 1.0)));
        assert_eq!(triangle.bounds(), Some(Box2D::new(pt(0.0, 0.0), pt(10.0, 10.0))));
    }

    #[test]
    fn fill_rules() {
        // an outer square with an inner square wound the same way
        let ring = [
            pt(0.0, 0.0),
            pt(10.0, 0.0),
            pt(10.0, 10.0),
            pt(0.0, 10.0),
        ];
        let inner = [pt(3.0, 3.0), pt(7.0, 3.0), pt(7.0, 7.0), pt(3.0, 7.0)];

        let build = |rule| {
            let mut polygon = Polygon::from_points(&ring, rule);
            for pair in inner.windows(2) {
                polygon.add_edge(pair[0], pair[1]);
            }
            polygon.add_edge(inner[3], inner[0]);
            polygon
        };

        let non_zero = build(FillRule::NonZero);
        assert_eq!(spans_at(&non_zero, 5.0), vec![Span::new(0.0, 10.0)]);

        let even_odd = build(FillRule::EvenOdd);
        assert_eq!(
            spans_at(&even_odd, 5.0),
            vec![Span::new(0.0, 3.0), Span::new(7.0, 10.0)]
        );
        assert!(!even_odd.contains(pt(5.0, 5.0)));
    }

    #[test]
    fn shared_vertices_count_once() {
        let diamond = Polygon::from_points(
            &[pt(5.0, 0.0), pt(10.0, 5.0), pt(5.0, 10.0), pt(0.0, 5.0)],
            FillRule::EvenOdd,
        );
        assert_eq!(spans_at(&diamond, 5.0), vec![Span::new(0.0, 10.0)]);
        assert_eq!(spans_at(&diamond, 0.0), vec![]);
    }

    #[test]
    fn empty_polygon() {
        let polygon = Polygon::from_points(&[], FillRule::NonZero);
        assert!(polygon.is_empty());
        assert_eq!(polygon.bounds(), None);
        assert_eq!(spans_at(&polygon, 0.0), vec![]);
    }
}
