// MIT/Apache2 License

use crate::{Box2D, Point2D, Region, Span, Vector2D};

/// An axis-aligned ellipse.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ellipse {
    /// The center of the ellipse.
    pub center: Point2D<f32>,
    /// The horizontal and vertical radii.
    pub radii: Vector2D<f32>,
}

impl Ellipse {
    /// Create a new ellipse.
    #[must_use]
    #[inline]
    pub fn new(center: Point2D<f32>, radii: Vector2D<f32>) -> Ellipse {
        Ellipse { center, radii }
    }

    /// Create a circle.
    #[must_use]
    #[inline]
    pub fn circle(center: Point2D<f32>, radius: f32) -> Ellipse {
        Ellipse::new(center, Vector2D::new(radius, radius))
    }

    #[inline]
    fn is_degenerate(&self) -> bool {
        !(self.radii.x > 0.0 && self.radii.y > 0.0)
    }
}

impl Region for Ellipse {
    fn bounds(&self) -> Option<Box2D<f32>> {
        if self.is_degenerate() {
            None
        } else {
            Some(Box2D::new(self.center - self.radii, self.center + self.radii))
        }
    }

    fn spans(&self, y: f32, spans: &mut Vec<Span>) {
        if self.is_degenerate() {
            return;
        }

        let dy = (y - self.center.y) / self.radii.y;
        let t = 1.0 - dy * dy;
        if t > 0.0 {
            let half_width = self.radii.x * t.sqrt();
            spans.push(Span::new(
                self.center.x - half_width,
                self.center.x + half_width,
            ));
        }
    }

    fn contains(&self, point: Point2D<f32>) -> bool {
        if self.is_degenerate() {
            return false;
        }

        let d = point - self.center;
        let (nx, ny) = (d.x / self.radii.x, d.y / self.radii.y);
        nx * nx + ny * ny < 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn circle_spans() {
        let circle = Ellipse::circle(Point2D::new(10.0, 10.0), 5.0);
        let mut spans = vec![];

        circle.spans(10.0, &mut spans);
        assert_eq!(spans, vec![Span::new(5.0, 15.0)]);

        spans.clear();
        circle.spans(13.0, &mut spans);
        assert_abs_diff_eq!(spans[0].start, 6.0, epsilon = 1e-5);
        assert_abs_diff_eq!(spans[0].end, 14.0, epsilon = 1e-5);

        spans.clear();
        circle.spans(15.0, &mut spans);
        assert!(spans.is_empty());
    }

    #[test]
    fn containment_and_bounds() {
        let ellipse = Ellipse::new(Point2D::new(0.0, 0.0), Vector2D::new(4.0, 2.0));
        assert!(ellipse.contains(Point2D::new(3.9, 0.0)));
        assert!(!ellipse.contains(Point2D::new(0.0, 2.1)));
        assert_eq!(
            ellipse.bounds(),
            Some(Box2D::new(Point2D::new(-4.0, -2.0), Point2D::new(4.0, 2.0)))
        );

        let flat = Ellipse::new(Point2D::new(0.0, 0.0), Vector2D::new(4.0, 0.0));
        assert!(flat.is_empty());
        assert!(!flat.contains(Point2D::new(0.0, 0.0)));
    }
}
