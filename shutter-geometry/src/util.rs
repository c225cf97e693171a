//               Copyright John Nunley, 2022.
// Distributed under the Boost Software License, Version 1.0.
//       (See accompanying file LICENSE or copy at
//         https://www.boost.org/LICENSE_1_0.txt)

use crate::{Box2D, Point2D};
use num_traits::Float;

pub(crate) fn approx_eq<Num: Float>(a: Num, b: Num) -> bool {
    (a - b).abs() < Num::epsilon()
}

/// The overlap of two boxes, or `None` if they do not overlap.
pub(crate) fn intersect_boxes(a: Box2D<f32>, b: Box2D<f32>) -> Option<Box2D<f32>> {
    let min = Point2D::new(a.min.x.max(b.min.x), a.min.y.max(b.min.y));
    let max = Point2D::new(a.max.x.min(b.max.x), a.max.y.min(b.max.y));

    if min.x < max.x && min.y < max.y {
        Some(Box2D::new(min, max))
    } else {
        None
    }
}

/// The smallest box containing both boxes.
pub(crate) fn unite_boxes(a: Box2D<f32>, b: Box2D<f32>) -> Box2D<f32> {
    Box2D::new(
        Point2D::new(a.min.x.min(b.min.x), a.min.y.min(b.min.y)),
        Point2D::new(a.max.x.max(b.max.x), a.max.y.max(b.max.y)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_overlap() {
        let a = Box2D::new(Point2D::new(0.0, 0.0), Point2D::new(10.0, 10.0));
        let b = Box2D::new(Point2D::new(5.0, -5.0), Point2D::new(20.0, 5.0));
        let c = Box2D::new(Point2D::new(10.0, 0.0), Point2D::new(12.0, 10.0));

        assert_eq!(
            intersect_boxes(a, b),
            Some(Box2D::new(Point2D::new(5.0, 0.0), Point2D::new(10.0, 5.0)))
        );
        // touching edges do not overlap
        assert_eq!(intersect_boxes(a, c), None);
        assert_eq!(
            unite_boxes(a, b),
            Box2D::new(Point2D::new(0.0, -5.0), Point2D::new(20.0, 10.0))
        );
    }
}
