// BSL 1.0 License

use crate::{
    util::{intersect_boxes, unite_boxes},
    Box2D, Point2D, RasterGeometry, RasterOptions, Stencil,
};
use ordered_float::OrderedFloat;
use std::{fmt, sync::Arc};

/// A shared, immutable region. This is what gets passed between image metadata and the shutter operation.
pub type Shape = Arc<dyn Region + Send + Sync>;

/// A horizontal run of a scanline that lies inside of a region.
///
/// `start` is inclusive and `end` is exclusive.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Span {
    /// The leftmost X coordinate inside of the region.
    pub start: f32,
    /// The first X coordinate past the region.
    pub end: f32,
}

impl Span {
    /// Create a new span.
    #[must_use]
    #[inline]
    pub fn new(start: f32, end: f32) -> Span {
        Span { start, end }
    }

    /// Does this span cover nothing?
    #[must_use]
    #[inline]
    pub fn is_empty(self) -> bool {
        // written this way so that NaN spans count as empty
        !(self.start < self.end)
    }

    /// Is the X coordinate inside of this span?
    #[must_use]
    #[inline]
    pub fn contains(self, x: f32) -> bool {
        x >= self.start && x < self.end
    }
}

/// A closed area of two-dimensional space.
///
/// The only things a region is required to know are its bounding box and the spans it covers along a given
/// horizontal scanline. Containment tests and rasterization into a [`Stencil`] are built on top of those, and
/// can be overridden if a region knows a faster way.
pub trait Region: fmt::Debug {
    /// The bounding box of this region, or `None` if the region covers nothing.
    fn bounds(&self) -> Option<Box2D<f32>>;

    /// Append the spans that this region covers along the scanline at `y` to `spans`.
    ///
    /// The appended spans are sorted by their start and do not overlap.
    fn spans(&self, y: f32, spans: &mut Vec<Span>);

    /// Is the given point inside of this region?
    fn contains(&self, point: Point2D<f32>) -> bool {
        let mut spans = Vec::new();
        self.spans(point.y, &mut spans);
        spans.iter().any(|span| span.contains(point.x))
    }

    /// Does this region cover nothing at all?
    fn is_empty(&self) -> bool {
        self.bounds().map_or(true, |bounds| bounds.is_empty())
    }

    /// Render this region into a one-bit stencil with the given geometry.
    fn rasterize(&self, geometry: RasterGeometry, options: &RasterOptions) -> Stencil {
        crate::rasterize(self, geometry, options)
    }
}

/// Combinators for building regions out of other regions.
pub trait RegionExt: Region + Sized {
    /// The area covered by either region.
    fn union_with<R: Region>(self, other: R) -> Union<Self, R> {
        Union(self, other)
    }

    /// The area covered by both regions.
    fn intersect_with<R: Region>(self, other: R) -> Intersection<Self, R> {
        Intersection(self, other)
    }

    /// The area covered by this region, but not by `other`.
    fn subtract<R: Region>(self, other: R) -> Difference<Self, R> {
        Difference(self, other)
    }

    /// Move this region behind a shared pointer.
    fn into_shape(self) -> Shape
    where
        Self: Send + Sync + 'static,
    {
        Arc::new(self)
    }
}

impl<R: Region> RegionExt for R {}

/// Axis-aligned rectangles.
impl Region for Box2D<f32> {
    fn bounds(&self) -> Option<Box2D<f32>> {
        if Box2D::is_empty(self) {
            None
        } else {
            Some(*self)
        }
    }

    fn spans(&self, y: f32, spans: &mut Vec<Span>) {
        if y >= self.min.y && y < self.max.y && self.min.x < self.max.x {
            spans.push(Span::new(self.min.x, self.max.x));
        }
    }

    fn contains(&self, point: Point2D<f32>) -> bool {
        Box2D::contains(self, point)
    }
}

/// The union of two regions.
#[derive(Debug, Clone)]
pub struct Union<A, B>(pub A, pub B);

impl<A: Region, B: Region> Region for Union<A, B> {
    fn bounds(&self) -> Option<Box2D<f32>> {
        match (self.0.bounds(), self.1.bounds()) {
            (Some(a), Some(b)) => Some(unite_boxes(a, b)),
            (a, None) => a,
            (None, b) => b,
        }
    }

    fn spans(&self, y: f32, spans: &mut Vec<Span>) {
        let mut combined = Vec::new();
        self.0.spans(y, &mut combined);
        self.1.spans(y, &mut combined);
        normalize(&mut combined);
        spans.extend(combined);
    }

    fn contains(&self, point: Point2D<f32>) -> bool {
        self.0.contains(point) || self.1.contains(point)
    }
}

/// The intersection of two regions.
#[derive(Debug, Clone)]
pub struct Intersection<A, B>(pub A, pub B);

impl<A: Region, B: Region> Region for Intersection<A, B> {
    fn bounds(&self) -> Option<Box2D<f32>> {
        intersect_boxes(self.0.bounds()?, self.1.bounds()?)
    }

    fn spans(&self, y: f32, spans: &mut Vec<Span>) {
        let (mut left, mut right) = (Vec::new(), Vec::new());
        self.0.spans(y, &mut left);
        self.1.spans(y, &mut right);
        intersect_spans(&left, &right, spans);
    }

    fn contains(&self, point: Point2D<f32>) -> bool {
        self.0.contains(point) && self.1.contains(point)
    }
}

/// The area of the first region that is not in the second.
#[derive(Debug, Clone)]
pub struct Difference<A, B>(pub A, pub B);

impl<A: Region, B: Region> Region for Difference<A, B> {
    fn bounds(&self) -> Option<Box2D<f32>> {
        self.0.bounds()
    }

    fn spans(&self, y: f32, spans: &mut Vec<Span>) {
        let (mut left, mut right) = (Vec::new(), Vec::new());
        self.0.spans(y, &mut left);
        self.1.spans(y, &mut right);
        subtract_spans(&left, &right, spans);
    }

    fn contains(&self, point: Point2D<f32>) -> bool {
        self.0.contains(point) && !self.1.contains(point)
    }
}

impl<R: Region + ?Sized> Region for &R {
    fn bounds(&self) -> Option<Box2D<f32>> {
        (**self).bounds()
    }

    fn spans(&self, y: f32, spans: &mut Vec<Span>) {
        (**self).spans(y, spans);
    }

    fn contains(&self, point: Point2D<f32>) -> bool {
        (**self).contains(point)
    }

    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }
}

impl<R: Region + ?Sized> Region for Box<R> {
    fn bounds(&self) -> Option<Box2D<f32>> {
        (**self).bounds()
    }

    fn spans(&self, y: f32, spans: &mut Vec<Span>) {
        (**self).spans(y, spans);
    }

    fn contains(&self, point: Point2D<f32>) -> bool {
        (**self).contains(point)
    }

    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }
}

impl<R: Region + ?Sized> Region for Arc<R> {
    fn bounds(&self) -> Option<Box2D<f32>> {
        (**self).bounds()
    }

    fn spans(&self, y: f32, spans: &mut Vec<Span>) {
        (**self).spans(y, spans);
    }

    fn contains(&self, point: Point2D<f32>) -> bool {
        (**self).contains(point)
    }

    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }
}

/// Sort a list of spans, drop the empty ones and merge the ones that overlap or touch.
pub fn normalize(spans: &mut Vec<Span>) {
    spans.retain(|span| !span.is_empty());
    spans.sort_unstable_by_key(|span| OrderedFloat(span.start));

    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    for span in spans.drain(..) {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }

    *spans = merged;
}

/// Append the overlap of two normalized span lists to `out`.
fn intersect_spans(a: &[Span], b: &[Span], out: &mut Vec<Span>) {
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        let span = Span::new(a[i].start.max(b[j].start), a[i].end.min(b[j].end));
        if !span.is_empty() {
            out.push(span);
        }

        if a[i].end < b[j].end {
            i += 1;
        } else {
            j += 1;
        }
    }
}

/// Append the parts of `a` not covered by `b` to `out`. Both lists must be normalized.
fn subtract_spans(a: &[Span], b: &[Span], out: &mut Vec<Span>) {
    let mut j = 0;

    for span in a {
        let mut start = span.start;

        // skip the cutters that end before this span does anything
        while j < b.len() && b[j].end <= start {
            j += 1;
        }

        let mut k = j;
        while k < b.len() && b[k].start < span.end {
            if b[k].start > start {
                out.push(Span::new(start, b[k].start));
            }
            start = start.max(b[k].end);
            k += 1;
        }

        if start < span.end {
            out.push(Span::new(start, span.end));
        }
    }
}
