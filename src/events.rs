use std::cmp::Ordering;

use geo::Coordinate;

/// A sweep event: a point in the plane at which the sweep line must
/// react, either an end point of a segment or a discovered
/// intersection of two segments.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Event {
    pub(crate) point: SweepPoint,
    pub(crate) ty: EventType,
    /// Key of the primary segment associated with this event.
    pub(crate) segment: usize,
    /// Key of the second segment; `Some` only for intersections.
    pub(crate) other: Option<usize>,
}

/// Equality check for usage in ordered sets. Note that it ignores the
/// segment keys.
impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.point == other.point && self.ty == other.ty
    }
}

/// Assert total equality
impl Eq for Event {}

/// Ordering for use with a max-heap (`BinaryHeap`). Note that it
/// ignores the segment keys. This suffices for heap usage, where
/// repeated items are allowed.
impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Reversed `(point, ty)` ordering, so the `BinaryHeap` pops the
/// lexicographically earliest event first.
impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        self.point
            .cmp(&other.point)
            .then_with(|| self.ty.cmp(&other.ty))
            .reverse()
    }
}

/// Event type to associate with event.
///
/// The declaration order doubles as the tie-break between events at
/// the same sweep point. Intersection events must pop contiguously so
/// that the sweep can collapse all of them at one point into a single
/// logical event, and end points are ordered before start points.
#[derive(Debug, PartialOrd, Ord, PartialEq, Eq, Clone, Copy)]
pub(crate) enum EventType {
    Intersection,
    SegmentEnd,
    SegmentStart,
}

/// Wraps a [`Coordinate`] to support lexicographic ordering.
///
/// The ordering is by `x` and then by `y`. Implements `PartialOrd`,
/// `Ord` and `Eq` even though `Coordinate` doesn't implement these.
/// This is necessary to support insertion to ordered collections,
/// especially `BinaryHeap` as required by sweep algorithms.
///
/// Construction asserts that both coordinates are finite; the sweep
/// cannot order NaN or infinite values.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct SweepPoint(Coordinate<f64>);

impl SweepPoint {
    /// The wrapped coordinate.
    #[inline]
    pub fn coord(&self) -> Coordinate<f64> {
        self.0
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.0.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.0.y
    }
}

/// Implement lexicographic ordering by `x` and then by `y`
/// coordinate.
impl PartialOrd for SweepPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.0.x.partial_cmp(&other.0.x) {
            Some(Ordering::Equal) => self.0.y.partial_cmp(&other.0.y),
            o => o,
        }
    }
}

/// Derive `Ord` from `PartialOrd` and expect to not fail.
impl Ord for SweepPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.partial_cmp(other).unwrap()
    }
}

/// Equality is exact: two sweep points are equal only when their
/// cached coordinates match bit-for-bit, which is what the same-point
/// event batching relies on.
impl Eq for SweepPoint {}

/// Create from `Coordinate` while checking the components are finite.
impl From<Coordinate<f64>> for SweepPoint {
    fn from(pt: Coordinate<f64>) -> Self {
        assert!(
            pt.x.is_finite(),
            "sweep point requires a finite x-coordinate"
        );
        assert!(
            pt.y.is_finite(),
            "sweep point requires a finite y-coordinate"
        );
        SweepPoint(pt)
    }
}
