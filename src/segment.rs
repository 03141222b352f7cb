use std::cmp::Ordering;

use geo::{Coordinate, Line};
use slab::Slab;

use crate::events::{Event, EventType, SweepPoint};

/// Tolerance for floating-point comparisons throughout the sweep.
///
/// Coordinate equality, parallel-line detection and the scheduling
/// guard for future intersection events all route through this one
/// constant.
pub const EPSILON: f64 = 1e-9;

/// A line segment tracked by the sweep, stored in a [`Slab`] arena.
///
/// The end points are normalized on construction so that `line.start`
/// is the lexicographically smaller one; all downstream logic relies
/// on this. Identity is the slab key: two coordinate-identical input
/// segments remain distinct entries.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Segment {
    key: usize,
    pub(crate) line: Line<f64>,
}

impl Segment {
    /// Create and store a `Segment` with normalized end points.
    pub(crate) fn new(storage: &mut Slab<Self>, line: Line<f64>) -> &mut Self {
        let start = SweepPoint::from(line.start);
        let end = SweepPoint::from(line.end);
        let line = if start <= end {
            Line::new(start.coord(), end.coord())
        } else {
            Line::new(end.coord(), start.coord())
        };

        let entry = storage.vacant_entry();
        let segment = Segment {
            key: entry.key(),
            line,
        };
        entry.insert(segment)
    }

    /// Get the segment's key.
    pub(crate) fn key(&self) -> usize {
        self.key
    }

    /// Get an event for the left end-point (start) of this segment.
    pub(crate) fn start_event(&self) -> Event {
        Event {
            point: self.line.start.into(),
            ty: EventType::SegmentStart,
            segment: self.key,
            other: None,
        }
    }

    /// Get an event for the right end-point (end) of this segment.
    pub(crate) fn end_event(&self) -> Event {
        Event {
            point: self.line.end.into(),
            ty: EventType::SegmentEnd,
            segment: self.key,
            other: None,
        }
    }

    /// Get events for both the end-points of this segment.
    pub(crate) fn events(&self) -> [Event; 2] {
        [self.start_event(), self.end_event()]
    }

    /// The y-value of this segment at sweep position `x`.
    ///
    /// Vertical segments report their lower end point. Positions
    /// outside the segment's x-extent clamp to the nearest end
    /// point's y.
    pub(crate) fn y_at(&self, x: f64) -> f64 {
        let (p, q) = (self.line.start, self.line.end);
        if p.x == q.x {
            return p.y;
        }
        if x <= p.x {
            return p.y;
        }
        if x >= q.x {
            return q.y;
        }
        p.y + (x - p.x) * (q.y - p.y) / (q.x - p.x)
    }

    /// The segment's slope; infinite for vertical segments so that
    /// they order above every finite slope in the tie-break.
    pub(crate) fn slope(&self) -> f64 {
        let (p, q) = (self.line.start, self.line.end);
        if (q.x - p.x).abs() < EPSILON {
            f64::INFINITY
        } else {
            (q.y - p.y) / (q.x - p.x)
        }
    }

    /// `true` if the two segments share an end point.
    ///
    /// Exact comparison is intended: end points are cached input
    /// coordinates, never recomputed.
    pub(crate) fn shares_end_point(&self, other: &Segment) -> bool {
        self.line.start == other.line.start
            || self.line.start == other.line.end
            || self.line.end == other.line.start
            || self.line.end == other.line.end
    }

    /// The crossing point of two segments, if they cross within both
    /// finite extents.
    ///
    /// Solves the parametric 2x2 system via cross products of the
    /// direction vectors. Parallel and collinear pairs (cross product
    /// below [`EPSILON`]) never yield a crossing; collinear overlaps
    /// are excluded from crossing counts by policy.
    pub(crate) fn intersection(&self, other: &Segment) -> Option<Coordinate<f64>> {
        let (p1, p2) = (self.line.start, self.line.end);
        let (p3, p4) = (other.line.start, other.line.end);

        let r = Coordinate {
            x: p2.x - p1.x,
            y: p2.y - p1.y,
        };
        let s = Coordinate {
            x: p4.x - p3.x,
            y: p4.y - p3.y,
        };

        let rxs = r.x * s.y - r.y * s.x;
        if rxs.abs() < EPSILON {
            return None;
        }

        // The crossing lies at p1 + t*r, equivalently p3 + u*s.
        let qp = Coordinate {
            x: p3.x - p1.x,
            y: p3.y - p1.y,
        };
        let t = (qp.x * s.y - qp.y * s.x) / rxs;
        let u = (qp.x * r.y - qp.y * r.x) / rxs;

        if (-EPSILON..=1. + EPSILON).contains(&t) && (-EPSILON..=1. + EPSILON).contains(&u) {
            Some(Coordinate {
                x: p1.x + t * r.x,
                y: p1.y + t * r.y,
            })
        } else {
            None
        }
    }
}

/// Vertical order of two segments at sweep position `x`.
///
/// Orders by the y-value at `x` with [`EPSILON`] tolerance, breaking
/// ties first by slope and finally by slab key. The key tie-break
/// keeps distinct segments distinct in ordered collections even when
/// they are geometrically indistinguishable at `x`.
pub(crate) fn compare_at(a: &Segment, b: &Segment, x: f64) -> Ordering {
    let ya = a.y_at(x);
    let yb = b.y_at(x);
    if (ya - yb).abs() > EPSILON {
        return if ya < yb {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }

    let sa = a.slope();
    let sb = b.slope();
    if sa < sb {
        Ordering::Less
    } else if sa > sb {
        Ordering::Greater
    } else {
        a.key.cmp(&b.key)
    }
}
