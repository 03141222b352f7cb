//! Counts pairwise crossings among a set of 2D line segments.
//!
//! This is an implementation of the [Bentley-Ottman] sweep-line
//! algorithm: a vertical line sweeps the plane left to right,
//! maintaining the vertical order of the segments it currently
//! crosses, and intersections are discovered only between segments
//! that become adjacent in that order. With n segments and k
//! crossings, the sweep runs in O((n + k) log n) time; this beats the
//! brute-force search over all pairs whenever k is small compared to
//! n^2.
//!
//! Two segments count as crossing when their interiors properly
//! cross, including a "T" where an end point lands on the interior of
//! another segment. Pairs that merely share an end point, and
//! collinear overlaps, contribute nothing.
//!
//! # Usage
//!
//! ```rust
//! use geo::Line;
//! use line_crossings::count_intersections;
//!
//! let input = vec![
//!     Line::from([(0., 0.), (10., 10.)]),
//!     Line::from([(0., 10.), (10., 0.)]),
//!     Line::from([(0., 1.), (10., 11.)]),
//! ];
//! // Only the first two cross; the third is parallel to the first.
//! assert_eq!(count_intersections(&input), 1);
//! ```
//!
//! Coordinates must be finite; all tolerance decisions route through
//! the single [`EPSILON`] constant. A quadratic reference counter,
//! [`count_intersections_naive`], is provided for differential
//! testing.
//!
//! [Bentley-Ottman]: //en.wikipedia.org/wiki/Bentley%E2%80%93Ottmann_algorithm
use geo::Line;

mod events;
pub use events::SweepPoint;

mod segment;
pub use segment::EPSILON;

mod active;

mod sweep;
pub use sweep::Sweep;

mod naive;
pub use naive::count_intersections_naive;

/// Counts the unordered pairs of segments whose interiors properly
/// cross.
///
/// A pure function of its input: the same segment set yields the same
/// count regardless of input order. Coordinates must be finite.
pub fn count_intersections(lines: &[Line<f64>]) -> usize {
    Sweep::new(lines.iter().copied()).run()
}

#[cfg(test)]
#[path = "../benches/utils/random.rs"]
pub(crate) mod random;
