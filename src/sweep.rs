use std::collections::BinaryHeap;

use geo::Line;
use log::{debug, trace};
use slab::Slab;
use smallvec::SmallVec;

use crate::{
    active::ActiveSet,
    events::{Event, EventType, SweepPoint},
    segment::{compare_at, Segment, EPSILON},
};

/// Sweep-line state for counting segment crossings.
///
/// This is the [Bentley-Ottman] sweep: events (segment end points and
/// discovered intersections) are processed left to right while the
/// status set maintains the vertical order of segments crossed by the
/// sweep line. New intersections are only ever searched for between
/// segments that become adjacent in that order, which is what makes
/// the algorithm sub-quadratic.
///
/// [Bentley-Ottman]: //en.wikipedia.org/wiki/Bentley%E2%80%93Ottmann_algorithm
pub struct Sweep {
    segments: Box<Slab<Segment>>,
    events: BinaryHeap<Event>,
    active: ActiveSet,
}

impl Sweep {
    /// Build a sweep over the given segments.
    ///
    /// Segments are copied and normalized; the input order is
    /// irrelevant to the result. Zero-length segments are skipped:
    /// they have no interior and no defined slope, and can never
    /// contribute a proper crossing.
    pub fn new<I: IntoIterator<Item = Line<f64>>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let size = {
            let (min_size, max_size) = iter.size_hint();
            max_size.unwrap_or(min_size)
        };

        let mut sweep = Sweep {
            segments: Slab::with_capacity(size).into(),
            events: BinaryHeap::with_capacity(2 * size),
            active: ActiveSet::new(),
        };

        for line in iter {
            if line.dx().abs() < EPSILON && line.dy().abs() < EPSILON {
                trace!("skipping zero-length segment: {:?}", line);
                continue;
            }
            let segment = Segment::new(&mut sweep.segments, line);
            for e in segment.events() {
                sweep.events.push(e);
            }
        }

        sweep
    }

    /// Run the sweep to completion and return the number of pairwise
    /// crossings.
    pub fn run(mut self) -> usize {
        let mut count = 0;

        while let Some(event) = self.events.pop() {
            trace!("handling event: {:?}", event);
            // All status comparisons at this event happen as of the
            // event's x position.
            self.active.set_sweep_x(event.point.x());

            match event.ty {
                EventType::SegmentStart => {
                    let key = event.segment;
                    // Safety: `self.segments` is a `Box` that is not
                    // de-allocated until `self` is dropped.
                    unsafe { self.active.add(key, &self.segments) };

                    let (above, below) = self.active.neighbors(key, &self.segments);
                    if let Some(above) = above {
                        self.check_intersection(key, above, event.point);
                    }
                    if let Some(below) = below {
                        self.check_intersection(key, below, event.point);
                    }
                }
                EventType::SegmentEnd => {
                    // Fetch neighbors before the removal; they become
                    // adjacent once the segment is gone.
                    let (above, below) = self.active.neighbors(event.segment, &self.segments);
                    self.active.remove(event.segment, &self.segments);
                    if let (Some(above), Some(below)) = (above, below) {
                        self.check_intersection(above, below, event.point);
                    }
                }
                EventType::Intersection => {
                    count += self.handle_intersection(event);
                }
            }
        }

        debug_assert!(
            self.active.is_empty(),
            "segments left in the status after the last event"
        );
        count
    }

    /// Handle an intersection event, returning the number of pairwise
    /// crossings at its point.
    ///
    /// When three or more segments meet at one point, each pair was
    /// discovered and scheduled independently; all co-located
    /// intersection events are collapsed into this one before any
    /// state changes.
    fn handle_intersection(&mut self, event: Event) -> usize {
        let mut batch: SmallVec<[usize; 16]> = SmallVec::new();
        batch.push(event.segment);
        let second = event
            .other
            .expect("intersection event missing its second segment");
        if !batch.contains(&second) {
            batch.push(second);
        }

        while let Some(next) = self.events.peek() {
            if next.ty != EventType::Intersection || next.point != event.point {
                break;
            }
            let next = self.events.pop().unwrap();
            let other = next
                .other
                .expect("intersection event missing its second segment");
            for key in [next.segment, other] {
                if !batch.contains(&key) {
                    batch.push(key);
                }
            }
        }

        // k mutually-crossing segments contribute C(k, 2) pairs, all
        // passing through this exact point.
        let k = batch.len();
        let found = k * (k - 1) / 2;
        debug!(
            "{} segments concurrent at {:?}: {} crossings",
            k, event.point, found
        );

        // Order the block at the crossing point itself to find its
        // current extremes, then capture the outer neighbors; only
        // those can newly interact with the block.
        let x = self.active.sweep_x();
        let segments = &self.segments;
        batch.sort_unstable_by(|&a, &b| compare_at(&segments[a], &segments[b], x));
        let (bottom, top) = (batch[0], batch[k - 1]);
        let (above, _) = self.active.neighbors(top, &self.segments);
        let (_, below) = self.active.neighbors(bottom, &self.segments);

        // Segments crossing at a point swap their vertical order on
        // the other side of it; re-inserting the whole block in
        // reversed order one epsilon past the point generalizes the
        // two-segment swap to any k.
        for &key in &batch {
            self.active.remove(key, &self.segments);
        }
        self.active.set_sweep_x(event.point.x() + EPSILON);
        for &key in batch.iter().rev() {
            // Safety: `self.segments` is a `Box` that is not
            // de-allocated until `self` is dropped.
            unsafe { self.active.add(key, &self.segments) };
        }

        // The old bottom of the block is its new top, and vice versa.
        if let Some(above) = above {
            self.check_intersection(batch[0], above, event.point);
        }
        if let Some(below) = below {
            self.check_intersection(batch[k - 1], below, event.point);
        }

        found
    }

    /// Schedule an intersection event for `s1` and `s2` if they cross
    /// strictly ahead of the sweep.
    ///
    /// The strict-future guard keeps the sweep from re-discovering
    /// the crossing it is currently processing over and over through
    /// floating-point round-trip error.
    fn check_intersection(&mut self, s1: usize, s2: usize, current: SweepPoint) {
        let (a, b) = (&self.segments[s1], &self.segments[s2]);

        // Segments meeting at a shared vertex only touch there, never
        // cross. Without this the tolerant parametric solve reports
        // the shared vertex itself whenever it lies ahead of the
        // sweep, and the pair gets counted.
        if a.shares_end_point(b) {
            return;
        }

        let point = match a.intersection(b) {
            Some(p) => p,
            None => return,
        };

        let is_future = point.x - current.x() > EPSILON
            || ((point.x - current.x()).abs() < EPSILON && point.y - current.y() > EPSILON);
        if is_future {
            debug!(
                "scheduling intersection of {} and {} at {:?}",
                s1, s2, point
            );
            self.events.push(Event {
                point: point.into(),
                ty: EventType::Intersection,
                segment: s1,
                other: Some(s2),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use geo::{Line, Rect};
    use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

    use crate::random::{grid_lines, uniform_line};
    use crate::{count_intersections, count_intersections_naive};

    fn init_log() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// Assert that both the sweep and the naive oracle agree with the
    /// expected count.
    fn check(lines: &[Line<f64>], expected: usize) {
        init_log();
        assert_eq!(count_intersections_naive(lines), expected, "naive count");
        assert_eq!(count_intersections(lines), expected, "sweep count");
    }

    #[test]
    fn test_empty_input() {
        check(&[], 0);
    }

    #[test]
    fn test_single_segment() {
        check(&[Line::from([(0., 0.), (10., 10.)])], 0);
    }

    #[test]
    fn test_simple_crossing() {
        check(
            &[
                Line::from([(0., 0.), (10., 10.)]),
                Line::from([(0., 10.), (10., 0.)]),
            ],
            1,
        );
    }

    #[test]
    fn test_parallel_disjoint() {
        check(
            &[
                Line::from([(0., 0.), (10., 10.)]),
                Line::from([(0., 1.), (10., 11.)]),
            ],
            0,
        );
    }

    #[test]
    fn test_vertical_crosses_horizontal() {
        check(
            &[
                Line::from([(5., 0.), (5., 10.)]),
                Line::from([(0., 5.), (10., 5.)]),
            ],
            1,
        );
    }

    #[test]
    fn test_parallel_horizontals() {
        check(
            &[
                Line::from([(0., 5.), (10., 5.)]),
                Line::from([(0., 6.), (10., 6.)]),
            ],
            0,
        );
    }

    #[test]
    fn test_parallel_verticals() {
        check(
            &[
                Line::from([(5., 0.), (5., 10.)]),
                Line::from([(6., 0.), (6., 10.)]),
            ],
            0,
        );
    }

    #[test]
    fn test_t_junction_counts_as_crossing() {
        // One end point lands on the interior of the vertical.
        check(
            &[
                Line::from([(5., 0.), (5., 10.)]),
                Line::from([(0., 5.), (5., 5.)]),
            ],
            1,
        );
    }

    #[test]
    fn test_shared_end_point_only_touches() {
        check(
            &[
                Line::from([(0., 0.), (5., 5.)]),
                Line::from([(10., 0.), (5., 5.)]),
            ],
            0,
        );
    }

    #[test]
    fn test_both_ending_at_shared_point() {
        // Both segments run into the same right-side vertex. While
        // both are still active their tolerant parametric solve lands
        // on that vertex; it must not be counted as a crossing.
        check(
            &[
                Line::from([(0., 0.), (5., 5.)]),
                Line::from([(0., 10.), (5., 5.)]),
            ],
            0,
        );
    }

    #[test]
    fn test_both_starting_at_shared_point() {
        check(
            &[
                Line::from([(5., 5.), (10., 10.)]),
                Line::from([(5., 5.), (10., 0.)]),
            ],
            0,
        );
    }

    #[test]
    fn test_collinear_disjoint() {
        check(
            &[
                Line::from([(0., 0.), (5., 5.)]),
                Line::from([(6., 6.), (10., 10.)]),
            ],
            0,
        );
    }

    #[test]
    fn test_collinear_overlap_is_not_a_crossing() {
        check(
            &[
                Line::from([(0., 0.), (10., 10.)]),
                Line::from([(2., 2.), (8., 8.)]),
            ],
            0,
        );
    }

    #[test]
    fn test_three_concurrent_at_one_point() {
        check(
            &[
                Line::from([(5., 0.), (5., 10.)]),
                Line::from([(0., 5.), (10., 5.)]),
                Line::from([(0., 0.), (10., 10.)]),
            ],
            3,
        );
    }

    #[test]
    fn test_four_concurrent_at_one_point() {
        check(
            &[
                Line::from([(5., 0.), (5., 10.)]),
                Line::from([(0., 5.), (10., 5.)]),
                Line::from([(0., 0.), (10., 10.)]),
                Line::from([(0., 10.), (10., 0.)]),
            ],
            6,
        );
    }

    #[test]
    fn test_two_by_two_grid() {
        check(
            &[
                Line::from([(0., 5.), (10., 5.)]),
                Line::from([(0., 6.), (10., 6.)]),
                Line::from([(5., 0.), (5., 10.)]),
                Line::from([(6., 0.), (6., 10.)]),
            ],
            4,
        );
    }

    #[test]
    fn test_mixed_bundle() {
        check(
            &[
                Line::from([(0., 0.), (10., 10.)]),
                Line::from([(0., 10.), (10., 0.)]),
                Line::from([(2., 0.), (8., 10.)]),
                Line::from([(0., 5.), (10., 5.)]),
            ],
            6,
        );
    }

    #[test]
    fn test_larger_grid() {
        check(&grid_lines(10, 100.), 100);
    }

    #[test]
    fn test_zero_length_segments_are_ignored() {
        check(
            &[
                Line::from([(1., 1.), (1., 1.)]),
                Line::from([(0., 0.), (10., 10.)]),
                Line::from([(0., 10.), (10., 0.)]),
            ],
            1,
        );
    }

    #[test]
    fn test_duplicate_segments_do_not_collapse() {
        // Coordinate-identical segments are distinct entities; both
        // must enter and leave the status cleanly.
        check(
            &[
                Line::from([(0., 0.), (10., 10.)]),
                Line::from([(0., 0.), (10., 10.)]),
            ],
            0,
        );
    }

    #[test]
    fn test_matches_naive_on_random_input() {
        init_log();
        let mut rng = StdRng::seed_from_u64(7);
        let bounds = Rect::new([0., 0.], [1000., 1000.]);

        for &n in &[10, 50, 100] {
            let lines: Vec<_> = (0..n).map(|_| uniform_line(&mut rng, bounds)).collect();
            assert_eq!(
                count_intersections(&lines),
                count_intersections_naive(&lines),
                "mismatch against the naive count for n = {}",
                n
            );
        }
    }

    #[test]
    fn test_input_order_is_irrelevant() {
        let mut lines = vec![
            Line::from([(0., 0.), (10., 10.)]),
            Line::from([(0., 10.), (10., 0.)]),
            Line::from([(2., 0.), (8., 10.)]),
            Line::from([(0., 5.), (10., 5.)]),
            Line::from([(3., 1.), (7., 9.)]),
            Line::from([(1., 8.), (9., 2.)]),
        ];
        let expected = count_intersections(&lines);

        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..16 {
            lines.shuffle(&mut rng);
            assert_eq!(count_intersections(&lines), expected);
        }
    }
}
