use geo::{Coordinate, Line, Rect};

use rand::Rng;

#[inline]
pub fn uniform_point<R: Rng>(rng: &mut R, bounds: Rect<f64>) -> Coordinate<f64> {
    let dims = bounds.max() - bounds.min();
    Coordinate {
        x: bounds.min().x + dims.x * rng.gen::<f64>(),
        y: bounds.min().y + dims.y * rng.gen::<f64>(),
    }
}

#[inline]
pub fn uniform_line<R: Rng>(rng: &mut R, bounds: Rect<f64>) -> Line<f64> {
    Line::new(uniform_point(rng, bounds), uniform_point(rng, bounds))
}

/// An n-by-n grid of horizontal and vertical lines: 2n segments with
/// exactly n^2 crossings.
pub fn grid_lines(n: usize, max_coord: f64) -> Vec<Line<f64>> {
    let step = max_coord / (n as f64 + 1.);
    let mut lines = Vec::with_capacity(2 * n);
    for i in 1..=n {
        let y = step * i as f64;
        lines.push(Line::from([(0., y), (max_coord, y)]));
    }
    for i in 1..=n {
        let x = step * i as f64;
        lines.push(Line::from([(x, 0.), (x, max_coord)]));
    }
    lines
}
