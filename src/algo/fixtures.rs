//! Polygons shared by the unit tests.

use std::f64::consts::PI;

use nalgebra::Point2;

use crate::polygon::Polygon;

fn pts(coords: &[(f64, f64)]) -> Vec<Point2<f64>> {
    coords.iter().map(|&(x, y)| Point2::new(x, y)).collect()
}

fn square_ring(x0: f64, y0: f64, size: f64) -> Vec<Point2<f64>> {
    pts(&[(x0, y0), (x0 + size, y0), (x0 + size, y0 + size), (x0, y0 + size)])
}

/// Clockwise square, as holes are given.
fn square_hole(x0: f64, y0: f64, size: f64) -> Vec<Point2<f64>> {
    pts(&[(x0, y0), (x0, y0 + size), (x0 + size, y0 + size), (x0 + size, y0)])
}

pub fn unit_square() -> Polygon {
    Polygon::new(square_ring(0.0, 0.0, 1.0))
}

/// Triangle with a notch in its base; the notch apex is a split vertex.
pub fn arrow() -> Polygon {
    Polygon::from_coords(&[(0.0, 0.0), (2.0, 1.0), (4.0, 0.0), (2.0, 4.0)])
}

/// 4x4 square with a centered 2x2 hole.
pub fn square_with_hole() -> Polygon {
    Polygon::new(square_ring(0.0, 0.0, 4.0)).with_hole(square_hole(1.0, 1.0, 2.0))
}

/// Bar with two notches of different depth in its bottom edge.
pub fn comb() -> Polygon {
    Polygon::from_coords(&[
        (0.0, 0.0),
        (2.0, 0.0),
        (3.0, 2.0),
        (4.0, 0.0),
        (6.0, 0.0),
        (8.0, 4.0),
        (10.0, 0.0),
        (12.0, 0.0),
        (12.0, 5.0),
        (11.0, 6.0),
        (0.0, 6.0),
    ])
}

/// Square with a notch reaching in from its lower-left corner.
pub fn corner_notch() -> Polygon {
    Polygon::from_coords(&[
        (1.0, 0.0),
        (4.0, 0.0),
        (4.0, 4.0),
        (0.0, 4.0),
        (0.0, 1.0),
        (2.0, 2.0),
    ])
}

/// Open-topped U: non-monotone for horizontal lines only.
pub fn u_shape() -> Polygon {
    Polygon::from_coords(&[
        (0.0, 0.0),
        (3.0, 0.0),
        (3.0, 3.0),
        (2.0, 3.0),
        (2.0, 1.0),
        (1.0, 1.0),
        (1.0, 3.0),
        (0.0, 3.0),
    ])
}

/// Rectangle with two square holes side by side.
pub fn two_holes() -> Polygon {
    Polygon::new(pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 4.0), (0.0, 4.0)]))
        .with_hole(square_hole(1.0, 1.0, 2.0))
        .with_hole(square_hole(6.0, 1.0, 2.0))
}

/// Five-pointed star, turned slightly so no two vertices share a coordinate.
pub fn star() -> Polygon {
    let outer = (0..10)
        .map(|i| {
            let angle = 0.1 + i as f64 * PI / 5.0;
            let r = if i % 2 == 0 { 2.0 } else { 0.8 };
            Point2::new(r * angle.cos(), r * angle.sin())
        })
        .collect();
    Polygon::new(outer)
}

/// 12x12 square with a 2x2 grid of square holes.
pub fn grid_of_holes() -> Polygon {
    let mut poly = Polygon::new(square_ring(0.0, 0.0, 12.0));
    for &(x, y) in &[(2.0, 2.0), (8.0, 2.0), (2.0, 8.0), (8.0, 8.0)] {
        poly.add_hole(square_hole(x, y, 2.0));
    }
    poly
}

/// Bar with `teeth` triangular notches of varying depth in its bottom edge.
pub fn comb_n(teeth: usize) -> Polygon {
    let width = 3.0 * teeth as f64 + 1.0;
    let mut outer = vec![Point2::new(0.0, 0.0)];
    for i in 0..teeth {
        let x = 3.0 * i as f64;
        let depth = 1.0 + ((i * 7) % 5) as f64 * 0.6;
        outer.push(Point2::new(x + 1.0, 0.0));
        outer.push(Point2::new(x + 2.0, depth));
        outer.push(Point2::new(x + 3.0, 0.0));
    }
    outer.push(Point2::new(width, 0.0));
    outer.push(Point2::new(width, 5.0));
    outer.push(Point2::new(0.0, 5.0));
    Polygon::new(outer)
}

#[test]
fn test_fixtures_are_valid() {
    for poly in [
        unit_square(),
        arrow(),
        square_with_hole(),
        comb(),
        corner_notch(),
        u_shape(),
        two_holes(),
        star(),
        grid_of_holes(),
        comb_n(6),
    ] {
        assert!(poly.validate().is_ok(), "{:?}", poly.validate());
        assert!(poly.area() > 0.0);
    }
}
