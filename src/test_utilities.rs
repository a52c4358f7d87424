use crate::Point2;
use rand::distributions::{Distribution, Uniform};
use rand::SeedableRng;

pub const SEED: &[u8; 32] = b"wPYxAkIiHcEmSBAxQFoXFrpYToCe1B71";
pub const SEED2: &[u8; 32] = b"14LzG37Y9EHTcmLW8vBDqWwtYsCeVVyF";

/// Uniformly distributed points in `[-range, range]²`.
pub fn random_points_in_range(range: f64, size: usize, seed: &[u8; 32]) -> Vec<Point2<f64>> {
    let mut rng = rand::rngs::StdRng::from_seed(*seed);
    let range = Uniform::new(-range, range);
    (0..size)
        .map(|_| Point2::new(range.sample(&mut rng), range.sample(&mut rng)))
        .collect()
}

pub fn random_points_with_seed(size: usize, seed: &[u8; 32]) -> Vec<Point2<f64>> {
    random_points_in_range(1.0, size, seed)
}

/// All points of a `size` × `size` integer grid, row by row. Grids contain many
/// collinear and cocircular subsets.
pub fn grid_points(size: usize, spacing: f64) -> Vec<Point2<f64>> {
    (0..size)
        .flat_map(|row| (0..size).map(move |column| (row, column)))
        .map(|(row, column)| Point2::new(column as f64 * spacing, row as f64 * spacing))
        .collect()
}

/// Points on a circle around the origin, in shuffled order.
pub fn points_on_circle(radius: f64, size: usize, seed: &[u8; 32]) -> Vec<Point2<f64>> {
    use rand::seq::SliceRandom;

    let mut points: Vec<_> = (0..size)
        .map(|i| {
            let angle = i as f64 / size as f64 * std::f64::consts::TAU;
            Point2::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect();
    let mut rng = rand::rngs::StdRng::from_seed(*seed);
    points.shuffle(&mut rng);
    points
}
