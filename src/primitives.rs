//! Plain geometric values handed out by triangulations and Voronoi diagrams.
//!
//! These types are detached from the triangulation they were created from and can be
//! stored, compared and passed on to meshing or rendering code.

use crate::delaunay_core::math::{self, GeometryError};
use crate::{CoordNum, Point2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A triangle given by its three corner positions.
///
/// Two triangles compare equal if their corners are the same three positions, in any
/// order. Repeated corners count: `[a, a, b]` differs from `[a, b, b]`.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde")
)]
pub struct Triangle2<S> {
    /// The triangle's corners.
    pub vertices: [Point2<S>; 3],
}

impl<S> Triangle2<S> {
    pub const fn new(a: Point2<S>, b: Point2<S>, c: Point2<S>) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }
}

impl<S> From<[Point2<S>; 3]> for Triangle2<S> {
    fn from(vertices: [Point2<S>; 3]) -> Self {
        Self { vertices }
    }
}

impl<S: PartialEq> PartialEq for Triangle2<S> {
    fn eq(&self, other: &Self) -> bool {
        let [a, b, c] = &other.vertices;
        let orderings = [
            [a, b, c],
            [b, c, a],
            [c, a, b],
            [a, c, b],
            [c, b, a],
            [b, a, c],
        ];
        orderings.iter().any(|ordering| {
            self.vertices
                .iter()
                .zip(ordering)
                .all(|(vertex, candidate)| vertex == *candidate)
        })
    }
}

impl<S: CoordNum> Triangle2<S> {
    /// Returns the point equidistant from all three corners.
    ///
    /// Fails with [GeometryError::DegenerateTriangle] if the corners are collinear.
    pub fn circumcenter(&self) -> Result<Point2<S>, GeometryError> {
        math::circumcenter(self.vertices)
            .map(|(center, _)| center)
            .ok_or(GeometryError::DegenerateTriangle)
    }

    /// Returns the circumcircle's squared radius.
    pub fn circumradius_2(&self) -> Result<S, GeometryError> {
        math::circumcenter(self.vertices)
            .map(|(_, radius_2)| radius_2)
            .ok_or(GeometryError::DegenerateTriangle)
    }

    pub fn area(&self) -> S {
        math::triangle_area(self.vertices)
    }

    pub fn centroid(&self) -> Point2<S> {
        let [a, b, c] = self.vertices;
        let three = S::one() + S::one() + S::one();
        a.add(b).add(c).mul(S::one() / three)
    }

    /// Returns `true` if the corners are ordered clockwise.
    pub fn is_clockwise(&self) -> bool {
        let [a, b, c] = self.vertices;
        math::side_query(a, b, c).is_on_right_side()
    }

    /// Returns `true` if the corners are collinear.
    pub fn is_degenerate(&self) -> bool {
        let [a, b, c] = self.vertices;
        math::side_query(a, b, c).is_on_line()
    }

    /// Returns `true` if `point` lies inside the triangle or on its border. The corners
    /// may be ordered either way.
    pub fn contains_point(&self, point: Point2<S>) -> bool {
        let [a, b, c] = self.vertices;
        let ccw = if self.is_clockwise() { [a, c, b] } else { [a, b, c] };
        math::is_inside_or_on_triangle(ccw, point)
    }
}

/// A simple polygon given by its corners in order.
///
/// Voronoi regions are returned as convex polygons ordered counter clockwise.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde")
)]
pub struct Polygon2<S> {
    vertices: Vec<Point2<S>>,
}

impl<S> Polygon2<S> {
    pub fn new(vertices: Vec<Point2<S>>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Point2<S>] {
        &self.vertices
    }

    pub fn into_vertices(self) -> Vec<Point2<S>> {
        self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn push(&mut self, vertex: Point2<S>) {
        self.vertices.push(vertex);
    }
}

impl<S> FromIterator<Point2<S>> for Polygon2<S> {
    fn from_iter<T: IntoIterator<Item = Point2<S>>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<S: CoordNum> Polygon2<S> {
    /// Iterates over all edges, including the closing edge from the last to the first
    /// vertex.
    pub fn edges(&self) -> impl Iterator<Item = (Point2<S>, Point2<S>)> + '_ {
        let len = self.vertices.len();
        (0..len).map(move |i| (self.vertices[i], self.vertices[(i + 1) % len]))
    }

    /// Returns the signed area. The result is positive for counter clockwise polygons.
    pub fn signed_area(&self) -> S {
        let twice_area = self
            .edges()
            .fold(S::zero(), |acc, (from, to)| acc + (from.x * to.y - to.x * from.y));
        twice_area * <S as From<f32>>::from(0.5)
    }

    pub fn area(&self) -> S {
        self.signed_area().abs()
    }

    pub fn is_clockwise(&self) -> bool {
        self.signed_area() < S::zero()
    }

    /// Returns the area centroid, or `None` for polygons without area.
    pub fn centroid(&self) -> Option<Point2<S>> {
        let area = self.signed_area();
        if area == S::zero() {
            return None;
        }
        let (cx, cy) = self.edges().fold((S::zero(), S::zero()), |(cx, cy), (from, to)| {
            let cross = from.x * to.y - to.x * from.y;
            (cx + (from.x + to.x) * cross, cy + (from.y + to.y) * cross)
        });
        let factor = <S as From<f32>>::from(6.0) * area;
        Some(Point2::new(cx / factor, cy / factor))
    }

    /// Returns `true` if the polygon has at least three corners and never turns in the
    /// opposite direction. Collinear consecutive corners are tolerated.
    pub fn is_convex(&self) -> bool {
        let len = self.vertices.len();
        if len < 3 {
            return false;
        }
        let mut has_left_turn = false;
        let mut has_right_turn = false;
        for i in 0..len {
            let side = math::side_query(
                self.vertices[i],
                self.vertices[(i + 1) % len],
                self.vertices[(i + 2) % len],
            );
            has_left_turn |= side.is_on_left_side();
            has_right_turn |= side.is_on_right_side();
        }
        !(has_left_turn && has_right_turn)
    }

    /// Returns `true` if `point` lies inside the polygon (even-odd rule).
    pub fn contains_point(&self, point: Point2<S>) -> bool {
        let mut inside = false;
        for (from, to) in self.edges() {
            if (from.y > point.y) != (to.y > point.y) {
                let x = from.x + (point.y - from.y) / (to.y - from.y) * (to.x - from.x);
                if point.x < x {
                    inside = !inside;
                }
            }
        }
        inside
    }
}

#[cfg(test)]
mod test {
    use super::{Polygon2, Triangle2};
    use crate::{GeometryError, Point2};
    use approx::assert_relative_eq;

    fn unit_square() -> Polygon2<f64> {
        Polygon2::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ])
    }

    #[test]
    fn test_triangle_equality_ignores_order() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(10.0, 0.0);
        let c = Point2::new(5.0, 10.0);
        assert_eq!(Triangle2::new(a, b, c), Triangle2::new(c, a, b));
        assert_eq!(Triangle2::new(a, b, c), Triangle2::new(b, a, c));
        assert_ne!(
            Triangle2::new(a, b, c),
            Triangle2::new(a, b, Point2::new(5.0, 11.0))
        );
    }

    #[test]
    fn test_triangle_equality_counts_repeated_corners() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(10.0, 0.0);
        let c = Point2::new(5.0, 10.0);
        assert_ne!(Triangle2::new(a, a, b), Triangle2::new(a, b, b));
        assert_ne!(Triangle2::new(a, b, b), Triangle2::new(a, a, b));
        assert_ne!(Triangle2::new(a, a, b), Triangle2::new(a, b, c));
        assert_eq!(Triangle2::new(a, a, b), Triangle2::new(a, b, a));
        assert_eq!(Triangle2::new(b, a, a), Triangle2::new(a, b, a));
    }

    #[test]
    fn test_triangle_circumcenter() {
        let triangle = Triangle2::new(
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(5.0, 10.0),
        );
        let center = triangle.circumcenter().unwrap();
        assert_relative_eq!(center.x, 5.0);
        assert_relative_eq!(center.y, 3.75);
        assert_relative_eq!(triangle.circumradius_2().unwrap(), 39.0625);
    }

    #[test]
    fn test_collinear_triangle() {
        let triangle = Triangle2::new(
            Point2::new(0.0, 0.0),
            Point2::new(5.0, 0.0),
            Point2::new(10.0, 0.0),
        );
        assert!(triangle.is_degenerate());
        assert_eq!(triangle.circumcenter(), Err(GeometryError::DegenerateTriangle));
        assert_eq!(triangle.area(), 0.0);
    }

    #[test]
    fn test_triangle_contains_point() {
        let cw = Triangle2::new(
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 4.0),
            Point2::new(4.0, 0.0),
        );
        assert!(cw.is_clockwise());
        assert!(cw.contains_point(Point2::new(1.0, 1.0)));
        assert!(cw.contains_point(Point2::new(2.0, 0.0)));
        assert!(!cw.contains_point(Point2::new(3.0, 3.0)));
        let centroid = cw.centroid();
        assert_relative_eq!(centroid.x, 4.0 / 3.0);
        assert_relative_eq!(centroid.y, 4.0 / 3.0);
    }

    #[test]
    fn test_polygon_area_and_centroid() {
        let square = unit_square();
        assert_relative_eq!(square.signed_area(), 1.0);
        assert!(!square.is_clockwise());
        let centroid = square.centroid().unwrap();
        assert_relative_eq!(centroid.x, 0.5);
        assert_relative_eq!(centroid.y, 0.5);

        let reversed: Polygon2<f64> = square.vertices().iter().rev().copied().collect();
        assert_relative_eq!(reversed.signed_area(), -1.0);
        assert!(reversed.is_clockwise());
        assert_relative_eq!(reversed.area(), 1.0);
    }

    #[test]
    fn test_polygon_convexity() {
        assert!(unit_square().is_convex());

        let dented = Polygon2::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(1.0, 0.5),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ]);
        assert!(!dented.is_convex());
        assert!(!Polygon2::new(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)]).is_convex());
    }

    #[test]
    fn test_polygon_contains_point() {
        let square = unit_square();
        assert!(square.contains_point(Point2::new(0.5, 0.5)));
        assert!(!square.contains_point(Point2::new(1.5, 0.5)));
        assert!(!square.contains_point(Point2::new(0.5, -0.5)));
        assert_eq!(square.edges().count(), 4);
    }
}
