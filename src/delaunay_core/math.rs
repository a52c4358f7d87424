use thiserror::Error;

use super::LineSideInfo;
use crate::{CoordNum, Point2};

/// The reason a coordinate was rejected by [validate_coordinate].
#[derive(Copy, Clone, PartialOrd, Ord, PartialEq, Eq, Debug, Hash, Error)]
pub enum CoordinateError {
    /// A coordinate value was too small.
    ///
    /// The absolute value of any inserted vertex coordinate must either be zero or
    /// greater than or equal to [MIN_ALLOWED_VALUE].
    #[error("coordinate is too small")]
    TooSmall,

    /// A coordinate value was too large or not finite.
    ///
    /// The absolute value of any inserted vertex coordinate must be less than or equal to
    /// [MAX_ALLOWED_VALUE].
    #[error("coordinate is too large")]
    TooLarge,

    /// A coordinate value was NaN.
    #[error("coordinate is NaN")]
    NAN,
}

/// The error type of all fallible triangulation and Voronoi operations.
///
/// Any error returned by [insert](crate::DelaunayTriangulation::insert) is raised before
/// the triangulation is modified: a failed insertion leaves the triangulation exactly as
/// it was.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, Error)]
pub enum GeometryError {
    /// A point coordinate cannot be used for geometric predicates.
    #[error("invalid coordinate: {reason}")]
    InvalidCoordinate {
        /// Why the coordinate was rejected.
        reason: CoordinateError,
    },

    /// The point does not lie strictly inside the bounding super-triangle.
    #[error("point lies outside of the bounding triangle")]
    OutsideBounds,

    /// Three points are collinear and do not span a triangle, or the triangle's
    /// circumcenter cannot be represented.
    #[error("degenerate triangle: points are collinear")]
    DegenerateTriangle,

    /// A handle or vertex given by the caller does not fit the triangulation.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// An internal consistency check failed. This is a bug.
    #[error("internal invariant violated: {0}")]
    InternalInvariant(&'static str),
}

impl From<CoordinateError> for GeometryError {
    fn from(reason: CoordinateError) -> Self {
        GeometryError::InvalidCoordinate { reason }
    }
}

/// The smallest allowed coordinate value greater than zero. This value is equal to
/// 2<sup>-142</sup>.
///
/// Smaller non-zero values can underflow while evaluating the orientation and
/// circumcircle predicates.
pub const MIN_ALLOWED_VALUE: f64 = 1.793662034335766e-43; // 1.0 * 2^-142

/// The largest allowed coordinate value. This value is equal to 2<sup>201</sup>.
pub const MAX_ALLOWED_VALUE: f64 = 3.2138760885179806e60; // 1.0 * 2^201

/// Checks if a coordinate value is suitable for insertion into a triangulation.
///
/// Passing in any non-finite number (e.g. `f32::NEG_INFINITY`) will result in
/// `Err(CoordinateError::TooLarge)`.
pub fn validate_coordinate<S: CoordNum>(value: S) -> Result<(), CoordinateError> {
    let as_f64: f64 = value.into();
    if as_f64.is_nan() {
        Err(CoordinateError::NAN)
    } else if as_f64.abs() < MIN_ALLOWED_VALUE && as_f64 != 0.0 {
        Err(CoordinateError::TooSmall)
    } else if as_f64.abs() > MAX_ALLOWED_VALUE {
        Err(CoordinateError::TooLarge)
    } else {
        Ok(())
    }
}

/// Checks both coordinates of a point, see [validate_coordinate].
pub fn validate_point<S: CoordNum>(point: Point2<S>) -> Result<(), CoordinateError> {
    validate_coordinate(point.x)?;
    validate_coordinate(point.y)?;
    Ok(())
}

fn to_robust_coord<S: CoordNum>(point: Point2<S>) -> robust::Coord<f64> {
    let point = point.to_f64();
    robust::Coord {
        x: point.x,
        y: point.y,
    }
}

/// Returns `true` if `p` lies strictly inside the circumcircle of `v1`, `v2` and `v3`.
///
/// The triangle must be ordered counter clockwise. Points exactly on the circle are
/// not contained.
pub fn contained_in_circumference<S>(
    v1: Point2<S>,
    v2: Point2<S>,
    v3: Point2<S>,
    p: Point2<S>,
) -> bool
where
    S: CoordNum,
{
    let v1 = to_robust_coord(v1);
    let v2 = to_robust_coord(v2);
    let v3 = to_robust_coord(v3);
    let p = to_robust_coord(p);

    // incircle expects clockwise input for right handed systems.
    robust::incircle(v3, v2, v1, p) < 0.0
}

pub fn side_query<S>(p1: Point2<S>, p2: Point2<S>, query_point: Point2<S>) -> LineSideInfo
where
    S: CoordNum,
{
    let p1 = to_robust_coord(p1);
    let p2 = to_robust_coord(p2);
    let query_point = to_robust_coord(query_point);

    let result = robust::orient2d(p1, p2, query_point);
    LineSideInfo::from_determinant(result)
}

/// Returns `true` if the three points form a proper, counter clockwise triangle.
pub fn is_strictly_ccw<S>(p1: Point2<S>, p2: Point2<S>, p3: Point2<S>) -> bool
where
    S: CoordNum,
{
    side_query(p1, p2, p3).is_on_left_side()
}

/// Returns `true` if `query_point` lies strictly inside the counter clockwise triangle.
pub fn is_strictly_inside_triangle<S>(positions: [Point2<S>; 3], query_point: Point2<S>) -> bool
where
    S: CoordNum,
{
    let [v0, v1, v2] = positions;
    side_query(v0, v1, query_point).is_on_left_side()
        && side_query(v1, v2, query_point).is_on_left_side()
        && side_query(v2, v0, query_point).is_on_left_side()
}

/// Returns `true` if `query_point` lies inside or on the border of the counter clockwise
/// triangle.
pub fn is_inside_or_on_triangle<S>(positions: [Point2<S>; 3], query_point: Point2<S>) -> bool
where
    S: CoordNum,
{
    let [v0, v1, v2] = positions;
    side_query(v0, v1, query_point).is_on_left_side_or_on_line()
        && side_query(v1, v2, query_point).is_on_left_side_or_on_line()
        && side_query(v2, v0, query_point).is_on_left_side_or_on_line()
}

/// Calculates the circumcenter and the squared circumradius of a triangle.
///
/// Returns `None` if the points are collinear or the result is not finite.
pub fn circumcenter<S>(positions: [Point2<S>; 3]) -> Option<(Point2<S>, S)>
where
    S: CoordNum,
{
    let [v0, v1, v2] = positions;
    if side_query(v0, v1, v2).is_on_line() {
        return None;
    }

    let b = v1.sub(v0);
    let c = v2.sub(v0);

    let one = S::one();
    let two = one + one;
    let d = two * (b.x * c.y - c.x * b.y);
    if d == S::zero() {
        return None;
    }
    let len_b = b.dot(b);
    let len_c = c.dot(c);
    let d_inv: S = one / d;

    let x = (len_b * c.y - len_c * b.y) * d_inv;
    let y = (-len_b * c.x + len_c * b.x) * d_inv;
    let result = Point2::new(x, y).add(v0);
    let radius_2 = x * x + y * y;
    if result.is_finite() && radius_2.is_finite() {
        Some((result, radius_2))
    } else {
        None
    }
}

/// Returns twice the signed area of a triangle. The value is positive for counter
/// clockwise triangles.
pub fn signed_area_2<S>(positions: [Point2<S>; 3]) -> S
where
    S: CoordNum,
{
    let [v0, v1, v2] = positions;
    let b = v1.sub(v0);
    let c = v2.sub(v0);
    b.x * c.y - b.y * c.x
}

pub fn triangle_area<S>(positions: [Point2<S>; 3]) -> S
where
    S: CoordNum,
{
    let half = <S as From<f32>>::from(0.5);
    signed_area_2(positions).abs() * half
}

#[cfg(test)]
mod test {
    use super::{circumcenter, validate_coordinate, CoordinateError, GeometryError};
    use crate::Point2;
    use approx::assert_relative_eq;

    #[test]
    fn test_validate_coordinate() {
        use CoordinateError::*;
        assert_eq!(validate_coordinate(f64::NAN), Err(NAN));
        let max_value = super::MAX_ALLOWED_VALUE;

        assert_eq!(validate_coordinate(f64::INFINITY), Err(TooLarge));
        assert_eq!(validate_coordinate(f64::NEG_INFINITY), Err(TooLarge));
        assert_eq!(validate_coordinate(max_value * 2.0), Err(TooLarge));

        let min_value = super::MIN_ALLOWED_VALUE;
        assert_eq!(validate_coordinate(min_value / 2.0), Err(TooSmall));

        assert_eq!(validate_coordinate(f32::MIN_POSITIVE), Ok(()));
        assert_eq!(validate_coordinate(f32::MAX), Ok(()));
        assert_eq!(validate_coordinate(min_value), Ok(()));
        assert_eq!(validate_coordinate(0.0), Ok(()));
    }

    #[test]
    fn check_allowed_value_bounds() {
        let mut expected_min = 1.0f64;
        for _ in 0..142 {
            expected_min *= 0.5;
        }
        assert_eq!(super::MIN_ALLOWED_VALUE, expected_min);

        let mut expected_max = 1.0f64;
        for _ in 0..201 {
            expected_max *= 2.0;
        }
        assert_eq!(super::MAX_ALLOWED_VALUE, expected_max);
    }

    #[test]
    fn test_error_conversion() {
        let error: GeometryError = CoordinateError::NAN.into();
        assert_eq!(
            error,
            GeometryError::InvalidCoordinate {
                reason: CoordinateError::NAN
            }
        );
        assert_eq!(error.to_string(), "invalid coordinate: coordinate is NaN");
    }

    #[test]
    fn test_edge_side() {
        use super::side_query;

        let p1 = Point2::new(0.0, 0.0);
        let p2 = Point2::new(1.0, 1.0);

        assert!(side_query(p1, p2, Point2::new(1.0, 0.0)).is_on_right_side());
        assert!(side_query(p1, p2, Point2::new(0.0, 1.0)).is_on_left_side());
        assert!(side_query(p1, p2, Point2::new(0.5, 0.5)).is_on_line());
    }

    #[test]
    fn test_contained_in_circumference() {
        use super::contained_in_circumference;

        let (a1, a2, a3) = (3f64, 2f64, 1f64);
        let offset = Point2::new(0.5, 0.7);
        let v1 = Point2::new(a1.sin(), a1.cos()).mul(2.).add(offset);
        let v2 = Point2::new(a2.sin(), a2.cos()).mul(2.).add(offset);
        let v3 = Point2::new(a3.sin(), a3.cos()).mul(2.).add(offset);
        assert!(super::side_query(v1, v2, v3).is_on_left_side());
        assert!(contained_in_circumference(v1, v2, v3, offset));
        let shrunk = (v1.sub(offset)).mul(0.9).add(offset);
        assert!(contained_in_circumference(v1, v2, v3, shrunk));
        let expanded = (v1.sub(offset)).mul(1.1).add(offset);
        assert!(!contained_in_circumference(v1, v2, v3, expanded));
        assert!(!contained_in_circumference(
            v1,
            v2,
            v3,
            Point2::new(2.0 + offset.x, 2.0 + offset.y)
        ));
    }

    #[test]
    fn test_cocircular_point_is_not_contained() {
        use super::contained_in_circumference;

        let square = [
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
        ];
        let [a, b, c] = square;
        assert!(!contained_in_circumference(a, b, c, Point2::new(0.0, 10.0)));
    }

    #[test]
    fn test_circumcenter() {
        let (center, radius_2) = circumcenter([
            Point2::new(0.0f64, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(0.0, 10.0),
        ])
        .unwrap();
        assert_relative_eq!(center.x, 5.0);
        assert_relative_eq!(center.y, 5.0);
        assert_relative_eq!(radius_2, 50.0);
    }

    #[test]
    fn test_circumcenter_collinear() {
        assert_eq!(
            circumcenter([
                Point2::new(0.0f64, 0.0),
                Point2::new(5.0, 0.0),
                Point2::new(10.0, 0.0),
            ]),
            None
        );
    }

    #[test]
    fn test_inside_triangle() {
        use super::{is_inside_or_on_triangle, is_strictly_inside_triangle};

        let t = [
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(0.0, 4.0),
        ];
        assert!(is_strictly_inside_triangle(t, Point2::new(1.0, 1.0)));
        assert!(!is_strictly_inside_triangle(t, Point2::new(2.0, 0.0)));
        assert!(is_inside_or_on_triangle(t, Point2::new(2.0, 0.0)));
        assert!(!is_inside_or_on_triangle(t, Point2::new(3.0, 3.0)));
    }

    #[test]
    fn test_triangle_area() {
        use super::{signed_area_2, triangle_area};

        let ccw = [
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(0.0, 2.0),
        ];
        let cw = [ccw[0], ccw[2], ccw[1]];
        assert_eq!(signed_area_2(ccw), 8.0);
        assert_eq!(signed_area_2(cw), -8.0);
        assert_eq!(triangle_area(cw), 4.0);
    }
}
