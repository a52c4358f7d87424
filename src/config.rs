use crate::{CoordNum, Point2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The default half extent of the bounding super-triangle.
pub const DEFAULT_SIZE: f32 = 10000.0;

/// Construction parameters of a [DelaunayTriangulation](crate::DelaunayTriangulation) or
/// [Voronoi](crate::Voronoi) diagram.
///
/// # Example
/// ```
/// use mesh2d::{TriangulationConfig, Voronoi};
///
/// let config = TriangulationConfig::default()
///     .with_bounding_size(500.0)
///     .with_duplicate_tolerance(1.0e-6);
/// let voronoi: Voronoi<f64> = Voronoi::with_config(&config)?;
/// assert!(voronoi.sites().is_empty());
/// # Ok::<(), mesh2d::GeometryError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde")
)]
pub struct TriangulationConfig<S> {
    /// Half extent of the super-triangle. Its corners are placed at `(-size, -size)`,
    /// `(size, -size)` and `(0, size)`.
    ///
    /// Every site must lie strictly inside that triangle. Sites close to its border
    /// produce Voronoi regions that are distorted by the super-triangle's corners, so the
    /// size should be chosen generously.
    pub bounding_size: S,

    /// Maximum distance at which a new point is considered a duplicate of an existing
    /// vertex. A value of zero only treats bit-identical positions as duplicates.
    ///
    /// Must be finite and not negative, otherwise construction fails with
    /// [GeometryError::InvalidInput](crate::GeometryError::InvalidInput).
    pub duplicate_tolerance: S,
}

impl<S: CoordNum> Default for TriangulationConfig<S> {
    fn default() -> Self {
        Self {
            bounding_size: <S as From<f32>>::from(DEFAULT_SIZE),
            duplicate_tolerance: S::zero(),
        }
    }
}

impl<S: CoordNum> TriangulationConfig<S> {
    pub fn with_bounding_size(mut self, bounding_size: S) -> Self {
        self.bounding_size = bounding_size;
        self
    }

    pub fn with_duplicate_tolerance(mut self, duplicate_tolerance: S) -> Self {
        self.duplicate_tolerance = duplicate_tolerance;
        self
    }

    /// Returns the super-triangle's corners in counter clockwise order.
    pub fn super_triangle(&self) -> [Point2<S>; 3] {
        let size = self.bounding_size;
        [
            Point2::new(-size, -size),
            Point2::new(size, -size),
            Point2::new(S::zero(), size),
        ]
    }
}
