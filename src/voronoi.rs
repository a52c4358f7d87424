use hashbrown::{HashMap, HashSet};

use crate::delaunay_core::{
    FixedTriangleHandle, FixedVertexHandle, InsertionObserver, SUPER_VERTICES,
};
use crate::{
    CoordNum, DelaunayTriangulation, GeometryError, InsertionOutcome, Point2, Polygon2,
    Triangle2, TriangulationConfig,
};

/// A Voronoi diagram built on top of an incremental [DelaunayTriangulation].
///
/// Sites are added one by one. The Voronoi region of a site is the polygon formed by the
/// circumcenters of all triangles around it. Since the triangulation is bounded by a
/// super-triangle, every region is a closed polygon. Regions of sites close to the
/// super-triangle's border are distorted by its corners.
///
/// # Example
/// ```
/// use mesh2d::{Point2, Voronoi};
///
/// let mut voronoi = Voronoi::new();
/// voronoi.add_points([
///     Point2::new(0.0, 0.0),
///     Point2::new(10.0, 0.0),
///     Point2::new(5.0, 10.0),
/// ])?;
///
/// let regions = voronoi.regions()?;
/// assert_eq!(regions.len(), 3);
/// for region in &regions {
///     assert!(region.len() >= 3);
/// }
/// # Ok::<(), mesh2d::GeometryError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Voronoi<S, O = ()> {
    triangulation: DelaunayTriangulation<S, O>,
    sites: Vec<Point2<S>>,
    site_vertices: Vec<FixedVertexHandle>,
}

impl<S: CoordNum> Default for Voronoi<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: CoordNum> Voronoi<S> {
    /// Creates an empty diagram bounded by a super-triangle of size
    /// [DEFAULT_SIZE](crate::DEFAULT_SIZE).
    pub fn new() -> Self {
        let config = TriangulationConfig::default();
        Self::from_triangulation(DelaunayTriangulation::from_ccw_corners(
            config.super_triangle(),
            config.duplicate_tolerance,
            (),
        ))
    }

    /// Creates an empty diagram whose super-triangle has the given half extent.
    ///
    /// Fails if `size` is not a positive, valid coordinate.
    pub fn with_size(size: S) -> Result<Self, GeometryError> {
        Self::with_config(&TriangulationConfig::default().with_bounding_size(size))
    }

    pub fn with_config(config: &TriangulationConfig<S>) -> Result<Self, GeometryError> {
        DelaunayTriangulation::with_config(config).map(Self::from_triangulation)
    }
}

impl<S: CoordNum, O: InsertionObserver<S>> Voronoi<S, O> {
    fn from_triangulation(triangulation: DelaunayTriangulation<S, O>) -> Self {
        Self {
            triangulation,
            sites: Vec::new(),
            site_vertices: Vec::new(),
        }
    }

    /// Replaces the observer that is notified about every insertion.
    pub fn with_observer<O2: InsertionObserver<S>>(self, observer: O2) -> Voronoi<S, O2> {
        Voronoi {
            triangulation: self.triangulation.with_observer(observer),
            sites: self.sites,
            site_vertices: self.site_vertices,
        }
    }

    /// Adds a new site.
    ///
    /// The site is only recorded if a new vertex was created. Duplicates and failed
    /// insertions leave the list of sites unchanged. See
    /// [DelaunayTriangulation::insert] for possible errors.
    pub fn add_point(&mut self, site: Point2<S>) -> Result<InsertionOutcome, GeometryError> {
        let outcome = self.triangulation.insert(site)?;
        if let InsertionOutcome::Inserted(vertex) = outcome {
            self.sites.push(site);
            self.site_vertices.push(vertex);
        }
        Ok(outcome)
    }

    /// Adds several sites in order.
    ///
    /// Stops at the first error. Sites added before the failing one are kept.
    pub fn add_points<I>(&mut self, sites: I) -> Result<(), GeometryError>
    where
        I: IntoIterator<Item = Point2<S>>,
    {
        for site in sites {
            self.add_point(site)?;
        }
        Ok(())
    }

    /// Returns all sites in insertion order.
    pub fn sites(&self) -> &[Point2<S>] {
        &self.sites
    }

    pub fn triangulation(&self) -> &DelaunayTriangulation<S, O> {
        &self.triangulation
    }

    /// Returns every triangle of the underlying triangulation, including those touching
    /// the super-triangle's corners.
    pub fn triangles(&self) -> Vec<Triangle2<S>> {
        self.triangulation
            .triangles()
            .map(|triangle| triangle.to_triangle())
            .collect()
    }

    /// Returns all triangles spanned by sites only.
    pub fn real_triangles(&self) -> Vec<Triangle2<S>> {
        self.triangulation
            .real_triangles()
            .map(|triangle| triangle.to_triangle())
            .collect()
    }

    /// Returns the Voronoi region of every site, in the same order as [sites](Self::sites).
    ///
    /// Each region lists the circumcenters of the triangles around its site in counter
    /// clockwise order. Circumcenters of degenerate triangles are left out.
    ///
    /// Fails with [GeometryError::InternalInvariant] if the triangulation around a site is
    /// broken. No region is returned in that case.
    pub fn regions(&self) -> Result<Vec<Polygon2<S>>, GeometryError> {
        let incident = self.incident_triangles();
        self.site_vertices
            .iter()
            .map(|vertex| self.region_around(*vertex, incident.get(vertex).copied()))
            .collect()
    }

    /// Returns every site together with its Voronoi region.
    pub fn regions_with_sites(&self) -> Result<Vec<(Point2<S>, Polygon2<S>)>, GeometryError> {
        Ok(self.sites.iter().copied().zip(self.regions()?).collect())
    }

    /// Returns the Voronoi region of a single site, or `None` if `site_index` is out of
    /// range.
    pub fn region(&self, site_index: usize) -> Result<Option<Polygon2<S>>, GeometryError> {
        let Some(vertex) = self.site_vertices.get(site_index).copied() else {
            return Ok(None);
        };
        let start = self.triangulation.incident_triangle(vertex);
        self.region_around(vertex, start).map(Some)
    }

    /// Finds one incident triangle for every site in a single pass over all triangles.
    fn incident_triangles(&self) -> HashMap<FixedVertexHandle, FixedTriangleHandle> {
        let mut done: HashSet<FixedVertexHandle> = SUPER_VERTICES.into_iter().collect();
        let mut incident = HashMap::with_capacity(self.site_vertices.len());
        for triangle in self.triangulation.triangles() {
            for vertex in triangle.vertices() {
                if done.insert(vertex) {
                    incident.insert(vertex, triangle.fix());
                }
            }
        }
        incident
    }

    fn region_around(
        &self,
        vertex: FixedVertexHandle,
        start: Option<FixedTriangleHandle>,
    ) -> Result<Polygon2<S>, GeometryError> {
        let start = start.ok_or(GeometryError::InternalInvariant(
            "site has no incident triangle",
        ))?;
        let fan = self.triangulation.surrounding_triangles(vertex, start)?;
        let mut region = Polygon2::default();
        for handle in fan.triangles() {
            let triangle = self.triangulation.triangle(*handle).ok_or(
                GeometryError::InternalInvariant("fan references a missing triangle"),
            )?;
            if let Ok(center) = triangle.circumcenter() {
                region.push(center);
            }
        }
        Ok(region)
    }
}

#[cfg(test)]
mod test {
    use super::Voronoi;
    use crate::delaunay_core::insertion_observer::RecordingObserver;
    use crate::test_utilities::{random_points_in_range, random_points_with_seed, SEED, SEED2};
    use crate::{
        GeometryError, InsertionOutcome, Point2, Polygon2, Triangle2, TriangulationConfig,
    };
    use approx::assert_relative_eq;

    fn check_regions(voronoi: &Voronoi<f64>) {
        let regions = voronoi.regions().unwrap();
        assert_eq!(regions.len(), voronoi.sites().len());
        for (site, region) in voronoi.sites().iter().zip(&regions) {
            assert!(region.len() >= 3);
            assert!(region.is_convex());
            assert!(!region.is_clockwise());
            assert!(region.contains_point(*site));
        }
    }

    #[test]
    fn test_empty() {
        let voronoi = Voronoi::<f64>::new();
        assert!(voronoi.sites().is_empty());
        assert_eq!(voronoi.regions(), Ok(Vec::new()));
        assert_eq!(voronoi.triangles().len(), 1);
        assert!(voronoi.real_triangles().is_empty());
        assert_eq!(voronoi.region(0), Ok(None));
    }

    #[test]
    fn test_triangle_sites() -> Result<(), GeometryError> {
        let points = [
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(5.0, 10.0),
        ];
        let mut voronoi = Voronoi::new();
        voronoi.add_points(points)?;

        assert_eq!(voronoi.sites(), &points);
        assert_eq!(
            voronoi.real_triangles(),
            vec![Triangle2::new(points[0], points[1], points[2])]
        );
        check_regions(&voronoi);

        // Every region contains the circumcenter of the single real triangle.
        let regions = voronoi.regions()?;
        for region in &regions {
            let center = region
                .vertices()
                .iter()
                .find(|p| (p.x - 5.0).abs() < 1e-9 && (p.y - 3.75).abs() < 1e-9);
            assert!(center.is_some());
        }
        Ok(())
    }

    #[test]
    fn test_square_with_center() -> Result<(), GeometryError> {
        let mut voronoi = Voronoi::new();
        voronoi.add_points([
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ])?;
        assert_eq!(voronoi.real_triangles().len(), 2);

        voronoi.add_point(Point2::new(5.0, 5.0))?;
        assert_eq!(voronoi.real_triangles().len(), 4);
        check_regions(&voronoi);

        // The center's region is the square spanned by the four triangles' circumcenters.
        let center_region = voronoi.region(4)?.unwrap();
        assert_eq!(center_region.len(), 4);
        assert_relative_eq!(center_region.area(), 50.0, epsilon = 1e-9);
        let centroid = center_region.centroid().unwrap();
        assert_relative_eq!(centroid.x, 5.0, epsilon = 1e-9);
        assert_relative_eq!(centroid.y, 5.0, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_duplicate_site() -> Result<(), GeometryError> {
        let mut voronoi = Voronoi::new();
        let first = voronoi.add_point(Point2::new(1.0, 2.0))?;
        voronoi.add_point(Point2::new(4.0, -2.0))?;
        let triangles = voronoi.triangles();

        let outcome = voronoi.add_point(Point2::new(1.0, 2.0))?;
        assert_eq!(outcome, InsertionOutcome::Duplicate(first.vertex()));
        assert_eq!(voronoi.sites().len(), 2);
        assert_eq!(voronoi.regions()?.len(), 2);
        assert_eq!(voronoi.triangles(), triangles);
        check_regions(&voronoi);
        Ok(())
    }

    #[test]
    fn test_collinear_sites() -> Result<(), GeometryError> {
        let mut voronoi = Voronoi::new();
        voronoi.add_points([
            Point2::new(0.0, 0.0),
            Point2::new(5.0, 0.0),
            Point2::new(10.0, 0.0),
        ])?;

        assert!(voronoi.real_triangles().is_empty());
        let degenerate = Triangle2::new(
            Point2::new(0.0, 0.0),
            Point2::new(5.0, 0.0),
            Point2::new(10.0, 0.0),
        );
        assert_eq!(
            degenerate.circumcenter(),
            Err(GeometryError::DegenerateTriangle)
        );

        let regions = voronoi.regions()?;
        assert_eq!(regions.len(), 3);
        assert!(regions.iter().all(|region| region.len() >= 3));
        Ok(())
    }

    #[test]
    fn test_random_sites() -> Result<(), GeometryError> {
        let points = random_points_in_range(1000.0, 50, SEED);
        let mut voronoi = Voronoi::new();
        voronoi.add_points(points.iter().copied())?;
        assert_eq!(voronoi.sites(), points.as_slice());
        voronoi.triangulation().sanity_check();
        check_regions(&voronoi);

        // Regions do not overlap, so no region may contain another site.
        let regions = voronoi.regions()?;
        for (index, region) in regions.iter().enumerate() {
            for (other, site) in voronoi.sites().iter().enumerate() {
                if other != index {
                    assert!(!region.contains_point(*site));
                }
            }
        }
        Ok(())
    }

    #[test]
    fn test_queries_are_idempotent() -> Result<(), GeometryError> {
        let mut voronoi = Voronoi::new();
        voronoi.add_points(random_points_with_seed(30, SEED2))?;
        assert_eq!(voronoi.triangles(), voronoi.triangles());
        assert_eq!(voronoi.regions(), voronoi.regions());

        let with_sites = voronoi.regions_with_sites()?;
        for (index, (site, region)) in with_sites.iter().enumerate() {
            assert_eq!(*site, voronoi.sites()[index]);
            assert_eq!(Some(region.clone()), voronoi.region(index)?);
        }
        assert_eq!(voronoi.region(with_sites.len()), Ok(None));
        Ok(())
    }

    #[test]
    fn test_errors_propagate() -> Result<(), GeometryError> {
        let mut voronoi = Voronoi::with_size(100.0)?;
        voronoi.add_point(Point2::new(0.0, 0.0))?;

        assert_eq!(
            voronoi.add_point(Point2::new(0.0, 200.0)),
            Err(GeometryError::OutsideBounds)
        );
        assert!(matches!(
            voronoi.add_point(Point2::new(f64::NAN, 0.0)),
            Err(GeometryError::InvalidCoordinate { .. })
        ));

        let result = voronoi.add_points([
            Point2::new(1.0, 1.0),
            Point2::new(500.0, 0.0),
            Point2::new(2.0, 2.0),
        ]);
        assert_eq!(result, Err(GeometryError::OutsideBounds));
        assert_eq!(
            voronoi.sites(),
            &[Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)]
        );
        voronoi.triangulation().sanity_check();
        Ok(())
    }

    #[test]
    fn test_invalid_size() {
        assert_eq!(
            Voronoi::<f64>::with_size(0.0).err(),
            Some(GeometryError::DegenerateTriangle)
        );
        assert!(Voronoi::<f64>::with_size(f64::NAN).is_err());
    }

    #[test]
    fn test_with_observer() -> Result<(), GeometryError> {
        let mut voronoi = Voronoi::<f64>::new().with_observer(RecordingObserver::default());
        voronoi.add_point(Point2::new(1.0, 1.0))?;
        voronoi.add_point(Point2::new(1.0, 1.0))?;
        assert_eq!(voronoi.sites().len(), 1);
        assert_eq!(
            voronoi.triangulation().observer().events,
            vec!["inserted 3 -1 +3".to_string(), "duplicate 3".to_string()]
        );
        Ok(())
    }

    #[test]
    fn test_f32_regions() -> Result<(), GeometryError> {
        let mut voronoi = Voronoi::<f32>::with_size(100.0)?;
        voronoi.add_points([
            Point2::new(0.0f32, 0.0),
            Point2::new(3.0, 1.0),
            Point2::new(-2.0, 4.0),
            Point2::new(1.0, -3.0),
        ])?;
        let regions: Vec<Polygon2<f32>> = voronoi.regions()?;
        assert_eq!(regions.len(), 4);
        assert!(regions.iter().all(|region| region.len() >= 3));
        Ok(())
    }

    #[test]
    fn test_region_errors_are_returned() -> Result<(), GeometryError> {
        let mut voronoi = Voronoi::new();
        voronoi.add_points([
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(5.0, 10.0),
        ])?;
        let vertex = voronoi.site_vertices[0];
        let foreign = voronoi
            .triangulation()
            .triangles()
            .find(|triangle| !triangle.contains_vertex(vertex))
            .map(|triangle| triangle.fix());
        assert!(foreign.is_some());

        assert!(matches!(
            voronoi.region_around(vertex, foreign),
            Err(GeometryError::InvalidInput(_))
        ));
        assert!(matches!(
            voronoi.region_around(vertex, None),
            Err(GeometryError::InternalInvariant(_))
        ));
        Ok(())
    }

    #[test]
    fn test_tiny_duplicate_tolerance() -> Result<(), GeometryError> {
        let config = TriangulationConfig::default().with_duplicate_tolerance(1e-300);
        let mut voronoi = Voronoi::with_config(&config)?;
        assert!(voronoi.add_point(Point2::new(1.0, 1.0))?.is_inserted());
        assert!(voronoi.add_point(Point2::new(2.0, 1.0))?.is_inserted());
        assert!(!voronoi.add_point(Point2::new(1.0, 1.0))?.is_inserted());
        assert_eq!(voronoi.sites().len(), 2);
        check_regions(&voronoi);
        Ok(())
    }

    #[test]
    fn test_invalid_duplicate_tolerance() {
        let config = TriangulationConfig::default().with_duplicate_tolerance(f64::INFINITY);
        assert!(matches!(
            Voronoi::with_config(&config).err(),
            Some(GeometryError::InvalidInput(_))
        ));
    }
}
