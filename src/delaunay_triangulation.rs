use hashbrown::{HashMap, HashSet};
use smallvec::{smallvec, SmallVec};

use crate::delaunay_core::iterators::{FixedTriangleIterator, TriangleIterator, VertexFan};
use crate::delaunay_core::math::{self, GeometryError};
use crate::delaunay_core::{
    FixedTriangleHandle, FixedVertexHandle, InsertionObserver, TriangleArena, TriangleHandle,
    VertexLookup, SUPER_VERTICES,
};
use crate::{CoordNum, Point2, TriangulationConfig};

/// The result of a successful call to [DelaunayTriangulation::insert].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub enum InsertionOutcome {
    /// A new vertex was created.
    Inserted(FixedVertexHandle),

    /// A vertex at the same position already existed. The triangulation was not changed.
    Duplicate(FixedVertexHandle),
}

impl InsertionOutcome {
    /// Returns the handle of the new or already existing vertex.
    pub fn vertex(&self) -> FixedVertexHandle {
        match self {
            InsertionOutcome::Inserted(handle) | InsertionOutcome::Duplicate(handle) => *handle,
        }
    }

    pub fn is_inserted(&self) -> bool {
        matches!(self, InsertionOutcome::Inserted(_))
    }
}

/// An edge of the polygonal hole left by removing all triangles in conflict with a new
/// vertex. The hole lies on the edge's left side.
#[derive(Clone, Copy, Debug)]
struct BoundaryEdge {
    from: FixedVertexHandle,
    to: FixedVertexHandle,
    /// The surviving triangle on the other side, if any.
    outside: Option<FixedTriangleHandle>,
}

#[derive(Debug, Default)]
struct Cavity {
    triangles: SmallVec<[FixedTriangleHandle; 16]>,
    boundary: SmallVec<[BoundaryEdge; 16]>,
}

fn invariant_violation(message: &'static str) -> GeometryError {
    debug_assert!(false, "{}", message);
    GeometryError::InternalInvariant(message)
}

/// A two dimensional [Delaunay triangulation](https://en.wikipedia.org/wiki/Delaunay_triangulation)
/// built by incremental insertion into a bounding *super-triangle*.
///
/// The triangulation starts out with a single triangle whose corners are not real
/// sites. Every inserted point must lie strictly inside this triangle. After each
/// insertion, no vertex lies strictly inside the circumcircle of any triangle (the
/// *Delaunay property*).
///
/// Insertion follows the Bowyer-Watson scheme: all triangles whose circumcircle contains
/// the new point are removed and the resulting hole is re-triangulated by connecting its
/// border to the new point. Conflicting triangles are found by scanning every triangle,
/// so a single insertion takes time linear in the size of the triangulation.
///
/// # Example
/// ```
/// use mesh2d::{DelaunayTriangulation, Point2};
///
/// let mut triangulation = DelaunayTriangulation::new([
///     Point2::new(-100.0, -100.0),
///     Point2::new(100.0, -100.0),
///     Point2::new(0.0, 100.0),
/// ])?;
///
/// triangulation.insert(Point2::new(0.0, 0.0))?;
/// triangulation.insert(Point2::new(10.0, 0.0))?;
///
/// assert_eq!(triangulation.num_sites(), 2);
/// // Two sites inside a triangle always yield five triangles.
/// assert_eq!(triangulation.num_triangles(), 5);
/// # Ok::<(), mesh2d::GeometryError>(())
/// ```
///
/// # Type parameters
///  * `S: CoordNum` The coordinate type, usually `f64` or `f32`.
///  * `O: InsertionObserver<S>` Receives diagnostics about insertions. Defaults to `()`,
///    which ignores them.
#[derive(Clone, Debug)]
pub struct DelaunayTriangulation<S, O = ()> {
    arena: TriangleArena<S>,
    lookup: VertexLookup,
    observer: O,
}

impl<S: CoordNum> DelaunayTriangulation<S> {
    /// Creates a triangulation containing only the given bounding triangle.
    ///
    /// The corners may be given in either orientation. Every point inserted later must
    /// lie strictly inside this triangle.
    ///
    /// Fails if a corner coordinate is invalid or if the corners are collinear.
    pub fn new(super_triangle: [Point2<S>; 3]) -> Result<Self, GeometryError> {
        Self::new_with_observer(super_triangle, S::zero(), ())
    }

    /// Creates a triangulation from a [TriangulationConfig].
    pub fn with_config(config: &TriangulationConfig<S>) -> Result<Self, GeometryError> {
        Self::new_with_observer(config.super_triangle(), config.duplicate_tolerance, ())
    }
}

impl<S: CoordNum, O: InsertionObserver<S>> DelaunayTriangulation<S, O> {
    /// Creates a triangulation with a custom observer.
    ///
    /// Points closer than `duplicate_tolerance` to an existing vertex are treated as
    /// duplicates, see [insert](Self::insert).
    ///
    /// Fails with [GeometryError::InvalidInput] if the tolerance is negative, NaN or
    /// infinite.
    pub fn new_with_observer(
        super_triangle: [Point2<S>; 3],
        duplicate_tolerance: S,
        observer: O,
    ) -> Result<Self, GeometryError> {
        let tolerance: f64 = duplicate_tolerance.into();
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(GeometryError::InvalidInput(
                "duplicate tolerance must be finite and not negative",
            ));
        }
        let [a, b, c] = super_triangle;
        for corner in super_triangle {
            math::validate_point(corner)?;
        }
        let side = math::side_query(a, b, c);
        let corners = if side.is_on_line() {
            return Err(GeometryError::DegenerateTriangle);
        } else if side.is_on_right_side() {
            [a, c, b]
        } else {
            [a, b, c]
        };

        Ok(Self::from_ccw_corners(corners, duplicate_tolerance, observer))
    }

    /// Creates a triangulation from already validated, counter clockwise corners.
    pub(crate) fn from_ccw_corners(
        corners: [Point2<S>; 3],
        duplicate_tolerance: S,
        observer: O,
    ) -> Self {
        Self {
            arena: TriangleArena::with_super_triangle(corners),
            lookup: VertexLookup::new(duplicate_tolerance.into()),
            observer,
        }
    }

    /// Replaces the observer, keeping the triangulation.
    pub fn with_observer<O2: InsertionObserver<S>>(
        self,
        observer: O2,
    ) -> DelaunayTriangulation<S, O2> {
        DelaunayTriangulation {
            arena: self.arena,
            lookup: self.lookup,
            observer,
        }
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Inserts a new site and restores the Delaunay property.
    ///
    /// If a vertex already exists at `position` (or within the configured duplicate
    /// tolerance), nothing is changed and [InsertionOutcome::Duplicate] is returned.
    ///
    /// # Errors
    ///  * [GeometryError::InvalidCoordinate] if a coordinate is NaN, infinite or out of
    ///    range.
    ///  * [GeometryError::OutsideBounds] if the position does not lie strictly inside the
    ///    super-triangle.
    ///  * [GeometryError::DegenerateTriangle] if the new vertex would create a collinear
    ///    triangle.
    ///
    /// The triangulation is left unchanged whenever an error is returned.
    pub fn insert(&mut self, position: Point2<S>) -> Result<InsertionOutcome, GeometryError> {
        let result = self.insert_impl(position);
        match &result {
            Ok(InsertionOutcome::Duplicate(existing)) => {
                self.observer.notify_duplicate(*existing, position)
            }
            Ok(InsertionOutcome::Inserted(_)) => {}
            Err(error) => self.observer.notify_rejected(position, error),
        }
        result
    }

    fn insert_impl(&mut self, position: Point2<S>) -> Result<InsertionOutcome, GeometryError> {
        math::validate_point(position)?;

        if let Some(existing) = self.lookup.find(position, self.arena.vertices()) {
            return Ok(InsertionOutcome::Duplicate(existing));
        }

        if !math::is_strictly_inside_triangle(self.super_triangle(), position) {
            return Err(GeometryError::OutsideBounds);
        }

        let cavity = self.find_cavity(position)?;
        self.validate_cavity(&cavity, position)?;

        let removed = cavity.triangles.len();
        let created = cavity.boundary.len();
        let vertex = self.retriangulate(cavity, position);
        self.lookup.insert(position, vertex);

        self.observer
            .notify_vertex_inserted(vertex, position, removed, created);
        Ok(InsertionOutcome::Inserted(vertex))
    }

    /// Collects all triangles in conflict with `position` and the border of the hole they
    /// leave behind.
    ///
    /// Every triangle is tested. The cavity is the connected set of conflicting triangles
    /// around the triangle containing `position`.
    fn find_cavity(&self, position: Point2<S>) -> Result<Cavity, GeometryError> {
        let entries = self.arena.triangle_entries();

        let in_conflict: Vec<bool> = (0..entries.len())
            .map(|index| {
                let [v0, v1, v2] = self.arena.triangle_positions(FixedTriangleHandle::new(index));
                math::contained_in_circumference(v0, v1, v2, position)
            })
            .collect();

        let start = self
            .locate_fixed(position)
            .ok_or(GeometryError::OutsideBounds)?;
        if !in_conflict[start.index()] {
            return Err(invariant_violation(
                "the triangle containing a new vertex must conflict with it",
            ));
        }

        let mut cavity = Cavity::default();
        let mut members = HashSet::new();
        let mut stack: SmallVec<[FixedTriangleHandle; 16]> = smallvec![start];
        members.insert(start);
        while let Some(current) = stack.pop() {
            cavity.triangles.push(current);
            for neighbor in entries[current.index()].neighbors().into_iter().flatten() {
                if in_conflict[neighbor.index()] && members.insert(neighbor) {
                    stack.push(neighbor);
                }
            }
        }

        for triangle in &cavity.triangles {
            let entry = &entries[triangle.index()];
            let vertices = entry.vertices();
            for (i, neighbor) in entry.neighbors().into_iter().enumerate() {
                let is_border = match neighbor {
                    Some(neighbor) => !members.contains(&neighbor),
                    None => true,
                };
                if is_border {
                    cavity.boundary.push(BoundaryEdge {
                        from: vertices[(i + 1) % 3],
                        to: vertices[(i + 2) % 3],
                        outside: neighbor,
                    });
                }
            }
        }
        Ok(cavity)
    }

    /// Checks that the hole is a simple polygon that is star shaped with respect to the new
    /// vertex. Nothing has been modified at this point, so any failure leaves the
    /// triangulation intact.
    fn validate_cavity(&self, cavity: &Cavity, position: Point2<S>) -> Result<(), GeometryError> {
        let boundary = &cavity.boundary;
        if boundary.len() != cavity.triangles.len() + 2 {
            return Err(invariant_violation(
                "the cavity border does not match the number of removed triangles",
            ));
        }

        let mut successors = HashMap::with_capacity(boundary.len());
        for edge in boundary {
            if successors.insert(edge.from, edge.to).is_some() {
                return Err(invariant_violation("the cavity border is not a simple loop"));
            }
        }

        let first = boundary[0].from;
        let mut current = boundary[0].to;
        let mut steps = 1;
        while current != first {
            current = *successors
                .get(&current)
                .ok_or_else(|| invariant_violation("the cavity border is not closed"))?;
            steps += 1;
            if steps > boundary.len() {
                return Err(invariant_violation("the cavity border is not a simple loop"));
            }
        }
        if steps != boundary.len() {
            return Err(invariant_violation("the cavity border consists of several loops"));
        }

        for edge in boundary {
            let from = self.arena.vertices()[edge.from.index()];
            let to = self.arena.vertices()[edge.to.index()];
            if !math::is_strictly_ccw(from, to, position) {
                return Err(GeometryError::DegenerateTriangle);
            }
        }
        Ok(())
    }

    /// Replaces the cavity with a fan of triangles around the new vertex. The cavity must
    /// have passed [validate_cavity](Self::validate_cavity).
    fn retriangulate(&mut self, cavity: Cavity, position: Point2<S>) -> FixedVertexHandle {
        let vertex = self.arena.push_vertex(position);

        // The fan always has two more triangles than the cavity, so every removed slot is
        // reused and two slots are appended.
        let mut free_slots = cavity.triangles;
        free_slots.reverse();

        let mut created: SmallVec<[FixedTriangleHandle; 16]> = SmallVec::new();
        let mut by_from = HashMap::with_capacity(cavity.boundary.len());
        let mut by_to = HashMap::with_capacity(cavity.boundary.len());
        for edge in &cavity.boundary {
            let handle = self
                .arena
                .store_triangle(free_slots.pop(), [edge.from, edge.to, vertex]);
            created.push(handle);
            by_from.insert(edge.from, handle);
            by_to.insert(edge.to, handle);
        }
        debug_assert!(free_slots.is_empty());

        for (edge, handle) in cavity.boundary.iter().zip(&created) {
            let entry = self.arena.triangle_mut(*handle);
            // Opposite to `from` lies the edge (to, vertex), shared with the triangle
            // starting at `to`. Opposite to `to` lies (vertex, from), shared with the
            // triangle ending at `from`.
            entry.neighbors = [
                by_from.get(&edge.to).copied(),
                by_to.get(&edge.from).copied(),
                edge.outside,
            ];

            if let Some(outside) = edge.outside {
                let linked = self
                    .arena
                    .triangle_mut(outside)
                    .set_neighbor_across(edge.from, edge.to, Some(*handle));
                debug_assert!(linked);
            }
        }
        vertex
    }

    /// Returns the triangles around `vertex`, starting with `start` and continuing counter
    /// clockwise via neighbor links.
    ///
    /// For vertices inside the triangulation, the walk ends when it reaches `start` again
    /// and the returned fan is closed. The super-triangle's corners lie on the outer
    /// boundary; their fan is open and ordered counter clockwise from one boundary
    /// triangle to the other, with `start` somewhere in between.
    ///
    /// Fails with [GeometryError::InvalidInput] if either handle is out of range or if
    /// `start` does not contain `vertex`.
    pub fn surrounding_triangles(
        &self,
        vertex: FixedVertexHandle,
        start: FixedTriangleHandle,
    ) -> Result<VertexFan, GeometryError> {
        if vertex.index() >= self.arena.num_vertices() {
            return Err(GeometryError::InvalidInput("vertex handle out of range"));
        }
        let start_entry = self
            .arena
            .triangle(start)
            .ok_or(GeometryError::InvalidInput("triangle handle out of range"))?;
        if !start_entry.contains_vertex(vertex) {
            return Err(GeometryError::InvalidInput(
                "vertex is not a corner of the start triangle",
            ));
        }

        let entries = self.arena.triangle_entries();
        let limit = entries.len();
        // For a vertex at local index i, the counter clockwise next triangle lies opposite
        // to local index i + 1 and the clockwise next one opposite to i + 2.
        let step = |current: FixedTriangleHandle, offset: usize| {
            let entry = &entries[current.index()];
            let i = entry.index_of(vertex)?;
            entry.neighbor_opposite(entry.vertices()[(i + offset) % 3])
        };

        let mut triangles: SmallVec<[FixedTriangleHandle; 8]> = smallvec![start];
        let mut current = start;
        while let Some(next) = step(current, 1) {
            if next == start {
                return Ok(VertexFan {
                    vertex,
                    triangles,
                    is_closed: true,
                });
            }
            if triangles.len() >= limit {
                return Err(invariant_violation("triangle fan does not terminate"));
            }
            triangles.push(next);
            current = next;
        }

        let mut backwards: SmallVec<[FixedTriangleHandle; 8]> = SmallVec::new();
        current = start;
        while let Some(previous) = step(current, 2) {
            if triangles.len() + backwards.len() >= limit {
                return Err(invariant_violation("triangle fan does not terminate"));
            }
            backwards.push(previous);
            current = previous;
        }
        backwards.reverse();
        backwards.extend(triangles);

        Ok(VertexFan {
            vertex,
            triangles: backwards,
            is_closed: false,
        })
    }

    /// Returns the triangle sharing the edge `{a, b}` with `triangle`.
    ///
    /// Returns `None` if the edge lies on the outer boundary, if `{a, b}` is not an edge of
    /// `triangle` or if `triangle` is out of range.
    pub fn neighbor_across(
        &self,
        triangle: FixedTriangleHandle,
        a: FixedVertexHandle,
        b: FixedVertexHandle,
    ) -> Option<FixedTriangleHandle> {
        self.arena
            .triangle(triangle)
            .and_then(|entry| entry.neighbor_across(a, b))
    }

    fn locate_fixed(&self, position: Point2<S>) -> Option<FixedTriangleHandle> {
        self.fixed_triangles()
            .find(|t| math::is_inside_or_on_triangle(self.arena.triangle_positions(*t), position))
    }

    /// Returns a triangle containing `position`, including its border.
    ///
    /// Returns `None` if the position lies outside the super-triangle.
    pub fn locate(&self, position: Point2<S>) -> Option<TriangleHandle<S>> {
        self.locate_fixed(position)
            .map(|handle| TriangleHandle::new(&self.arena, handle))
    }

    /// Returns the vertex at `position`, honoring the duplicate tolerance.
    pub fn find_vertex(&self, position: Point2<S>) -> Option<FixedVertexHandle> {
        self.lookup.find(position, self.arena.vertices())
    }

    /// Returns any triangle containing `vertex`.
    pub fn incident_triangle(&self, vertex: FixedVertexHandle) -> Option<FixedTriangleHandle> {
        self.fixed_triangles()
            .find(|t| self.arena.triangle_entries()[t.index()].contains_vertex(vertex))
    }

    /// Returns the distance below which two positions are considered duplicates.
    pub fn duplicate_tolerance(&self) -> f64 {
        self.lookup.tolerance()
    }

    /// Returns the positions of the super-triangle's corners in counter clockwise order.
    pub fn super_triangle(&self) -> [Point2<S>; 3] {
        self.arena.positions_of(SUPER_VERTICES)
    }

    pub fn vertex_position(&self, vertex: FixedVertexHandle) -> Option<Point2<S>> {
        self.arena.vertex_position(vertex).copied()
    }

    /// Returns the positions of all vertices, including the super-triangle's corners,
    /// indexed by vertex handle.
    pub fn vertex_positions(&self) -> &[Point2<S>] {
        self.arena.vertices()
    }

    /// Returns all triangles in conflict with their neighbors, i.e. triangles whose
    /// circumcircle strictly contains the vertex opposite to a shared edge.
    ///
    /// The result is empty for any triangulation built by [insert](Self::insert).
    pub fn find_delaunay_violations(&self) -> SmallVec<[FixedTriangleHandle; 8]> {
        let entries = self.arena.triangle_entries();
        self.fixed_triangles()
            .filter(|handle| {
                let entry = &entries[handle.index()];
                let [v0, v1, v2] = self.arena.triangle_positions(*handle);
                entry.neighbors().into_iter().enumerate().any(|(i, neighbor)| {
                    let Some(neighbor) = neighbor else {
                        return false;
                    };
                    let edge = [entry.vertices()[(i + 1) % 3], entry.vertices()[(i + 2) % 3]];
                    entries[neighbor.index()]
                        .vertex_but_not(&edge)
                        .map(|opposite| {
                            let opposite = self.arena.vertices()[opposite.index()];
                            math::contained_in_circumference(v0, v1, v2, opposite)
                        })
                        .unwrap_or(false)
                })
            })
            .collect()
    }
}

impl<S, O> DelaunayTriangulation<S, O> {
    /// Returns the number of vertices, including the three super-triangle corners.
    pub fn num_vertices(&self) -> usize {
        self.arena.num_vertices()
    }

    /// Returns the number of inserted sites, excluding the super-triangle corners.
    pub fn num_sites(&self) -> usize {
        self.arena.num_vertices() - SUPER_VERTICES.len()
    }

    pub fn num_triangles(&self) -> usize {
        self.arena.num_triangles()
    }

    /// Returns `true` if `vertex` is a corner of the super-triangle.
    pub fn is_super_vertex(&self, vertex: FixedVertexHandle) -> bool {
        vertex.is_super_vertex()
    }

    /// Returns the handles of the super-triangle's corners.
    pub fn super_vertices(&self) -> [FixedVertexHandle; 3] {
        SUPER_VERTICES
    }

    /// Returns the triangle with the given handle, or `None` if the handle is out of range.
    pub fn triangle(&self, handle: FixedTriangleHandle) -> Option<TriangleHandle<S>> {
        self.arena
            .triangle(handle)
            .map(|_| TriangleHandle::new(&self.arena, handle))
    }

    /// Iterates over all triangles, including those touching the super-triangle.
    ///
    /// Each call starts a fresh traversal.
    pub fn triangles(&self) -> TriangleIterator<S> {
        TriangleIterator::new(&self.arena)
    }

    pub fn fixed_triangles(&self) -> FixedTriangleIterator {
        FixedTriangleIterator::new(self.arena.num_triangles())
    }

    /// Iterates over all triangles without a super-triangle corner.
    pub fn real_triangles(&self) -> impl Iterator<Item = TriangleHandle<S>> + '_ {
        self.triangles().filter(|t| t.is_real())
    }
}

#[cfg(test)]
impl<S: CoordNum, O: InsertionObserver<S>> DelaunayTriangulation<S, O> {
    pub(crate) fn sanity_check(&self) {
        self.arena.sanity_check();

        // A triangulation of n points with a triangular hull has 2n - 5 triangles.
        assert_eq!(self.num_triangles(), 2 * self.num_vertices() - 5);
        assert!(self.find_delaunay_violations().is_empty());

        for triangle in self.triangles() {
            assert!(triangle.circumcenter().is_ok());
        }
        for (index, position) in self.vertex_positions().iter().enumerate().skip(3) {
            assert_eq!(
                self.find_vertex(*position),
                Some(FixedVertexHandle::new(index))
            );
        }
    }
}
