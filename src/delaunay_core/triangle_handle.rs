use super::arena::TriangleArena;
use super::handles::{FixedTriangleHandle, FixedVertexHandle};
use super::math::GeometryError;
use crate::{CoordNum, Point2, Triangle2};

/// A reference to a live triangle of a triangulation.
///
/// Unlike a [FixedTriangleHandle], this handle borrows the triangulation and can be used to
/// query the triangle's geometry directly.
pub struct TriangleHandle<'a, S> {
    arena: &'a TriangleArena<S>,
    handle: FixedTriangleHandle,
}

impl<'a, S> Clone for TriangleHandle<'a, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, S> Copy for TriangleHandle<'a, S> {}

impl<'a, S> PartialEq for TriangleHandle<'a, S> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.arena, other.arena) && self.handle == other.handle
    }
}

impl<'a, S> std::fmt::Debug for TriangleHandle<'a, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriangleHandle")
            .field("index", &self.handle.index())
            .finish()
    }
}

impl<'a, S> TriangleHandle<'a, S> {
    pub(crate) fn new(arena: &'a TriangleArena<S>, handle: FixedTriangleHandle) -> Self {
        Self { arena, handle }
    }

    /// Converts this handle into a fixed handle that does not borrow the triangulation.
    pub fn fix(&self) -> FixedTriangleHandle {
        self.handle
    }

    /// Returns the triangle's vertices in counter clockwise order.
    pub fn vertices(&self) -> [FixedVertexHandle; 3] {
        self.arena.triangle_entries()[self.handle.index()].vertices()
    }

    /// Returns the neighbors across the edges opposite to each vertex.
    pub fn neighbors(&self) -> [Option<TriangleHandle<'a, S>>; 3] {
        let arena = self.arena;
        self.arena.triangle_entries()[self.handle.index()]
            .neighbors()
            .map(|n| n.map(|n| TriangleHandle::new(arena, n)))
    }

    /// Returns the neighbor sharing the edge `{a, b}`, see
    /// [DelaunayTriangulation::neighbor_across](crate::DelaunayTriangulation::neighbor_across).
    pub fn neighbor_across(
        &self,
        a: FixedVertexHandle,
        b: FixedVertexHandle,
    ) -> Option<TriangleHandle<'a, S>> {
        self.arena.triangle_entries()[self.handle.index()]
            .neighbor_across(a, b)
            .map(|n| TriangleHandle::new(self.arena, n))
    }

    pub fn contains_vertex(&self, vertex: FixedVertexHandle) -> bool {
        self.vertices().contains(&vertex)
    }

    /// Returns `true` if both triangles are spanned by the same vertices. Unlike `==`, this
    /// also holds for handles into different triangulations.
    pub fn same_vertices(&self, other: &TriangleHandle<S>) -> bool {
        let entries = self.arena.triangle_entries();
        entries[self.handle.index()]
            .same_vertices(&other.arena.triangle_entries()[other.handle.index()])
    }

    /// Returns `true` if none of the triangle's vertices is a super-triangle corner.
    pub fn is_real(&self) -> bool {
        self.vertices().iter().all(|v| !v.is_super_vertex())
    }
}

impl<'a, S: CoordNum> TriangleHandle<'a, S> {
    /// Returns the positions of the triangle's vertices in counter clockwise order.
    pub fn positions(&self) -> [Point2<S>; 3] {
        self.arena.triangle_positions(self.handle)
    }

    /// Returns the triangle's circumcenter.
    ///
    /// Fails with [GeometryError::DegenerateTriangle] if the triangle's vertices are
    /// collinear.
    pub fn circumcenter(&self) -> Result<Point2<S>, GeometryError> {
        self.arena.triangle_entries()[self.handle.index()].circumcenter()
    }

    /// Converts this triangle into a plain value.
    pub fn to_triangle(&self) -> Triangle2<S> {
        Triangle2::from(self.positions())
    }
}
