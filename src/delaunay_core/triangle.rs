use super::handles::{FixedTriangleHandle, FixedVertexHandle};
use super::math::{self, GeometryError};
use crate::{CoordNum, Point2};

/// A single face of the triangulation together with its adjacency.
///
/// The vertices are ordered counter clockwise. `neighbors[i]` is the triangle on the
/// other side of the edge *opposite* to `vertices[i]`, that is, the edge from
/// `vertices[i + 1]` to `vertices[i + 2]` (indices taken modulo 3). A missing neighbor
/// marks an edge of the outer boundary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriangleEntry<S> {
    pub(crate) vertices: [FixedVertexHandle; 3],
    pub(crate) neighbors: [Option<FixedTriangleHandle>; 3],
    circumcenter: Option<Point2<S>>,
}

impl<S: CoordNum> TriangleEntry<S> {
    /// Creates a new entry without neighbors. The circumcenter is computed right away; a
    /// collinear triangle stores no circumcenter.
    pub(crate) fn new(vertices: [FixedVertexHandle; 3], positions: [Point2<S>; 3]) -> Self {
        Self {
            vertices,
            neighbors: [None; 3],
            circumcenter: math::circumcenter(positions).map(|(center, _)| center),
        }
    }

    /// Returns the cached circumcenter.
    pub fn circumcenter(&self) -> Result<Point2<S>, GeometryError> {
        self.circumcenter.ok_or(GeometryError::DegenerateTriangle)
    }
}

impl<S> TriangleEntry<S> {
    pub fn vertices(&self) -> [FixedVertexHandle; 3] {
        self.vertices
    }

    pub fn neighbors(&self) -> [Option<FixedTriangleHandle>; 3] {
        self.neighbors
    }

    /// Returns the local index (0, 1 or 2) of a vertex.
    pub fn index_of(&self, vertex: FixedVertexHandle) -> Option<usize> {
        self.vertices.iter().position(|v| *v == vertex)
    }

    pub fn contains_vertex(&self, vertex: FixedVertexHandle) -> bool {
        self.index_of(vertex).is_some()
    }

    /// Returns the neighbor across the edge opposite to `vertex`.
    ///
    /// Returns `None` if `vertex` is not part of this triangle or if the opposite edge
    /// lies on the outer boundary.
    pub fn neighbor_opposite(&self, vertex: FixedVertexHandle) -> Option<FixedTriangleHandle> {
        self.index_of(vertex).and_then(|i| self.neighbors[i])
    }

    /// Returns the neighbor sharing the edge `{a, b}`. The edge direction is irrelevant.
    pub fn neighbor_across(
        &self,
        a: FixedVertexHandle,
        b: FixedVertexHandle,
    ) -> Option<FixedTriangleHandle> {
        let ia = self.index_of(a)?;
        let ib = self.index_of(b)?;
        if ia == ib {
            return None;
        }
        // The remaining local index is the vertex opposite to {a, b}.
        self.neighbors[3 - ia - ib]
    }

    /// Returns the first vertex that is not contained in `excluded`.
    pub fn vertex_but_not(&self, excluded: &[FixedVertexHandle]) -> Option<FixedVertexHandle> {
        self.vertices
            .iter()
            .copied()
            .find(|v| !excluded.contains(v))
    }

    /// Returns `true` if both triangles are spanned by the same vertices, regardless of
    /// their rotation.
    pub fn same_vertices(&self, other: &TriangleEntry<S>) -> bool {
        let [a, b, c] = other.vertices;
        self.vertices == [a, b, c] || self.vertices == [b, c, a] || self.vertices == [c, a, b]
    }

    /// Sets the neighbor across the edge `{a, b}`. Returns `false` if `{a, b}` is not an
    /// edge of this triangle.
    pub(crate) fn set_neighbor_across(
        &mut self,
        a: FixedVertexHandle,
        b: FixedVertexHandle,
        neighbor: Option<FixedTriangleHandle>,
    ) -> bool {
        match (self.index_of(a), self.index_of(b)) {
            (Some(ia), Some(ib)) if ia != ib => {
                self.neighbors[3 - ia - ib] = neighbor;
                true
            }
            _ => false,
        }
    }
}
