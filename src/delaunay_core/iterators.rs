use std::ops::Range;

use smallvec::SmallVec;

use super::arena::TriangleArena;
use super::handles::{FixedTriangleHandle, FixedVertexHandle};
use super::triangle_handle::TriangleHandle;

/// Iterates over the fixed handles of all live triangles.
#[derive(Clone, Debug)]
pub struct FixedTriangleIterator {
    range: Range<usize>,
}

impl FixedTriangleIterator {
    pub(crate) fn new(num_triangles: usize) -> Self {
        Self {
            range: 0..num_triangles,
        }
    }
}

impl Iterator for FixedTriangleIterator {
    type Item = FixedTriangleHandle;

    fn next(&mut self) -> Option<FixedTriangleHandle> {
        self.range.next().map(FixedTriangleHandle::new)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl DoubleEndedIterator for FixedTriangleIterator {
    fn next_back(&mut self) -> Option<FixedTriangleHandle> {
        self.range.next_back().map(FixedTriangleHandle::new)
    }
}

impl ExactSizeIterator for FixedTriangleIterator {}

/// Iterates over all live triangles of a triangulation.
///
/// Every live triangle is returned exactly once. The order follows the internal arena
/// layout and carries no geometric meaning.
pub struct TriangleIterator<'a, S> {
    arena: &'a TriangleArena<S>,
    fixed: FixedTriangleIterator,
}

impl<'a, S> TriangleIterator<'a, S> {
    pub(crate) fn new(arena: &'a TriangleArena<S>) -> Self {
        Self {
            arena,
            fixed: FixedTriangleIterator::new(arena.num_triangles()),
        }
    }
}

impl<'a, S> Iterator for TriangleIterator<'a, S> {
    type Item = TriangleHandle<'a, S>;

    fn next(&mut self) -> Option<TriangleHandle<'a, S>> {
        self.fixed
            .next()
            .map(|handle| TriangleHandle::new(self.arena, handle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.fixed.size_hint()
    }
}

impl<'a, S> ExactSizeIterator for TriangleIterator<'a, S> {}

/// The triangles incident to a vertex, ordered counter clockwise around it.
///
/// Consecutive triangles share an edge that contains the vertex. For a vertex in the
/// interior of the triangulation, the last triangle also shares an edge with the first
/// one and the fan is *closed*. Corners of the super-triangle have an *open* fan whose
/// first and last triangles lie on the outer boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VertexFan {
    pub(crate) vertex: FixedVertexHandle,
    pub(crate) triangles: SmallVec<[FixedTriangleHandle; 8]>,
    pub(crate) is_closed: bool,
}

impl VertexFan {
    /// The vertex shared by all triangles of this fan.
    pub fn vertex(&self) -> FixedVertexHandle {
        self.vertex
    }

    pub fn triangles(&self) -> &[FixedTriangleHandle] {
        &self.triangles
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Returns `true` if the fan surrounds its vertex completely.
    pub fn is_closed(&self) -> bool {
        self.is_closed
    }
}

impl<'a> IntoIterator for &'a VertexFan {
    type Item = &'a FixedTriangleHandle;
    type IntoIter = std::slice::Iter<'a, FixedTriangleHandle>;

    fn into_iter(self) -> Self::IntoIter {
        self.triangles.iter()
    }
}
