use super::handles::{FixedTriangleHandle, FixedVertexHandle};
use super::triangle::TriangleEntry;
use crate::{CoordNum, Point2};

/// Owns every vertex position and every triangle record of a triangulation.
///
/// Vertices are only ever appended. Triangle slots are overwritten in place when a
/// triangle is replaced during insertion; every slot always holds a live triangle.
#[derive(Clone, Debug)]
pub struct TriangleArena<S> {
    pub(crate) vertices: Vec<Point2<S>>,
    pub(crate) triangles: Vec<TriangleEntry<S>>,
}

impl<S: CoordNum> TriangleArena<S> {
    /// Creates an arena holding the three corners and the single triangle they span.
    ///
    /// `corners` must be ordered counter clockwise.
    pub(crate) fn with_super_triangle(corners: [Point2<S>; 3]) -> Self {
        let vertices = corners.to_vec();
        let handles = [0, 1, 2].map(FixedVertexHandle::new);
        let triangles = vec![TriangleEntry::new(handles, corners)];
        TriangleArena {
            vertices,
            triangles,
        }
    }

    pub(crate) fn push_vertex(&mut self, position: Point2<S>) -> FixedVertexHandle {
        let handle = FixedVertexHandle::new(self.vertices.len());
        self.vertices.push(position);
        handle
    }

    /// Stores a triangle in `slot`, or appends it if no slot is given.
    pub(crate) fn store_triangle(
        &mut self,
        slot: Option<FixedTriangleHandle>,
        vertices: [FixedVertexHandle; 3],
    ) -> FixedTriangleHandle {
        let entry = TriangleEntry::new(vertices, self.positions_of(vertices));
        match slot {
            Some(handle) => {
                self.triangles[handle.index()] = entry;
                handle
            }
            None => {
                self.triangles.push(entry);
                FixedTriangleHandle::new(self.triangles.len() - 1)
            }
        }
    }

    pub(crate) fn triangle_mut(&mut self, handle: FixedTriangleHandle) -> &mut TriangleEntry<S> {
        &mut self.triangles[handle.index()]
    }

    pub fn positions_of(&self, vertices: [FixedVertexHandle; 3]) -> [Point2<S>; 3] {
        vertices.map(|v| self.vertices[v.index()])
    }

    pub fn triangle_positions(&self, handle: FixedTriangleHandle) -> [Point2<S>; 3] {
        self.positions_of(self.triangles[handle.index()].vertices)
    }
}

impl<S> TriangleArena<S> {
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    pub fn vertex_position(&self, handle: FixedVertexHandle) -> Option<&Point2<S>> {
        self.vertices.get(handle.index())
    }

    pub fn triangle(&self, handle: FixedTriangleHandle) -> Option<&TriangleEntry<S>> {
        self.triangles.get(handle.index())
    }

    pub fn vertices(&self) -> &[Point2<S>] {
        &self.vertices
    }

    pub fn triangle_entries(&self) -> &[TriangleEntry<S>] {
        &self.triangles
    }
}

#[cfg(test)]
impl<S: CoordNum> TriangleArena<S> {
    /// Checks the structural invariants: counter clockwise orientation, symmetric
    /// neighbor links across shared edges and connectivity of the triangle graph.
    pub fn sanity_check(&self) {
        use super::math;

        for (index, entry) in self.triangles.iter().enumerate() {
            let handle = FixedTriangleHandle::new(index);
            let [a, b, c] = self.positions_of(entry.vertices);
            assert!(math::is_strictly_ccw(a, b, c), "{:?} is not ccw", handle);

            for i in 0..3 {
                let from = entry.vertices[(i + 1) % 3];
                let to = entry.vertices[(i + 2) % 3];
                match entry.neighbors[i] {
                    Some(neighbor) => {
                        let other = &self.triangles[neighbor.index()];
                        assert_eq!(other.neighbor_across(to, from), Some(handle));
                        // The shared edge must run in the opposite direction.
                        let j = other.index_of(to).unwrap();
                        assert_eq!(other.vertices[(j + 1) % 3], from);
                    }
                    None => {
                        // Only the super-triangle's edges may lie on the boundary.
                        assert!(from.is_super_vertex() && to.is_super_vertex());
                    }
                }
            }
        }

        let mut visited = vec![false; self.triangles.len()];
        let mut stack = vec![FixedTriangleHandle::new(0)];
        visited[0] = true;
        while let Some(current) = stack.pop() {
            for neighbor in self.triangles[current.index()].neighbors.iter().flatten() {
                if !visited[neighbor.index()] {
                    visited[neighbor.index()] = true;
                    stack.push(*neighbor);
                }
            }
        }
        assert!(visited.iter().all(|v| *v), "triangle graph is not connected");
    }
}
