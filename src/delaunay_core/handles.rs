//! Stable integer handles into a triangulation's arena.
//!
//! Handles stay valid for the whole lifetime of a triangulation: vertices are never
//! removed, and a triangle slot is only ever overwritten by another live triangle.
//! A [FixedTriangleHandle] may refer to a different triangle after an insertion, though.

use std::convert::TryInto;
use std::marker::PhantomData;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Marker type for vertex handles.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde")
)]
pub struct VertexTag;

/// Marker type for triangle handles.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde")
)]
pub struct TriangleTag;

/// Internal handle representation. Use [FixedVertexHandle] and [FixedTriangleHandle].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde")
)]
pub struct FixedHandleImpl<Type> {
    index: u32,
    ty: PhantomData<Type>,
}

impl<Type> std::fmt::Debug for FixedHandleImpl<Type> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedHandle")
            .field("index", &self.index)
            .finish()
    }
}

impl<Type> FixedHandleImpl<Type> {
    pub(crate) fn new(index: usize) -> Self {
        Self::new_internal(
            index
                .try_into()
                .expect("Index too big - at most 2^32 elements supported"),
        )
    }

    const fn new_internal(index: u32) -> Self {
        Self {
            index,
            ty: PhantomData,
        }
    }

    /// Returns the position of the referenced element in the arena.
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

/// References a vertex. Vertices are numbered in insertion order, starting with the three
/// corners of the super-triangle.
pub type FixedVertexHandle = FixedHandleImpl<VertexTag>;

/// References a triangle slot of the arena.
pub type FixedTriangleHandle = FixedHandleImpl<TriangleTag>;

pub(crate) const fn new_fixed_vertex_handle(index: u32) -> FixedVertexHandle {
    FixedHandleImpl::new_internal(index)
}

/// The number of vertices spanning the super-triangle.
pub const NUM_SUPER_VERTICES: usize = 3;

/// The super-triangle's corner vertices. They are created first and occupy the first
/// three vertex slots.
pub const SUPER_VERTICES: [FixedVertexHandle; NUM_SUPER_VERTICES] = [
    new_fixed_vertex_handle(0),
    new_fixed_vertex_handle(1),
    new_fixed_vertex_handle(2),
];

impl FixedVertexHandle {
    /// Returns `true` if this vertex is a corner of the super-triangle.
    pub fn is_super_vertex(&self) -> bool {
        self.index() < NUM_SUPER_VERTICES
    }
}
