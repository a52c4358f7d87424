// Copyright 2026 The mesh2d Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # mesh2d
//! Incremental 2D Delaunay triangulations and the Voronoi diagrams derived from them.
//!
//! # Features
//! * A [DelaunayTriangulation] bounded by a *super-triangle* that accepts sites one at a
//!   time and restores the Delaunay property after every insertion
//! * A [Voronoi] diagram that keeps track of its sites and returns one closed region per
//!   site
//! * Adjacency queries: triangle fans around a vertex, neighbors across an edge
//! * Duplicate detection, either bit exact or within a configurable tolerance
//! * Robust orientation and incircle predicates
//! * Pluggable diagnostics via [InsertionObserver], including a [TracingObserver] for the
//!   `tracing` ecosystem
//! * `serde` support for the value types with the `serde` feature
//!
//! # Example
//! ```
//! use mesh2d::{Point2, Voronoi};
//!
//! let mut voronoi = Voronoi::new();
//! voronoi.add_point(Point2::new(0.0, 0.0))?;
//! voronoi.add_point(Point2::new(10.0, 0.0))?;
//! voronoi.add_point(Point2::new(10.0, 10.0))?;
//! voronoi.add_point(Point2::new(0.0, 10.0))?;
//!
//! assert_eq!(voronoi.real_triangles().len(), 2);
//! for (site, region) in voronoi.regions_with_sites()? {
//!     assert!(region.contains_point(site));
//! }
//! # Ok::<(), mesh2d::GeometryError>(())
//! ```

#![forbid(unsafe_code)]

mod config;
mod delaunay_core;
mod delaunay_triangulation;
mod point;
mod primitives;
mod voronoi;

#[cfg(test)]
mod test_utilities;

pub use crate::config::{TriangulationConfig, DEFAULT_SIZE};
pub use crate::delaunay_core::math::{
    validate_coordinate, validate_point, CoordinateError, GeometryError, MAX_ALLOWED_VALUE,
    MIN_ALLOWED_VALUE,
};
pub use crate::delaunay_core::{
    FixedTriangleHandle, FixedVertexHandle, InsertionObserver, LineSideInfo, TracingObserver,
    TriangleHandle,
};
pub use crate::delaunay_triangulation::{DelaunayTriangulation, InsertionOutcome};
pub use crate::point::{CoordNum, Point2};
pub use crate::primitives::{Polygon2, Triangle2};
pub use crate::voronoi::Voronoi;

/// Handle types used to refer to the vertices and triangles of a triangulation.
pub mod handles {
    pub use crate::delaunay_core::{
        FixedHandleImpl, FixedTriangleHandle, FixedVertexHandle, TriangleHandle, TriangleTag,
        VertexTag, NUM_SUPER_VERTICES, SUPER_VERTICES,
    };
}

/// Iterators over the triangles of a triangulation.
pub mod iterators {
    pub use crate::delaunay_core::iterators::{FixedTriangleIterator, TriangleIterator, VertexFan};
}

/// Geometric predicates used by the triangulation.
pub mod math {
    pub use crate::delaunay_core::math::{
        circumcenter, contained_in_circumference, is_strictly_ccw, side_query,
    };
}
