use crate::{CoordNum, GeometryError, Point2};

use super::FixedVertexHandle;

/// Receives diagnostics about insertions into a triangulation.
///
/// The triangulation itself never logs. Any reporting is done by the observer given as
/// type parameter of [DelaunayTriangulation](crate::DelaunayTriangulation). All methods
/// default to doing nothing.
///
/// Two observers are bundled:
///  - `()` ignores every notification and is used by default.
///  - [TracingObserver] forwards every notification to the `tracing` crate.
pub trait InsertionObserver<S: CoordNum> {
    /// Notifies the observer that a new vertex was inserted.
    ///
    /// `removed_triangles` is the number of triangles whose circumcircle contained the new
    /// vertex; `created_triangles` is the number of triangles that replaced them.
    fn notify_vertex_inserted(
        &mut self,
        _vertex: FixedVertexHandle,
        _position: Point2<S>,
        _removed_triangles: usize,
        _created_triangles: usize,
    ) {
    }

    /// Notifies the observer that an insertion was skipped because an equal vertex already
    /// exists.
    fn notify_duplicate(&mut self, _existing: FixedVertexHandle, _position: Point2<S>) {}

    /// Notifies the observer that an insertion failed. The triangulation is unchanged.
    fn notify_rejected(&mut self, _position: Point2<S>, _error: &GeometryError) {}
}

impl<S: CoordNum> InsertionObserver<S> for () {}

/// An observer that emits a `tracing` event for every notification.
///
/// Insertions are logged at `debug` level. Skipped duplicates and failed insertions are
/// logged at `warn` level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TracingObserver;

impl<S: CoordNum> InsertionObserver<S> for TracingObserver {
    fn notify_vertex_inserted(
        &mut self,
        vertex: FixedVertexHandle,
        position: Point2<S>,
        removed_triangles: usize,
        created_triangles: usize,
    ) {
        tracing::debug!(
            vertex = vertex.index(),
            ?position,
            removed_triangles,
            created_triangles,
            "inserted vertex"
        );
    }

    fn notify_duplicate(&mut self, existing: FixedVertexHandle, position: Point2<S>) {
        tracing::warn!(
            existing = existing.index(),
            ?position,
            "skipped duplicate vertex"
        );
    }

    fn notify_rejected(&mut self, position: Point2<S>, error: &GeometryError) {
        tracing::warn!(?position, %error, "rejected vertex");
    }
}

/// An observer that records every notification. Used to verify notification order.
#[cfg(test)]
#[derive(Default, Debug)]
pub(crate) struct RecordingObserver {
    pub events: Vec<String>,
}

#[cfg(test)]
impl<S: CoordNum> InsertionObserver<S> for RecordingObserver {
    fn notify_vertex_inserted(
        &mut self,
        vertex: FixedVertexHandle,
        _: Point2<S>,
        removed_triangles: usize,
        created_triangles: usize,
    ) {
        self.events.push(format!(
            "inserted {} -{} +{}",
            vertex.index(),
            removed_triangles,
            created_triangles
        ));
    }

    fn notify_duplicate(&mut self, existing: FixedVertexHandle, _: Point2<S>) {
        self.events.push(format!("duplicate {}", existing.index()));
    }

    fn notify_rejected(&mut self, _: Point2<S>, error: &GeometryError) {
        self.events.push(format!("rejected {}", error));
    }
}
