use hashbrown::HashMap;
use smallvec::SmallVec;

use super::handles::FixedVertexHandle;
use crate::{CoordNum, Point2};

/// Canonical key of a position.
///
/// Exact keys use the coordinates' bit patterns with `-0.0` folded into `0.0`. Cell keys
/// identify the grid cell of side length `tolerance` containing the position.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum VertexKey {
    Exact(u64, u64),
    Cell(i64, i64),
}

/// Maps positions to the vertices inserted at them.
///
/// With a tolerance of zero, only bit-identical positions are considered equal. With a
/// positive tolerance, any existing vertex within that distance counts as a duplicate.
/// If several vertices qualify, the closest one wins and ties go to the vertex inserted
/// first.
#[derive(Clone, Debug, Default)]
pub struct VertexLookup {
    tolerance: f64,
    buckets: HashMap<VertexKey, SmallVec<[FixedVertexHandle; 2]>>,
}

fn canonical_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

impl VertexLookup {
    /// Creates an empty lookup. Callers validate the tolerance first; negative and NaN
    /// tolerances are treated as zero.
    pub fn new(tolerance: f64) -> Self {
        let tolerance = if tolerance > 0.0 { tolerance } else { 0.0 };
        Self {
            tolerance,
            buckets: HashMap::new(),
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    fn key(&self, position: Point2<f64>) -> VertexKey {
        if self.tolerance == 0.0 {
            VertexKey::Exact(canonical_bits(position.x), canonical_bits(position.y))
        } else {
            // Quotients beyond the `i64` range saturate. Such cells may be shared by
            // distant points, which `find` filters by distance.
            VertexKey::Cell(
                (position.x / self.tolerance).floor() as i64,
                (position.y / self.tolerance).floor() as i64,
            )
        }
    }

    /// Registers a vertex at the given position.
    pub fn insert<S: CoordNum>(&mut self, position: Point2<S>, handle: FixedVertexHandle) {
        let key = self.key(position.to_f64());
        self.buckets.entry(key).or_default().push(handle);
    }

    /// Looks up a vertex at (or, with a positive tolerance, close to) `position`.
    ///
    /// `positions` holds the position of every vertex, indexed by handle.
    pub fn find<S: CoordNum>(
        &self,
        position: Point2<S>,
        positions: &[Point2<S>],
    ) -> Option<FixedVertexHandle> {
        let position = position.to_f64();
        match self.key(position) {
            key @ VertexKey::Exact(..) => self
                .buckets
                .get(&key)
                .and_then(|bucket| bucket.first().copied()),
            VertexKey::Cell(cx, cy) => {
                let tolerance_2 = self.tolerance * self.tolerance;
                let mut best: Option<(f64, FixedVertexHandle)> = None;
                for dx in -1..=1 {
                    for dy in -1..=1 {
                        let (Some(x), Some(y)) = (cx.checked_add(dx), cy.checked_add(dy)) else {
                            continue;
                        };
                        let Some(bucket) = self.buckets.get(&VertexKey::Cell(x, y)) else {
                            continue;
                        };
                        for handle in bucket {
                            let distance_2 = positions[handle.index()].to_f64().distance_2(position);
                            if distance_2 > tolerance_2 {
                                continue;
                            }
                            let is_better = match best {
                                None => true,
                                Some((best_distance, best_handle)) => {
                                    distance_2 < best_distance
                                        || (distance_2 == best_distance && *handle < best_handle)
                                }
                            };
                            if is_better {
                                best = Some((distance_2, *handle));
                            }
                        }
                    }
                }
                best.map(|(_, handle)| handle)
            }
        }
    }
}
