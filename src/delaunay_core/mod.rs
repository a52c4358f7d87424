mod arena;
mod handles;
mod line_side_info;
mod triangle;
mod triangle_handle;
mod vertex_lookup;

pub mod insertion_observer;
pub mod iterators;

pub(crate) mod math;

pub(crate) use arena::TriangleArena;
pub(crate) use vertex_lookup::VertexLookup;

pub use handles::*;
pub use insertion_observer::{InsertionObserver, TracingObserver};
pub use line_side_info::LineSideInfo;
pub use triangle_handle::TriangleHandle;
