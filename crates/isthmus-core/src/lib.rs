//! Geometry primitives shared by the isthmus crates.
//!
//! Cells of a maze are addressed by [`Point`]s (`x` is the column, `y` the
//! row) and bounded by half-open [`Range`]s that iterate in row-major order.

pub mod geom;

pub use geom::{Point, Range, RangeIter};
