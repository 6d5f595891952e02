//! Cube-sphere cell index for location-scoped queries.
//!
//! The server partitions the globe into a fixed-depth grid and expects
//! map queries to name the grid cells they cover. This crate implements
//! that grid: the sphere is projected onto the six faces of a cube, each
//! face subdivided into a 2^level × 2^level grid, and every cell gets a
//! packed 64-bit identifier.
//!
//! The interesting part is neighbor finding at face seams. A cell on a
//! face edge has neighbors on a *different* cube face, in a different
//! (u, v) frame. [`CellId::edge_neighbors`] handles the seam crossing
//! exactly, so nothing above this crate ever special-cases poles or the
//! antimeridian — those are just ordinary points in the interior of a
//! face or on a seam like any other.
//!
//! ```text
//! (lat, lon) → unit vector → dominant cube face → (u, v) → (i, j) grid
//! ```

mod cell;
mod face;
mod resolver;

pub use cell::{CellId, MAX_LEVEL};
pub use face::Face;
pub use resolver::{QUERY_LEVEL, cover};
