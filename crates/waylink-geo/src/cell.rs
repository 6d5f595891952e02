//! Packed cell identifiers and neighbor finding.
//!
//! A cell is one square of the 2^level × 2^level grid on one cube face.
//! The identifier packs everything into 64 bits:
//!
//! ```text
//! bits 63–61  face (0–5)
//! bits 60–56  level (0–28)
//! bits 55–28  i (column, 28 bits)
//! bits 27–0   j (row, 28 bits)
//! ```
//!
//! # Exactness
//!
//! Neighbor finding across a face seam re-projects the exact cube-edge
//! point through the adjacent face's frame. Every quantity involved is
//! a dyadic rational with a small denominator (cell centers, ±1 edge
//! coordinates, dot products with 0/±1 frame axes), so the arithmetic
//! is exact in f64 and the neighbor relation is symmetric — including
//! across seams, at cube corners, and therefore at the poles and the
//! antimeridian, which are not special cases at all.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::face::{Face, dot, scale};

/// Deepest level the 28-bit index fields can represent. The protocol
/// only ever queries at level 15; the headroom is for free.
pub const MAX_LEVEL: u8 = 28;

/// A packed cell identifier. See the module docs for the bit layout.
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CellId(u64);

impl CellId {
    /// Packs a (face, level, i, j) tuple.
    ///
    /// Callers inside this crate guarantee the ranges; the debug
    /// asserts catch violations in tests.
    pub fn new(face: Face, level: u8, i: u32, j: u32) -> Self {
        debug_assert!(level <= MAX_LEVEL);
        debug_assert!(u64::from(i) < 1 << level);
        debug_assert!(u64::from(j) < 1 << level);
        Self(
            (u64::from(face as u8) << 61)
                | (u64::from(level) << 56)
                | (u64::from(i) << 28)
                | u64::from(j),
        )
    }

    /// The cell at the given depth containing a latitude/longitude
    /// (degrees). Deterministic for a fixed level.
    pub fn from_lat_lon(latitude: f64, longitude: f64, level: u8) -> Self {
        let (phi, lambda) = (latitude.to_radians(), longitude.to_radians());
        let direction = [
            phi.cos() * lambda.cos(),
            phi.cos() * lambda.sin(),
            phi.sin(),
        ];
        Self::from_direction(direction, level)
    }

    /// The cell at the given depth containing a direction vector
    /// (need not be normalized).
    pub fn from_direction(p: [f64; 3], level: u8) -> Self {
        let face = Face::from_direction(p);
        let (u, v) = face.uv(p);
        Self::new(
            face,
            level,
            coord_to_index(u, level),
            coord_to_index(v, level),
        )
    }

    /// Reconstructs a cell id from its packed form, validating ranges.
    pub fn from_raw(raw: u64) -> Option<Self> {
        let face = (raw >> 61) as u8;
        let level = ((raw >> 56) & 0x1f) as u8;
        let i = (raw >> 28) & 0x0fff_ffff;
        let j = raw & 0x0fff_ffff;
        if face > 5 || level > MAX_LEVEL || i >> level != 0 || j >> level != 0
        {
            return None;
        }
        Some(Self(raw))
    }

    /// The packed 64-bit form, as embedded in map-scan payloads.
    pub fn raw(self) -> u64 {
        self.0
    }

    /// The cube face this cell lies on.
    pub fn face(self) -> Face {
        Face::from_index((self.0 >> 61) as u8)
    }

    /// The subdivision depth.
    pub fn level(self) -> u8 {
        ((self.0 >> 56) & 0x1f) as u8
    }

    /// Grid column on the face.
    pub fn i(self) -> u32 {
        ((self.0 >> 28) & 0x0fff_ffff) as u32
    }

    /// Grid row on the face.
    pub fn j(self) -> u32 {
        (self.0 & 0x0fff_ffff) as u32
    }

    /// The direction through the cell's center (not normalized).
    pub fn center_direction(self) -> [f64; 3] {
        let level = self.level();
        self.face().point(
            center_coord(self.i(), level),
            center_coord(self.j(), level),
        )
    }

    /// The four edge-adjacent cells at the same level, in
    /// north/east/south/west order.
    ///
    /// Neighbors across a face seam are found by re-projecting the
    /// shared edge point through the adjacent face; see the module docs
    /// for why that is exact.
    pub fn edge_neighbors(self) -> [CellId; 4] {
        let size = 1i64 << self.level();
        let (i, j) = (i64::from(self.i()), i64::from(self.j()));
        // N, E, S, W in (di, dj) grid steps.
        [(0, 1), (1, 0), (0, -1), (-1, 0)].map(|(di, dj)| {
            let (ni, nj) = (i + di, j + dj);
            if (0..size).contains(&ni) && (0..size).contains(&nj) {
                CellId::new(self.face(), self.level(), ni as u32, nj as u32)
            } else {
                self.wrap_neighbor(ni, nj)
            }
        })
    }

    /// Finds the neighbor when a grid step leaves this face.
    ///
    /// Builds the exact point where the step crosses the cube edge
    /// (out-of-range axis clamped to ±1, in-range axis at the cell
    /// center), identifies the face whose normal points along the
    /// overflowed axis, and reads the (u, v) coordinates there. The
    /// depth along the new face's normal is exactly 1 on the shared
    /// edge, so the coordinates are plain dot products.
    fn wrap_neighbor(self, ni: i64, nj: i64) -> CellId {
        let level = self.level();
        let size = 1i64 << level;
        let face = self.face();

        let (p, adjacent) = if !(0..size).contains(&ni) {
            let sign = if ni < 0 { -1.0 } else { 1.0 };
            let v = center_coord(self.j(), level);
            (
                face.point(sign, v),
                Face::from_axis(scale(face.u_axis(), sign)),
            )
        } else {
            let sign = if nj < 0 { -1.0 } else { 1.0 };
            let u = center_coord(self.i(), level);
            (
                face.point(u, sign),
                Face::from_axis(scale(face.v_axis(), sign)),
            )
        };

        let u = dot(p, adjacent.u_axis());
        let v = dot(p, adjacent.v_axis());
        CellId::new(
            adjacent,
            level,
            coord_to_index(u, level),
            coord_to_index(v, level),
        )
    }
}

impl fmt::Debug for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CellId({:?} L{} i={} j={})",
            self.face(),
            self.level(),
            self.i(),
            self.j()
        )
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// Face coordinate of a cell center: the midpoint of grid slot `index`
/// mapped from [0, size] onto [-1, 1]. Exact for levels ≤ 28.
fn center_coord(index: u32, level: u8) -> f64 {
    let size = (1u64 << level) as f64;
    2.0 * (f64::from(index) + 0.5) / size - 1.0
}

/// Grid index containing face coordinate `c` ∈ [-1, 1]. The clamp
/// folds the c = 1.0 boundary into the last slot.
fn coord_to_index(c: f64, level: u8) -> u32 {
    let size = 1i64 << level;
    let slot = ((c + 1.0) / 2.0 * size as f64).floor() as i64;
    slot.clamp(0, size - 1) as u32
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Every (face, edge-ish position) combination used below exists at
    /// this level while keeping indices small enough to read in failures.
    const LEVEL: u8 = 6;

    fn cell(face: Face, i: u32, j: u32) -> CellId {
        CellId::new(face, LEVEL, i, j)
    }

    // =====================================================================
    // Packing
    // =====================================================================

    #[test]
    fn test_new_round_trips_through_accessors() {
        let c = CellId::new(Face::NegY, 15, 20000, 31111);
        assert_eq!(c.face(), Face::NegY);
        assert_eq!(c.level(), 15);
        assert_eq!(c.i(), 20000);
        assert_eq!(c.j(), 31111);
    }

    #[test]
    fn test_from_raw_accepts_packed_form() {
        let c = CellId::new(Face::PosZ, 15, 123, 456);
        assert_eq!(CellId::from_raw(c.raw()), Some(c));
    }

    #[test]
    fn test_from_raw_rejects_out_of_range_fields() {
        // Face 7 doesn't exist.
        assert!(CellId::from_raw(7 << 61).is_none());
        // Level 31 exceeds MAX_LEVEL.
        assert!(CellId::from_raw(31 << 56).is_none());
        // Index wider than the level allows (i = 4 at level 2).
        assert!(CellId::from_raw((2 << 56) | (4 << 28)).is_none());
    }

    // =====================================================================
    // Point containment
    // =====================================================================

    #[test]
    fn test_center_direction_resolves_to_same_cell() {
        // The center of a cell must map back to that cell — this is the
        // exactness property the seam wrap relies on.
        for face in Face::ALL {
            for (i, j) in [(0, 0), (63, 0), (17, 42), (63, 63)] {
                let c = cell(face, i, j);
                let back =
                    CellId::from_direction(c.center_direction(), LEVEL);
                assert_eq!(back, c);
            }
        }
    }

    #[test]
    fn test_from_lat_lon_is_deterministic() {
        let a = CellId::from_lat_lon(40.758, -73.985, 15);
        let b = CellId::from_lat_lon(40.758, -73.985, 15);
        assert_eq!(a, b);
    }

    #[test]
    fn test_poles_resolve_to_z_faces() {
        assert_eq!(CellId::from_lat_lon(90.0, 0.0, 15).face(), Face::PosZ);
        assert_eq!(CellId::from_lat_lon(-90.0, 0.0, 15).face(), Face::NegZ);
        // Near-pole longitudes all land on the same face.
        assert_eq!(
            CellId::from_lat_lon(89.99, 137.0, 15).face(),
            Face::PosZ
        );
    }

    // =====================================================================
    // Neighbors
    // =====================================================================

    #[test]
    fn test_edge_neighbors_interior_cell_steps_one_slot() {
        let c = cell(Face::PosX, 30, 30);
        let [n, e, s, w] = c.edge_neighbors();
        assert_eq!(n, cell(Face::PosX, 30, 31));
        assert_eq!(e, cell(Face::PosX, 31, 30));
        assert_eq!(s, cell(Face::PosX, 30, 29));
        assert_eq!(w, cell(Face::PosX, 29, 30));
    }

    #[test]
    fn test_edge_neighbors_are_distinct() {
        // Interior cells, edge cells, and corner cells all have four
        // distinct edge neighbors.
        for c in [
            cell(Face::PosY, 30, 30),
            cell(Face::PosY, 63, 12),
            cell(Face::PosY, 0, 0),
            cell(Face::NegZ, 63, 63),
        ] {
            let neighbors = c.edge_neighbors();
            for (a, n) in neighbors.iter().enumerate() {
                assert_ne!(*n, c);
                for b in &neighbors[a + 1..] {
                    assert_ne!(n, b, "duplicate neighbor of {c:?}");
                }
            }
        }
    }

    #[test]
    fn test_edge_neighbors_cross_seam_land_on_other_face() {
        let c = cell(Face::PosX, 63, 20);
        let [_, east, _, _] = c.edge_neighbors();
        assert_ne!(east.face(), Face::PosX);
        assert_eq!(east.level(), LEVEL);
    }

    #[test]
    fn test_edge_neighbor_relation_is_symmetric() {
        // If B is a neighbor of A then A is a neighbor of B — on the
        // same face, across seams, and at cube corners alike.
        let samples = [
            cell(Face::PosX, 30, 30),  // interior
            cell(Face::PosX, 63, 20),  // east seam
            cell(Face::PosX, 0, 20),   // west seam
            cell(Face::PosY, 12, 63),  // north seam
            cell(Face::NegY, 12, 0),   // south seam
            cell(Face::PosZ, 0, 0),    // corner
            cell(Face::NegZ, 63, 63),  // corner
            cell(Face::NegX, 0, 63),   // corner
        ];
        for c in samples {
            for n in c.edge_neighbors() {
                assert!(
                    n.edge_neighbors().contains(&c),
                    "asymmetric neighbors: {c:?} -> {n:?}"
                );
            }
        }
    }

    #[test]
    fn test_edge_neighbors_preserve_level_across_seams() {
        let c = CellId::new(Face::NegY, 15, 0, 777);
        for n in c.edge_neighbors() {
            assert_eq!(n.level(), 15);
        }
    }
}
