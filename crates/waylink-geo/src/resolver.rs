//! The query-cover resolver: which cells must accompany a map scan.
//!
//! A map query covers a neighborhood, not a single cell — a moving
//! client needs visibility into adjacent cells without re-querying on
//! every small coordinate change. The server expects the cover for the
//! player's position, computed as: the containing cell, its edge
//! neighbors, and each neighbor's own edge neighbors, deduplicated.

use std::collections::HashSet;

use crate::CellId;

/// Fixed depth for map-query covers. Protocol constant.
pub const QUERY_LEVEL: u8 = 15;

/// Computes the deduplicated cell cover for a position.
///
/// Pure and deterministic: identical coordinates produce identical
/// output. Cells appear in first-discovery order (center, first ring,
/// then the second-order expansion) — consumers must not rely on any
/// sort order beyond that.
///
/// For points in a face interior this is the 13-cell diamond of grid
/// distance ≤ 2; near cube corners the expansion revisits cells from
/// two directions and the dedup produces a slightly smaller set.
pub fn cover(latitude: f64, longitude: f64) -> Vec<CellId> {
    let center = CellId::from_lat_lon(latitude, longitude, QUERY_LEVEL);
    let mut seen = HashSet::with_capacity(16);
    let mut cells = Vec::with_capacity(13);

    seen.insert(center);
    cells.push(center);

    let ring = center.edge_neighbors();
    for neighbor in ring {
        if seen.insert(neighbor) {
            cells.push(neighbor);
        }
    }
    for neighbor in ring {
        for second in neighbor.edge_neighbors() {
            if seen.insert(second) {
                cells.push(second);
            }
        }
    }

    cells
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Asserts the structural properties every cover must satisfy,
    /// regardless of where it sits on the cube.
    fn assert_valid_cover(cells: &[CellId], latitude: f64, longitude: f64) {
        // No duplicates even when neighbor-of-neighbor revisits a cell
        // from two directions.
        let unique: HashSet<_> = cells.iter().collect();
        assert_eq!(unique.len(), cells.len(), "cover contains duplicates");

        // The containing cell leads.
        let center = CellId::from_lat_lon(latitude, longitude, QUERY_LEVEL);
        assert_eq!(cells[0], center);

        // Uniform depth.
        assert!(cells.iter().all(|c| c.level() == QUERY_LEVEL));

        // Center + 4 neighbors at minimum, full diamond at most.
        assert!(cells.len() >= 5 && cells.len() <= 13, "{}", cells.len());
    }

    #[test]
    fn test_cover_interior_point_is_13_cell_diamond() {
        // Grid distance ≤ 2: 1 center + 4 ring + 8 second-order.
        let cells = cover(40.758, -73.985);
        assert_eq!(cells.len(), 13);
        assert_valid_cover(&cells, 40.758, -73.985);
    }

    #[test]
    fn test_cover_leads_with_center_then_first_ring() {
        let cells = cover(40.758, -73.985);
        let ring = cells[0].edge_neighbors();
        assert_eq!(&cells[1..5], &ring);
    }

    #[test]
    fn test_cover_is_deterministic() {
        let a = cover(51.5007, -0.1246);
        let b = cover(51.5007, -0.1246);
        assert_eq!(a, b);
    }

    #[test]
    fn test_cover_at_north_pole_is_well_formed() {
        // The pole is the interior of the +Z face — not a special case.
        let cells = cover(90.0, 0.0);
        assert_valid_cover(&cells, 90.0, 0.0);
    }

    #[test]
    fn test_cover_at_antimeridian_is_well_formed() {
        let cells = cover(0.0, 180.0);
        assert_valid_cover(&cells, 0.0, 180.0);
    }

    #[test]
    fn test_cover_on_face_seam_is_well_formed() {
        // lon 45° at the equator sits exactly on a cube seam; the cover
        // spans two faces and must still be duplicate-free.
        let cells = cover(0.0, 45.0);
        assert_valid_cover(&cells, 0.0, 45.0);
        let faces: HashSet<_> = cells.iter().map(|c| c.face()).collect();
        assert!(faces.len() >= 2, "seam cover should span faces");
    }
}
