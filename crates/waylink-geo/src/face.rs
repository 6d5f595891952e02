//! The six cube faces and their (u, v, w) coordinate frames.
//!
//! Each face carries a right-handed orthonormal frame: `w` is the
//! outward face normal, `u` and `v` span the face plane. All nine frame
//! components are 0 or ±1, which keeps every projection in this crate
//! exact for the values that matter (face centers, cell centers, edge
//! points).

/// One face of the projection cube.
///
/// The numbering follows the dominant axis: faces 0–2 are +X, +Y, +Z
/// and faces 3–5 are −X, −Y, −Z.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Face {
    PosX = 0,
    PosY = 1,
    PosZ = 2,
    NegX = 3,
    NegY = 4,
    NegZ = 5,
}

/// Per-face (u, v, w) frames. Chosen so adjacent faces agree on seam
/// orientation; every neighbor transform is derived from this table, so
/// consistency here is the only topology invariant that matters.
const FRAMES: [[[f64; 3]; 3]; 6] = [
    // face      u-axis            v-axis            w-axis (normal)
    /* PosX */ [[0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]],
    /* PosY */ [[-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]],
    /* PosZ */ [[-1.0, 0.0, 0.0], [0.0, -1.0, 0.0], [0.0, 0.0, 1.0]],
    /* NegX */ [[0.0, 0.0, -1.0], [0.0, -1.0, 0.0], [-1.0, 0.0, 0.0]],
    /* NegY */ [[0.0, 0.0, -1.0], [1.0, 0.0, 0.0], [0.0, -1.0, 0.0]],
    /* NegZ */ [[0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]],
];

impl Face {
    /// All six faces in index order.
    pub const ALL: [Face; 6] = [
        Face::PosX,
        Face::PosY,
        Face::PosZ,
        Face::NegX,
        Face::NegY,
        Face::NegZ,
    ];

    /// Face by index 0–5. Panics on anything else; indices only come
    /// from packed cell ids which are validated on construction.
    pub(crate) fn from_index(index: u8) -> Face {
        Face::ALL[index as usize]
    }

    /// The face whose interior contains the given direction: the one
    /// matching the dominant (largest-magnitude) axis. Points exactly on
    /// a seam resolve deterministically by axis order X, Y, Z.
    pub fn from_direction(p: [f64; 3]) -> Face {
        let (mut axis, mut best) = (0usize, p[0].abs());
        if p[1].abs() > best {
            (axis, best) = (1, p[1].abs());
        }
        if p[2].abs() > best {
            axis = 2;
        }
        match (axis, p[axis] >= 0.0) {
            (0, true) => Face::PosX,
            (1, true) => Face::PosY,
            (2, true) => Face::PosZ,
            (0, false) => Face::NegX,
            (1, false) => Face::NegY,
            _ => Face::NegZ,
        }
    }

    /// The face whose outward normal is the given signed elementary
    /// axis. Used for seam wrapping: stepping past u = ±1 or v = ±1
    /// lands on the face whose normal is that frame axis.
    pub(crate) fn from_axis(axis: [f64; 3]) -> Face {
        // Exactly one component is ±1; the rest are 0.
        if axis[0] > 0.5 {
            Face::PosX
        } else if axis[0] < -0.5 {
            Face::NegX
        } else if axis[1] > 0.5 {
            Face::PosY
        } else if axis[1] < -0.5 {
            Face::NegY
        } else if axis[2] > 0.5 {
            Face::PosZ
        } else {
            Face::NegZ
        }
    }

    /// The outward normal (the frame's w axis).
    pub fn normal(self) -> [f64; 3] {
        FRAMES[self as usize][2]
    }

    /// The frame's u axis.
    pub fn u_axis(self) -> [f64; 3] {
        FRAMES[self as usize][0]
    }

    /// The frame's v axis.
    pub fn v_axis(self) -> [f64; 3] {
        FRAMES[self as usize][1]
    }

    /// Projects a direction onto this face's (u, v) plane.
    ///
    /// Valid only for directions with a positive component along the
    /// face normal (i.e. directions this face can see).
    pub fn uv(self, p: [f64; 3]) -> (f64, f64) {
        let depth = dot(p, self.normal());
        (dot(p, self.u_axis()) / depth, dot(p, self.v_axis()) / depth)
    }

    /// The cube point for face coordinates (u, v) — not normalized.
    /// (u, v) may lie outside [-1, 1]; the point is then off this face,
    /// which is exactly what seam wrapping exploits.
    pub fn point(self, u: f64, v: f64) -> [f64; 3] {
        let (ua, va, w) = (self.u_axis(), self.v_axis(), self.normal());
        [
            w[0] + u * ua[0] + v * va[0],
            w[1] + u * ua[1] + v * va[1],
            w[2] + u * ua[2] + v * va[2],
        ]
    }
}

pub(crate) fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Scales a frame axis by ±1. Kept exact: components are 0 or ±1.
pub(crate) fn scale(a: [f64; 3], s: f64) -> [f64; 3] {
    [a[0] * s, a[1] * s, a[2] * s]
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_are_right_handed_orthonormal() {
        for face in Face::ALL {
            let (u, v, w) = (face.u_axis(), face.v_axis(), face.normal());
            assert_eq!(dot(u, v), 0.0);
            assert_eq!(dot(u, w), 0.0);
            assert_eq!(dot(v, w), 0.0);
            // u × v should equal w (right-handed).
            let cross = [
                u[1] * v[2] - u[2] * v[1],
                u[2] * v[0] - u[0] * v[2],
                u[0] * v[1] - u[1] * v[0],
            ];
            assert_eq!(cross, w, "face {face:?} frame is left-handed");
        }
    }

    #[test]
    fn test_from_direction_picks_dominant_axis() {
        assert_eq!(Face::from_direction([0.9, 0.1, 0.2]), Face::PosX);
        assert_eq!(Face::from_direction([-0.9, 0.1, 0.2]), Face::NegX);
        assert_eq!(Face::from_direction([0.1, 0.2, -0.9]), Face::NegZ);
    }

    #[test]
    fn test_from_direction_of_normal_is_identity() {
        for face in Face::ALL {
            assert_eq!(Face::from_direction(face.normal()), face);
        }
    }

    #[test]
    fn test_uv_of_face_center_is_origin() {
        for face in Face::ALL {
            assert_eq!(face.uv(face.normal()), (0.0, 0.0));
        }
    }

    #[test]
    fn test_point_uv_round_trip() {
        for face in Face::ALL {
            let p = face.point(0.25, -0.5);
            assert_eq!(Face::from_direction(p), face);
            assert_eq!(face.uv(p), (0.25, -0.5));
        }
    }
}
