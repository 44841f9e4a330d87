//! Equatorial coordinates to texture pixels via an octahedral unwrap.
//!
//! The sphere is normalized onto the L1 unit sphere (an octahedron), the
//! upper four faces map straight onto the unit square and the lower four
//! are folded outwards into its corners. The only discontinuity is along
//! the equator seam of the folded half.

use crate::Vector3;

/// A point on the unfolded octahedron, both coordinates in [-1, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarPoint {
    pub u: f64,
    pub v: f64,
}

/// Continuous position in pixel units, `[0, resolution]` on each axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelCoord {
    pub x: f64,
    pub y: f64,
}

/// Difference between a cell's reference point and the star's
/// continuous position, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubPixelOffset {
    pub du: f64,
    pub dv: f64,
}

/// Unit direction vector for a right ascension / declination in degrees
pub fn radec_to_unit_vector(ra_deg: f64, dec_deg: f64) -> Vector3 {
    let ra_rad = ra_deg.to_radians();
    let dec_rad = dec_deg.to_radians();
    Vector3::new(
        dec_rad.cos() * ra_rad.cos(),
        dec_rad.cos() * ra_rad.sin(),
        dec_rad.sin(),
    )
}

/// Sign that maps zero to zero, unlike `f64::signum`
#[inline]
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Fold a direction onto the unit square.
///
/// `z >= 0` keeps `(x', y')` of the L1-normalized vector; the lower
/// hemisphere becomes `(sign(x')(1 - |y'|), sign(y')(1 - |x'|))`.
pub fn octahedral_fold(dir: &Vector3) -> PlanarPoint {
    let l1 = dir.x.abs() + dir.y.abs() + dir.z.abs();
    let p = dir / l1;
    if p.z >= 0.0 {
        PlanarPoint { u: p.x, v: p.y }
    } else {
        PlanarPoint {
            u: sign(p.x) * (1.0 - p.y.abs()),
            v: sign(p.y) * (1.0 - p.x.abs()),
        }
    }
}

pub fn planar_to_pixel(point: PlanarPoint, resolution: u32) -> PixelCoord {
    let res = resolution as f64;
    PixelCoord {
        x: (point.u + 1.0) / 2.0 * res,
        y: (point.v + 1.0) / 2.0 * res,
    }
}

/// Inverse of [`planar_to_pixel`]
pub fn pixel_to_planar(coord: PixelCoord, resolution: u32) -> PlanarPoint {
    let res = resolution as f64;
    PlanarPoint {
        u: coord.x / res * 2.0 - 1.0,
        v: coord.y / res * 2.0 - 1.0,
    }
}

impl PixelCoord {
    /// Unwrapped integer cell holding this position: `ceil(c) - 1` per axis.
    ///
    /// A coordinate exactly on a cell boundary belongs to the lower cell, so
    /// `0.0` yields `-1`; callers wrap it into the texture.
    pub fn home_cell(&self) -> (i64, i64) {
        (self.x.ceil() as i64 - 1, self.y.ceil() as i64 - 1)
    }

    /// Offset stored for this position when it lands in cell `(cx, cy)`.
    ///
    /// Measured from the cell reference `c - 0.5` to the position shifted
    /// down by one pixel: `(c - 0.5) - (p - 1)`. Renderers reconstruct
    /// positions with the same convention, so both halves must match.
    pub fn offset_from(&self, cx: i64, cy: i64) -> SubPixelOffset {
        SubPixelOffset {
            du: (cx as f64 - 0.5) - (self.x - 1.0),
            dv: (cy as f64 - 0.5) - (self.y - 1.0),
        }
    }

    /// Inverse of [`PixelCoord::offset_from`]
    pub fn from_offset(cx: i64, cy: i64, offset: SubPixelOffset) -> Self {
        PixelCoord {
            x: cx as f64 + 0.5 - offset.du,
            y: cy as f64 + 0.5 - offset.dv,
        }
    }

    /// Distance to the reference point `c - 0.5` of cell `(cx, cy)`
    pub fn distance_to_cell(&self, cx: i64, cy: i64) -> f64 {
        (self.x - (cx as f64 - 0.5)).hypot(self.y - (cy as f64 - 0.5))
    }
}

/// Project a catalog position all the way to pixel space
pub fn project_radec(ra_deg: f64, dec_deg: f64, resolution: u32) -> PixelCoord {
    let dir = radec_to_unit_vector(ra_deg, dec_deg);
    planar_to_pixel(octahedral_fold(&dir), resolution)
}
