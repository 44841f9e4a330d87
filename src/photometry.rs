//! Photometric conversions from catalog magnitudes.

/// Largest B-V colour index kept in a catalog.
///
/// Redder entries push the temperature approximation towards its pole
/// (B-V = 1.54) and are excluded before projection.
pub const MAX_COLOR_INDEX: f64 = 1.4;

/// Slack for the colour-index cutoff. Catalog magnitudes carry three
/// decimals, so a printed B-V of exactly the cutoff can land a few ulps
/// above it after subtraction.
const COLOR_INDEX_TOLERANCE: f64 = 1e-9;

/// True if `bv` is at or below `max_color_index` at catalog precision
#[inline]
pub fn within_color_cutoff(bv: f64, max_color_index: f64) -> bool {
    bv <= max_color_index + COLOR_INDEX_TOLERANCE
}

/// B-V colour index from blue and visual magnitudes
#[inline]
pub fn color_index(b_mag: f64, v_mag: f64) -> f64 {
    b_mag - v_mag
}

/// Colour temperature in Kelvin for a B-V colour index.
///
///   T = 4600 * (1 / ((0.92 - bv) + 1.7) + 1 / ((0.92 - bv) + 0.62))
///
/// Only meaningful for `bv <= MAX_COLOR_INDEX`; no clamping is applied.
pub fn color_index_to_temperature(bv: f64) -> f64 {
    let shifted = 0.92 - bv;
    4600.0 * (1.0 / (shifted + 1.7) + 1.0 / (shifted + 0.62))
}
