//! Reconstruct star positions and photometry from a packed texture.
//!
//! This mirrors what a renderer sampling the texture does: a cell with any
//! non-zero channel holds a star whose continuous position is the cell
//! reference point shifted by the decoded sub-pixel offset.

use super::allocator::PixelCell;
use super::encoding;
use super::projection::{pixel_to_planar, PixelCoord, PlanarPoint, SubPixelOffset};
use super::TextureConfig;
use crate::Texture;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodedStar {
    pub cell: PixelCell,
    pub offset: SubPixelOffset,
    pub planar: PlanarPoint,
    pub v_mag: f64,
    pub temperature_k: f64,
}

/// Decode a single cell's channels
pub fn decode_cell(cell: PixelCell, channels: [u8; 4], config: &TextureConfig) -> DecodedStar {
    let offset = SubPixelOffset {
        du: encoding::offset_from_8bit(channels[0]),
        dv: encoding::offset_from_8bit(channels[1]),
    };
    let coord = PixelCoord::from_offset(cell.px as i64, cell.py as i64, offset);
    DecodedStar {
        cell,
        offset,
        planar: pixel_to_planar(coord, config.resolution),
        v_mag: encoding::magnitude_from_8bit(
            channels[2],
            config.bright_mag_bound,
            config.dim_mag_bound,
        ),
        temperature_k: encoding::temperature_from_8bit(
            channels[3],
            config.min_temperature_k,
            config.max_temperature_k,
        ),
    }
}

/// All stars in a texture, in row-major cell order.
///
/// Cells store `(px, py)` at image row `px`, column `py`.
pub fn decode_texture(texture: &Texture, config: &TextureConfig) -> Vec<DecodedStar> {
    texture
        .enumerate_pixels()
        .filter(|(_, _, pixel)| pixel.0.iter().any(|&c| c != 0))
        .map(|(col, row, pixel)| decode_cell(PixelCell { px: row, py: col }, pixel.0, config))
        .collect()
}
