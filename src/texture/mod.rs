pub mod allocator;
pub mod decode;
pub mod encoding;
pub mod projection;
pub mod writer;

use std::path::Path;

use anyhow::bail;

use allocator::{AllocationStats, PixelAllocator, PixelCell, Placement};
use projection::SubPixelOffset;

use crate::catalogs::{Star, StarCatalog};
use crate::photometry;
use crate::Texture;

pub const DEFAULT_RESOLUTION: u32 = 1024;
/// Largest accepted texture side, 1 GiB of RGBA
pub const MAX_RESOLUTION: u32 = 16384;

/// Texture geometry and channel normalization bounds
#[derive(Debug, Clone, PartialEq)]
pub struct TextureConfig {
    pub resolution: u32,
    pub max_color_index: f64,
    pub bright_mag_bound: f64,
    pub dim_mag_bound: f64,
    pub min_temperature_k: f64,
    pub max_temperature_k: f64,
}

impl Default for TextureConfig {
    fn default() -> Self {
        TextureConfig {
            resolution: DEFAULT_RESOLUTION,
            max_color_index: photometry::MAX_COLOR_INDEX,
            bright_mag_bound: encoding::BRIGHT_MAG_BOUND,
            dim_mag_bound: encoding::DIM_MAG_BOUND,
            min_temperature_k: encoding::MIN_TEMPERATURE_K,
            max_temperature_k: encoding::MAX_TEMPERATURE_K,
        }
    }
}

impl TextureConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.resolution == 0 {
            bail!("Texture resolution must be positive");
        }
        if self.resolution > MAX_RESOLUTION {
            bail!(
                "Texture resolution {} exceeds the maximum of {}",
                self.resolution,
                MAX_RESOLUTION
            );
        }
        if !self.max_color_index.is_finite() {
            bail!("Maximum color index must be finite");
        }
        if !(self.bright_mag_bound.is_finite()
            && self.dim_mag_bound.is_finite()
            && self.bright_mag_bound < self.dim_mag_bound)
        {
            bail!(
                "Magnitude bounds must satisfy bright < dim (got {} / {})",
                self.bright_mag_bound,
                self.dim_mag_bound
            );
        }
        if !(self.min_temperature_k > 0.0
            && self.max_temperature_k.is_finite()
            && self.min_temperature_k < self.max_temperature_k)
        {
            bail!(
                "Temperature bounds must satisfy 0 < min < max (got {} / {})",
                self.min_temperature_k,
                self.max_temperature_k
            );
        }
        Ok(())
    }

    /// Channel values for a star: offset x, offset y, magnitude, temperature
    pub fn encode_star(&self, star: &Star, offset: SubPixelOffset) -> [u8; 4] {
        [
            encoding::offset_to_8bit(offset.du),
            encoding::offset_to_8bit(offset.dv),
            encoding::magnitude_to_8bit(star.v_mag, self.bright_mag_bound, self.dim_mag_bound),
            encoding::temperature_to_8bit(
                star.temperature_k(),
                self.min_temperature_k,
                self.max_temperature_k,
            ),
        ]
    }
}

/// Incrementally packs stars into a texture.
///
/// Stars claim cells in the order they are added, so feed them
/// brightest first.
pub struct StarTextureMaker {
    config: TextureConfig,
    allocator: PixelAllocator,
    texture: Texture,
    filtered: usize,
}

impl StarTextureMaker {
    pub fn new(config: TextureConfig) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self {
            allocator: PixelAllocator::new(config.resolution),
            texture: Texture::new(config.resolution, config.resolution),
            config,
            filtered: 0,
        })
    }

    pub fn config(&self) -> &TextureConfig {
        &self.config
    }

    pub fn stats(&self) -> AllocationStats {
        self.allocator.stats()
    }

    fn write_cell(&mut self, cell: PixelCell, channels: [u8; 4]) {
        // Cell (px, py) lives at row px, column py
        self.texture.put_pixel(cell.py, cell.px, image::Rgba(channels));
    }

    /// Place one star. Returns `None` if its colour index is above the
    /// configured cutoff and it was never projected.
    pub fn add_star(&mut self, star: &Star) -> Option<Placement> {
        if !photometry::within_color_cutoff(star.color_index(), self.config.max_color_index) {
            self.filtered += 1;
            return None;
        }
        let coord = projection::project_radec(star.ra_deg, star.dec_deg, self.config.resolution);
        let placement = self.allocator.allocate(coord);
        match placement {
            Placement::Primary { cell, offset } | Placement::Neighbor { cell, offset } => {
                let channels = self.config.encode_star(star, offset);
                self.write_cell(cell, channels);
            }
            Placement::Dropped => {
                tracing::debug!(
                    "No free cell for star at ra {:.4} dec {:.4} (mag {:.2})",
                    star.ra_deg,
                    star.dec_deg,
                    star.v_mag
                );
            }
        }
        Some(placement)
    }

    pub fn add_catalog(&mut self, catalog: &StarCatalog) -> AllocationStats {
        for star in catalog.stars() {
            self.add_star(star);
        }
        self.allocator.stats()
    }

    pub fn finish(self) -> StarTexture {
        let stats = self.allocator.stats();
        tracing::info!(
            "Placed {} stars ({} displaced to a neighbor), {} filtered by color index",
            stats.placed(),
            stats.neighbor,
            self.filtered
        );
        if stats.dropped > 0 {
            tracing::warn!("Dropped {} stars with no free cell nearby", stats.dropped);
        }
        StarTexture {
            image: self.texture,
            stats,
            config: self.config,
        }
    }
}

/// Finished texture and its allocation report
#[derive(Debug, Clone)]
pub struct StarTexture {
    pub image: Texture,
    pub stats: AllocationStats,
    config: TextureConfig,
}

impl StarTexture {
    pub fn config(&self) -> &TextureConfig {
        &self.config
    }

    /// Channels stored for a cell
    pub fn cell(&self, cell: PixelCell) -> [u8; 4] {
        self.image.get_pixel(cell.py, cell.px).0
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        writer::write_png(&self.image, path.as_ref())?;
        tracing::info!(
            "Wrote {}x{} star texture to {}",
            self.image.width(),
            self.image.height(),
            path.as_ref().display()
        );
        Ok(())
    }

    pub fn decode(&self) -> Vec<decode::DecodedStar> {
        decode::decode_texture(&self.image, &self.config)
    }
}

/// Pack a whole catalog into a texture
pub fn render_catalog(catalog: &StarCatalog, config: TextureConfig) -> anyhow::Result<StarTexture> {
    let mut maker = StarTextureMaker::new(config)?;
    maker.add_catalog(catalog);
    Ok(maker.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn star(ra_deg: f64, dec_deg: f64, v_mag: f64, b_mag: f64) -> Star {
        Star {
            ra_deg,
            dec_deg,
            v_mag,
            b_mag,
        }
    }

    fn config(resolution: u32) -> TextureConfig {
        TextureConfig {
            resolution,
            ..Default::default()
        }
    }

    #[test]
    fn test_default_config_valid() {
        let cfg = TextureConfig::default();
        assert_eq!(cfg.resolution, 1024);
        assert_eq!(cfg.max_color_index, 1.4);
        assert_eq!(cfg.bright_mag_bound, -1.46);
        assert_eq!(cfg.dim_mag_bound, 7.0);
        assert_eq!(cfg.min_temperature_k, 2650.0);
        assert_eq!(cfg.max_temperature_k, 37000.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_invalid_configs() {
        assert!(StarTextureMaker::new(config(0)).is_err());
        assert!(config(MAX_RESOLUTION).validate().is_ok());
        assert!(config(MAX_RESOLUTION + 1).validate().is_err());
        assert!(StarTextureMaker::new(config(4_000_000_000)).is_err());
        let cfg = TextureConfig {
            bright_mag_bound: 8.0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
        let cfg = TextureConfig {
            min_temperature_k: 0.0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_origin_lands_on_right_edge() {
        let catalog = StarCatalog::from_stars(vec![star(0.0, 0.0, 1.0, 1.5)], 1.4);
        let texture = render_catalog(&catalog, config(1024)).expect("rendering");
        let cell = PixelCell { px: 1023, py: 511 };
        let channels = texture.cell(cell);
        assert!(channels.iter().any(|&c| c != 0));

        // Raw position (1024, 512) sits on the corner of cell (1023, 511)
        assert_eq!(channels[0], encoding::offset_to_8bit(-0.5));
        assert_eq!(channels[1], encoding::offset_to_8bit(-0.5));
        assert_eq!(texture.stats.primary, 1);

        let decoded = texture.decode();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].cell, cell);
        assert_abs_diff_eq!(decoded[0].planar.u, 1.0, epsilon = 1e-3);
        assert_abs_diff_eq!(decoded[0].planar.v, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_collision_keeps_brighter_star() {
        // Identical positions, dimmer star listed first in the raw catalog
        let dim = star(45.0, 30.0, 5.0, 5.6);
        let bright = star(45.0, 30.0, 1.0, 1.2);
        let catalog = StarCatalog::from_stars(vec![dim.clone(), bright.clone()], 1.4);
        let cfg = config(256);
        let texture = render_catalog(&catalog, cfg.clone()).expect("rendering");

        let coord = projection::project_radec(45.0, 30.0, 256);
        let (hx, hy) = coord.home_cell();
        let home = PixelCell {
            px: allocator::wrap_coordinate(hx, 256),
            py: allocator::wrap_coordinate(hy, 256),
        };
        let home_channels = texture.cell(home);
        assert_eq!(
            home_channels,
            cfg.encode_star(&bright, coord.offset_from(hx, hy))
        );

        let dim_mag = encoding::magnitude_to_8bit(5.0, cfg.bright_mag_bound, cfg.dim_mag_bound);
        let decoded = texture.decode();
        assert_eq!(decoded.len(), 2);
        let displaced = decoded
            .iter()
            .find(|s| s.cell != home)
            .expect("dimmer star placed");
        let dx = (displaced.cell.px as i64 - home.px as i64).abs();
        let dy = (displaced.cell.py as i64 - home.py as i64).abs();
        assert!(dx <= 1 && dy <= 1);
        assert_eq!(texture.cell(displaced.cell)[2], dim_mag);
        assert_eq!(texture.stats.neighbor, 1);
    }

    #[test]
    fn test_red_star_never_written() {
        let red = star(120.0, -20.0, 2.0, 3.5);
        let texture = {
            let mut maker = StarTextureMaker::new(config(64)).expect("maker");
            assert!(maker.add_star(&red).is_none());
            maker.finish()
        };
        assert!(texture.image.as_raw().iter().all(|&c| c == 0));

        let catalog = StarCatalog::from_stars(vec![red, star(10.0, 10.0, 2.0, 2.5)], 1.4);
        let texture = render_catalog(&catalog, config(64)).expect("rendering");
        assert_eq!(texture.decode().len(), 1);
        assert_eq!(texture.stats.total(), 1);
    }

    #[test]
    fn test_star_on_color_cutoff_written() {
        // B - V = 4.4 - 3.0 sits exactly on the 1.4 cutoff
        let mut maker = StarTextureMaker::new(config(64)).expect("maker");
        let placement = maker.add_star(&star(120.0, -20.0, 3.0, 4.4));
        assert!(matches!(placement, Some(Placement::Primary { .. })));
        let texture = maker.finish();
        assert_eq!(texture.decode().len(), 1);
    }

    #[test]
    fn test_all_zero_star_still_claims_cell() {
        // Magnitude and temperature channels both saturate to zero
        let mut maker = StarTextureMaker::new(config(16)).expect("maker");
        let ghost = star(0.0, 0.0, 9.0, 7.0);
        let first = maker.add_star(&ghost).and_then(|p| p.cell());
        let second = maker.add_star(&ghost).and_then(|p| p.cell());
        assert!(first.is_some() && second.is_some());
        assert_ne!(first, second);
    }

    #[test]
    fn test_dense_cluster_drops_excess() {
        let stars: Vec<Star> = (0..12).map(|i| star(200.0, 45.0, i as f64 * 0.1, 0.5)).collect();
        let catalog = StarCatalog::from_stars(stars, 1.4);
        let texture = render_catalog(&catalog, config(128)).expect("rendering");
        assert_eq!(texture.stats.primary, 1);
        assert_eq!(texture.stats.neighbor, 8);
        assert_eq!(texture.stats.dropped, 3);
        assert_eq!(texture.decode().len(), 9);
    }

    #[test]
    fn test_saved_texture_reloads() {
        let dir = tempfile::TempDir::new().expect("creating temp dir");
        let path = dir.path().join("stars.png");
        let catalog = StarCatalog::from_stars(
            vec![star(10.0, 20.0, 0.5, 0.7), star(250.0, -60.0, 3.0, 3.1)],
            1.4,
        );
        let texture = render_catalog(&catalog, config(32)).expect("rendering");
        texture.save_png(&path).expect("saving texture");

        let loaded = writer::read_png(&path).expect("loading texture");
        assert_eq!(loaded.as_raw(), texture.image.as_raw());
    }
}
