pub mod flat_csv;
pub mod hipparcos;
pub mod simbad;

use std::path::Path;

use anyhow::Context;
use rkyv::{Archive, Deserialize, Serialize};

use crate::photometry;

/// A single catalog entry: equatorial position plus
/// visual and blue magnitudes
#[derive(Archive, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Star {
    pub ra_deg: f64,
    pub dec_deg: f64,
    pub v_mag: f64,
    pub b_mag: f64,
}

impl Star {
    pub fn color_index(&self) -> f64 {
        photometry::color_index(self.b_mag, self.v_mag)
    }

    pub fn temperature_k(&self) -> f64 {
        photometry::color_index_to_temperature(self.color_index())
    }

    pub fn j2000_vec(&self) -> crate::Vector3 {
        crate::texture::projection::radec_to_unit_vector(self.ra_deg, self.dec_deg)
    }

    fn is_finite(&self) -> bool {
        self.ra_deg.is_finite()
            && self.dec_deg.is_finite()
            && self.v_mag.is_finite()
            && self.b_mag.is_finite()
    }
}

/// Catalog columns as parallel sequences of equal length
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogColumns {
    pub ra_deg: Vec<f64>,
    pub dec_deg: Vec<f64>,
    pub v_mag: Vec<f64>,
    pub color_index: Vec<f64>,
}

/// Cleaned star list, sorted by ascending visual magnitude
/// (brightest first), with red outliers removed
#[derive(Archive, Serialize, Deserialize, Debug, Clone, Default)]
pub struct StarCatalog {
    stars: Vec<Star>,
}

impl StarCatalog {
    /// Build a catalog from raw records.
    ///
    /// Records with non-finite fields or a colour index above
    /// `max_color_index` are dropped; the rest are stable-sorted by
    /// visual magnitude so equal magnitudes keep catalog order.
    pub fn from_stars(stars: Vec<Star>, max_color_index: f64) -> Self {
        let total = stars.len();
        let mut stars: Vec<Star> = stars
            .into_iter()
            .filter(|s| {
                s.is_finite() && photometry::within_color_cutoff(s.color_index(), max_color_index)
            })
            .collect();
        stars.sort_by(|a, b| a.v_mag.total_cmp(&b.v_mag));

        tracing::info!(
            "Kept {} of {} stars (color index <= {})",
            stars.len(),
            total,
            max_color_index
        );
        Self { stars }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    pub fn columns(&self) -> CatalogColumns {
        let mut cols = CatalogColumns::default();
        for star in &self.stars {
            cols.ra_deg.push(star.ra_deg);
            cols.dec_deg.push(star.dec_deg);
            cols.v_mag.push(star.v_mag);
            cols.color_index.push(star.color_index());
        }
        cols
    }

    /// Serialize the cleaned catalog to an rkyv archive
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let bytes = rkyv::to_bytes::<rkyv::rancor::Error>(self)
            .map_err(|e| anyhow::anyhow!("Failed to serialize star catalog: {}", e))?;
        std::fs::write(path.as_ref(), &bytes)
            .with_context(|| format!("writing {}", path.as_ref().display()))?;
        tracing::info!(
            "Serialized {} stars into {} bytes ({})",
            self.stars.len(),
            bytes.len(),
            path.as_ref().display()
        );
        Ok(())
    }

    /// Load a catalog previously written by [`StarCatalog::save_to_file`]
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let buffer = std::fs::read(path.as_ref())
            .with_context(|| format!("reading {}", path.as_ref().display()))?;
        rkyv::from_bytes::<StarCatalog, rkyv::rancor::Error>(&buffer)
            .map_err(|e| anyhow::anyhow!("Failed to deserialize star catalog: {}", e))
    }
}
