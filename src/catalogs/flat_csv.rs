//! Flat CSV star list.
//!
//! Import requires the columns `ra_deg,dec_deg,v_mag,b_mag` (in any
//! order; extra columns are ignored). Export writes those columns plus
//! the derived `color_index` and `temperature_k`.

use std::path::Path;

use anyhow::{Context, Result};

use super::{Star, StarCatalog};

const REQUIRED_COLUMNS: [&str; 4] = ["ra_deg", "dec_deg", "v_mag", "b_mag"];

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| anyhow::anyhow!("Missing {} column", name))
}

fn parse_field(record: &csv::StringRecord, idx: usize) -> Option<f64> {
    record
        .get(idx)
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn parse_star(record: &csv::StringRecord, columns: [usize; 4]) -> Option<Star> {
    let [ra_idx, dec_idx, v_idx, b_idx] = columns;
    Some(Star {
        ra_deg: parse_field(record, ra_idx)?,
        dec_deg: parse_field(record, dec_idx)?,
        v_mag: parse_field(record, v_idx)?,
        b_mag: parse_field(record, b_idx)?,
    })
}

pub fn parse_flat_csv<R: std::io::Read>(reader: R) -> Result<Vec<Star>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers().context("Failed to read CSV header")?.clone();

    let mut columns = [0_usize; 4];
    for (slot, name) in columns.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = column_index(&headers, name)?;
    }

    let mut stars = Vec::new();
    let mut skipped = 0_usize;
    for (row, result) in rdr.records().enumerate() {
        let record = result.context("Failed to read a record from star CSV")?;
        match parse_star(&record, columns) {
            Some(star) => stars.push(star),
            None => {
                tracing::debug!("Skipping CSV row {}", row + 1);
                skipped += 1;
            }
        }
    }

    tracing::info!("Parsed {} CSV rows ({} skipped)", stars.len(), skipped);
    Ok(stars)
}

pub fn load_flat_csv<T: AsRef<Path>>(path: T, max_color_index: f64) -> Result<StarCatalog> {
    let file = std::fs::File::open(path.as_ref())
        .with_context(|| format!("Failed to open star CSV file: {}", path.as_ref().display()))?;
    let stars = parse_flat_csv(file)
        .with_context(|| format!("parsing {}", path.as_ref().display()))?;
    Ok(StarCatalog::from_stars(stars, max_color_index))
}

pub fn write_flat_csv<W: std::io::Write>(catalog: &StarCatalog, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(
        REQUIRED_COLUMNS
            .iter()
            .copied()
            .chain(["color_index", "temperature_k"]),
    )?;
    for star in catalog.stars() {
        wtr.write_record(&[
            star.ra_deg.to_string(),
            star.dec_deg.to_string(),
            star.v_mag.to_string(),
            star.b_mag.to_string(),
            format!("{:.3}", star.color_index()),
            format!("{:.1}", star.temperature_k()),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

impl StarCatalog {
    /// Dump the cleaned catalog as flat CSV
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path.as_ref())
            .with_context(|| format!("creating {}", path.as_ref().display()))?;
        write_flat_csv(self, std::io::BufWriter::new(file))
            .with_context(|| format!("writing {}", path.as_ref().display()))
    }
}
