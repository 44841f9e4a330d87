//! Module to load stars from the Hipparcos new reduction (I/311)
//!
//! Catalog file:
//! <http://cdsarc.u-strasbg.fr/ftp/I/311/hip2.dat.gz>
//!
//! Fixed-width records; the fields used here are
//!
//! | bytes   | format  | units | field                    |
//! |---------|---------|-------|--------------------------|
//! | 16-28   | F13.10  | rad   | right ascension (ICRS)   |
//! | 30-42   | F13.10  | rad   | declination (ICRS)       |
//! | 130-136 | F7.4    | mag   | Hipparcos magnitude Hp   |
//! | 153-158 | F6.3    | mag   | B-V colour index         |

use std::path::Path;

use anyhow::Context;

use super::{Star, StarCatalog};

const MIN_RECORD_LEN: usize = 158;

/// Convert Hipparcos Hp magnitude to Johnson V using the
/// 4th-order polynomial in B-V from ESA SP-1200, Table 1.3.5.
///
/// Valid for roughly -0.2 < (B-V) < 1.8.
pub fn hp_to_v(hpmag: f64, b_v: f64) -> f64 {
    let delta = 0.304 * b_v - 0.202 * b_v.powi(2) + 0.107 * b_v.powi(3) - 0.045 * b_v.powi(4);
    hpmag - delta
}

fn parse_hipparcos_star(record: &str) -> Option<Star> {
    if record.len() < MIN_RECORD_LEN || !record.is_ascii() {
        return None;
    }
    let ra_rad: f64 = record[15..28].trim().parse().ok()?;
    let dec_rad: f64 = record[29..42].trim().parse().ok()?;
    let hpmag: f64 = record[129..136].trim().parse().ok()?;
    let b_v: f64 = record[152..158].trim().parse().ok()?;

    let v_mag = hp_to_v(hpmag, b_v);
    Some(Star {
        ra_deg: ra_rad.to_degrees(),
        dec_deg: dec_rad.to_degrees(),
        v_mag,
        b_mag: v_mag + b_v,
    })
}

/// Parse raw star records from an in-memory Hipparcos file.
/// Short or unparsable records are skipped.
pub fn parse_hipparcos_records(data: &str) -> Vec<Star> {
    let mut skipped = 0_usize;
    let stars: Vec<Star> = data
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let star = parse_hipparcos_star(line);
            if star.is_none() {
                skipped += 1;
            }
            star
        })
        .collect();
    tracing::info!(
        "Parsed {} Hipparcos records ({} skipped)",
        stars.len(),
        skipped
    );
    stars
}

pub fn load_hipparcos_catalog(data: &str, max_color_index: f64) -> StarCatalog {
    StarCatalog::from_stars(parse_hipparcos_records(data), max_color_index)
}

pub fn load_hipparcos_catalog_from_file<P: AsRef<Path>>(
    path: P,
    max_color_index: f64,
) -> anyhow::Result<StarCatalog> {
    let data = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("reading Hipparcos catalog {}", path.as_ref().display()))?;
    Ok(load_hipparcos_catalog(&data, max_color_index))
}
