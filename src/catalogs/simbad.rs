//! Module to load stars from a SIMBAD ASCII query result
//!
//! SIMBAD returns a `|`-delimited table preceded by a free-text preamble
//! and followed by a footer:
//!
//! ```text
//! C.D.S.  -  SIMBAD4 rel 1.8  -  2023.11.02CET09:18:26
//!
//! Number of objects : 15427
//!
//!  #|      identifier      |typ|     coord2 (ICRS,J2000/2000)      |Mag V |Mag B |
//! --|----------------------|---|-----------------------------------|------|------|
//! 1 |* alf CMa             |SB*|101.28715533 -16.71611586          |-1.46 |-1.46 |
//! 2 |* alf Car             |*  |95.98795778 -52.69566138           |-0.74 |-0.54 |
//! ================================================================================
//! ```
//!
//! Only the coordinate column (decimal degrees, `"ra dec"`) and the two
//! magnitude columns are used. Missing values are written as `~`.

use std::path::Path;

use anyhow::{bail, Context};

use super::{Star, StarCatalog};

const SENTINEL: &str = "~";

/// Column positions of the fields we care about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnLayout {
    coord: usize,
    v_mag: usize,
    b_mag: usize,
}

impl ColumnLayout {
    fn from_header(line: &str) -> Option<Self> {
        if !line.contains('|') {
            return None;
        }
        let mut coord = None;
        let mut v_mag = None;
        let mut b_mag = None;
        for (idx, cell) in line.split('|').enumerate() {
            let cell = cell.trim();
            if coord.is_none() && cell.starts_with("coord") {
                coord = Some(idx);
            } else if cell == "Mag V" {
                v_mag = Some(idx);
            } else if cell == "Mag B" {
                b_mag = Some(idx);
            }
        }
        Some(Self {
            coord: coord?,
            v_mag: v_mag?,
            b_mag: b_mag?,
        })
    }

    fn min_cells(&self) -> usize {
        self.coord.max(self.v_mag).max(self.b_mag) + 1
    }
}

/// Rows that carry table decoration rather than data
fn is_separator(line: &str) -> bool {
    line.chars()
        .all(|c| matches!(c, '-' | '=' | '+' | '|') || c.is_whitespace())
}

fn parse_value(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() || cell == SENTINEL {
        return None;
    }
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_coord(cell: &str) -> Option<(f64, f64)> {
    let mut parts = cell.split_whitespace();
    let ra = parse_value(parts.next()?)?;
    let dec = parse_value(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    Some((ra, dec))
}

fn parse_simbad_row(line: &str, layout: &ColumnLayout) -> Option<Star> {
    let cells: Vec<&str> = line.split('|').collect();
    if cells.len() < layout.min_cells() {
        return None;
    }
    let (ra_deg, dec_deg) = parse_coord(cells[layout.coord])?;
    Some(Star {
        ra_deg,
        dec_deg,
        v_mag: parse_value(cells[layout.v_mag])?,
        b_mag: parse_value(cells[layout.b_mag])?,
    })
}

/// Parse raw star records from an in-memory SIMBAD table.
///
/// Returns an empty list for an empty source. A non-empty source with no
/// recognisable header row is an error.
pub fn parse_simbad_table(data: &str) -> anyhow::Result<Vec<Star>> {
    if data.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut lines = data.lines().enumerate();
    let layout = loop {
        match lines.next() {
            Some((_, line)) => {
                if let Some(layout) = ColumnLayout::from_header(line) {
                    break layout;
                }
            }
            None => bail!("no header row with coord, Mag V and Mag B columns"),
        }
    };

    let mut stars = Vec::new();
    let mut skipped = 0_usize;
    for (line_num, line) in lines {
        if line.trim().is_empty() || is_separator(line) {
            continue;
        }
        if ColumnLayout::from_header(line) == Some(layout) {
            continue;
        }
        match parse_simbad_row(line, &layout) {
            Some(star) => stars.push(star),
            None => {
                tracing::debug!("Skipping SIMBAD line {}: {:?}", line_num + 1, line.trim());
                skipped += 1;
            }
        }
    }

    tracing::info!(
        "Parsed {} SIMBAD rows ({} skipped)",
        stars.len(),
        skipped
    );
    Ok(stars)
}

/// Load and clean a SIMBAD table
pub fn load_simbad_catalog(data: &str, max_color_index: f64) -> anyhow::Result<StarCatalog> {
    let stars = parse_simbad_table(data)?;
    Ok(StarCatalog::from_stars(stars, max_color_index))
}

pub fn load_simbad_catalog_from_file<P: AsRef<Path>>(
    path: P,
    max_color_index: f64,
) -> anyhow::Result<StarCatalog> {
    let data = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("reading SIMBAD table {}", path.as_ref().display()))?;
    load_simbad_catalog(&data, max_color_index)
        .with_context(|| format!("parsing SIMBAD table {}", path.as_ref().display()))
}
