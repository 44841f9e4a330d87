//! CLI argument definitions for star_texture_maker

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use startexture::photometry::MAX_COLOR_INDEX;
use startexture::texture::DEFAULT_RESOLUTION;

#[derive(Parser)]
#[command(name = "star_texture_maker")]
#[command(about = "Pack a star catalog into an octahedral sky texture")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a catalog into an RGBA star texture
    Build(BuildArgs),

    /// Clean a raw catalog once and store it as rkyv and/or CSV
    Ingest(IngestArgs),

    /// Print a summary of an existing star texture
    Inspect(InspectArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CatalogFormat {
    /// SIMBAD pipe-delimited ASCII table
    Simbad,
    /// Hipparcos new reduction (hip2.dat)
    Hipparcos,
    /// Flat CSV with ra_deg,dec_deg,v_mag,b_mag columns
    Csv,
    /// Catalog archive written by `ingest`
    Rkyv,
}

#[derive(Parser)]
pub struct BuildArgs {
    /// Input catalog file
    #[arg(long)]
    pub catalog: PathBuf,

    /// Input catalog format
    #[arg(long, value_enum, default_value = "simbad")]
    pub format: CatalogFormat,

    /// Output PNG path
    #[arg(long)]
    pub output: PathBuf,

    /// Texture width and height in pixels
    #[arg(long, default_value_t = DEFAULT_RESOLUTION)]
    pub resolution: u32,

    /// Drop stars with a B-V colour index above this value
    #[arg(long, default_value_t = MAX_COLOR_INDEX)]
    pub max_color_index: f64,
}

#[derive(Parser)]
pub struct IngestArgs {
    /// Input catalog file
    #[arg(long)]
    pub catalog: PathBuf,

    /// Input catalog format
    #[arg(long, value_enum, default_value = "simbad")]
    pub format: CatalogFormat,

    /// Write the cleaned catalog as an rkyv archive
    #[arg(long)]
    pub rkyv: Option<PathBuf>,

    /// Write the cleaned catalog as flat CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Drop stars with a B-V colour index above this value
    #[arg(long, default_value_t = MAX_COLOR_INDEX)]
    pub max_color_index: f64,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Star texture PNG
    #[arg(long)]
    pub texture: PathBuf,

    /// Number of brightest decoded stars to list
    #[arg(long, default_value = "10")]
    pub top: usize,
}
