//! star_texture_maker: star catalog to GPU sky texture
//!
//! Loads a catalog, projects every star through the octahedral unwrap,
//! packs offset, magnitude and temperature into an RGBA PNG.

mod cli;

use anyhow::bail;
use clap::Parser;
use cli::{BuildArgs, CatalogFormat, Cli, Commands, IngestArgs, InspectArgs};
use tracing::info;

use startexture::catalogs::{flat_csv, hipparcos, simbad, StarCatalog};
use startexture::texture::{render_catalog, writer, TextureConfig};

fn load_catalog(
    path: &std::path::Path,
    format: CatalogFormat,
    max_color_index: f64,
) -> anyhow::Result<StarCatalog> {
    info!("Loading {:?} catalog from {}", format, path.display());
    match format {
        CatalogFormat::Simbad => simbad::load_simbad_catalog_from_file(path, max_color_index),
        CatalogFormat::Hipparcos => {
            hipparcos::load_hipparcos_catalog_from_file(path, max_color_index)
        }
        CatalogFormat::Csv => flat_csv::load_flat_csv(path, max_color_index),
        CatalogFormat::Rkyv => StarCatalog::load_from_file(path),
    }
}

fn build(args: &BuildArgs) -> anyhow::Result<()> {
    let config = TextureConfig {
        resolution: args.resolution,
        max_color_index: args.max_color_index,
        ..Default::default()
    };
    config.validate()?;

    let catalog = load_catalog(&args.catalog, args.format, args.max_color_index)?;
    let texture = render_catalog(&catalog, config)?;
    texture.save_png(&args.output)?;

    let stats = texture.stats;
    println!(
        "{} stars placed ({} primary, {} neighbor), {} dropped",
        stats.placed(),
        stats.primary,
        stats.neighbor,
        stats.dropped
    );
    Ok(())
}

fn ingest(args: &IngestArgs) -> anyhow::Result<()> {
    if args.format == CatalogFormat::Rkyv {
        bail!("ingest reads raw catalogs; rkyv archives are already cleaned");
    }
    if args.rkyv.is_none() && args.csv.is_none() {
        bail!("nothing to write: pass --rkyv and/or --csv");
    }

    let catalog = load_catalog(&args.catalog, args.format, args.max_color_index)?;
    if let Some(path) = &args.rkyv {
        catalog.save_to_file(path)?;
    }
    if let Some(path) = &args.csv {
        catalog.write_csv(path)?;
    }
    println!("Wrote out {} stars", catalog.len());
    Ok(())
}

fn inspect(args: &InspectArgs) -> anyhow::Result<()> {
    let image = writer::read_png(&args.texture)?;
    let config = TextureConfig {
        resolution: image.width(),
        ..Default::default()
    };
    let mut stars = startexture::texture::decode::decode_texture(&image, &config);
    let cells = image.width() as usize * image.height() as usize;

    println!("{} x {} x 4", image.width(), image.height());
    println!(
        "{} occupied cells ({:.3}%)",
        stars.len(),
        100.0 * stars.len() as f64 / cells as f64
    );

    stars.sort_by(|a, b| a.v_mag.total_cmp(&b.v_mag));
    for star in stars.iter().take(args.top) {
        println!(
            "  cell ({:4}, {:4})  u {:+.5} v {:+.5}  mag {:5.2}  T {:6.0} K",
            star.cell.px,
            star.cell.py,
            star.planar.u,
            star.planar.v,
            star.v_mag,
            star.temperature_k
        );
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    match &cli.command {
        Commands::Build(args) => build(args),
        Commands::Ingest(args) => ingest(args),
        Commands::Inspect(args) => inspect(args),
    }
}
