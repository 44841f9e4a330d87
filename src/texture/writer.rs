//! Lossless PNG serialization of star textures (8-bit RGBA).

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{bail, Context};

use crate::Texture;

pub fn write_png<P: AsRef<Path>>(texture: &Texture, path: P) -> anyhow::Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;

    let mut encoder = png::Encoder::new(BufWriter::new(file), texture.width(), texture.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .with_context(|| format!("writing PNG header to {}", path.display()))?;
    writer
        .write_image_data(texture.as_raw())
        .with_context(|| format!("writing PNG data to {}", path.display()))?;
    writer
        .finish()
        .with_context(|| format!("finishing {}", path.display()))?;
    Ok(())
}

/// Load a square 8-bit RGBA PNG written by [`write_png`]
pub fn read_png<P: AsRef<Path>>(path: P) -> anyhow::Result<Texture> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;

    let decoder = png::Decoder::new(BufReader::new(file));
    let mut reader = decoder
        .read_info()
        .with_context(|| format!("reading PNG header from {}", path.display()))?;
    let mut buffer = vec![0_u8; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buffer)
        .with_context(|| format!("decoding {}", path.display()))?;

    if info.color_type != png::ColorType::Rgba || info.bit_depth != png::BitDepth::Eight {
        bail!(
            "{} is {:?}/{:?}, expected 8-bit RGBA",
            path.display(),
            info.color_type,
            info.bit_depth
        );
    }
    if info.width != info.height {
        bail!(
            "{} is {}x{}, expected a square texture",
            path.display(),
            info.width,
            info.height
        );
    }
    buffer.truncate(info.buffer_size());

    Texture::from_raw(info.width, info.height, buffer)
        .with_context(|| format!("unexpected buffer size in {}", path.display()))
}
