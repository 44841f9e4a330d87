pub mod catalogs;
pub mod photometry;
pub mod texture;

pub use catalogs::{Star, StarCatalog};
pub use texture::{StarTexture, StarTextureMaker, TextureConfig};

#[cfg(feature = "pybindings")]
mod pybindings;

/// Common types used in the library
pub type Vector3 = nalgebra::Vector3<f64>;

/// 8-bit RGBA raster holding one packed star per pixel
pub type Texture = image::ImageBuffer<image::Rgba<u8>, Vec<u8>>;
