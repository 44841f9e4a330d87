use numpy::{ndarray::Array3, PyArray3};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use super::pycatalog::PyStarCatalog;

use crate::texture::{render_catalog, StarTexture, TextureConfig, DEFAULT_RESOLUTION};

#[pyclass(name = "StarTexture")]
pub struct PyStarTexture {
    texture: StarTexture,
}

#[pymethods]
impl PyStarTexture {
    #[new]
    #[pyo3(signature = (catalog, resolution=DEFAULT_RESOLUTION))]
    pub fn new(catalog: &PyStarCatalog, resolution: u32) -> PyResult<Self> {
        let config = TextureConfig {
            resolution,
            ..Default::default()
        };
        config
            .validate()
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        let texture = render_catalog(catalog.inner(), config)
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))?;
        Ok(Self { texture })
    }

    #[getter]
    pub fn resolution(&self) -> u32 {
        self.texture.config().resolution
    }

    /// (primary, neighbor, dropped) allocation counts
    #[getter]
    pub fn stats(&self) -> (usize, usize, usize) {
        let s = self.texture.stats;
        (s.primary, s.neighbor, s.dropped)
    }

    pub fn save_png(&self, path: &str) -> PyResult<()> {
        self.texture
            .save_png(path)
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }

    /// Raster as a (rows, cols, 4) uint8 array
    pub fn texture_array<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let image = &self.texture.image;
        let shape = (image.height() as usize, image.width() as usize, 4);
        let array = Array3::from_shape_vec(shape, image.as_raw().clone())
            .map_err(|_| PyRuntimeError::new_err("Failed to reshape texture buffer"))?;
        Ok(PyArray3::from_owned_array(py, array))
    }

    fn __str__(&self) -> PyResult<String> {
        let s = self.texture.stats;
        Ok(format!(
            "StarTexture:\n  resolution: {0}x{0} px\n  primary: {1}\n  neighbor: {2}\n  dropped: {3}",
            self.texture.config().resolution,
            s.primary,
            s.neighbor,
            s.dropped
        ))
    }
}

/// Render a catalog and write it as PNG in one call
#[pyfunction]
#[pyo3(signature = (catalog, output, resolution=DEFAULT_RESOLUTION))]
pub fn render_star_texture(
    catalog: &PyStarCatalog,
    output: &str,
    resolution: u32,
) -> PyResult<(usize, usize, usize)> {
    let texture = PyStarTexture::new(catalog, resolution)?;
    texture.save_png(output)?;
    Ok(texture.stats())
}
