use pyo3::exceptions::PyRuntimeError;
use pyo3::prelude::*;

use crate::catalogs::{flat_csv, hipparcos, simbad, StarCatalog};
use crate::photometry::MAX_COLOR_INDEX;

use super::pystar::PyStar;

#[pyclass(name = "StarCatalog")]
pub struct PyStarCatalog {
    catalog: StarCatalog,
}

impl PyStarCatalog {
    pub(crate) fn inner(&self) -> &StarCatalog {
        &self.catalog
    }
}

fn runtime_err(e: anyhow::Error) -> PyErr {
    PyErr::new::<PyRuntimeError, _>(format!("{:#}", e))
}

#[pymethods]
impl PyStarCatalog {
    #[new]
    #[pyo3(signature = (stars, max_color_index=MAX_COLOR_INDEX))]
    pub fn new(stars: Vec<PyStar>, max_color_index: f64) -> Self {
        Self {
            catalog: StarCatalog::from_stars(
                stars.into_iter().map(Into::into).collect(),
                max_color_index,
            ),
        }
    }

    #[staticmethod]
    #[pyo3(signature = (path, max_color_index=MAX_COLOR_INDEX))]
    pub fn from_simbad(path: &str, max_color_index: f64) -> PyResult<Self> {
        let catalog =
            simbad::load_simbad_catalog_from_file(path, max_color_index).map_err(runtime_err)?;
        Ok(Self { catalog })
    }

    #[staticmethod]
    #[pyo3(signature = (path, max_color_index=MAX_COLOR_INDEX))]
    pub fn from_hipparcos(path: &str, max_color_index: f64) -> PyResult<Self> {
        let catalog = hipparcos::load_hipparcos_catalog_from_file(path, max_color_index)
            .map_err(runtime_err)?;
        Ok(Self { catalog })
    }

    #[staticmethod]
    #[pyo3(signature = (path, max_color_index=MAX_COLOR_INDEX))]
    pub fn from_csv(path: &str, max_color_index: f64) -> PyResult<Self> {
        let catalog = flat_csv::load_flat_csv(path, max_color_index).map_err(runtime_err)?;
        Ok(Self { catalog })
    }

    #[staticmethod]
    pub fn from_rkyv(path: &str) -> PyResult<Self> {
        let catalog = StarCatalog::load_from_file(path).map_err(runtime_err)?;
        Ok(Self { catalog })
    }

    pub fn save_rkyv(&self, path: &str) -> PyResult<()> {
        self.catalog.save_to_file(path).map_err(runtime_err)
    }

    pub fn save_csv(&self, path: &str) -> PyResult<()> {
        self.catalog.write_csv(path).map_err(runtime_err)
    }

    /// Parallel (ra_deg, dec_deg, v_mag, color_index) lists
    pub fn columns(&self) -> (Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>) {
        let cols = self.catalog.columns();
        (cols.ra_deg, cols.dec_deg, cols.v_mag, cols.color_index)
    }

    pub fn stars(&self) -> Vec<PyStar> {
        self.catalog
            .stars()
            .iter()
            .cloned()
            .map(PyStar::from)
            .collect()
    }

    pub fn __len__(&self) -> usize {
        self.catalog.len()
    }
}
