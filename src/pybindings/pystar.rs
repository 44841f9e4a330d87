use crate::Star;
use pyo3::prelude::*;

#[pyclass(name = "Star")]
#[derive(Clone)]
pub struct PyStar {
    inner: Star,
}

#[pymethods]
impl PyStar {
    #[new]
    pub fn new(ra_deg: f64, dec_deg: f64, v_mag: f64, b_mag: f64) -> Self {
        Self {
            inner: Star {
                ra_deg,
                dec_deg,
                v_mag,
                b_mag,
            },
        }
    }

    #[getter]
    pub fn ra_deg(&self) -> f64 {
        self.inner.ra_deg
    }

    #[getter]
    pub fn dec_deg(&self) -> f64 {
        self.inner.dec_deg
    }

    #[getter]
    pub fn v_mag(&self) -> f64 {
        self.inner.v_mag
    }

    #[getter]
    pub fn b_mag(&self) -> f64 {
        self.inner.b_mag
    }

    #[getter]
    pub fn color_index(&self) -> f64 {
        self.inner.color_index()
    }

    #[getter]
    pub fn temperature_k(&self) -> f64 {
        self.inner.temperature_k()
    }

    #[getter]
    pub fn j2000_vec(&self) -> (f64, f64, f64) {
        let v = self.inner.j2000_vec();
        (v.x, v.y, v.z)
    }
}

impl From<Star> for PyStar {
    fn from(value: Star) -> Self {
        Self { inner: value }
    }
}

impl From<PyStar> for Star {
    fn from(value: PyStar) -> Self {
        value.inner
    }
}
