mod pycatalog;
mod pystar;
mod pytexture;

use pyo3::prelude::*;

#[pymodule]
pub fn startexture(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<pystar::PyStar>()?;
    m.add_class::<pycatalog::PyStarCatalog>()?;
    m.add_class::<pytexture::PyStarTexture>()?;
    m.add_function(wrap_pyfunction!(pytexture::render_star_texture, m)?)?;
    Ok(())
}
