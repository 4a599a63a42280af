use pyo3::{pyclass, pymethods};

use crate::{Detection, python_api::PyBBox};

#[pyclass(name = "Detection")]
pub struct PyDetection {
    pub inner: Detection,
}

#[pymethods]
impl PyDetection {
    #[new]
    #[pyo3(signature = (bbox, class_id, score, member_id, feature=None))]
    pub fn new(
        bbox: &PyBBox,
        class_id: u32,
        score: f32,
        member_id: u32,
        feature: Option<Vec<f32>>,
    ) -> Self {
        let mut inner = Detection::new(bbox.inner, class_id, score, member_id);
        inner.feature = feature;
        Self { inner }
    }

    #[getter]
    fn bbox(&self) -> PyBBox {
        PyBBox {
            inner: self.inner.bbox,
        }
    }

    #[getter]
    fn class_id(&self) -> u32 {
        self.inner.class
    }

    #[getter]
    fn score(&self) -> f32 {
        self.inner.score
    }

    #[getter]
    fn member_id(&self) -> u32 {
        self.inner.member_id
    }

    #[getter]
    fn feature(&self) -> Option<Vec<f32>> {
        self.inner.feature.clone()
    }
}
