use pyo3::{pyclass, pymethods};

use crate::BBox;

#[pyclass(name = "BBox")]
#[derive(Clone)]
pub struct PyBBox {
    pub inner: BBox,
}

#[pymethods]
impl PyBBox {
    #[new]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            inner: BBox::new(x, y, width, height),
        }
    }

    #[getter]
    fn x(&self) -> f32 {
        self.inner.x
    }

    #[getter]
    fn y(&self) -> f32 {
        self.inner.y
    }

    #[getter]
    fn width(&self) -> f32 {
        self.inner.width
    }

    #[getter]
    fn height(&self) -> f32 {
        self.inner.height
    }

    fn iou(&self, other: &PyBBox) -> f32 {
        self.inner.iou(&other.inner)
    }

    fn __repr__(&self) -> String {
        format!(
            "BBox(x={}, y={}, width={}, height={})",
            self.x(),
            self.y(),
            self.width(),
            self.height()
        )
    }

    fn __str__(&self) -> String {
        self.__repr__()
    }
}
