use pyo3::{pyclass, pymethods};

use crate::{TrackRecord, TrackState, python_api::PyBBox};

#[pyclass(name = "TrackRecord")]
pub struct PyTrackRecord {
    #[pyo3(get)]
    pub track_id: u32,
    #[pyo3(get)]
    pub age: u32,
    #[pyo3(get)]
    pub hits: u32,
    #[pyo3(get)]
    pub state: String,
    #[pyo3(get)]
    pub member_id: Option<u32>,
    #[pyo3(get)]
    pub class_id: u32,
    pub bbox: PyBBox,
}

impl From<TrackRecord> for PyTrackRecord {
    fn from(record: TrackRecord) -> Self {
        let state = match record.state {
            TrackState::New => "new".to_string(),
            TrackState::Tracked => "tracked".to_string(),
            TrackState::Lost => "lost".to_string(),
        };
        Self {
            track_id: record.track_id,
            age: record.age,
            hits: record.hits,
            state,
            member_id: record.member_id,
            class_id: record.class,
            bbox: PyBBox { inner: record.bbox },
        }
    }
}

#[pymethods]
impl PyTrackRecord {
    #[getter]
    fn bbox(&self) -> PyBBox {
        self.bbox.clone()
    }

    fn __repr__(&self) -> String {
        format!(
            "TrackRecord(track_id={}, age={}, hits={}, state={}, member_id={:?})",
            self.track_id, self.age, self.hits, self.state, self.member_id
        )
    }
}
