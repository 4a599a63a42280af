use pyo3::{PyRef, PyResult, exceptions::PyValueError, pyclass, pymethods};

use crate::{
    Detection, TrackManager, TrackerConfig,
    python_api::{PyDetection, PyTrackRecord},
};

#[pyclass(name = "TrackManager", unsendable)]
pub struct PyTrackManager {
    inner: TrackManager,
}

#[pymethods]
impl PyTrackManager {
    #[new]
    #[pyo3(signature = (track_threshold=0.5, lost_threshold=5, with_features=false))]
    pub fn new(track_threshold: f32, lost_threshold: u32, with_features: bool) -> PyResult<Self> {
        let config = TrackerConfig {
            track_threshold,
            lost_threshold,
            with_features,
            ..TrackerConfig::default()
        };
        let inner =
            TrackManager::new(config).map_err(|error| PyValueError::new_err(error.to_string()))?;
        Ok(Self { inner })
    }

    pub fn tracks(&self) -> Vec<PyTrackRecord> {
        self.inner
            .tracks()
            .iter()
            .map(|track| PyTrackRecord::from(track.record()))
            .collect()
    }

    pub fn process_frame(&mut self, detections: Vec<PyRef<PyDetection>>) -> Vec<PyTrackRecord> {
        let inner_detections = detections
            .iter()
            .map(|detection| detection.inner.clone())
            .collect::<Vec<Detection>>();

        self.inner
            .process_frame(&inner_detections)
            .into_iter()
            .map(PyTrackRecord::from)
            .collect()
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }
}
