//! Multi object tracking core: Kalman box prediction, similarity scoring
//! and Kuhn-Munkres assignment combined into a per frame track lifecycle.

pub mod associate;
pub mod bbox;
pub mod config;
pub mod error;
pub mod hungarian;
pub mod motion_filter;
#[cfg(feature = "python")]
mod python_api;
pub mod similarity;
pub mod track;
pub mod track_manager;

pub use bbox::BBox;
pub use config::TrackerConfig;
pub use error::{AssignmentError, ConfigError, MotionError};
pub use hungarian::{Assignment, HungarianSolver, MAX_SIZE};
pub use motion_filter::{MotionFilter, NoiseModel};
pub use similarity::{MixedGate, SimilarityMethod, SimilarityScorer};
pub use track::{Track, TrackRecord, TrackState};
pub use track_manager::{Detection, TrackManager, attach_features};

#[cfg(feature = "python")]
use pyo3::{
    Bound, PyResult, pymodule,
    types::{PyModule, PyModuleMethods},
};

#[cfg(feature = "python")]
use crate::python_api::{PyBBox, PyDetection, PyTrackManager, PyTrackRecord};

#[cfg(feature = "python")]
#[pymodule]
fn mot_sort(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyBBox>()?;
    m.add_class::<PyDetection>()?;
    m.add_class::<PyTrackManager>()?;
    m.add_class::<PyTrackRecord>()?;

    Ok(())
}
