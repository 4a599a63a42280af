mod py_bbox;
mod py_detection;
mod py_track_manager;
mod py_track_record;

pub use py_bbox::PyBBox;
pub use py_detection::PyDetection;
pub use py_track_manager::PyTrackManager;
pub use py_track_record::PyTrackRecord;
