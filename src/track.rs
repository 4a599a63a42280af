use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    bbox::BBox,
    motion_filter::{MotionFilter, NoiseModel},
    track_manager::Detection,
};

/// Matches needed before a track counts as confirmed.
pub const HITS_THRESHOLD: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackState {
    New,
    Tracked,
    Lost,
}

/// One persistent identity hypothesis.
pub struct Track {
    pub(crate) id: u32,
    pub(crate) age: u32,
    pub(crate) hits: u32,
    pub(crate) lost_age: u32,
    pub(crate) state: TrackState,
    pub(crate) last_box: BBox,
    pub(crate) class: u32,
    pub(crate) member_id: u32,
    pub(crate) feature: Option<Vec<f32>>,
    pub(crate) motion: MotionFilter,
}

impl Track {
    pub(crate) fn new(id: u32, detection: &Detection, noise: NoiseModel) -> Self {
        let mut motion = MotionFilter::new(noise);
        if let Err(error) = motion.init(&detection.bbox) {
            warn!("track {id} starts without motion model: {error}");
        }

        Self {
            id,
            age: 1,
            hits: 1,
            lost_age: 0,
            state: TrackState::New,
            last_box: detection.bbox,
            class: detection.class,
            member_id: detection.member_id,
            feature: detection.feature.clone(),
            motion,
        }
    }

    pub(crate) fn mark_matched(&mut self, detection: &Detection) {
        self.age += 1;
        self.hits += 1;
        self.lost_age = 0;
        if self.hits >= HITS_THRESHOLD {
            self.state = TrackState::Tracked;
        }
        if let Err(error) = self.motion.correct(&detection.bbox) {
            warn!("track {} skipped correction: {error}", self.id);
        }
        self.last_box = detection.bbox;
        self.class = detection.class;
        self.member_id = detection.member_id;
        if let Some(feature) = &detection.feature {
            self.feature = Some(feature.clone());
        }
    }

    pub(crate) fn mark_lost(&mut self) {
        self.state = TrackState::Lost;
        self.age += 1;
        self.lost_age += 1;
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn lost_age(&self) -> u32 {
        self.lost_age
    }

    pub fn state(&self) -> TrackState {
        self.state
    }

    /// Predicted box, or the matched detection's box once corrected.
    pub fn last_box(&self) -> &BBox {
        &self.last_box
    }

    pub fn class(&self) -> u32 {
        self.class
    }

    pub fn member_id(&self) -> u32 {
        self.member_id
    }

    pub fn feature(&self) -> Option<&[f32]> {
        self.feature.as_deref()
    }

    pub fn record(&self) -> TrackRecord {
        TrackRecord {
            track_id: self.id,
            age: self.age,
            hits: self.hits,
            state: self.state,
            member_id: (self.state != TrackState::Lost).then_some(self.member_id),
            bbox: self.last_box,
            class: self.class,
        }
    }
}

/// Per frame report of one track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub track_id: u32,
    pub age: u32,
    pub hits: u32,
    pub state: TrackState,
    /// Detection that fed the track this frame, `None` while lost.
    pub member_id: Option<u32>,
    pub bbox: BBox,
    pub class: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(member_id: u32, bbox: BBox) -> Detection {
        Detection {
            bbox,
            class: 3,
            score: 0.9,
            member_id,
            feature: None,
        }
    }

    #[test]
    fn test_new_track_starts_with_one_hit() {
        let track = Track::new(7, &detection(2, BBox::new(0.0, 0.0, 4.0, 4.0)), NoiseModel::default());

        assert_eq!(track.id(), 7);
        assert_eq!((track.age(), track.hits(), track.lost_age()), (1, 1, 0));
        assert_eq!(track.state(), TrackState::New);
        assert!(track.motion.is_initialized());
        assert_eq!(track.record().member_id, Some(2));
    }

    #[test]
    fn test_track_with_overflowing_box_has_no_motion_model() {
        let track = Track::new(
            1,
            &detection(0, BBox::new(0.0, 0.0, f32::MAX, f32::MAX)),
            NoiseModel::default(),
        );

        assert!(!track.motion.is_initialized());
        assert_eq!(track.state(), TrackState::New);
    }

    #[test]
    fn test_matched_track_is_confirmed_and_lost_track_drops_member() {
        let mut track = Track::new(1, &detection(0, BBox::new(0.0, 0.0, 4.0, 4.0)), NoiseModel::default());
        let mut next = detection(5, BBox::new(1.0, 0.0, 4.0, 4.0));
        next.feature = Some(vec![1.0, 0.0]);

        track.mark_matched(&next);
        assert_eq!(track.state(), TrackState::Tracked);
        assert_eq!((track.age(), track.hits(), track.lost_age()), (2, 2, 0));
        assert_eq!(track.last_box(), &BBox::new(1.0, 0.0, 4.0, 4.0));
        assert_eq!(track.feature(), Some(&[1.0, 0.0][..]));

        track.mark_lost();
        track.mark_lost();
        let record = track.record();
        assert_eq!(record.state, TrackState::Lost);
        assert_eq!(record.member_id, None);
        assert_eq!((record.age, record.hits), (4, 2));
        assert_eq!(track.lost_age(), 2);
    }
}
