use std::{collections::HashMap, ops::RangeFrom};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    associate::{Matching, associate_detections_to_tracks},
    bbox::BBox,
    config::TrackerConfig,
    error::ConfigError,
    hungarian::HungarianSolver,
    similarity::SimilarityScorer,
    track::{Track, TrackRecord, TrackState},
};

/// One object found in the current frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub bbox: BBox,
    pub class: u32,
    pub score: f32,
    /// Index of the object in the detector output.
    pub member_id: u32,
    pub feature: Option<Vec<f32>>,
}

impl Detection {
    pub fn new(bbox: BBox, class: u32, score: f32, member_id: u32) -> Self {
        Self {
            bbox,
            class,
            score,
            member_id,
            feature: None,
        }
    }

    pub fn with_feature(mut self, feature: Vec<f32>) -> Self {
        self.feature = Some(feature);
        self
    }
}

/// Pairs embedding vectors with detections by member id.
///
/// Detections without an entry keep whatever feature they had.
pub fn attach_features(detections: &mut [Detection], features: Vec<(u32, Vec<f32>)>) {
    let mut by_member: HashMap<u32, Vec<f32>> = features.into_iter().collect();
    for detection in detections.iter_mut() {
        if let Some(feature) = by_member.remove(&detection.member_id) {
            detection.feature = Some(feature);
        }
    }
}

/// Per stream multi object tracker.
///
/// Frames must be fed in arrival order, one `process_frame` call at a time.
pub struct TrackManager {
    tracks: Vec<Track>,
    config: TrackerConfig,
    scorer: SimilarityScorer,
    solver: HungarianSolver,
    unique_id_iter: RangeFrom<u32>,
    frame_count: u64,
}

impl TrackManager {
    pub fn new(config: TrackerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let scorer = SimilarityScorer::new(config.similarity_method(), config.mixed_gate);

        Ok(Self {
            tracks: Vec::new(),
            config,
            scorer,
            solver: HungarianSolver::new(),
            unique_id_iter: 1..,
            frame_count: 0,
        })
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Live tracks in creation order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Drops every track and restarts the id space.
    pub fn reset(&mut self) {
        self.tracks.clear();
        self.unique_id_iter = 1..;
        self.frame_count = 0;
    }

    /// Runs one tracking cycle and reports every live track plus those
    /// removed in this frame.
    pub fn process_frame(&mut self, detections: &[Detection]) -> Vec<TrackRecord> {
        self.frame_count += 1;

        if self.tracks.is_empty() {
            self.spawn_tracks(detections, 0..detections.len());
            return self.collect_records();
        }

        for track in self.tracks.iter_mut() {
            track.last_box = match track.motion.predict() {
                Ok(bbox) => bbox,
                Err(error) => {
                    debug!("track {} has no prediction: {error}", track.id);
                    BBox::default()
                }
            };
        }

        if detections.is_empty() {
            self.tracks.iter_mut().for_each(Track::mark_lost);
            return self.collect_records();
        }

        let matching = match associate_detections_to_tracks(
            &self.tracks,
            detections,
            &self.scorer,
            &mut self.solver,
            self.config.track_threshold,
        ) {
            Ok(matching) => matching,
            Err(error) => {
                warn!(
                    "frame {}: matching failed, marking all tracks lost: {error}",
                    self.frame_count
                );
                self.tracks.iter_mut().for_each(Track::mark_lost);
                return self.collect_records();
            }
        };

        let Matching {
            matched,
            unmatched_tracks,
            unmatched_detections,
        } = matching;
        debug!(
            "frame {}: {} tracks, {} detections, {} matched, {} new",
            self.frame_count,
            self.tracks.len(),
            detections.len(),
            matched.len(),
            unmatched_detections.len()
        );

        for &(track_index, detection_index) in &matched {
            self.tracks[track_index].mark_matched(&detections[detection_index]);
        }
        for &track_index in &unmatched_tracks {
            self.tracks[track_index].mark_lost();
        }
        self.spawn_tracks(detections, unmatched_detections);

        self.collect_records()
    }

    fn spawn_tracks(
        &mut self,
        detections: &[Detection],
        detection_indices: impl IntoIterator<Item = usize>,
    ) {
        let noise = self.config.noise;
        let new_tracks: Vec<Track> = detection_indices
            .into_iter()
            .zip(&mut self.unique_id_iter)
            .map(|(detection_index, id)| Track::new(id, &detections[detection_index], noise))
            .collect();
        self.tracks.extend(new_tracks);
    }

    /// Reports all tracks, then drops lost ones past the threshold.
    fn collect_records(&mut self) -> Vec<TrackRecord> {
        let records = self.tracks.iter().map(Track::record).collect();

        let lost_threshold = self.config.lost_threshold;
        let before = self.tracks.len();
        self.tracks
            .retain(|track| !(track.state == TrackState::Lost && track.lost_age > lost_threshold));
        if self.tracks.len() != before {
            debug!(
                "frame {}: removed {} lost tracks",
                self.frame_count,
                before - self.tracks.len()
            );
        }

        records
    }
}
