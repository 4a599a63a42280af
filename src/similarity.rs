//! Similarity between a track's last known box and a fresh detection.

use serde::{Deserialize, Serialize};

use crate::bbox::BBox;

const NORM_EPSILON: f32 = 1e-10;
const DENOMINATOR_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMethod {
    /// Intersection over union of the two boxes.
    Overlap,
    /// Cosine of the two feature vectors.
    FeatureCosine,
    /// Gated center distance, boosted by a confident feature match.
    Mixed,
}

/// Tuning constants of the [`SimilarityMethod::Mixed`] score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixedGate {
    /// Largest relative width change, as a fraction of the track width.
    pub max_width_change: f32,
    /// Largest relative height change, as a fraction of the track height.
    pub max_height_change: f32,
    /// Largest horizontal center shift, as a fraction of the track width.
    pub max_x_shift: f32,
    /// Largest vertical center shift, as a fraction of the track height.
    pub max_y_shift: f32,
    /// Cosine above which the feature match counts as confident.
    pub cosine_threshold: f32,
    /// Multiplier applied to a confident match.
    pub boost: f32,
}

impl Default for MixedGate {
    fn default() -> Self {
        Self {
            max_width_change: 1.0,
            max_height_change: 1.0,
            max_x_shift: 1.3,
            max_y_shift: 1.0,
            cosine_threshold: 0.66,
            boost: 6.0,
        }
    }
}

/// Scores track/detection pairs with a fixed method.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityScorer {
    pub method: SimilarityMethod,
    pub gate: MixedGate,
}

impl SimilarityScorer {
    pub fn new(method: SimilarityMethod, gate: MixedGate) -> Self {
        Self { method, gate }
    }

    pub fn score(
        &self,
        track_box: &BBox,
        track_feature: Option<&[f32]>,
        detection_box: &BBox,
        detection_feature: Option<&[f32]>,
    ) -> f32 {
        match self.method {
            SimilarityMethod::Overlap => overlap(track_box, detection_box),
            SimilarityMethod::FeatureCosine => feature_cosine(
                track_feature.unwrap_or_default(),
                detection_feature.unwrap_or_default(),
            ),
            SimilarityMethod::Mixed => mixed(
                track_box,
                track_feature.unwrap_or_default(),
                detection_box,
                detection_feature.unwrap_or_default(),
                &self.gate,
            ),
        }
    }
}

pub fn overlap(track_box: &BBox, detection_box: &BBox) -> f32 {
    track_box.iou(detection_box)
}

/// Cosine similarity, 0 for empty, mismatched or near zero vectors.
pub fn feature_cosine(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a <= NORM_EPSILON || norm_b <= NORM_EPSILON {
        return 0.0;
    }
    dot / norm_a / norm_b
}

/// `(1 - |dx| / min_width) * (1 - |dy| / min_height)` over the box centers.
///
/// Factors go negative once a center shift exceeds the smaller extent.
pub fn center_distance_similarity(a: &BBox, b: &BBox) -> f32 {
    let min_width = a.width.min(b.width);
    let min_height = a.height.min(b.height);
    if min_width.abs() < DENOMINATOR_EPSILON || min_height.abs() < DENOMINATOR_EPSILON {
        return 0.0;
    }
    let (ax, ay) = a.center();
    let (bx, by) = b.center();

    let x_factor = 1.0 - (ax - bx).abs() / min_width;
    let y_factor = 1.0 - (ay - by).abs() / min_height;
    x_factor * y_factor
}

pub fn mixed(
    track_box: &BBox,
    track_feature: &[f32],
    detection_box: &BBox,
    detection_feature: &[f32],
    gate: &MixedGate,
) -> f32 {
    let (track_width, track_height) = (track_box.width, track_box.height);
    if track_width.abs() < DENOMINATOR_EPSILON || track_height.abs() < DENOMINATOR_EPSILON {
        return 0.0;
    }

    let width_change = (detection_box.width - track_width).abs() / track_width;
    let height_change = (detection_box.height - track_height).abs() / track_height;
    if width_change > gate.max_width_change || height_change > gate.max_height_change {
        return 0.0;
    }

    let (track_cx, track_cy) = track_box.center();
    let (detection_cx, detection_cy) = detection_box.center();
    let x_shift = (detection_cx - track_cx).abs() / track_width;
    let y_shift = (detection_cy - track_cy).abs() / track_height;
    if x_shift > gate.max_x_shift || y_shift > gate.max_y_shift {
        return 0.0;
    }

    let distance = center_distance_similarity(track_box, detection_box);
    let cosine = feature_cosine(track_feature, detection_feature);
    if cosine > gate.cosine_threshold {
        (distance * cosine * gate.boost).max(1.0)
    } else {
        distance
    }
}
