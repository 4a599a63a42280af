use itertools::iproduct;
use log::debug;
use pathfinding::matrix::Matrix;

use crate::{
    error::AssignmentError, hungarian::HungarianSolver, similarity::SimilarityScorer,
    track::Track, track_manager::Detection,
};

// used to convert the float similarity into an integer weight since
// the assignment solver works on integer matrices.
pub const SCORE_MULTIPLIER: f32 = 1000.0;

/// Result of matching the live tracks against one frame of detections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matching {
    /// Accepted `(track index, detection index)` pairs in track order.
    pub matched: Vec<(usize, usize)>,
    pub unmatched_tracks: Vec<usize>,
    pub unmatched_detections: Vec<usize>,
}

/// Builds the `tracks x detections` similarity weights, scaled to integers.
pub fn build_cost_matrix(
    tracks: &[Track],
    detections: &[Detection],
    scorer: &SimilarityScorer,
) -> Matrix<i64> {
    let mut matrix = Matrix::new(tracks.len(), detections.len(), 0);

    for ((i, track), (j, detection)) in iproduct!(
        tracks.iter().enumerate(),
        detections.iter().enumerate()
    ) {
        let score = scorer.score(
            track.last_box(),
            track.feature(),
            &detection.bbox,
            detection.feature.as_deref(),
        );
        matrix[(i, j)] = (score.max(0.0) * SCORE_MULTIPLIER).round() as i64;
    }

    matrix
}

/// Associates the given detections to the given tracks.
///
/// ## Args
///  - tracks: The live tracks, their `last_box` already predicted for this frame.
///  - detections: The detections of this frame.
///  - scorer: Similarity used to weight each pair.
///  - solver: Assignment solver, its workspace is reset on every call.
///  - track_threshold: The minimum similarity needed for a valid association.
///
/// A pair chosen by the solver whose weight is below the threshold leaves
/// both sides unmatched.
pub fn associate_detections_to_tracks(
    tracks: &[Track],
    detections: &[Detection],
    scorer: &SimilarityScorer,
    solver: &mut HungarianSolver,
    track_threshold: f32,
) -> Result<Matching, AssignmentError> {
    let cost_matrix = build_cost_matrix(tracks, detections, scorer);
    let assignment = solver.solve_matrix(&cost_matrix)?;
    // scaled the same way as the matrix entries so the gate stays inclusive
    let min_weight = (track_threshold * SCORE_MULTIPLIER).round() as i64;

    let mut matching = Matching::default();
    let mut claimed = vec![false; detections.len()];

    for (track_index, column) in assignment.row_to_column().iter().enumerate() {
        match *column {
            Some(detection_index)
                if cost_matrix[(track_index, detection_index)] >= min_weight =>
            {
                claimed[detection_index] = true;
                matching.matched.push((track_index, detection_index));
            }
            Some(detection_index) => {
                debug!(
                    "rejected pairing track {} / detection {detection_index}, weight {} below {min_weight}",
                    tracks[track_index].id(),
                    cost_matrix[(track_index, detection_index)]
                );
                matching.unmatched_tracks.push(track_index);
            }
            None => matching.unmatched_tracks.push(track_index),
        }
    }
    matching.unmatched_detections = claimed
        .iter()
        .enumerate()
        .filter(|(_, claimed)| !**claimed)
        .map(|(detection_index, _)| detection_index)
        .collect();

    Ok(matching)
}
