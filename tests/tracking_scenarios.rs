use mot_sort::{BBox, Detection, TrackManager, TrackState, TrackerConfig};

fn detection(member_id: u32, x: f32, y: f32) -> Detection {
    Detection::new(BBox::new(x, y, 10.0, 10.0), 0, 0.9, member_id)
}

fn manager(track_threshold: f32, lost_threshold: u32) -> TrackManager {
    TrackManager::new(TrackerConfig {
        track_threshold,
        lost_threshold,
        ..TrackerConfig::default()
    })
    .unwrap()
}

#[test]
fn test_identical_detections_keep_every_track() {
    let mut manager = manager(0.5, 2);
    let frame = [
        detection(0, 0.0, 0.0),
        detection(1, 20.0, 0.0),
        detection(2, 40.0, 0.0),
    ];
    manager.process_frame(&frame);

    let records = manager.process_frame(&frame);

    assert_eq!(records.len(), 3);
    for (index, record) in records.iter().enumerate() {
        assert_eq!(record.track_id, index as u32 + 1);
        assert_eq!(record.member_id, Some(index as u32));
        assert_eq!(record.hits, 2);
        assert_eq!(record.state, TrackState::Tracked);
    }
}

#[test]
fn test_track_without_detections_is_removed_after_lost_threshold() {
    let mut manager = manager(0.5, 2);
    manager.process_frame(&[detection(0, 0.0, 0.0)]);

    let first = manager.process_frame(&[]);
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].state, TrackState::Lost);

    let second = manager.process_frame(&[]);
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].state, TrackState::Lost);

    // reported one last time while being removed
    let third = manager.process_frame(&[]);
    assert_eq!(third.len(), 1);
    assert_eq!(third[0].state, TrackState::Lost);
    assert_eq!(third[0].member_id, None);
    assert!(manager.tracks().is_empty());

    assert!(manager.process_frame(&[]).is_empty());
}

#[test]
fn test_detections_without_tracks_spawn_new_tracks() {
    let mut manager = manager(0.5, 2);

    let records = manager.process_frame(&[detection(0, 0.0, 0.0), detection(1, 50.0, 50.0)]);

    assert_eq!(records.len(), 2);
    for record in &records {
        assert_eq!(record.state, TrackState::New);
        assert_eq!((record.hits, record.age), (1, 1));
    }
}

#[test]
fn test_matched_every_frame_accumulates_hits() {
    let mut manager = manager(0.3, 2);
    manager.process_frame(&[detection(0, 0.0, 0.0)]);

    for frame_count in 1..8u32 {
        let x = frame_count as f32 * 2.0;
        let records = manager.process_frame(&[detection(0, x, 0.0)]);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].track_id, 1);
        assert_eq!(records[0].hits, frame_count + 1);
        assert_eq!(records[0].age, frame_count + 1);
        assert_eq!(records[0].state, TrackState::Tracked);
    }
}

#[test]
fn test_track_that_stops_matching_is_lost_then_removed() {
    let lost_threshold = 3;
    let mut manager = manager(0.3, lost_threshold);
    let k = 4;
    for frame in 0..=k {
        manager.process_frame(&[detection(0, frame as f32, 0.0)]);
    }

    // the object jumps far away, the old track never matches again
    for frame in (k + 1)..=(k + lost_threshold) {
        let records = manager.process_frame(&[detection(0, 500.0, 500.0)]);
        let old = records.iter().find(|record| record.track_id == 1).unwrap();
        assert_eq!(old.state, TrackState::Lost, "frame {frame}");
        assert!(manager.tracks().iter().any(|track| track.id() == 1));
    }

    let records = manager.process_frame(&[detection(0, 500.0, 500.0)]);
    assert!(records.iter().any(|record| record.track_id == 1));
    assert!(manager.tracks().iter().all(|track| track.id() != 1));
}

#[test]
fn test_moving_object_keeps_identity() {
    let mut manager = manager(0.3, 1);
    for frame in 0..20 {
        let x = 100.0 + frame as f32 * 3.0;
        let records = manager.process_frame(&[detection(0, x, 50.0)]);

        assert_eq!(records.len(), 1, "frame {frame}");
        assert_eq!(records[0].track_id, 1, "frame {frame}");
    }
}

#[test]
fn test_crossing_detections_are_assigned_globally() {
    let mut manager = manager(0.1, 2);
    manager.process_frame(&[detection(0, 0.0, 0.0), detection(1, 12.0, 0.0)]);

    // order swapped in the detector output
    let records = manager.process_frame(&[detection(0, 12.0, 0.0), detection(1, 1.0, 0.0)]);

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].track_id, 1);
    assert_eq!(records[0].member_id, Some(1));
    assert_eq!(records[1].track_id, 2);
    assert_eq!(records[1].member_id, Some(0));
}

#[test]
fn test_features_drive_mixed_matching() {
    let mut manager = TrackManager::new(TrackerConfig {
        with_features: true,
        lost_threshold: 2,
        ..TrackerConfig::default()
    })
    .unwrap();
    manager.process_frame(&[
        detection(0, 0.0, 0.0).with_feature(vec![1.0, 0.0]),
        detection(1, 11.0, 0.0).with_feature(vec![0.0, 1.0]),
    ]);

    // both detections sit between the tracks; the embeddings decide
    let records = manager.process_frame(&[
        detection(0, 6.0, 0.0).with_feature(vec![0.0, 1.0]),
        detection(1, 5.0, 0.0).with_feature(vec![1.0, 0.0]),
    ]);

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].member_id, Some(1));
    assert_eq!(records[1].member_id, Some(0));
}
