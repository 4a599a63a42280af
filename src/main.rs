use mot_sort::{BBox, Detection, TrackManager, TrackerConfig};

fn main() {
    let config = TrackerConfig {
        track_threshold: 0.3,
        lost_threshold: 2,
        ..TrackerConfig::default()
    };
    let Ok(mut manager) = TrackManager::new(config) else {
        eprintln!("invalid tracker configuration");
        return;
    };

    // two objects drifting right, the second one leaves after frame 3
    for frame in 0..6 {
        let step = frame as f32 * 3.0;
        let mut detections = vec![Detection::new(BBox::new(10.0 + step, 20.0, 30.0, 60.0), 0, 0.9, 0)];
        if frame < 3 {
            detections.push(Detection::new(BBox::new(200.0 + step, 40.0, 40.0, 40.0), 1, 0.8, 1));
        }

        let tracks = manager.process_frame(&detections);
        println!("frame {frame}: number of tracks {:?}, Tracks: {:?}", tracks.len(), tracks);
    }
}
