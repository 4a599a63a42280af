use serde::{Deserialize, Serialize};

use crate::{
    error::ConfigError,
    motion_filter::NoiseModel,
    similarity::{MixedGate, SimilarityMethod},
};

/// Settings of one tracking stream, fixed at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Similarity floor in `[0, 1]` below which a pairing is rejected.
    pub track_threshold: f32,
    /// Consecutive unmatched frames tolerated before a track is removed.
    pub lost_threshold: u32,
    /// Detections carry feature vectors.
    pub with_features: bool,
    /// Overrides the method implied by `with_features`.
    pub similarity_method: Option<SimilarityMethod>,
    pub mixed_gate: MixedGate,
    pub noise: NoiseModel,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            track_threshold: 0.5,
            lost_threshold: 5,
            with_features: false,
            similarity_method: None,
            mixed_gate: MixedGate::default(),
            noise: NoiseModel::default(),
        }
    }
}

impl TrackerConfig {
    /// Effective similarity method: the override, else `Mixed` with features and `Overlap` without.
    pub fn similarity_method(&self) -> SimilarityMethod {
        match self.similarity_method {
            Some(method) => method,
            None if self.with_features => SimilarityMethod::Mixed,
            None => SimilarityMethod::Overlap,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.track_threshold) {
            return Err(ConfigError::TrackThreshold(self.track_threshold));
        }

        let NoiseModel {
            process,
            measurement,
            initial_covariance,
        } = self.noise;
        for (name, value) in [
            ("process", process),
            ("measurement", measurement),
            ("initial_covariance", initial_covariance),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NoiseModel { name, value });
            }
        }

        let gate = &self.mixed_gate;
        for (name, value) in [
            ("max_width_change", gate.max_width_change),
            ("max_height_change", gate.max_height_change),
            ("max_x_shift", gate.max_x_shift),
            ("max_y_shift", gate.max_y_shift),
            ("cosine_threshold", gate.cosine_threshold),
            ("boost", gate.boost),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::MixedGate { name, value });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = TrackerConfig::default();

        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.similarity_method(), SimilarityMethod::Overlap);
    }

    #[test]
    fn test_features_select_mixed_method_unless_overridden() {
        let mut config = TrackerConfig {
            with_features: true,
            ..TrackerConfig::default()
        };
        assert_eq!(config.similarity_method(), SimilarityMethod::Mixed);

        config.similarity_method = Some(SimilarityMethod::FeatureCosine);
        assert_eq!(config.similarity_method(), SimilarityMethod::FeatureCosine);
    }

    #[test]
    fn test_out_of_range_threshold_is_rejected() {
        for track_threshold in [-0.1, 1.5, f32::NAN] {
            let config = TrackerConfig {
                track_threshold,
                ..TrackerConfig::default()
            };
            assert!(matches!(config.validate(), Err(ConfigError::TrackThreshold(_))));
        }
    }

    #[test]
    fn test_non_positive_noise_is_rejected() {
        let mut config = TrackerConfig::default();
        config.noise.measurement = 0.0;

        assert_eq!(
            config.validate(),
            Err(ConfigError::NoiseModel {
                name: "measurement",
                value: 0.0
            })
        );
    }

    #[test]
    fn test_negative_gate_is_rejected() {
        let mut config = TrackerConfig::default();
        config.mixed_gate.max_x_shift = -1.0;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::MixedGate {
                name: "max_x_shift",
                ..
            })
        ));
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let config: TrackerConfig = serde_json::from_str(
            r#"{
                "track_threshold": 0.3,
                "lost_threshold": 2,
                "similarity_method": "feature_cosine",
                "mixed_gate": { "max_x_shift": 2.0 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.track_threshold, 0.3);
        assert_eq!(config.lost_threshold, 2);
        assert!(!config.with_features);
        assert_eq!(config.similarity_method(), SimilarityMethod::FeatureCosine);
        assert_eq!(config.mixed_gate.max_x_shift, 2.0);
        assert_eq!(config.mixed_gate.cosine_threshold, 0.66);
        assert_eq!(config.noise, NoiseModel::default());
    }
}
