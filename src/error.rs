use thiserror::Error;

/// Errors returned by the assignment solver.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssignmentError {
    #[error("invalid cost matrix dimensions: {rows}x{cols}, each side must be in 1..={max}")]
    InvalidDimensions {
        rows: usize,
        cols: usize,
        max: usize,
    },

    #[error("no augmenting path and no price reduction left for row {row}")]
    Infeasible { row: usize },
}

/// Errors returned by a track's motion filter.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MotionError {
    #[error("motion filter is not initialized")]
    NotInitialized,

    #[error("{quantity} is out of the representable range: {value}")]
    NumericOverflow { quantity: &'static str, value: f64 },
}

/// Errors raised while validating a tracker configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("track threshold must be within [0, 1], got {0}")]
    TrackThreshold(f32),

    #[error("noise level `{name}` must be finite and positive, got {value}")]
    NoiseModel { name: &'static str, value: f32 },

    #[error("mixed gate parameter `{name}` must be finite and non-negative, got {value}")]
    MixedGate { name: &'static str, value: f32 },
}
