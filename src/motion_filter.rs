use kfilter::{
    Kalman1M, KalmanPredict, measurement::LinearMeasurement, system::LinearNoInputSystem,
};
use nalgebra::{SMatrix, SVector};
use serde::{Deserialize, Serialize};

use crate::{bbox::BBox, error::MotionError};

type BoxKalman =
    Kalman1M<f32, 7, 0, 4, LinearNoInputSystem<f32, 7>, LinearMeasurement<f32, 7, 4>>;

/// Diagonal noise levels of the constant velocity box model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseModel {
    /// Process noise Q.
    pub process: f32,
    /// Measurement noise R.
    pub measurement: f32,
    /// Error covariance P right after initialization.
    pub initial_covariance: f32,
}

impl Default for NoiseModel {
    fn default() -> Self {
        Self {
            process: 1e-2,
            measurement: 1e-1,
            initial_covariance: 1.0,
        }
    }
}

/// Constant velocity Kalman filter over `[cx, cy, area, aspect, vcx, vcy, varea]`.
///
/// Starts uninitialized; [`MotionFilter::init`] seeds it from a first box.
pub struct MotionFilter {
    kalman: Option<BoxKalman>,
    noise: NoiseModel,
}

impl MotionFilter {
    pub fn new(noise: NoiseModel) -> Self {
        Self {
            kalman: None,
            noise,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.kalman.is_some()
    }

    /// Seeds the state from `bbox` with zero velocity.
    ///
    /// On overflow the filter stays untouched.
    pub fn init(&mut self, bbox: &BBox) -> Result<(), MotionError> {
        let z = bbox.to_measurement()?;

        // aspect ratio is constant, the other observed quantities move with their velocity
        let mut f = SMatrix::<f32, 7, 7>::identity();
        f[(0, 4)] = 1.0;
        f[(1, 5)] = 1.0;
        f[(2, 6)] = 1.0;
        let q = SMatrix::<f32, 7, 7>::identity() * self.noise.process;
        let mut x_initial = SVector::<f32, 7>::zeros();
        x_initial.fixed_rows_mut::<4>(0).copy_from(&z);
        let system = LinearNoInputSystem::new(f, q, x_initial);

        let p = SMatrix::<f32, 7, 7>::identity() * self.noise.initial_covariance;

        let h = SMatrix::<f32, 4, 7>::identity();
        let r = SMatrix::<f32, 4, 4>::identity() * self.noise.measurement;
        let measurement = LinearMeasurement::new(h, r, z);

        self.kalman = Some(Kalman1M::new_custom(system, p, measurement));
        Ok(())
    }

    /// Advances one frame and returns the predicted box.
    pub fn predict(&mut self) -> Result<BBox, MotionError> {
        let kalman = self.kalman.as_mut().ok_or(MotionError::NotInitialized)?;
        let state = kalman.predict().clone_owned();
        Ok(BBox::from_state_vector(&state))
    }

    /// Folds an observed box into the state.
    ///
    /// On overflow the observation is dropped and the state is kept.
    pub fn correct(&mut self, observation: &BBox) -> Result<(), MotionError> {
        let kalman = self.kalman.as_mut().ok_or(MotionError::NotInitialized)?;
        let z = observation.to_measurement()?;
        kalman.update(z);
        Ok(())
    }
}

impl Default for MotionFilter {
    fn default() -> Self {
        Self::new(NoiseModel::default())
    }
}
