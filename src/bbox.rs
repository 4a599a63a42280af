use nalgebra::SVector;
use serde::{Deserialize, Serialize};

use crate::error::MotionError;

/// Widths below this are treated as a collapsed box.
const DEGENERATE_WIDTH: f32 = 1e-6;

/// Axis aligned box in image pixel coordinates, anchored at its top left corner.
#[derive(Clone, Copy, Default, Debug, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        if width < 0.0 || height < 0.0 {
            return BBox::default();
        }
        BBox {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_corners(x_1: f32, y_1: f32, x_2: f32, y_2: f32) -> Self {
        if x_1 > x_2 || y_1 > y_2 {
            return BBox::default();
        }
        BBox::new(x_1, y_1, x_2 - x_1, y_2 - y_1)
    }

    /// Recovers a box from a `[cx, cy, area, aspect, vcx, vcy, varea]` state.
    ///
    /// A collapsed width yields the zero box. A negative corner whose center
    /// is still positive is pulled back to 0 and the extent shrinks so the
    /// center stays where the filter put it.
    pub fn from_state_vector(state: &SVector<f32, 7>) -> Self {
        let (cx, cy, area, aspect) = (state[0], state[1], state[2], state[3]);
        let width = (area * aspect).sqrt();
        // NaN fails this comparison too
        if !(width >= DEGENERATE_WIDTH) {
            return BBox::default();
        }
        let height = area / width;

        let (x, width) = clamp_corner(cx, width);
        let (y, height) = clamp_corner(cy, height);

        BBox {
            x,
            y,
            width,
            height,
        }
    }

    /// Converts the box into the `[cx, cy, area, aspect]` measurement.
    ///
    /// Center and area are computed in double precision and rejected when
    /// they do not fit in an `f32`.
    pub fn to_measurement(&self) -> Result<SVector<f32, 4>, MotionError> {
        let cx = f64::from(self.x) + f64::from(self.width) / 2.0;
        check_range("center x", cx)?;
        let cy = f64::from(self.y) + f64::from(self.height) / 2.0;
        check_range("center y", cy)?;
        let area = f64::from(self.width) * f64::from(self.height);
        check_range("area", area)?;

        Ok(SVector::<f32, 4>::new(
            cx as f32,
            cy as f32,
            area as f32,
            self.aspect(),
        ))
    }

    pub fn x_2(&self) -> f32 {
        self.x + self.width
    }

    pub fn y_2(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn area(&self) -> f32 {
        (self.width * self.height).max(0.0)
    }

    /// Width over height, 0 for a flat box.
    pub fn aspect(&self) -> f32 {
        if self.height.abs() > f32::EPSILON {
            self.width / self.height
        } else {
            0.0
        }
    }

    pub fn iou(&self, other: &Self) -> f32 {
        let iwidth = (self.x_2().min(other.x_2()) - self.x.max(other.x)).max(0.0);
        let iheight = (self.y_2().min(other.y_2()) - self.y.max(other.y)).max(0.0);
        let iarea = iwidth * iheight;

        let union = self.area() + other.area() - iarea;

        if union.abs() < 1e-6 {
            return 0.0;
        }

        iarea / union
    }
}

fn clamp_corner(center: f32, extent: f32) -> (f32, f32) {
    let corner = center - extent / 2.0;
    if corner < 0.0 && center > f32::EPSILON {
        return (0.0, 2.0 * center);
    }
    (corner, extent)
}

fn check_range(quantity: &'static str, value: f64) -> Result<(), MotionError> {
    if value.abs() > f64::from(f32::MAX) || value.is_nan() {
        return Err(MotionError::NumericOverflow { quantity, value });
    }
    Ok(())
}
