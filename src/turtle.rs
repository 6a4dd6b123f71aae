//! Turtle cursor: position plus a 4x4 orientation transform.
//!
//! The interpreter mutates [`Shape`](crate::shape::Shape) state directly;
//! the turtle is kept as an independent utility for composing elementary
//! rotations, usable by drivers that lay structures out around a scene.

use crate::error::StructureError;
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Builds the elementary rotation matrix for `angle_degrees` about one of
/// the three coordinate axes.
///
/// The axis must be exactly `Vec3::X`, `Vec3::Y`, or `Vec3::Z`; any other
/// vector (including combined axes such as `(1, 1, 0)`) is rejected with
/// [`StructureError::InvalidAxis`].
pub fn rotation_about_axis(angle_degrees: f32, axis: Vec3) -> Result<Mat4, StructureError> {
    let theta = angle_degrees.to_radians();
    if axis == Vec3::X {
        Ok(Mat4::from_rotation_x(theta))
    } else if axis == Vec3::Y {
        Ok(Mat4::from_rotation_y(theta))
    } else if axis == Vec3::Z {
        Ok(Mat4::from_rotation_z(theta))
    } else {
        Err(StructureError::InvalidAxis { axis })
    }
}

/// A cursor carrying a world-space position and orientation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Turtle {
    /// Current world-space position of the cursor.
    pub position: Vec3,

    /// Current orientation as a homogeneous transform.
    pub rotation: Mat4,
}

impl Default for Turtle {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Mat4::IDENTITY,
        }
    }
}

impl Turtle {
    /// Creates a turtle at `position` with the given orientation.
    pub fn new(position: Vec3, rotation: Mat4) -> Self {
        Self { position, rotation }
    }

    /// Moves the cursor by `delta`.
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Composes a rotation of `angle_degrees` about `axis` into the current
    /// orientation (right-multiplied, i.e. applied in local space).
    ///
    /// `axis` must be one of the three unit coordinate axes; see
    /// [`rotation_about_axis`] for the rejection policy.
    pub fn rotate(&mut self, angle_degrees: f32, axis: Vec3) -> Result<(), StructureError> {
        let rot = rotation_about_axis(angle_degrees, axis)?;
        self.rotation *= rot;
        Ok(())
    }
}
