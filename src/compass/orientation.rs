//! Derive the device orientation from gravity and geomagnetic field vectors
use nalgebra::{Matrix3, Vector3};

/// Standard gravity in m/s^2
pub const STANDARD_GRAVITY: f32 = 9.80665;
/// Gravity readings weaker than 10% of standard gravity mean the device is in free fall
const FREE_FALL_GRAVITY_SQUARED: f32 = 0.01 * STANDARD_GRAVITY * STANDARD_GRAVITY;
/// Minimum horizontal field strength, below this the device is close to magnetic north/south
const MIN_HORIZONTAL_FIELD: f32 = 0.1;

/// Compute the rotation matrix that maps device coordinates to world coordinates
///
/// The rows are east, north and up expressed in device coordinates. Returns None when the
/// vectors can't define a frame: the device is in free fall, the field is parallel to gravity
/// or a reading is not finite.
pub fn rotation_matrix(gravity: &Vector3<f32>, geomagnetic: &Vector3<f32>) -> Option<Matrix3<f32>> {
    let gravity_squared = gravity.norm_squared();
    if !gravity_squared.is_finite() || gravity_squared < FREE_FALL_GRAVITY_SQUARED {
        return None;
    }

    let east = geomagnetic.cross(gravity);
    let east_norm = east.norm();
    if !east_norm.is_finite() || east_norm < MIN_HORIZONTAL_FIELD {
        return None;
    }
    let east = east / east_norm;
    let up = gravity.normalize();
    let north = up.cross(&east);

    Some(Matrix3::from_rows(&[
        east.transpose(),
        north.transpose(),
        up.transpose(),
    ]))
}

/// Azimuth, pitch and roll in radians from a rotation matrix
pub fn orientation(rotation: &Matrix3<f32>) -> (f32, f32, f32) {
    let azimuth = rotation[(0, 1)].atan2(rotation[(1, 1)]);
    let pitch = (-rotation[(2, 1)]).asin();
    let roll = (-rotation[(2, 0)]).atan2(rotation[(2, 2)]);
    (azimuth, pitch, roll)
}

/// Compass heading of the device in degrees, normalised to 0..360
pub fn heading(rotation: &Matrix3<f32>) -> f32 {
    let (azimuth, _, _) = orientation(rotation);
    let degrees = azimuth.to_degrees().rem_euclid(360.0);
    if degrees >= 360.0 {
        0.0
    } else {
        degrees
    }
}
