//! Math helpers for world-space movement.
//!
//! Angles are kept in degrees throughout the game code and converted at the point of
//! use, the same convention the camera and the locomotion state machine share.

pub mod coordinates;

/// Wraps an angle in degrees into `[0, 360)`.
///
/// # Example
/// ```
/// use mazewalk::math::wrap_degrees;
///
/// assert_eq!(wrap_degrees(-90.0), 270.0);
/// assert_eq!(wrap_degrees(450.0), 90.0);
/// ```
pub fn wrap_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Unit vector on the XZ plane for a yaw angle in degrees.
///
/// Yaw 0 faces north (towards -z), yaw 90 faces east (towards +x).
pub fn yaw_to_forward(yaw: f32) -> [f32; 2] {
    let radians = yaw.to_radians();
    [radians.sin(), -radians.cos()]
}

/// Unit vector pointing to the player's right for a yaw angle in degrees.
pub fn yaw_to_right(yaw: f32) -> [f32; 2] {
    let radians = yaw.to_radians();
    [radians.cos(), radians.sin()]
}
