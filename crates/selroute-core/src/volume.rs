//! Closed-form volume estimates to feed the router.
//!
//! Invalid geometry yields `0.0`. As a world volume that always routes to
//! Backend B; as a query volume it means "nothing selected". Valid geometry
//! too large for `f32` saturates at `f32::MAX`, so results are always finite.

use std::f32::consts::PI;

#[inline]
fn valid_length(x: f32) -> bool {
    x.is_finite() && x >= 0.0
}

/// Narrows an `f64` volume, saturating at the largest finite `f32`.
///
/// Products of finite `f32` lengths never overflow in `f64`, so a zero
/// factor stays zero instead of meeting an infinity.
#[inline]
#[allow(clippy::cast_possible_truncation)] // Reason: out-of-range values saturate just below
fn saturate(volume: f64) -> f32 {
    (volume as f32).min(f32::MAX)
}

/// Volume of a sphere of radius `radius`.
#[must_use]
pub fn sphere_volume(radius: f32) -> f32 {
    if !valid_length(radius) {
        return 0.0;
    }
    let r = f64::from(radius);
    saturate(4.0 / 3.0 * std::f64::consts::PI * r * r * r)
}

/// Volume of an axis-aligned box.
#[must_use]
pub fn box_volume(width: f32, height: f32, depth: f32) -> f32 {
    if !(valid_length(width) && valid_length(height) && valid_length(depth)) {
        return 0.0;
    }
    saturate(f64::from(width) * f64::from(height) * f64::from(depth))
}

/// Volume of a symmetric perspective view frustum.
///
/// `fov_y` is the full vertical field of view in radians, `aspect` is
/// width / height. The near and far planes are rectangles, so the volume is
/// that of a truncated pyramid: `h / 3 * (A_near + A_far + sqrt(A_near * A_far))`.
#[must_use]
pub fn frustum_volume(fov_y: f32, aspect: f32, near: f32, far: f32) -> f32 {
    let valid = fov_y.is_finite()
        && fov_y > 0.0
        && fov_y < PI
        && aspect.is_finite()
        && aspect > 0.0
        && valid_length(near)
        && far.is_finite()
        && near < far;
    if !valid {
        return 0.0;
    }

    let tan_half = (f64::from(fov_y) * 0.5).tan();
    let aspect = f64::from(aspect);
    let plane_area = |distance: f64| {
        let height = 2.0 * distance * tan_half;
        height * (height * aspect)
    };
    let (near, far) = (f64::from(near), f64::from(far));
    let near_area = plane_area(near);
    let far_area = plane_area(far);
    saturate((far - near) / 3.0 * (near_area + far_area + (near_area * far_area).sqrt()))
}
