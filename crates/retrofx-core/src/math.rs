//! Angle and interpolation helpers

use glam::{Mat4, Quat, Vec3};
use std::f32::consts::{PI, TAU};

/// Signed difference `a - b`, wrapped into `(-π, π]`.
pub fn subtract_angles(a: f32, b: f32) -> f32 {
    let diff = a - b;
    if diff > PI {
        diff - TAU
    } else if diff <= -PI {
        diff + TAU
    } else {
        diff
    }
}

/// Unsigned shortest distance between two angles
pub fn angular_distance(a: f32, b: f32) -> f32 {
    let mut diff = a - b;
    if diff.abs() > PI {
        if b < a {
            diff = b - a;
        }
        diff += TAU;
    } else if diff <= 0.0 {
        diff = -diff;
    }
    diff
}

/// Folds an angle that drifted at most one turn out of `[0, 2π]` back in
pub fn radian_modulo(mut theta: f32) -> f32 {
    if theta > TAU {
        theta -= TAU;
    }
    if theta < 0.0 {
        theta += TAU;
    }
    theta
}

/// Linear interpolation, `t = 0` gives `start`
pub fn lerp(start: f32, end: f32, t: f32) -> f32 {
    (1.0 - t) * start + t * end
}

/// Per-axis angle interpolation along the shorter arc
pub fn radian_lerp(start: Vec3, end: Vec3, t: f32) -> Vec3 {
    let mut out = [0.0; 3];
    let (s, e) = (start.to_array(), end.to_array());
    for axis in 0..3 {
        let mut a = s[axis];
        let mut b = e[axis];
        if b - a > PI {
            a += TAU;
        } else if a - b > PI {
            b += TAU;
        }
        out[axis] = a * (1.0 - t) + b * t;
    }
    Vec3::from_array(out)
}

pub fn axis_rotation_to_quaternion(axis: Vec3, theta: f32) -> Quat {
    let sin_half = (theta / 2.0).sin();
    Quat::from_xyzw(
        axis.x * sin_half,
        axis.y * sin_half,
        axis.z * sin_half,
        (theta / 2.0).cos(),
    )
}

/// Moves `src` by `dist` along the direction from the camera towards it
pub fn push_along_lookat(src: Vec3, dist: f32, camera_world: &Mat4) -> Vec3 {
    let eye = camera_world.w_axis.truncate();
    let dir = (src - eye).normalize_or_zero();
    src + dir * dist
}

/// Camera yaw in turns, read from a column-major view matrix
pub fn view_yaw(view: &Mat4) -> f32 {
    (-view.x_axis.z).atan2(view.x_axis.x) / TAU
}

/// Camera pitch in turns, read from a column-major view matrix
pub fn view_pitch(view: &Mat4) -> f32 {
    view.y_axis.z.clamp(-1.0, 1.0).asin() / TAU
}
