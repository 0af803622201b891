//! Small vector and 4×4 matrix helpers for the particle background.
//!
//! Matrices are column-major `[f32; 16]`, same layout a GPU uniform expects.
//! Only what the camera and cloud transform need lives here.

pub type Vec3 = [f32; 3];
pub type Mat4 = [f32; 16];

pub const IDENTITY: Mat4 = [
    1.0, 0.0, 0.0, 0.0, // col 0
    0.0, 1.0, 0.0, 0.0, // col 1
    0.0, 0.0, 1.0, 0.0, // col 2
    0.0, 0.0, 0.0, 1.0, // col 3
];

#[inline]
pub fn length(v: Vec3) -> f32 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

#[inline]
pub fn distance(a: Vec3, b: Vec3) -> f32 {
    length([a[0] - b[0], a[1] - b[1], a[2] - b[2]])
}

#[inline]
pub fn scale(v: Vec3, s: f32) -> Vec3 {
    [v[0] * s, v[1] * s, v[2] * s]
}

/// Shrinks `v` so its length is at most `max_len`. Direction is preserved.
pub fn clamp_length(v: Vec3, max_len: f32) -> Vec3 {
    let len = length(v);
    if len > max_len && len > 0.0 {
        scale(v, max_len / len)
    } else {
        v
    }
}

/// Rotates a vector about the Y axis. Matches `rotate_y` applied to a point.
pub fn rotate_y_vec(v: Vec3, angle: f32) -> Vec3 {
    let (s, c) = angle.sin_cos();
    [c * v[0] + s * v[2], v[1], -s * v[0] + c * v[2]]
}

/// Perspective projection matrix.
///
/// `fov_y` is vertical field of view in radians.
/// `near` and `far` are the clip planes (must be > 0).
pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let f = 1.0 / (fov_y * 0.5).tan();
    let range_inv = 1.0 / (near - far);

    [
        f / aspect,
        0.0,
        0.0,
        0.0,
        0.0,
        f,
        0.0,
        0.0,
        0.0,
        0.0,
        (far + near) * range_inv,
        -1.0,
        0.0,
        0.0,
        2.0 * far * near * range_inv,
        0.0,
    ]
}

/// Rotation around the Y axis.
pub fn rotate_y(angle: f32) -> Mat4 {
    let c = angle.cos();
    let s = angle.sin();
    [
        c, 0.0, -s, 0.0, 0.0, 1.0, 0.0, 0.0, s, 0.0, c, 0.0, 0.0, 0.0, 0.0, 1.0,
    ]
}

/// Translation matrix.
pub fn translate(x: f32, y: f32, z: f32) -> Mat4 {
    [
        1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, x, y, z, 1.0,
    ]
}

/// Multiply two 4×4 column-major matrices: result = a × b.
pub fn mul(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut out = [0.0f32; 16];
    for col in 0..4 {
        for row in 0..4 {
            let mut sum = 0.0;
            for k in 0..4 {
                sum += a[k * 4 + row] * b[col * 4 + k];
            }
            out[col * 4 + row] = sum;
        }
    }
    out
}

/// Transforms the point `(p, 1)` and returns homogeneous clip coordinates.
pub fn transform_point(m: &Mat4, p: Vec3) -> [f32; 4] {
    let mut out = [0.0f32; 4];
    for (row, slot) in out.iter_mut().enumerate() {
        *slot = m[row] * p[0] + m[4 + row] * p[1] + m[8 + row] * p[2] + m[12 + row];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn clamp_length_keeps_short_vectors() {
        let v = [0.1, -0.2, 0.3];
        assert_eq!(clamp_length(v, 5.0), v);
    }

    #[test]
    fn clamp_length_shrinks_long_vectors() {
        let v = clamp_length([30.0, 40.0, 0.0], 5.0);
        assert!(approx(length(v), 5.0));
        assert!(approx(v[0], 3.0));
        assert!(approx(v[1], 4.0));
    }

    #[test]
    fn rotate_y_vec_agrees_with_matrix() {
        let p = [1.5, -2.0, 4.0];
        let angle = 0.7;
        let by_matrix = transform_point(&rotate_y(angle), p);
        let by_vec = rotate_y_vec(p, angle);
        for i in 0..3 {
            assert!(approx(by_matrix[i], by_vec[i]));
        }
        assert!(approx(by_matrix[3], 1.0));
    }

    #[test]
    fn translate_moves_point() {
        let out = transform_point(&translate(0.0, 0.0, -20.0), [1.0, 2.0, 3.0]);
        assert_eq!(out, [1.0, 2.0, -17.0, 1.0]);
    }

    #[test]
    fn identity_mul_identity() {
        assert_eq!(mul(&IDENTITY, &IDENTITY), IDENTITY);
    }

    #[test]
    fn perspective_maps_center_to_center() {
        let p = perspective(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0);
        let clip = transform_point(&p, [0.0, 0.0, -10.0]);
        assert!(approx(clip[0], 0.0));
        assert!(approx(clip[1], 0.0));
        // w carries the view depth for the perspective divide
        assert!(approx(clip[3], 10.0));
    }
}
