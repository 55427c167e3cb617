//! Interpolation helpers:
//! - lerp_* (component-wise)
//! - slerp_quat (shortest arc, renormalized)
//! - catmull_rom_vec3 (uniform Catmull-Rom through neighbouring keys)
//! - quaternion algebra and Euler (degrees, ZXY) conversion
//! - the named easing curves

use std::f32::consts::{FRAC_PI_2, PI};

pub const QUAT_IDENTITY: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Above this cosine the arc is short enough that slerp degenerates to nlerp.
const SLERP_NLERP_THRESHOLD: f32 = 0.9995;

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_vec3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        lerp_f32(a[0], b[0], t),
        lerp_f32(a[1], b[1], t),
        lerp_f32(a[2], b[2], t),
    ]
}

#[inline]
pub fn lerp_vec4(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    [
        lerp_f32(a[0], b[0], t),
        lerp_f32(a[1], b[1], t),
        lerp_f32(a[2], b[2], t),
        lerp_f32(a[3], b[3], t),
    ]
}

#[inline]
pub fn dot4(a: [f32; 4], b: [f32; 4]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
}

/// Normalize a quaternion. A zero-length input yields the identity rotation.
#[inline]
pub fn normalize_quat(mut q: [f32; 4]) -> [f32; 4] {
    let len2 = dot4(q, q);
    if len2 > 0.0 && len2.is_finite() {
        let inv_len = len2.sqrt().recip();
        q[0] *= inv_len;
        q[1] *= inv_len;
        q[2] *= inv_len;
        q[3] *= inv_len;
        q
    } else {
        QUAT_IDENTITY
    }
}

/// Spherical linear interpolation with shortest-arc correction.
/// If dot < 0, negate the second quaternion so the shorter path is taken.
/// Returns a normalized quaternion (x,y,z,w).
pub fn slerp_quat(a: [f32; 4], mut b: [f32; 4], t: f32) -> [f32; 4] {
    let mut d = dot4(a, b);
    if d < 0.0 {
        b = [-b[0], -b[1], -b[2], -b[3]];
        d = -d;
    }
    if d > SLERP_NLERP_THRESHOLD {
        return normalize_quat(lerp_vec4(a, b, t));
    }
    let theta = d.min(1.0).acos();
    let sin_theta = theta.sin();
    let wa = ((1.0 - t) * theta).sin() / sin_theta;
    let wb = (t * theta).sin() / sin_theta;
    normalize_quat([
        a[0] * wa + b[0] * wb,
        a[1] * wa + b[1] * wb,
        a[2] * wa + b[2] * wb,
        a[3] * wa + b[3] * wb,
    ])
}

/// Hamilton product `a * b` (apply `b` first, then `a`).
#[inline]
pub fn mul_quat(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
    let [ax, ay, az, aw] = a;
    let [bx, by, bz, bw] = b;
    [
        aw * bx + ax * bw + ay * bz - az * by,
        aw * by - ax * bz + ay * bw + az * bx,
        aw * bz + ax * by - ay * bx + az * bw,
        aw * bw - ax * bx - ay * by - az * bz,
    ]
}

#[inline]
fn cross3(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Rotate `v` by the unit quaternion `q`.
pub fn rotate_vec3(q: [f32; 4], v: [f32; 3]) -> [f32; 3] {
    let u = [q[0], q[1], q[2]];
    let w = q[3];
    let c = cross3(u, v);
    let t = [2.0 * c[0], 2.0 * c[1], 2.0 * c[2]];
    let ut = cross3(u, t);
    [
        v[0] + w * t[0] + ut[0],
        v[1] + w * t[1] + ut[1],
        v[2] + w * t[2] + ut[2],
    ]
}

#[inline]
fn axis_quat(axis: usize, radians: f32) -> [f32; 4] {
    let (s, c) = (radians * 0.5).sin_cos();
    let mut q = [0.0, 0.0, 0.0, c];
    q[axis] = s;
    q
}

/// Euler angles in degrees to a quaternion. Rotation order is Z, then X,
/// then Y (`q = qy * qx * qz`), matching the Unity convention curve authors use.
pub fn euler_degrees_to_quat(e: [f32; 3]) -> [f32; 4] {
    let qx = axis_quat(0, e[0].to_radians());
    let qy = axis_quat(1, e[1].to_radians());
    let qz = axis_quat(2, e[2].to_radians());
    mul_quat(mul_quat(qy, qx), qz)
}

/// Inverse of [`euler_degrees_to_quat`].
pub fn quat_to_euler_degrees(q: [f32; 4]) -> [f32; 3] {
    let [x, y, z, w] = normalize_quat(q);
    let m00 = 1.0 - 2.0 * (y * y + z * z);
    let m02 = 2.0 * (x * z + w * y);
    let m10 = 2.0 * (x * y + w * z);
    let m11 = 1.0 - 2.0 * (x * x + z * z);
    let m12 = 2.0 * (y * z - w * x);
    let m20 = 2.0 * (x * z - w * y);
    let m22 = 1.0 - 2.0 * (x * x + y * y);

    let sin_x = (-m12).clamp(-1.0, 1.0);
    let ex = sin_x.asin();
    let (ey, ez) = if sin_x.abs() < 0.999_999 {
        (m02.atan2(m22), m10.atan2(m11))
    } else {
        // gimbal lock: fold the Z rotation into Y
        ((-m20).atan2(m00), 0.0)
    };
    [ex.to_degrees(), ey.to_degrees(), ez.to_degrees()]
}

/// Uniform Catmull-Rom segment between `p1` and `p2`.
pub fn catmull_rom_vec3(p0: [f32; 3], p1: [f32; 3], p2: [f32; 3], p3: [f32; 3], t: f32) -> [f32; 3] {
    let tt = t * t;
    let ttt = tt * t;

    let q0 = -ttt + 2.0 * tt - t;
    let q1 = 3.0 * ttt - 5.0 * tt + 2.0;
    let q2 = -3.0 * ttt + 4.0 * tt + t;
    let q3 = ttt - tt;

    let mut out = [0.0; 3];
    for i in 0..3 {
        out[i] = 0.5 * (p0[i] * q0 + p1[i] * q1 + p2[i] * q2 + p3[i] * q3);
    }
    out
}

// ----- easing curves (p in [0,1]) -----

#[inline]
pub fn ease_linear(p: f32) -> f32 {
    p
}

#[inline]
pub fn ease_step(p: f32) -> f32 {
    p.floor()
}

pub fn ease_in_quad(p: f32) -> f32 {
    p * p
}

pub fn ease_out_quad(p: f32) -> f32 {
    -(p * (p - 2.0))
}

pub fn ease_in_out_quad(p: f32) -> f32 {
    if p < 0.5 {
        2.0 * p * p
    } else {
        -2.0 * p * p + 4.0 * p - 1.0
    }
}

pub fn ease_in_cubic(p: f32) -> f32 {
    p * p * p
}

pub fn ease_out_cubic(p: f32) -> f32 {
    let f = p - 1.0;
    f * f * f + 1.0
}

pub fn ease_in_out_cubic(p: f32) -> f32 {
    if p < 0.5 {
        4.0 * p * p * p
    } else {
        let f = 2.0 * p - 2.0;
        0.5 * f * f * f + 1.0
    }
}

pub fn ease_in_quart(p: f32) -> f32 {
    p * p * p * p
}

pub fn ease_out_quart(p: f32) -> f32 {
    let f = p - 1.0;
    f * f * f * (1.0 - p) + 1.0
}

pub fn ease_in_out_quart(p: f32) -> f32 {
    if p < 0.5 {
        8.0 * p * p * p * p
    } else {
        let f = p - 1.0;
        -8.0 * f * f * f * f + 1.0
    }
}

pub fn ease_in_quint(p: f32) -> f32 {
    p * p * p * p * p
}

pub fn ease_out_quint(p: f32) -> f32 {
    let f = p - 1.0;
    f * f * f * f * f + 1.0
}

pub fn ease_in_out_quint(p: f32) -> f32 {
    if p < 0.5 {
        16.0 * p * p * p * p * p
    } else {
        let f = 2.0 * p - 2.0;
        0.5 * f * f * f * f * f + 1.0
    }
}

pub fn ease_in_sine(p: f32) -> f32 {
    ((p - 1.0) * FRAC_PI_2).sin() + 1.0
}

pub fn ease_out_sine(p: f32) -> f32 {
    (p * FRAC_PI_2).sin()
}

pub fn ease_in_out_sine(p: f32) -> f32 {
    0.5 * (1.0 - (p * PI).cos())
}

pub fn ease_in_circ(p: f32) -> f32 {
    1.0 - (1.0 - p * p).max(0.0).sqrt()
}

pub fn ease_out_circ(p: f32) -> f32 {
    ((2.0 - p) * p).max(0.0).sqrt()
}

pub fn ease_in_out_circ(p: f32) -> f32 {
    if p < 0.5 {
        0.5 * (1.0 - (1.0 - 4.0 * p * p).max(0.0).sqrt())
    } else {
        0.5 * ((-(2.0 * p - 3.0) * (2.0 * p - 1.0)).max(0.0).sqrt() + 1.0)
    }
}

pub fn ease_in_expo(p: f32) -> f32 {
    if p <= 0.0 {
        0.0
    } else {
        2.0f32.powf(10.0 * (p - 1.0))
    }
}

pub fn ease_out_expo(p: f32) -> f32 {
    if p >= 1.0 {
        1.0
    } else {
        1.0 - 2.0f32.powf(-10.0 * p)
    }
}

pub fn ease_in_out_expo(p: f32) -> f32 {
    if p <= 0.0 || p >= 1.0 {
        p.clamp(0.0, 1.0)
    } else if p < 0.5 {
        0.5 * 2.0f32.powf(20.0 * p - 10.0)
    } else {
        -0.5 * 2.0f32.powf(-20.0 * p + 10.0) + 1.0
    }
}

pub fn ease_in_elastic(p: f32) -> f32 {
    (13.0 * FRAC_PI_2 * p).sin() * 2.0f32.powf(10.0 * (p - 1.0))
}

pub fn ease_out_elastic(p: f32) -> f32 {
    (-13.0 * FRAC_PI_2 * (p + 1.0)).sin() * 2.0f32.powf(-10.0 * p) + 1.0
}

pub fn ease_in_out_elastic(p: f32) -> f32 {
    if p < 0.5 {
        0.5 * (13.0 * FRAC_PI_2 * (2.0 * p)).sin() * 2.0f32.powf(10.0 * (2.0 * p - 1.0))
    } else {
        0.5 * ((-13.0 * FRAC_PI_2 * (2.0 * p)).sin() * 2.0f32.powf(-10.0 * (2.0 * p - 1.0)) + 2.0)
    }
}

pub fn ease_in_back(p: f32) -> f32 {
    p * p * p - p * (p * PI).sin()
}

pub fn ease_out_back(p: f32) -> f32 {
    let f = 1.0 - p;
    1.0 - (f * f * f - f * (f * PI).sin())
}

pub fn ease_in_out_back(p: f32) -> f32 {
    if p < 0.5 {
        let f = 2.0 * p;
        0.5 * (f * f * f - f * (f * PI).sin())
    } else {
        let f = 1.0 - (2.0 * p - 1.0);
        0.5 * (1.0 - (f * f * f - f * (f * PI).sin())) + 0.5
    }
}

pub fn ease_out_bounce(p: f32) -> f32 {
    if p < 4.0 / 11.0 {
        121.0 * p * p / 16.0
    } else if p < 8.0 / 11.0 {
        363.0 / 40.0 * p * p - 99.0 / 10.0 * p + 17.0 / 5.0
    } else if p < 9.0 / 10.0 {
        4356.0 / 361.0 * p * p - 35442.0 / 1805.0 * p + 16061.0 / 1805.0
    } else {
        54.0 / 5.0 * p * p - 513.0 / 25.0 * p + 268.0 / 25.0
    }
}

pub fn ease_in_bounce(p: f32) -> f32 {
    1.0 - ease_out_bounce(1.0 - p)
}

pub fn ease_in_out_bounce(p: f32) -> f32 {
    if p < 0.5 {
        0.5 * ease_in_bounce(2.0 * p)
    } else {
        0.5 * ease_out_bounce(2.0 * p - 1.0) + 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32, eps: f32) {
        assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
    }

    fn norm4(q: [f32; 4]) -> f32 {
        dot4(q, q).sqrt()
    }

    #[test]
    fn slerp_takes_shorter_arc() {
        let a = QUAT_IDENTITY;
        // 90 degrees about Y, expressed with negative w (same rotation, far hemisphere)
        let s = std::f32::consts::FRAC_1_SQRT_2;
        let b = [0.0, -s, 0.0, -s];
        let mid = slerp_quat(a, b, 0.5);
        approx(norm4(mid), 1.0, 1e-6);
        // shorter path: halfway is 45 degrees about +Y
        let expected = axis_quat(1, std::f32::consts::FRAC_PI_4);
        approx(mid[1], expected[1], 1e-5);
        approx(mid[3], expected[3], 1e-5);
    }

    #[test]
    fn slerp_endpoints_match_inputs() {
        let a = euler_degrees_to_quat([10.0, 20.0, 30.0]);
        let b = euler_degrees_to_quat([-40.0, 80.0, 5.0]);
        let at0 = slerp_quat(a, b, 0.0);
        let at1 = slerp_quat(a, b, 1.0);
        for i in 0..4 {
            approx(at0[i], a[i], 1e-5);
        }
        // q and -q are the same rotation
        approx(dot4(at1, b).abs(), 1.0, 1e-5);
    }

    #[test]
    fn euler_round_trip() {
        for e in [[10.0, 20.0, 30.0], [-45.0, 120.0, -75.0], [0.0, 0.0, 90.0]] {
            let q = euler_degrees_to_quat(e);
            let back = quat_to_euler_degrees(q);
            for i in 0..3 {
                approx(back[i], e[i], 1e-3);
            }
        }
    }

    #[test]
    fn rotate_vec3_about_y() {
        let q = euler_degrees_to_quat([0.0, 90.0, 0.0]);
        let v = rotate_vec3(q, [1.0, 0.0, 0.0]);
        approx(v[0], 0.0, 1e-6);
        approx(v[2], -1.0, 1e-6);
    }

    #[test]
    fn zero_quat_normalizes_to_identity() {
        assert_eq!(normalize_quat([0.0; 4]), QUAT_IDENTITY);
    }

    #[test]
    fn catmull_rom_passes_through_control_points() {
        let p0 = [0.0, 0.0, 0.0];
        let p1 = [1.0, 2.0, 3.0];
        let p2 = [4.0, 0.0, -1.0];
        let p3 = [5.0, 5.0, 5.0];
        assert_eq!(catmull_rom_vec3(p0, p1, p2, p3, 0.0), p1);
        let end = catmull_rom_vec3(p0, p1, p2, p3, 1.0);
        for i in 0..3 {
            approx(end[i], p2[i], 1e-6);
        }
    }
}
