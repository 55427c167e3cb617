//! Value kinds a point definition can produce.
//!
//! Each kind is a zero-sized marker implementing [`PointKind`]; the generic
//! parser and evaluator only ever talk to a kind through this trait.

use std::fmt::Debug;

use crate::interp::functions::{
    catmull_rom_vec3, euler_degrees_to_quat, lerp_f32, lerp_vec3, lerp_vec4, mul_quat,
    normalize_quat, quat_to_euler_degrees, rotate_vec3, slerp_quat,
};
use crate::modifier::Operation;
use crate::providers::{BaseSample, BaseTag};

pub trait PointKind: Copy + Debug + Default + Send + Sync + 'static {
    type Output: Copy + Debug + PartialEq + Send + Sync;

    /// Short name used in logs and error messages.
    const NAME: &'static str;
    /// Number of components in [`Self::Output`].
    const ARITY: usize;
    /// Whether `splineCatmullRom` changes how segments are blended.
    const SUPPORTS_SPLINE: bool = false;

    /// Decide how many of `count` plain numbers are value and whether the
    /// remaining trailing number is a time. `None` when `count` fits no form.
    fn split_time(count: usize) -> Option<bool> {
        if count == Self::ARITY {
            Some(false)
        } else if count == Self::ARITY + 1 {
            Some(true)
        } else {
            None
        }
    }

    /// Build a value from exactly the numbers of a static value group.
    fn from_static(numbers: &[f32]) -> Option<Self::Output>;

    /// Build a value from concatenated live components, truncating or
    /// zero-padding as needed.
    fn from_dynamic(components: &[f32]) -> Self::Output;

    fn components(value: Self::Output) -> Vec<f32>;

    fn blend(a: Self::Output, b: Self::Output, t: f32) -> Self::Output;

    fn catmull_rom(
        _p0: Self::Output,
        _p1: Self::Output,
        _p2: Self::Output,
        _p3: Self::Output,
        _t: f32,
    ) -> Option<Self::Output> {
        None
    }

    fn apply_op(acc: Self::Output, operand: Self::Output, op: Operation) -> Self::Output;

    fn combine_base(value: Self::Output, base: &BaseSample) -> Self::Output;

    /// Canonicalize a parsed constant keyframe value.
    fn normalize_key(value: Self::Output) -> Self::Output {
        value
    }

    /// Bring an evaluated result back into the kind's valid range.
    fn finish(value: Self::Output) -> Self::Output {
        value
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FloatKind;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Vector3Kind;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Vector4Kind;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct QuaternionKind;

fn padded<const N: usize>(components: &[f32]) -> [f32; N] {
    let mut out = [0.0; N];
    for (slot, v) in out.iter_mut().zip(components) {
        *slot = *v;
    }
    out
}

fn exact<const N: usize>(numbers: &[f32]) -> Option<[f32; N]> {
    numbers.try_into().ok()
}

fn op_array<const N: usize>(acc: [f32; N], operand: [f32; N], op: Operation) -> [f32; N] {
    let mut out = acc;
    for (o, b) in out.iter_mut().zip(operand) {
        *o = op.apply(*o, b);
    }
    out
}

/// Elementwise add; a single base value is broadcast, missing components add 0.
fn add_broadcast<const N: usize>(value: [f32; N], base: &[f32]) -> [f32; N] {
    let mut out = value;
    match base {
        [] => {}
        [single] => out.iter_mut().for_each(|o| *o += single),
        _ => {
            for (o, b) in out.iter_mut().zip(base) {
                *o += b;
            }
        }
    }
    out
}

fn base_rotation(base: &BaseSample) -> Option<[f32; 4]> {
    if base.tag == BaseTag::Quaternion && base.values.len() >= 4 {
        Some(normalize_quat(padded(&base.values)))
    } else {
        None
    }
}

impl PointKind for FloatKind {
    type Output = f32;
    const NAME: &'static str = "float";
    const ARITY: usize = 1;

    fn from_static(numbers: &[f32]) -> Option<f32> {
        match numbers {
            [v] => Some(*v),
            _ => None,
        }
    }

    fn from_dynamic(components: &[f32]) -> f32 {
        components.first().copied().unwrap_or(0.0)
    }

    fn components(value: f32) -> Vec<f32> {
        vec![value]
    }

    fn blend(a: f32, b: f32, t: f32) -> f32 {
        lerp_f32(a, b, t)
    }

    fn apply_op(acc: f32, operand: f32, op: Operation) -> f32 {
        op.apply(acc, operand)
    }

    fn combine_base(value: f32, base: &BaseSample) -> f32 {
        value + base.values.first().copied().unwrap_or(0.0)
    }
}

impl PointKind for Vector3Kind {
    type Output = [f32; 3];
    const NAME: &'static str = "vector3";
    const ARITY: usize = 3;
    const SUPPORTS_SPLINE: bool = true;

    fn from_static(numbers: &[f32]) -> Option<[f32; 3]> {
        exact(numbers)
    }

    fn from_dynamic(components: &[f32]) -> [f32; 3] {
        padded(components)
    }

    fn components(value: [f32; 3]) -> Vec<f32> {
        value.to_vec()
    }

    fn blend(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
        lerp_vec3(a, b, t)
    }

    fn catmull_rom(
        p0: [f32; 3],
        p1: [f32; 3],
        p2: [f32; 3],
        p3: [f32; 3],
        t: f32,
    ) -> Option<[f32; 3]> {
        Some(catmull_rom_vec3(p0, p1, p2, p3, t))
    }

    fn apply_op(acc: [f32; 3], operand: [f32; 3], op: Operation) -> [f32; 3] {
        op_array(acc, operand, op)
    }

    fn combine_base(value: [f32; 3], base: &BaseSample) -> [f32; 3] {
        match base_rotation(base) {
            Some(q) => rotate_vec3(q, value),
            None => add_broadcast(value, &base.values),
        }
    }
}

impl PointKind for Vector4Kind {
    type Output = [f32; 4];
    const NAME: &'static str = "vector4";
    const ARITY: usize = 4;

    fn from_static(numbers: &[f32]) -> Option<[f32; 4]> {
        exact(numbers)
    }

    fn from_dynamic(components: &[f32]) -> [f32; 4] {
        padded(components)
    }

    fn components(value: [f32; 4]) -> Vec<f32> {
        value.to_vec()
    }

    fn blend(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
        lerp_vec4(a, b, t)
    }

    fn apply_op(acc: [f32; 4], operand: [f32; 4], op: Operation) -> [f32; 4] {
        op_array(acc, operand, op)
    }

    fn combine_base(value: [f32; 4], base: &BaseSample) -> [f32; 4] {
        match base_rotation(base) {
            Some(q) => mul_quat(q, value),
            None => add_broadcast(value, &base.values),
        }
    }
}

/// Rotations, stored as `[x, y, z, w]`.
///
/// Plain number groups may also be Euler angles in degrees (Unity `ZXY`
/// order): three numbers are a constant, four are Euler plus time, five are
/// `x y z w` plus time.
impl PointKind for QuaternionKind {
    type Output = [f32; 4];
    const NAME: &'static str = "quaternion";
    const ARITY: usize = 4;

    fn split_time(count: usize) -> Option<bool> {
        match count {
            3 => Some(false),
            4 | 5 => Some(true),
            _ => None,
        }
    }

    fn from_static(numbers: &[f32]) -> Option<[f32; 4]> {
        match numbers {
            [x, y, z] => Some(euler_degrees_to_quat([*x, *y, *z])),
            [x, y, z, w] => Some([*x, *y, *z, *w]),
            _ => None,
        }
    }

    fn from_dynamic(components: &[f32]) -> [f32; 4] {
        if components.len() >= 4 {
            normalize_quat(padded(components))
        } else {
            euler_degrees_to_quat(padded(components))
        }
    }

    fn components(value: [f32; 4]) -> Vec<f32> {
        value.to_vec()
    }

    fn blend(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
        slerp_quat(a, b, t)
    }

    /// Arithmetic on rotations happens on their Euler angles.
    fn apply_op(acc: [f32; 4], operand: [f32; 4], op: Operation) -> [f32; 4] {
        if op == Operation::None {
            return normalize_quat(operand);
        }
        let a = quat_to_euler_degrees(acc);
        let b = quat_to_euler_degrees(operand);
        euler_degrees_to_quat(op_array(a, b, op))
    }

    fn combine_base(value: [f32; 4], base: &BaseSample) -> [f32; 4] {
        match (base.tag, base.values.len()) {
            (_, 0) => value,
            (BaseTag::Quaternion | BaseTag::Untagged, n) if n >= 4 => {
                normalize_quat(mul_quat(normalize_quat(padded(&base.values)), value))
            }
            (_, 3) => normalize_quat(mul_quat(
                euler_degrees_to_quat(padded(&base.values)),
                value,
            )),
            _ => normalize_quat(add_broadcast(value, &base.values)),
        }
    }

    fn normalize_key(value: [f32; 4]) -> [f32; 4] {
        normalize_quat(value)
    }

    fn finish(value: [f32; 4]) -> [f32; 4] {
        normalize_quat(value)
    }
}
