//! Point definition lifecycle and sampling for each value kind.

use std::ffi::c_char;
use std::ptr;

use vizij_tracks_core::{
    FloatKind, PointDefinition, PointKind, ProviderContext, QuaternionKind,
    UpdatableProviderRegistry, Value, Vector3Kind, Vector4Kind,
};

use crate::context::c_str;
use crate::error::guard;
use crate::json::{to_value, FFIJsonValue};

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct WrapVec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct WrapVec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WrapQuat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for WrapQuat {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        }
    }
}

impl From<[f32; 3]> for WrapVec3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<[f32; 4]> for WrapVec4 {
    fn from([x, y, z, w]: [f32; 4]) -> Self {
        Self { x, y, z, w }
    }
}

impl From<[f32; 4]> for WrapQuat {
    fn from([x, y, z, w]: [f32; 4]) -> Self {
        Self { x, y, z, w }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FloatInterpolationResult {
    pub value: f32,
    pub is_last: bool,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vector3InterpolationResult {
    pub value: WrapVec3,
    pub is_last: bool,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vector4InterpolationResult {
    pub value: WrapVec4,
    pub is_last: bool,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct QuaternionInterpolationResult {
    pub value: WrapQuat,
    pub is_last: bool,
}

unsafe fn build<K: PointKind>(
    value: &Value,
    context: *const ProviderContext,
    updatable: *const UpdatableProviderRegistry,
) -> Result<*mut PointDefinition<K>, String> {
    let empty;
    let context = match context.as_ref() {
        Some(ctx) => ctx,
        None => {
            empty = ProviderContext::new();
            &empty
        }
    };
    let definition = PointDefinition::<K>::parse(value, context, updatable.as_ref())
        .map_err(|e| e.to_string())?;
    log::debug!(
        "{} point definition with {} keyframes",
        K::NAME,
        definition.count()
    );
    Ok(Box::into_raw(Box::new(definition)))
}

unsafe fn sample<K: PointKind>(
    definition: *const PointDefinition<K>,
    time: f32,
    context: *const ProviderContext,
) -> Result<(K::Output, bool), String> {
    let definition = definition.as_ref().ok_or("definition is null")?;
    Ok(match context.as_ref() {
        Some(ctx) => definition.interpolate(time, ctx),
        None => definition.interpolate(time, &ProviderContext::new()),
    })
}

macro_rules! point_definition_abi {
    (
        $kind:ty, $result:ident,
        make = $make:ident,
        make_from_str = $make_str:ident,
        interpolate = $interp:ident,
        count = $count:ident,
        has_base = $has_base:ident,
        free = $free:ident $(,)?
    ) => {
        /// Parse a definition from a value tree. Returns null on failure; see
        /// `tracks_last_error`.
        ///
        /// # Safety
        ///
        /// `json` must be a valid value tree. `context` and `updatable` may be
        /// null; both must outlive sampling of the returned definition.
        #[no_mangle]
        pub unsafe extern "C" fn $make(
            json: *const FFIJsonValue,
            context: *const ProviderContext,
            updatable: *const UpdatableProviderRegistry,
        ) -> *mut PointDefinition<$kind> {
            guard(stringify!($make), ptr::null_mut(), || {
                let json = json.as_ref().ok_or("json is null")?;
                build::<$kind>(&to_value(json)?, context, updatable)
            })
        }

        /// Parse a definition from JSON text. Returns null on failure.
        ///
        /// # Safety
        ///
        /// `text` must be NUL-terminated; see the value tree constructor for
        /// the other arguments.
        #[no_mangle]
        pub unsafe extern "C" fn $make_str(
            text: *const c_char,
            context: *const ProviderContext,
            updatable: *const UpdatableProviderRegistry,
        ) -> *mut PointDefinition<$kind> {
            guard(stringify!($make_str), ptr::null_mut(), || {
                let text = c_str(text, "text")?;
                let value = Value::from_json_str(text).map_err(|e| e.to_string())?;
                build::<$kind>(&value, context, updatable)
            })
        }

        /// # Safety
        ///
        /// `definition` must be live. `context` may be null.
        #[no_mangle]
        pub unsafe extern "C" fn $interp(
            definition: *const PointDefinition<$kind>,
            time: f32,
            context: *const ProviderContext,
        ) -> $result {
            guard(stringify!($interp), $result::default(), || {
                let (value, is_last) = sample::<$kind>(definition, time, context)?;
                Ok($result {
                    value: value.into(),
                    is_last,
                })
            })
        }

        /// # Safety
        ///
        /// `definition` must be null or live.
        #[no_mangle]
        pub unsafe extern "C" fn $count(definition: *const PointDefinition<$kind>) -> usize {
            definition.as_ref().map_or(0, |d| d.count())
        }

        /// # Safety
        ///
        /// `definition` must be null or live.
        #[no_mangle]
        pub unsafe extern "C" fn $has_base(definition: *const PointDefinition<$kind>) -> bool {
            definition.as_ref().is_some_and(|d| d.has_base_provider())
        }

        /// # Safety
        ///
        /// `definition` must be null or come from this kind's constructors.
        #[no_mangle]
        pub unsafe extern "C" fn $free(definition: *mut PointDefinition<$kind>) {
            if !definition.is_null() {
                drop(Box::from_raw(definition));
            }
        }
    };
}

point_definition_abi!(
    FloatKind, FloatInterpolationResult,
    make = tracks_make_float_point_definition,
    make_from_str = tracks_make_float_point_definition_from_str,
    interpolate = tracks_interpolate_float,
    count = tracks_float_count,
    has_base = tracks_float_has_base_provider,
    free = tracks_free_float_point_definition,
);

point_definition_abi!(
    Vector3Kind, Vector3InterpolationResult,
    make = tracks_make_vector3_point_definition,
    make_from_str = tracks_make_vector3_point_definition_from_str,
    interpolate = tracks_interpolate_vector3,
    count = tracks_vector3_count,
    has_base = tracks_vector3_has_base_provider,
    free = tracks_free_vector3_point_definition,
);

point_definition_abi!(
    Vector4Kind, Vector4InterpolationResult,
    make = tracks_make_vector4_point_definition,
    make_from_str = tracks_make_vector4_point_definition_from_str,
    interpolate = tracks_interpolate_vector4,
    count = tracks_vector4_count,
    has_base = tracks_vector4_has_base_provider,
    free = tracks_free_vector4_point_definition,
);

point_definition_abi!(
    QuaternionKind, QuaternionInterpolationResult,
    make = tracks_make_quat_point_definition,
    make_from_str = tracks_make_quat_point_definition_from_str,
    interpolate = tracks_interpolate_quat,
    count = tracks_quat_count,
    has_base = tracks_quat_has_base_provider,
    free = tracks_free_quat_point_definition,
);
