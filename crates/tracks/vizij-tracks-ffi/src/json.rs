//! C representation of the point definition value model.
//!
//! Strings and arrays created through the `tracks_create_json_*` functions
//! own their storage. An array takes ownership of the elements it is built
//! from, so only the outermost value is passed to [`tracks_free_json_value`].

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use vizij_tracks_core::Value;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum JsonValueType {
    Number,
    Null,
    String,
    Array,
}

#[repr(C)]
pub struct JsonArray {
    pub elements: *const FFIJsonValue,
    pub length: usize,
}

#[repr(C)]
#[derive(Copy, Clone)]
pub union JsonValueData {
    pub number_value: f64,
    pub string_value: *const c_char,
    pub array: *const JsonArray,
}

#[repr(C)]
#[derive(Copy, Clone)]
pub struct FFIJsonValue {
    pub value_type: JsonValueType,
    pub data: JsonValueData,
}

impl FFIJsonValue {
    const NULL: FFIJsonValue = FFIJsonValue {
        value_type: JsonValueType::Null,
        data: JsonValueData {
            string_value: ptr::null(),
        },
    };
}

#[no_mangle]
pub extern "C" fn tracks_create_json_number(value: f64) -> FFIJsonValue {
    FFIJsonValue {
        value_type: JsonValueType::Number,
        data: JsonValueData {
            number_value: value,
        },
    }
}

#[no_mangle]
pub extern "C" fn tracks_create_json_null() -> FFIJsonValue {
    FFIJsonValue::NULL
}

/// Copy a NUL-terminated string. A null pointer yields a null value.
///
/// # Safety
///
/// `value` must be null or point to a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn tracks_create_json_string(value: *const c_char) -> FFIJsonValue {
    if value.is_null() {
        return FFIJsonValue::NULL;
    }
    let owned = CString::from(CStr::from_ptr(value));
    FFIJsonValue {
        value_type: JsonValueType::String,
        data: JsonValueData {
            string_value: owned.into_raw(),
        },
    }
}

/// Build an array from `length` values. The array takes ownership of the
/// elements' storage; do not free them separately.
///
/// # Safety
///
/// `elements` must be valid for `length` reads (or null when `length` is 0),
/// and each element must come from a `tracks_create_json_*` function.
#[no_mangle]
pub unsafe extern "C" fn tracks_create_json_array(
    elements: *const FFIJsonValue,
    length: usize,
) -> FFIJsonValue {
    let items: Box<[FFIJsonValue]> = if elements.is_null() || length == 0 {
        Box::new([])
    } else {
        std::slice::from_raw_parts(elements, length).into()
    };
    let length = items.len();
    let elements = Box::into_raw(items) as *const FFIJsonValue;
    let array = Box::new(JsonArray { elements, length });
    FFIJsonValue {
        value_type: JsonValueType::Array,
        data: JsonValueData {
            array: Box::into_raw(array),
        },
    }
}

/// Release a value created by this library, recursively, and reset it to null.
///
/// # Safety
///
/// `json_value` must be null or point to a value built by `tracks_create_json_*`
/// that has not been freed or moved into an array.
#[no_mangle]
pub unsafe extern "C" fn tracks_free_json_value(json_value: *mut FFIJsonValue) {
    let Some(value) = json_value.as_mut() else {
        return;
    };
    free_in_place(value);
}

unsafe fn free_in_place(value: &mut FFIJsonValue) {
    match value.value_type {
        JsonValueType::String => {
            let s = value.data.string_value;
            if !s.is_null() {
                drop(CString::from_raw(s as *mut c_char));
            }
        }
        JsonValueType::Array => {
            let array = value.data.array;
            if !array.is_null() {
                let array = Box::from_raw(array as *mut JsonArray);
                let items = ptr::slice_from_raw_parts_mut(array.elements as *mut FFIJsonValue, array.length);
                let mut items = Box::from_raw(items);
                for item in items.iter_mut() {
                    free_in_place(item);
                }
            }
        }
        JsonValueType::Number | JsonValueType::Null => {}
    }
    *value = FFIJsonValue::NULL;
}

/// Deep-copy a borrowed C value into the core value model.
///
/// # Safety
///
/// Every string and array pointer reachable from `value` must be valid.
pub(crate) unsafe fn to_value(value: &FFIJsonValue) -> Result<Value, String> {
    match value.value_type {
        JsonValueType::Number => Ok(Value::Number(value.data.number_value)),
        JsonValueType::Null => Ok(Value::Null),
        JsonValueType::String => {
            let s = value.data.string_value;
            if s.is_null() {
                return Err("string value with null pointer".into());
            }
            CStr::from_ptr(s)
                .to_str()
                .map(Value::from)
                .map_err(|e| format!("string value is not UTF-8: {e}"))
        }
        JsonValueType::Array => {
            let Some(array) = value.data.array.as_ref() else {
                return Err("array value with null pointer".into());
            };
            if array.length == 0 {
                return Ok(Value::Array(Vec::new()));
            }
            if array.elements.is_null() {
                return Err("array with null elements".into());
            }
            std::slice::from_raw_parts(array.elements, array.length)
                .iter()
                .map(|item| to_value(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
    }
}
