//! Static base values and callback providers owned across the C boundary.

use std::ffi::{c_char, c_void, CStr};

use vizij_tracks_core::{
    ProviderContext, UpdatableHandle, UpdatableProvider, UpdatableProviderRegistry,
};

use crate::error::guard;

/// Borrowed slice returned by a host callback. It only needs to stay valid
/// until the callback returns; the values are copied immediately.
#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct WrappedValues {
    pub values: *const f32,
    pub length: usize,
}

pub type BaseFFIProvider =
    unsafe extern "C" fn(context: *const ProviderContext, user_data: *mut c_void) -> WrappedValues;

struct FfiProvider {
    callback: BaseFFIProvider,
    user_data: *mut c_void,
}

// SAFETY: the host promises `user_data` may be used from whichever thread
// samples the definitions that reference this provider.
unsafe impl Send for FfiProvider {}

impl UpdatableProvider for FfiProvider {
    fn values(&mut self, context: &ProviderContext) -> Vec<f32> {
        let wrapped = unsafe { (self.callback)(context as *const _, self.user_data) };
        if wrapped.values.is_null() || wrapped.length == 0 {
            return Vec::new();
        }
        unsafe { std::slice::from_raw_parts(wrapped.values, wrapped.length) }.to_vec()
    }
}

pub(crate) unsafe fn c_str<'a>(ptr: *const c_char, what: &str) -> Result<&'a str, String> {
    if ptr.is_null() {
        return Err(format!("{what} is null"));
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|e| format!("{what} is not UTF-8: {e}"))
}

#[no_mangle]
pub extern "C" fn tracks_make_base_provider_context() -> *mut ProviderContext {
    Box::into_raw(Box::new(ProviderContext::new()))
}

/// # Safety
///
/// `context` must be null or come from [`tracks_make_base_provider_context`].
/// Definitions parsed against it must not be sampled with it afterwards.
#[no_mangle]
pub unsafe extern "C" fn tracks_dispose_base_provider_context(context: *mut ProviderContext) {
    if !context.is_null() {
        drop(Box::from_raw(context));
    }
}

/// Set (or replace) a named static base value.
///
/// # Safety
///
/// `context` must be live, `name` NUL-terminated, and `values` valid for
/// `count` reads.
#[no_mangle]
pub unsafe extern "C" fn tracks_set_base_provider(
    context: *mut ProviderContext,
    name: *const c_char,
    values: *const f32,
    count: usize,
    quat: bool,
) -> bool {
    guard("tracks_set_base_provider", false, || {
        let context = context.as_mut().ok_or("context is null")?;
        let name = c_str(name, "name")?;
        let values = if count == 0 {
            Vec::new()
        } else if values.is_null() {
            return Err("values is null".into());
        } else {
            std::slice::from_raw_parts(values, count).to_vec()
        };
        context.set(name, values, quat);
        Ok(true)
    })
}

#[no_mangle]
pub extern "C" fn tracks_make_updatable_provider_context() -> *mut UpdatableProviderRegistry {
    Box::into_raw(Box::new(UpdatableProviderRegistry::new()))
}

/// Dropping the registry makes every definition link to it stale; those
/// definitions keep working and sample without a base.
///
/// # Safety
///
/// `registry` must be null or come from [`tracks_make_updatable_provider_context`].
#[no_mangle]
pub unsafe extern "C" fn tracks_dispose_updatable_provider_context(
    registry: *mut UpdatableProviderRegistry,
) {
    if !registry.is_null() {
        drop(Box::from_raw(registry));
    }
}

/// Register a callback provider. Returns its handle, or `0` on failure.
///
/// # Safety
///
/// `registry` must be live and `name` NUL-terminated. `callback` is invoked
/// with `user_data` until the handle is disposed.
#[no_mangle]
pub unsafe extern "C" fn tracks_register_updatable_provider(
    registry: *mut UpdatableProviderRegistry,
    name: *const c_char,
    callback: Option<BaseFFIProvider>,
    user_data: *mut c_void,
) -> u64 {
    guard("tracks_register_updatable_provider", 0, || {
        let registry = registry.as_ref().ok_or("registry is null")?;
        let name = c_str(name, "name")?;
        let callback = callback.ok_or("callback is null")?;
        let handle = registry.register(
            name,
            FfiProvider {
                callback,
                user_data,
            },
        );
        Ok(handle.to_bits())
    })
}

/// Release a provider handle. Returns `false` for stale or unknown handles.
///
/// # Safety
///
/// `registry` must be null or live.
#[no_mangle]
pub unsafe extern "C" fn tracks_dispose_updatable_provider(
    registry: *mut UpdatableProviderRegistry,
    handle: u64,
) -> bool {
    guard("tracks_dispose_updatable_provider", false, || {
        let registry = registry.as_ref().ok_or("registry is null")?;
        Ok(UpdatableHandle::from_bits(handle).is_some_and(|h| registry.dispose(h)))
    })
}
