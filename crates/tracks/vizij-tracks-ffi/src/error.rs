//! Per-thread failure reporting for the C boundary.

use std::any::Any;
use std::cell::RefCell;
use std::ffi::{c_char, CString};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

pub(crate) fn set_last_error(message: String) {
    log::warn!("{message}");
    let message = CString::new(message.replace('\0', " ")).ok();
    LAST_ERROR.with(|slot| *slot.borrow_mut() = message);
}

pub(crate) fn clear_last_error() {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = None);
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}

/// Run `f` without letting a panic cross the boundary. Errors and panics
/// are recorded for [`tracks_last_error`] and replaced with `fallback`.
pub(crate) fn guard<T>(op: &str, fallback: T, f: impl FnOnce() -> Result<T, String>) -> T {
    clear_last_error();
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => value,
        Ok(Err(message)) => {
            set_last_error(format!("{op}: {message}"));
            fallback
        }
        Err(payload) => {
            set_last_error(format!("{op} panicked: {}", panic_message(payload.as_ref())));
            fallback
        }
    }
}

/// Reason for the most recent failure on this thread, or null.
///
/// The pointer stays valid until the next `tracks_*` call on the same thread.
#[no_mangle]
pub extern "C" fn tracks_last_error() -> *const c_char {
    LAST_ERROR.with(|slot| {
        slot.borrow()
            .as_ref()
            .map_or(ptr::null(), |message| message.as_ptr())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    #[test]
    fn guard_records_errors_and_panics() {
        let v = guard("op", 0, || Err("boom".to_string()));
        assert_eq!(v, 0);
        let msg = unsafe { CStr::from_ptr(tracks_last_error()) };
        assert_eq!(msg.to_str().unwrap(), "op: boom");

        let v = guard("op", -1, || -> Result<i32, String> { panic!("kaboom") });
        assert_eq!(v, -1);
        let msg = unsafe { CStr::from_ptr(tracks_last_error()) };
        assert!(msg.to_str().unwrap().contains("kaboom"));

        assert_eq!(guard("op", 0, || Ok(7)), 7);
        assert!(tracks_last_error().is_null());
    }
}
