//! C ABI for Vizij tracks point definitions.
//!
//! Hosts build a value tree (or pass JSON text), parse it against a static
//! provider context and an optional updatable provider registry, then sample
//! the returned definition per frame. Every object handed out is freed by its
//! matching `tracks_free_*` / `tracks_dispose_*` function. Failures return a
//! neutral value and set a per-thread message readable through
//! [`tracks_last_error`].

mod context;
mod definitions;
mod error;
mod json;

pub use context::*;
pub use definitions::*;
pub use error::tracks_last_error;
pub use json::*;

/// Route `log` output through `env_logger` (honours `RUST_LOG`). Returns
/// `false` if a logger was already installed.
#[no_mangle]
pub extern "C" fn tracks_init_logging() -> bool {
    env_logger::try_init().is_ok()
}
