//! Fault boundary around command execution.
//!
//! A panic inside a command must never take down the serving process. The
//! command runs under `catch_unwind`; a caught panic is logged and turned
//! into a [`StreamError::Fault`] so the caller sees it as a distinct error
//! class.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::error;
use vtctl_core::{StreamError, PANIC_MARKER};

/// Run `work`, converting a panic into `StreamError::Fault`.
///
/// The inner `Result` is whatever `work` returned; the outer one is `Err`
/// only when `work` panicked.
pub(crate) fn run_supervised<T>(work: impl FnOnce() -> T) -> Result<T, StreamError> {
    // Nothing reads the closure's captures after a panic.
    catch_unwind(AssertUnwindSafe(work)).map_err(|payload| {
        let message = panic_message(payload.as_ref());
        error!("{}: {}", PANIC_MARKER, message);
        StreamError::Fault { message }
    })
}

/// Extract the message from a panic payload.
///
/// `panic!("literal")` carries a `&'static str`, formatted panics carry a
/// `String`; anything else has no readable message.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "(non-string panic)".to_string()
    }
}
