//! Commands that exist to exercise the serving path itself.

use crate::Result;

/// Message of the panic raised by the `Panic` command.
pub const PANIC_MESSAGE: &str = "this command panics on purpose";

/// Handle Panic command.
pub fn panic_on_purpose() -> Result<()> {
    panic!("{}", PANIC_MESSAGE)
}
