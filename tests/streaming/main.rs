//! Streaming Tests
//!
//! End-to-end properties of a vtctl call, checked over both transports:
//! - Ordering - lines arrive in production order, N-tablet output is deterministic
//! - Terminal - exactly one terminal signal, repeated on every later read
//! - Faults - a panicking command is isolated and the server keeps serving
//! - Deadline - a slow command ends with a deadline error
//! - Cancellation - a cancelled call yields no further lines

mod common;

mod cancellation;
mod deadline;
mod faults;
mod ordering;
mod terminal;
