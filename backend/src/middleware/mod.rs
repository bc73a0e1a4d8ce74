//! Middleware wrapped around every request.
//!
//! [`Trace`] assigns the trace id that error payloads echo back.

pub mod trace;

pub use trace::Trace;
