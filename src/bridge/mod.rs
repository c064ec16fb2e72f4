//! Host bridge implementations.
//!
//! The editor glue that actually owns the debug sessions lives in another
//! process; the bridge speaks to it over newline-delimited JSON frames.

mod stdio;

pub use stdio::StdioBridge;
