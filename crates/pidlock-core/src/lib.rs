//! pidlock-core — single-instance enforcement with PID lock files.
//!
//! Rust callers use [`lock::PidLock`] directly. C callers link the
//! `cdylib`/`staticlib` build and go through the functions in [`ffi`]
//! (declared in `include/pidlock.h`).

pub mod ffi;
pub mod lock;

// Re-export commonly used types
pub use lock::{LockError, PidLock, TryLock};
