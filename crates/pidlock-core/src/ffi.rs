//! C-callable wrappers around [`PidLock`].
//!
//! Handles are heap-allocated and passed to C as opaque pointers. Results use
//! sentinel values instead of Rust errors:
//!
//! - `pidlock_trylock`: PID (> 0) on acquisition, `0` when contended or
//!   already held, `-errno` on failure
//! - `pidlock_unlock`: `1` on success, `-errno` on failure
//! - `pidlock_get_pid`: `-1` while not held
//!
//! `pidlock_init` returns `NULL` on failure. The OS error code of the most
//! recent failure is kept in a process-wide slot read by `pidlock_last_error`.

use crate::lock::{LockError, PidLock, TryLock};
use libc::{c_int, pid_t};
use std::ffi::{c_char, CStr, CString};
use std::path::PathBuf;
use std::sync::atomic::{AtomicI32, Ordering};

static LAST_ERROR: AtomicI32 = AtomicI32::new(0);

/// Opaque handle given to C callers.
pub struct PidLockHandle {
    lock: PidLock,
    // NUL-terminated copy of the path for pidlock_get_location
    location: CString,
}

fn set_last_error(code: c_int) {
    LAST_ERROR.store(code, Ordering::Relaxed);
}

fn errno_of(err: &LockError) -> c_int {
    err.raw_os_error().unwrap_or(libc::EIO)
}

fn pid_to_raw(pid: u32) -> pid_t {
    pid_t::try_from(pid).unwrap_or(pid_t::MAX)
}

#[cfg(unix)]
fn path_from_c(path: &CStr) -> PathBuf {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(OsStr::from_bytes(path.to_bytes()))
}

#[cfg(not(unix))]
fn path_from_c(path: &CStr) -> PathBuf {
    PathBuf::from(path.to_string_lossy().into_owned())
}

/// Create a lock handle for `path`, creating or truncating the file.
/// Returns NULL on failure; see `pidlock_last_error`.
///
/// # Safety
///
/// `path` must be NULL or point to a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn pidlock_init(path: *const c_char) -> *mut PidLockHandle {
    if path.is_null() {
        set_last_error(libc::EINVAL);
        return std::ptr::null_mut();
    }
    let location = unsafe { CStr::from_ptr(path) }.to_owned();
    match PidLock::new(path_from_c(&location)) {
        Ok(lock) => Box::into_raw(Box::new(PidLockHandle { lock, location })),
        Err(e) => {
            set_last_error(errno_of(&e));
            std::ptr::null_mut()
        }
    }
}

/// Try to take the lock. Returns the PID, 0, or -errno.
///
/// # Safety
///
/// `handle` must be NULL or a live pointer returned by `pidlock_init`.
#[no_mangle]
pub unsafe extern "C" fn pidlock_trylock(handle: *mut PidLockHandle) -> c_int {
    let Some(h) = (unsafe { handle.as_mut() }) else {
        set_last_error(libc::EINVAL);
        return -libc::EINVAL;
    };
    match h.lock.try_lock() {
        TryLock::Acquired(pid) => pid_to_raw(pid),
        TryLock::Contended => 0,
        TryLock::Failed(e) => {
            let code = errno_of(&e);
            set_last_error(code);
            -code
        }
    }
}

/// Release the lock. Returns 1 on success or -errno.
///
/// # Safety
///
/// `handle` must be NULL or a live pointer returned by `pidlock_init`.
#[no_mangle]
pub unsafe extern "C" fn pidlock_unlock(handle: *mut PidLockHandle) -> c_int {
    let Some(h) = (unsafe { handle.as_mut() }) else {
        set_last_error(libc::EINVAL);
        return -libc::EINVAL;
    };
    match h.lock.unlock() {
        Ok(()) => 1,
        Err(e) => {
            let code = errno_of(&e);
            set_last_error(code);
            -code
        }
    }
}

/// PID written by this handle, or -1 while not held.
///
/// # Safety
///
/// `handle` must be NULL or a live pointer returned by `pidlock_init`.
#[no_mangle]
pub unsafe extern "C" fn pidlock_get_pid(handle: *const PidLockHandle) -> pid_t {
    match unsafe { handle.as_ref() } {
        Some(h) => h.lock.held_pid().map_or(-1, pid_to_raw),
        None => -1,
    }
}

/// Path of the lock file. Valid until `pidlock_destroy`; do NOT free.
///
/// # Safety
///
/// `handle` must be NULL or a live pointer returned by `pidlock_init`.
#[no_mangle]
pub unsafe extern "C" fn pidlock_get_location(handle: *const PidLockHandle) -> *const c_char {
    match unsafe { handle.as_ref() } {
        Some(h) => h.location.as_ptr(),
        None => std::ptr::null(),
    }
}

/// 1 if this handle holds the lock, else 0.
///
/// # Safety
///
/// `handle` must be NULL or a live pointer returned by `pidlock_init`.
#[no_mangle]
pub unsafe extern "C" fn pidlock_is_locked(handle: *const PidLockHandle) -> c_int {
    match unsafe { handle.as_ref() } {
        Some(h) => c_int::from(h.lock.is_held()),
        None => 0,
    }
}

/// Close the handle and remove the lock file. NULL is ignored.
///
/// # Safety
///
/// `handle` must be NULL or a pointer returned by `pidlock_init` that has
/// not been destroyed yet.
#[no_mangle]
pub unsafe extern "C" fn pidlock_destroy(handle: *mut PidLockHandle) {
    if !handle.is_null() {
        unsafe { drop(Box::from_raw(handle)) };
    }
}

/// OS error code of the most recent failure in this adapter, 0 if none.
#[no_mangle]
pub extern "C" fn pidlock_last_error() -> c_int {
    LAST_ERROR.load(Ordering::Relaxed)
}
