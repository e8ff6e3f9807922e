//! Best-effort memory locking for the two account secrets while they sit
//! decrypted in the process, as defense in depth alongside `zeroize`.
//!
//! - **Unix**: `mlock()`
//! - **Windows**: `VirtualLock()`
//! - **Other**: logs a warning and continues unlocked
//!
//! Locking failures are logged, never fatal: `zeroize` already guarantees
//! the secret is cleared on drop regardless of whether the page was ever
//! kept out of swap.

use std::ptr::NonNull;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockResult {
    Locked,
    Failed,
    Unsupported,
}

/// # Safety
/// `ptr` must point to valid memory of at least `len` bytes.
pub unsafe fn mlock(ptr: NonNull<u8>, len: usize) -> LockResult {
    if len == 0 {
        return LockResult::Locked;
    }

    #[cfg(unix)]
    {
        mlock_unix(ptr, len)
    }

    #[cfg(windows)]
    {
        mlock_windows(ptr, len)
    }

    #[cfg(not(any(unix, windows)))]
    {
        tracing::warn!("memory locking not supported on this platform; secrets may be swapped to disk");
        LockResult::Unsupported
    }
}

/// # Safety
/// `ptr` must point to valid memory of at least `len` bytes previously
/// locked with `mlock()`.
pub unsafe fn munlock(ptr: NonNull<u8>, len: usize) {
    if len == 0 {
        return;
    }

    #[cfg(unix)]
    {
        munlock_unix(ptr, len);
    }

    #[cfg(windows)]
    {
        munlock_windows(ptr, len);
    }
}

#[cfg(unix)]
unsafe fn mlock_unix(ptr: NonNull<u8>, len: usize) -> LockResult {
    let result = libc::mlock(ptr.as_ptr() as *const libc::c_void, len);
    if result == 0 {
        tracing::debug!(len, "locked memory region");
        LockResult::Locked
    } else {
        let errno = std::io::Error::last_os_error().raw_os_error().unwrap_or(0);
        let reason = match errno {
            libc::ENOMEM => "insufficient memory or exceeds RLIMIT_MEMLOCK",
            libc::EPERM => "insufficient permissions (may need CAP_IPC_LOCK)",
            libc::EINVAL => "invalid address range",
            _ => "unknown error",
        };
        tracing::warn!(reason, errno, "failed to lock memory; secret may be swapped to disk");
        LockResult::Failed
    }
}

#[cfg(unix)]
unsafe fn munlock_unix(ptr: NonNull<u8>, len: usize) {
    if libc::munlock(ptr.as_ptr() as *const libc::c_void, len) != 0 {
        tracing::debug!("munlock returned non-zero, likely already unlocked");
    }
}

#[cfg(windows)]
unsafe fn mlock_windows(ptr: NonNull<u8>, len: usize) -> LockResult {
    use windows::Win32::System::Memory::VirtualLock;

    if VirtualLock(ptr.as_ptr() as *const std::ffi::c_void, len).is_ok() {
        tracing::debug!(len, "locked memory region");
        LockResult::Locked
    } else {
        let error = windows::core::Error::from_win32();
        tracing::warn!(%error, "failed to lock memory; secret may be swapped to disk");
        LockResult::Failed
    }
}

#[cfg(windows)]
unsafe fn munlock_windows(ptr: NonNull<u8>, len: usize) {
    use windows::Win32::System::Memory::VirtualUnlock;

    if VirtualUnlock(ptr.as_ptr() as *const std::ffi::c_void, len).is_err() {
        tracing::debug!("VirtualUnlock failed, likely already unlocked");
    }
}

/// RAII guard: locks on construction, unlocks on drop.
#[derive(Debug)]
pub struct LockedRegion {
    ptr: NonNull<u8>,
    len: usize,
    was_locked: bool,
}

impl LockedRegion {
    /// # Safety
    /// `ptr` must stay valid for at least `len` bytes for the lifetime of
    /// this guard.
    pub unsafe fn new(ptr: NonNull<u8>, len: usize) -> Self {
        let result = mlock(ptr, len);
        Self {
            ptr,
            len,
            was_locked: result == LockResult::Locked,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.was_locked
    }
}

impl Drop for LockedRegion {
    fn drop(&mut self) {
        if self.was_locked {
            // SAFETY: only unlocking memory we locked ourselves, before it is freed.
            unsafe { munlock(self.ptr, self.len) };
        }
    }
}

unsafe impl Send for LockedRegion {}
unsafe impl Sync for LockedRegion {}

/// Locks the memory backing a byte slice (e.g. a decoded secret buffer).
///
/// # Safety
/// The caller must ensure `bytes` outlives the returned guard.
pub unsafe fn lock_bytes(bytes: &[u8]) -> LockedRegion {
    match NonNull::new(bytes.as_ptr() as *mut u8) {
        Some(ptr) => LockedRegion::new(ptr, bytes.len()),
        None => LockedRegion {
            ptr: NonNull::dangling(),
            len: 0,
            was_locked: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_unlock_roundtrip_never_panics() {
        let data = vec![0u8; 4096];
        let ptr = NonNull::new(data.as_ptr() as *mut u8).unwrap();
        unsafe {
            let result = mlock(ptr, data.len());
            assert!(matches!(
                result,
                LockResult::Locked | LockResult::Failed | LockResult::Unsupported
            ));
            if result == LockResult::Locked {
                munlock(ptr, data.len());
            }
        }
    }

    #[test]
    fn locked_region_drops_cleanly() {
        let data = vec![0u8; 4096];
        let ptr = NonNull::new(data.as_ptr() as *mut u8).unwrap();
        let region = unsafe { LockedRegion::new(ptr, data.len()) };
        let _ = region.is_locked();
        drop(region);
    }

    #[test]
    fn empty_lock_is_a_no_op() {
        let ptr = NonNull::dangling();
        unsafe {
            assert_eq!(mlock(ptr, 0), LockResult::Locked);
            munlock(ptr, 0);
        }
    }
}
