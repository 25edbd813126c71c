// Keep the controller resident: mlockall so it is never paged out under memory pressure

/// Locks current and future pages. Prefers `MCL_ONFAULT` (pin on first touch) and falls
/// back to plain `MCL_CURRENT | MCL_FUTURE` on kernels that reject it.
#[cfg(target_os = "linux")]
pub fn lock_all_pages() -> Result<(), nix::Error> {
    use nix::sys::mman::{MlockAllFlags, mlockall};

    let base = MlockAllFlags::MCL_CURRENT | MlockAllFlags::MCL_FUTURE;
    let on_fault = MlockAllFlags::from_bits_retain(nix::libc::MCL_ONFAULT);
    match mlockall(base | on_fault) {
        Err(nix::Error::EINVAL) => mlockall(base),
        other => other,
    }
}

#[cfg(not(target_os = "linux"))]
pub fn lock_all_pages() -> Result<(), std::io::Error> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "mlockall is only used on Linux",
    ))
}

/// Locks memory, logging the outcome. Failure (RLIMIT_MEMLOCK, missing CAP_IPC_LOCK) is not fatal.
pub fn lock_memory_pages() -> bool {
    match lock_all_pages() {
        Ok(()) => {
            tracing::info!("Memory pages locked in RAM");
            true
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Failed to lock memory pages (mlockall); raise RLIMIT_MEMLOCK or grant CAP_IPC_LOCK"
            );
            false
        }
    }
}
