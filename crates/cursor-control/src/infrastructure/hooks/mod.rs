//! Platform-specific global hook implementations.
//!
//! Mirrors the `injection` module: the Win32 low-level hook adapter is
//! compiled only for Windows, and [`FakeHookPlatform`](mock::FakeHookPlatform)
//! is available everywhere for tests and dry runs.

use std::sync::Arc;

use crate::application::observe_input::HookPlatform;
use crate::application::PlatformError;

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

/// Returns the native hook platform for this target.
///
/// # Errors
///
/// Returns [`PlatformError::Unsupported`] on targets without an adapter.
pub fn default_hook_platform() -> Result<Arc<dyn HookPlatform>, PlatformError> {
    #[cfg(target_os = "windows")]
    {
        Ok(Arc::new(windows::WindowsHookPlatform::new()))
    }

    #[cfg(not(target_os = "windows"))]
    {
        Err(PlatformError::Unsupported(format!(
            "global input hooks are only implemented for Windows (target: {})",
            std::env::consts::OS
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn test_default_hook_platform_is_unsupported_off_windows() {
        assert!(matches!(
            default_hook_platform(),
            Err(PlatformError::Unsupported(_))
        ));
    }
}
