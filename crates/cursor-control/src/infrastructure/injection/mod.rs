//! Platform-specific input injection implementations.
//!
//! The Win32 adapter is selected at compile time via `#[cfg(target_os = ...)]`;
//! [`default_injector`] hands back whatever the current target supports.

use std::sync::Arc;

use crate::application::inject_input::PlatformInjector;
use crate::application::PlatformError;

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

/// Returns the native injector for this target.
///
/// # Errors
///
/// Returns [`PlatformError::Unsupported`] on targets without an adapter.
pub fn default_injector() -> Result<Arc<dyn PlatformInjector>, PlatformError> {
    #[cfg(target_os = "windows")]
    {
        Ok(Arc::new(windows::WindowsInjector::new()))
    }

    #[cfg(not(target_os = "windows"))]
    {
        Err(PlatformError::Unsupported(format!(
            "input injection is only implemented for Windows (target: {})",
            std::env::consts::OS
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn test_default_injector_is_unsupported_off_windows() {
        assert!(matches!(default_injector(), Err(PlatformError::Unsupported(_))));
    }

    #[cfg(target_os = "windows")]
    #[test]
    fn test_default_injector_is_available_on_windows() {
        assert!(default_injector().is_ok());
    }
}
