//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Wall-clock time (result timestamps)
//! - Optional shell capabilities such as a hardware back button

use thiserror::Error;

/// Errors from optional host capabilities
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("capability not available on this host: {0}")]
    Unavailable(&'static str),
}

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

/// Milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Hardware/system back navigation offered by a mobile shell
pub trait BackButtonHost {
    /// Start delivering back presses to the app
    fn register(&mut self) -> Result<(), PlatformError>;
    /// Stop delivering back presses
    fn unregister(&mut self);
}

/// Host without a back button (desktop browsers, tests, the demo binary)
#[derive(Debug, Default)]
pub struct NoBackButton;

impl BackButtonHost for NoBackButton {
    fn register(&mut self) -> Result<(), PlatformError> {
        Err(PlatformError::Unavailable("back button"))
    }

    fn unregister(&mut self) {}
}

/// Try to hook the back button. A missing capability is logged and
/// gameplay continues without it.
pub fn install_back_button(host: &mut dyn BackButtonHost) -> bool {
    match host.register() {
        Ok(()) => true,
        Err(e) => {
            log::info!("Back button integration skipped: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingHost {
        registered: u32,
    }

    impl BackButtonHost for CountingHost {
        fn register(&mut self) -> Result<(), PlatformError> {
            self.registered += 1;
            Ok(())
        }

        fn unregister(&mut self) {
            self.registered -= 1;
        }
    }

    #[test]
    fn test_missing_back_button_is_not_fatal() {
        assert!(!install_back_button(&mut NoBackButton));
    }

    #[test]
    fn test_available_back_button() {
        let mut host = CountingHost { registered: 0 };
        assert!(install_back_button(&mut host));
        assert_eq!(host.registered, 1);
        host.unregister();
        assert_eq!(host.registered, 0);
    }

    #[test]
    fn test_clock_is_after_2020() {
        assert!(now_ms() > 1_577_836_800_000);
    }
}
