//! Permission resolution for the ISP operator dashboard.
//!
//! `permissions` holds the immutable catalog and role table, `identity` resolves a user's
//! effective permissions and exposes the query surface, `gates` turns answers into
//! enable/disable and redirect decisions. All of it is advisory UI gating; the backend API
//! enforces access.

pub mod permissions;
pub mod identity;
pub mod gates;
pub mod config;
pub mod error;

// Test-only printing helper: expands to tprintln! during tests and is absent otherwise.
// Usage in tests: tprintln!("debug: {}", value);
#[cfg(any(test, debug_assertions))]
#[macro_export]
macro_rules! tprintln {
    ($($arg:tt)*) => ( eprintln!($($arg)*) );
}

// In non-test builds, provide a no-op tprintln! so calls compile without effect.
#[cfg(not(any(test, debug_assertions)))]
#[macro_export]
macro_rules! tprintln {
    ($($arg:tt)*) => ({
        // Preserve formatting checks in release without producing code
        if false { let _ = format!($($arg)*); }
    });
}
