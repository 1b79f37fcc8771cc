//! Utility module
//!
//! This module provides common utilities and helper functions used
//! throughout the library.

/// Formats bytes as uppercase hex pairs separated by spaces
pub fn hex_dump(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&format!("{:02X}", byte));
    }
    out
}

/// Installs a global stderr subscriber for the crate's tracing events.
///
/// Intended for binaries embedding the link; does nothing if a subscriber
/// is already set.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_target(false)
        .try_init();
}
