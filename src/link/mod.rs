//! Serial link management module
//!
//! This module owns the open serial device and routes framed traffic:
//! commands in, decoded samples out.

mod connection;

pub use self::connection::{LinkHandle, LinkManager};
