//! Shared helpers for the binary: logging bootstrap and the platform
//! folder opener.

pub mod logging;
pub mod reveal;
