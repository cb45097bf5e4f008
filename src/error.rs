//! Error classification shared by every layer.
//!
//! Each component keeps its own `thiserror` enum; this trait gives them a
//! stable machine-readable code and a retry hint for the HTTP boundary and
//! for logs.

pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}
