//! Caller-facing use-case API for dealbook.

pub mod api;

pub use api::*;
