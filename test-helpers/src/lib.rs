//! Common helpers used in unit and integration tests of the deploy scripts

pub mod misc;
pub mod mock;
