//! Common test utilities
//!
//! This module is shared across all integration tests

pub mod fixtures;

#[allow(unused_imports)]
pub use fixtures::{resolver_for, surface_options, tiklydown_payload, tikwm_payload, SHORT_URL, VIDEO_URL};
