//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Integer math types and 90-degree quantised rotation helpers
//! - Isometric screen projection
//! - Logging utilities

pub mod logging;
pub mod math;
