//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types (positions and colors)
//! - Time representation and frame stepping
//! - Logging utilities

pub mod math;
pub mod time;
pub mod logging;
