//! # LEAP Common Library
//!
//! Shared code for LEAP microservices including:
//! - Error taxonomy
//! - Configuration loading and root folder resolution
//! - Timestamp and calendar-date utilities

pub mod config;
pub mod error;
pub mod time;

pub use error::{Error, Result};
