//! Centralized error handling for m3u-curator
//!
//! # Error Categories
//!
//! - **Validation Errors**: inputs that violate a pipeline precondition
//! - **Configuration Errors**: unusable configuration values (e.g. a zero block size)
//! - **I/O / Encoding Errors**: filesystem, JSON channel store and TOML config failures
//!
//! # Usage
//!
//! ```rust
//! use m3u_curator::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     // Function can return any error type that converts to AppError
//!     Ok("success".to_string())
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;
