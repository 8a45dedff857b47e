//! Error types for the Signbridge gateway.
//!
//! This crate provides the foundation error types used throughout the Signbridge workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use signbridge_error::{GenerationError, GenerationErrorKind, SignbridgeResult};
//!
//! fn generate() -> SignbridgeResult<String> {
//!     Err(GenerationError::new(GenerationErrorKind::EmptyKeywords))?
//! }
//!
//! match generate() {
//!     Ok(text) => println!("Got: {}", text),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod generation;
mod model;
mod server;

pub use config::ConfigError;
pub use error::{SignbridgeError, SignbridgeErrorKind, SignbridgeResult};
pub use generation::{GenerationError, GenerationErrorKind, RetryableError};
pub use model::{ModelError, ModelErrorKind};
pub use server::ServerError;
