//! Progress tracking.
//!
//! Weighted, clamped progress updates and the controller that persists them.

#![warn(missing_docs)]

pub mod engine;
pub mod controller;

pub use engine::ProgressEngine;
pub use controller::ActivityCompletionController;
