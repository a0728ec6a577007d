//! Utility modules for the Studynotes application.
//!
//! # Available Utilities
//!
//! - [`datetime`] - Date and time formatting, parsing, and validation functions

pub mod datetime;
