//! Studynotes - a terminal study companion
//!
//! This library provides a terminal interface for keeping personal notes,
//! grouping them into categories, marking favorites and scheduling study
//! plans. All data lives in a hosted backend (Supabase: auth, PostgREST rows
//! and storage buckets); nothing is cached locally.
//!
//! # Modules
//!
//! * [`config`] - Application configuration management
//! * [`backend`] - Remote service abstraction (auth, rows, storage)
//! * [`repositories`] - One-to-one wrappers over remote table/bucket operations
//! * [`view_state`] - Observable screen state that calls the repositories
//! * [`ui`] - Terminal user interface components
//! * [`utils`] - Utility functions and helpers

/// Backend abstraction layer for the hosted service
pub mod backend;

/// Configuration module for managing application settings
pub mod config;

/// Application constants and default values
pub mod constants;

/// Plain data models mirroring the remote tables
pub mod entities;

/// Icon definitions for visual representation in the TUI
pub mod icons;

/// Logging utilities for debugging and error tracking
pub mod logger;

/// Repository layer for remote table and bucket operations
pub mod repositories;

/// Persistence of the signed-in session between runs
pub mod session;

/// Terminal user interface components and rendering
pub mod ui;

/// Utility functions for date/time handling and other helpers
pub mod utils;

/// Observable state holders backing each screen
pub mod view_state;

// Re-export entity models for convenient access
pub use entities::{Category, Favorite, NewNote, Note, StudyPlan};
