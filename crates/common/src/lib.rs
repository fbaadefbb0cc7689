//! Common utilities used across the kiln workspace.
//!
//! This crate provides hex helpers, formatting traits and small file-system utilities that are
//! shared by the VM, the configuration loader and the command line interface.

/// General utility functions and types for common tasks.
pub mod utils;
