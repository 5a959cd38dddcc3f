//! The tools module provides helper functions for huffpack.
//!
//! The tools are:
//! - cli: Command line interface for huffpack.
//! - freq_count: Byte frequency count of the input.
//!
pub mod cli;
pub mod freq_count;
