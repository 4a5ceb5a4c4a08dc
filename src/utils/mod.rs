//! # Utilities Module
//!
//! Grid reachability helpers shared by generation and tests.

pub mod connectivity;

pub use connectivity::*;
