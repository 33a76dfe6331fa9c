//! Notebook batch operations.

pub mod describe;
pub mod runner;
pub mod strip;
