//! Enrollchart - stacked-bar enrollment infographics with country flags.
//!
//! The [`data`] module builds and sorts the enrollment tables, the
//! [`charts`] module turns them into a PNG.

pub mod charts;
pub mod data;
