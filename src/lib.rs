//! liftlog library
//!
//! Workout log cleaning, per-exercise metric series, trend fitting and
//! weekly frequency counts, with plotters-based chart output.

pub mod analysis;
pub mod build_info;
pub mod charts;
pub mod config;
pub mod models;
pub mod pipeline;
