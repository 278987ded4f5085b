//! CLI library components for the ward census pipeline.

pub mod logging;
pub mod resolve;
pub mod weekly;
