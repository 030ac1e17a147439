//! Utility modules for the batch driver

pub mod error;
pub mod logging;
