//! Core functionality of the batch driver
//!
//! Records, the batch lifecycle, the remote provider and the page scraper.

pub mod batch;
pub mod providers;
pub mod records;
pub mod scrape;
