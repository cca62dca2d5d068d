//! Core domain types and logic.

pub mod config_validation;
pub mod engine;
pub mod error;
pub mod frame;
pub mod indicator;
pub mod ohlcv;
pub mod params;
pub mod position;
pub mod scan;
pub mod signal;
pub mod universe;
