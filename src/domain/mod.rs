//! Core domain types and simulation logic.

pub mod record;
pub mod series;
pub mod signal;
pub mod strategy;
pub mod execution;
pub mod backtest;
pub mod metrics;
pub mod config_validation;
pub mod error;
