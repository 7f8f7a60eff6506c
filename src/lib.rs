//! tinytrader — single-asset, single-position strategy backtester.
//!
//! Hexagonal architecture: simulation logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
