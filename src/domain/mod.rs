//! Core domain types and logic.

pub mod candle;
pub mod config_validation;
pub mod error;
pub mod exit;
pub mod frame;
pub mod indicator;
pub mod informative;
pub mod normalizer;
pub mod nostalgia;
pub mod params;
pub mod rule;
pub mod rule_eval;
pub mod series;
pub mod signal;
pub mod strategy;
pub mod trade;
