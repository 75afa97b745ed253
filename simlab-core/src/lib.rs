//! SimLab Core — domain types, engine state, simulation loop, strategies.
//!
//! This crate contains the heart of the backtesting engine:
//! - Domain types (price points and series, signals, trades, positions)
//! - Engine state with the two legal transitions (apply a signal, record equity)
//! - Step-by-step simulation loop with a structural look-ahead guard
//! - Strategy trait, built-in strategies and the strategy registry
//! - Market data provider boundary (trait, columnar payloads, resampling)

pub mod data;
pub mod domain;
pub mod engine;
pub mod indicators;
pub mod strategy;
