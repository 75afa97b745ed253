//! Backtesting engine — engine state and the step-by-step simulation loop.
//!
//! The engine consumes a validated price series and a strategy, then for
//! each step hands the strategy the visible history, executes its signals
//! at the step's close, and records marked-to-market equity.

pub mod loop_runner;
pub mod state;

pub use loop_runner::{simulate, SimulationResult, SkippedSignal};
pub use state::{EngineConfig, EngineState, ExecutionError};
