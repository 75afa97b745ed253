//! Strategy registry — string identifiers to shared strategies.
//!
//! The runner depends only on [`Strategy`]; how strategies are named and
//! registered lives here so new ones can be added without touching it.

use super::builtin::{BuyAndHold, Hold, MaCrossover};
use super::{Strategy, StrategyRef};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Default capital the built-in `buy_and_hold` sizes against.
pub const DEFAULT_BUY_AND_HOLD_CAPITAL: f64 = 100_000.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error("strategy '{0}' is already registered")]
    Duplicate(String),

    #[error("strategy id must not be empty")]
    EmptyName,
}

/// Mapping from case-insensitive ids to strategies.
#[derive(Clone, Default)]
pub struct StrategyRegistry {
    entries: BTreeMap<String, StrategyRef>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with `hold`, `buy_and_hold`, `ema` and `sma_cross`.
    pub fn with_builtins() -> Self {
        Self::with_builtins_for_capital(DEFAULT_BUY_AND_HOLD_CAPITAL)
    }

    /// Same as [`with_builtins`](Self::with_builtins), sizing `buy_and_hold`
    /// against `capital`.
    pub fn with_builtins_for_capital(capital: f64) -> Self {
        let mut entries: BTreeMap<String, StrategyRef> = BTreeMap::new();
        entries.insert("hold".into(), Arc::new(Hold));
        entries.insert("buy_and_hold".into(), Arc::new(BuyAndHold::new(capital)));
        entries.insert("ema".into(), Arc::new(MaCrossover::ema_default()));
        entries.insert("sma_cross".into(), Arc::new(MaCrossover::sma_default()));
        Self { entries }
    }

    /// Register `strategy` under `name`. Ids are trimmed and lower-cased.
    pub fn register(&mut self, name: &str, strategy: StrategyRef) -> Result<(), RegistryError> {
        let key = normalize(name);
        if key.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.entries.contains_key(&key) {
            return Err(RegistryError::Duplicate(key));
        }
        self.entries.insert(key, strategy);
        Ok(())
    }

    /// Register a concrete strategy value.
    pub fn register_strategy<S>(&mut self, name: &str, strategy: S) -> Result<(), RegistryError>
    where
        S: Strategy + 'static,
    {
        self.register(name, Arc::new(strategy))
    }

    pub fn get(&self, name: &str) -> Option<StrategyRef> {
        self.entries.get(&normalize(name)).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&normalize(name))
    }

    /// Registered ids in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("names", &self.names())
            .finish()
    }
}

/// Parse a comma-separated list of strategy ids; `all` expands to every
/// registered id.
pub fn parse_strategy_list(list: &str, registry: &StrategyRegistry) -> Vec<String> {
    if list.trim().eq_ignore_ascii_case("all") {
        return registry.names().iter().map(|s| s.to_string()).collect();
    }
    list.split(',')
        .map(normalize)
        .filter(|s| !s.is_empty())
        .collect()
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
