//! Engine configuration: which strategy runs the layer operations.
//!
//! The choice is made once, when [`EngineConfig::build`] constructs the
//! [`LayerOps`] implementation. Callers then use the trait object and never
//! branch on the strategy themselves.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::info;

use p2p_backend_cpu::CpuBackend;

use crate::accelerated::Accelerated;
use crate::ops::LayerOps;
use crate::reference::Reference;

/// Environment variable read by [`EngineConfig::from_env`] for the strategy.
pub const STRATEGY_ENV: &str = "P2P_STRATEGY";
/// Environment variable read by [`EngineConfig::from_env`] for the worker count.
pub const THREADS_ENV: &str = "P2P_THREADS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown strategy {0:?} (expected \"reference\" or \"accelerated\")")]
    UnknownStrategy(String),

    #[error("invalid thread count {0:?}: expected a positive integer")]
    InvalidThreads(String),

    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Execution strategy for the layer operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    /// Scalar loops, single-threaded.
    Reference,
    /// Batched kernels on a parallel backend.
    #[default]
    Accelerated,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Reference => f.write_str("reference"),
            Strategy::Accelerated => f.write_str("accelerated"),
        }
    }
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reference" | "scalar" => Ok(Strategy::Reference),
            "accelerated" | "parallel" => Ok(Strategy::Accelerated),
            _ => Err(ConfigError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Settings for building a [`LayerOps`] implementation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    pub strategy: Strategy,
    /// Dedicated worker count for the accelerated backend; `None` shares the
    /// global rayon pool. Ignored by the reference strategy.
    pub threads: Option<usize>,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Read [`STRATEGY_ENV`] and [`THREADS_ENV`]; unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`EngineConfig::from_env`] but with an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = EngineConfig::default();
        if let Some(strategy) = lookup(STRATEGY_ENV) {
            config.strategy = strategy.parse()?;
        }
        if let Some(threads) = lookup(THREADS_ENV) {
            let n = threads
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidThreads(threads.clone()))?;
            config.threads = Some(n);
        }
        Ok(config)
    }

    /// Construct the configured implementation.
    pub fn build(&self) -> Result<Box<dyn LayerOps>, ConfigError> {
        if self.threads == Some(0) {
            return Err(ConfigError::InvalidThreads("0".to_string()));
        }
        info!(strategy = %self.strategy, threads = ?self.threads, "building layer ops");
        match self.strategy {
            Strategy::Reference => Ok(Box::new(Reference)),
            Strategy::Accelerated => {
                let backend = match self.threads {
                    Some(n) => CpuBackend::with_threads(n)?,
                    None => CpuBackend::new(),
                };
                Ok(Box::new(Accelerated::new(backend)))
            }
        }
    }
}
