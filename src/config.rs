//! Engine configuration and builder
//!
//! ## Table of Contents
//! - **PlacementConfig**: strategy and scoring knobs for the placement engine
//! - **EngineConfig**: top-level configuration assembled via [`EngineConfigBuilder`]

use crate::scheduler::strategy::GPU_SCORE_WEIGHT;
use crate::scheduler::Strategy;

/// Placement engine configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementConfig {
    /// Which strategy [`crate::scheduler::schedule`] should run.
    pub strategy: Strategy,
    /// GPU weight `K` in the scalar placement score `cpuMilli +
    /// memoryMB + K·gpus`. Defaults to [`GPU_SCORE_WEIGHT`]; only
    /// [`crate::scheduler::schedule_with_config`] honors an override.
    pub gpu_weight: i64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Binpack,
            gpu_weight: GPU_SCORE_WEIGHT,
        }
    }
}

/// Top-level configuration for a placement + simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngineConfig {
    /// Placement engine configuration.
    pub placement: PlacementConfig,
    /// Whether to register and populate Prometheus metrics for the run.
    pub metrics_enabled: bool,
}

/// Fluent builder for [`EngineConfig`].
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Start from the default configuration (binpack strategy, metrics on).
    pub fn new() -> Self {
        Self {
            config: EngineConfig {
                placement: PlacementConfig::default(),
                metrics_enabled: true,
            },
        }
    }

    /// Set the placement strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.config.placement.strategy = strategy;
        self
    }

    /// Override the GPU weight `K` used by the scalar placement score.
    pub fn with_gpu_weight(mut self, gpu_weight: i64) -> Self {
        self.config.placement.gpu_weight = gpu_weight;
        self
    }

    /// Enable or disable metrics collection.
    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.config.metrics_enabled = enabled;
        self
    }

    /// Finish building.
    pub fn build(self) -> EngineConfig {
        self.config
    }
}

impl Default for EngineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_to_binpack_with_metrics_enabled() {
        let config = EngineConfigBuilder::new().build();
        assert_eq!(config.placement.strategy, Strategy::Binpack);
        assert!(config.metrics_enabled);
    }

    #[test]
    fn builder_overrides_apply() {
        let config = EngineConfigBuilder::new()
            .with_strategy(Strategy::Spread)
            .with_metrics(false)
            .build();
        assert_eq!(config.placement.strategy, Strategy::Spread);
        assert!(!config.metrics_enabled);
    }

    #[test]
    fn gpu_weight_override_applies() {
        let config = EngineConfigBuilder::new().with_gpu_weight(42).build();
        assert_eq!(config.placement.gpu_weight, 42);
    }
}
