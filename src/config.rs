use crate::domain::verification::DEFAULT_CODE_TTL_MINUTES;
use crate::error::{LifecycleError, Result};
use crate::infrastructure::code_store::DEFAULT_SHARDS;
use chrono::Duration;

/// Default interval between background sweeps.
pub const DEFAULT_SWEEP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60);

/// Most lock stripes the code store may be configured with.
pub const MAX_SHARDS: usize = 4096;

/// Longest accepted interval between background sweeps.
pub const MAX_SWEEP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(24 * 60 * 60);

/// Tunables for the code vault and its sweeper.
#[derive(Debug, Clone, PartialEq)]
pub struct VaultConfig {
    /// How long an issued code stays valid.
    pub code_ttl: Duration,
    /// Number of lock stripes in the code store.
    pub shard_count: usize,
    /// How often expired codes are purged in the background.
    pub sweep_interval: std::time::Duration,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            code_ttl: Duration::minutes(DEFAULT_CODE_TTL_MINUTES),
            shard_count: DEFAULT_SHARDS,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

impl VaultConfig {
    /// Builds a config from raw second counts, as given on the command line.
    pub fn from_secs(code_ttl_secs: i64, shard_count: usize, sweep_interval_secs: u64) -> Result<Self> {
        let code_ttl = Duration::try_seconds(code_ttl_secs).ok_or_else(|| {
            LifecycleError::ValidationError(format!("Code ttl out of range: {}s", code_ttl_secs))
        })?;
        let config = Self {
            code_ttl,
            shard_count,
            sweep_interval: std::time::Duration::from_secs(sweep_interval_secs),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.code_ttl <= Duration::zero() {
            return Err(LifecycleError::ValidationError(
                "Code ttl must be positive".to_string(),
            ));
        }
        if self.shard_count == 0 || self.shard_count > MAX_SHARDS {
            return Err(LifecycleError::ValidationError(format!(
                "Shard count must be between 1 and {}",
                MAX_SHARDS
            )));
        }
        if self.sweep_interval.is_zero() {
            return Err(LifecycleError::ValidationError(
                "Sweep interval must be positive".to_string(),
            ));
        }
        if self.sweep_interval > MAX_SWEEP_INTERVAL {
            return Err(LifecycleError::ValidationError(format!(
                "Sweep interval must be at most {}s",
                MAX_SWEEP_INTERVAL.as_secs()
            )));
        }
        Ok(())
    }
}
