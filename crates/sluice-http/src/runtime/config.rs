//! Environment-based configuration for the HTTP runtime.
//!
//! ## Environment Variables
//!
//! - `SLUICE_DRAIN_DEADLINE_SECS` - Maximum time to wait for in-flight
//!   executions to finish once draining starts (default: 30)

use std::{env, time::Duration};

/// Error produced while loading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid environment variable '{key}': {message}")]
    InvalidEnvVar { key: String, message: String },
}

/// Runtime configuration for the HTTP boundary.
///
/// One knob, as the lifecycle core only needs to know how long to wait
/// before giving up on a clean drain.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeConfig {
    pub drain_deadline: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            drain_deadline: Duration::from_secs(30),
        }
    }
}

impl RuntimeConfig {
    /// Load from the environment, falling back to defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(secs) = get_env_u64("SLUICE_DRAIN_DEADLINE_SECS")? {
            config.drain_deadline = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

fn get_env_u64(key: &str) -> Result<Option<u64>, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .parse::<u64>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidEnvVar {
                key: key.to_string(),
                message: e.to_string(),
            }),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError::InvalidEnvVar {
            key: key.to_string(),
            message: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn default_drain_deadline_is_30s() {
        let config = RuntimeConfig::default();
        assert_eq!(config.drain_deadline, Duration::from_secs(30));
    }

    #[test]
    fn from_env_honors_override() {
        let _guard = ENV_LOCK.lock().unwrap();
        unsafe {
            env::set_var("SLUICE_DRAIN_DEADLINE_SECS", "45");
        }
        let config = RuntimeConfig::from_env().unwrap();
        assert_eq!(config.drain_deadline, Duration::from_secs(45));
        unsafe {
            env::remove_var("SLUICE_DRAIN_DEADLINE_SECS");
        }
    }

    #[test]
    fn from_env_falls_back_to_default_when_unset() {
        let _guard = ENV_LOCK.lock().unwrap();
        unsafe {
            env::remove_var("SLUICE_DRAIN_DEADLINE_SECS");
        }
        let config = RuntimeConfig::from_env().unwrap();
        assert_eq!(config.drain_deadline, Duration::from_secs(30));
    }

    #[test]
    fn from_env_rejects_invalid_value() {
        let _guard = ENV_LOCK.lock().unwrap();
        unsafe {
            env::set_var("SLUICE_DRAIN_DEADLINE_SECS", "not-a-number");
        }
        let result = RuntimeConfig::from_env();
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar { .. })));
        unsafe {
            env::remove_var("SLUICE_DRAIN_DEADLINE_SECS");
        }
    }
}
