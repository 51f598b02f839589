//! Session configuration.
//!
//! # Environment
//!
//! | Variable               | Values                                  | Default         |
//! |------------------------|-----------------------------------------|-----------------|
//! | `DTREE_PRUNE_POLICY`   | `on_completion`, `on_any_finish`, `never` | `on_completion` |
//! | `DTREE_MAX_PATH_DEPTH` | positive integer                        | `64`            |

use std::fmt;
use std::str::FromStr;

const ENV_PRUNE_POLICY: &str = "DTREE_PRUNE_POLICY";
const ENV_MAX_PATH_DEPTH: &str = "DTREE_MAX_PATH_DEPTH";

/// Default bound on delta path length, root region index included.
pub const DEFAULT_MAX_PATH_DEPTH: usize = 64;

/// When a finished run sweeps away nodes from earlier runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrunePolicy {
    /// Only after a run that completed successfully. A run that failed to
    /// compile or was interrupted leaves the previous output on screen.
    #[default]
    OnCompletion,
    /// After every run, however it ended.
    OnAnyFinish,
    /// Never; stale nodes accumulate until replaced.
    Never,
}

impl PrunePolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OnCompletion => "on_completion",
            Self::OnAnyFinish => "on_any_finish",
            Self::Never => "never",
        }
    }
}

impl fmt::Display for PrunePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrunePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on_completion" => Ok(Self::OnCompletion),
            "on_any_finish" => Ok(Self::OnAnyFinish),
            "never" => Ok(Self::Never),
            _ => Err(ConfigError::InvalidValue {
                key: ENV_PRUNE_POLICY,
                value: s.to_string(),
                expected: "on_completion, on_any_finish or never",
            }),
        }
    }
}

/// Rejected configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue {
                key,
                value,
                expected,
            } => write!(f, "invalid {key}={value:?}: expected {expected}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Tunables for a [`Session`](crate::Session).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub prune_policy: PrunePolicy,
    /// Deltas with longer paths are rejected before touching the tree.
    pub max_path_depth: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            prune_policy: PrunePolicy::default(),
            max_path_depth: DEFAULT_MAX_PATH_DEPTH,
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn with_prune_policy(mut self, policy: PrunePolicy) -> Self {
        self.prune_policy = policy;
        self
    }

    #[must_use]
    pub fn with_max_path_depth(mut self, depth: usize) -> Self {
        self.max_path_depth = depth;
        self
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Defaults overridden through a custom environment lookup (for tests).
    pub fn from_env_with<F>(get_env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = get_env(ENV_PRUNE_POLICY) {
            config.prune_policy = value.parse()?;
        }
        if let Some(value) = get_env(ENV_MAX_PATH_DEPTH) {
            config.max_path_depth = match value.trim().parse::<usize>() {
                Ok(depth) if depth > 0 => depth,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_MAX_PATH_DEPTH,
                        value,
                        expected: "a positive integer",
                    });
                }
            };
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn unset_environment_gives_defaults() {
        let config = SessionConfig::from_env_with(env(&[])).expect("defaults");
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.prune_policy, PrunePolicy::OnCompletion);
        assert_eq!(config.max_path_depth, DEFAULT_MAX_PATH_DEPTH);
    }

    #[test]
    fn environment_overrides() {
        let config = SessionConfig::from_env_with(env(&[
            ("DTREE_PRUNE_POLICY", "On_Any_Finish"),
            ("DTREE_MAX_PATH_DEPTH", " 8 "),
        ]))
        .expect("valid");
        assert_eq!(config.prune_policy, PrunePolicy::OnAnyFinish);
        assert_eq!(config.max_path_depth, 8);
    }

    #[test]
    fn malformed_values_are_rejected() {
        let err = SessionConfig::from_env_with(env(&[("DTREE_PRUNE_POLICY", "sometimes")]))
            .unwrap_err();
        assert!(err.to_string().contains("DTREE_PRUNE_POLICY"));
        for bad in ["0", "-3", "deep"] {
            assert!(
                SessionConfig::from_env_with(env(&[("DTREE_MAX_PATH_DEPTH", bad)])).is_err(),
                "{bad}"
            );
        }
    }

    #[test]
    fn builder_and_policy_names() {
        let config = SessionConfig::default()
            .with_prune_policy(PrunePolicy::Never)
            .with_max_path_depth(3);
        assert_eq!(config.prune_policy, PrunePolicy::Never);
        assert_eq!(config.max_path_depth, 3);
        for policy in [
            PrunePolicy::OnCompletion,
            PrunePolicy::OnAnyFinish,
            PrunePolicy::Never,
        ] {
            assert_eq!(policy.to_string().parse::<PrunePolicy>(), Ok(policy));
        }
    }
}
