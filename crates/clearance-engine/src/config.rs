//! Run configuration: concurrency budgets, timeouts, and retry shape
//! (§5 "Concurrency budgets", §4.9).

use clearance_retry::RetryPolicy;
use std::env;
use std::time::Duration;

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name).ok().and_then(|value| value.parse().ok()).unwrap_or(default)
}

/// Per-run concurrency budgets and LLM call parameters.
///
/// Defaults match typical production values; each is overridable via an
/// environment variable so operators can tune a deployment without a
/// rebuild.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Parallel jobs (§5: "`J_max` (parallel jobs)", typical 4).
    pub j_max: usize,
    /// Per-job parallel files (§5: "`F_max` (per-job parallel files)",
    /// typical 8).
    pub f_max: usize,
    /// Global cap on in-flight LLM calls (§5: "`LLM_global_max`... typical
    /// 100").
    pub llm_global_max: usize,
    /// Per-attempt LLM call timeout (§5: "Each LLM call has a per-attempt
    /// timeout (typical 120 s)").
    pub llm_timeout: Duration,
    /// Model identifier passed to every LLM invocation.
    pub llm_model: String,
    pub retry_policy: RetryPolicy,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            j_max: 4,
            f_max: 8,
            llm_global_max: 100,
            llm_timeout: Duration::from_secs(120),
            llm_model: "claude-sonnet-4-5".to_string(),
            retry_policy: RetryPolicy::default(),
        }
    }
}

impl RunConfig {
    /// Layer environment overrides on top of the defaults
    /// (`CLEARANCE_J_MAX`, `CLEARANCE_F_MAX`, `CLEARANCE_LLM_GLOBAL_MAX`,
    /// `CLEARANCE_LLM_TIMEOUT_SECS`, `CLEARANCE_LLM_MODEL`,
    /// `CLEARANCE_RETRY_MAX_ATTEMPTS`, `CLEARANCE_RETRY_BASE_BACKOFF_SECS`).
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            j_max: env_or("CLEARANCE_J_MAX", defaults.j_max),
            f_max: env_or("CLEARANCE_F_MAX", defaults.f_max),
            llm_global_max: env_or("CLEARANCE_LLM_GLOBAL_MAX", defaults.llm_global_max),
            llm_timeout: Duration::from_secs(env_or(
                "CLEARANCE_LLM_TIMEOUT_SECS",
                defaults.llm_timeout.as_secs(),
            )),
            llm_model: env::var("CLEARANCE_LLM_MODEL").unwrap_or(defaults.llm_model),
            retry_policy: RetryPolicy::new(
                env_or("CLEARANCE_RETRY_MAX_ATTEMPTS", defaults.retry_policy.max_attempts),
                Duration::from_secs(env_or(
                    "CLEARANCE_RETRY_BASE_BACKOFF_SECS",
                    defaults.retry_policy.base_backoff.as_secs(),
                )),
                defaults.retry_policy.jitter,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_typical_values() {
        let config = RunConfig::default();
        assert_eq!(config.j_max, 4);
        assert_eq!(config.f_max, 8);
        assert_eq!(config.llm_global_max, 100);
        assert_eq!(config.llm_timeout, Duration::from_secs(120));
    }
}
