use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Exponential backoff for reconnecting the notification channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconnectPolicy {
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub multiplier: f64,
    /// `None` retries forever.
    pub max_attempts: Option<u32>,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            initial_delay_ms: 500,
            max_delay_ms: 30_000,
            multiplier: 2.0,
            max_attempts: Some(8),
        }
    }
}

impl ReconnectPolicy {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.initial_delay_ms == 0 {
            return Err(AppError::Config(
                "initial_delay_ms must be positive".to_string(),
            ));
        }
        if self.max_delay_ms < self.initial_delay_ms {
            return Err(AppError::Config(format!(
                "max_delay_ms ({}) must not be below initial_delay_ms ({})",
                self.max_delay_ms, self.initial_delay_ms
            )));
        }
        if !self.multiplier.is_finite() || self.multiplier < 1.0 {
            return Err(AppError::Config(format!(
                "multiplier must be a finite number of at least 1, got {}",
                self.multiplier
            )));
        }
        Ok(())
    }

    /// Delay before reconnect attempt `attempt` (1-based), or `None` once
    /// attempts are exhausted.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || self.max_attempts.is_some_and(|max| attempt > max) {
            return None;
        }

        let multiplier = if self.multiplier.is_finite() && self.multiplier >= 1.0 {
            self.multiplier
        } else {
            1.0
        };
        let exponent = (attempt - 1).min(64) as i32;
        let millis = (self.initial_delay_ms as f64) * multiplier.powi(exponent);
        let capped = millis.min(self.max_delay_ms as f64);
        Some(Duration::from_millis(capped as u64))
    }
}
