//! Training configuration shared by the gradient-descent estimators.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Hyperparameters for mini-batch gradient descent.
///
/// Missing fields fall back to their defaults when deserializing, so a
/// config file only needs to name what it changes.
///
/// ```
/// use regressions::TrainingConfig;
///
/// let config = TrainingConfig::default()
///     .with_learning_rate(0.5)
///     .with_batch_size(50);
/// assert_eq!(config.iterations, 1000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Initial step size. The trainer keeps its own copy and adapts it
    /// after every epoch.
    pub learning_rate: f64,
    /// Number of epochs. There is no early stopping.
    pub iterations: usize,
    /// Rows per gradient step. Trailing rows that do not fill a whole batch
    /// are skipped every epoch.
    pub batch_size: usize,
    /// Probability threshold for the positive class (binary logistic only).
    pub decision_boundary: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            iterations: 1000,
            batch_size: 10,
            decision_boundary: 0.5,
        }
    }
}

impl TrainingConfig {
    #[must_use]
    pub const fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    #[must_use]
    pub const fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    #[must_use]
    pub const fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    #[must_use]
    pub const fn with_decision_boundary(mut self, decision_boundary: f64) -> Self {
        self.decision_boundary = decision_boundary;
        self
    }

    /// Checks the configuration against a training set of `n_rows` rows.
    pub fn validate(&self, n_rows: usize) -> Result<()> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "learning_rate must be positive and finite, got {}",
                self.learning_rate
            )));
        }
        if self.iterations == 0 {
            return Err(Error::InvalidConfig("iterations must be > 0".to_string()));
        }
        if self.batch_size == 0 {
            return Err(Error::InvalidConfig("batch_size must be > 0".to_string()));
        }
        if self.batch_size > n_rows {
            return Err(Error::InvalidConfig(format!(
                "batch_size ({}) exceeds number of training rows ({}), no batch would run",
                self.batch_size, n_rows
            )));
        }
        Ok(())
    }

    /// Checks the probability threshold. Only binary classifiers read it.
    pub fn validate_decision_boundary(&self) -> Result<()> {
        if !(self.decision_boundary > 0.0 && self.decision_boundary < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "decision_boundary must lie in (0, 1), got {}",
                self.decision_boundary
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrainingConfig::default();
        assert_eq!(config.learning_rate, 0.1);
        assert_eq!(config.iterations, 1000);
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.decision_boundary, 0.5);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TrainingConfig =
            serde_json::from_str(r#"{ "learning_rate": 0.5, "batch_size": 50 }"#).unwrap();
        assert_eq!(config.learning_rate, 0.5);
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.iterations, 1000);
        assert_eq!(config.decision_boundary, 0.5);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(TrainingConfig::default().validate(10).is_ok());
        assert!(TrainingConfig::default().with_batch_size(0).validate(10).is_err());
        assert!(TrainingConfig::default().with_iterations(0).validate(10).is_err());
        assert!(TrainingConfig::default().with_learning_rate(0.0).validate(10).is_err());
        assert!(TrainingConfig::default().with_learning_rate(f64::NAN).validate(10).is_err());
    }

    #[test]
    fn test_decision_boundary_checked_separately() {
        let config = TrainingConfig::default().with_decision_boundary(1.0);
        assert!(config.validate(10).is_ok());
        assert!(config.validate_decision_boundary().is_err());
        assert!(TrainingConfig::default().validate_decision_boundary().is_ok());
    }

    #[test]
    fn test_batch_larger_than_rows() {
        let err = TrainingConfig::default().with_batch_size(11).validate(10);
        assert!(matches!(err, Err(Error::InvalidConfig(_))));
    }
}
