use std::collections::VecDeque;

use super::loss::SquaredError;
use super::trainer::GradientDescent;
use crate::config::TrainingConfig;
use crate::error::{Error, Result};
use crate::preprocessing::VarianceFloor;
use crate::Matrix;

/// Least-squares regression trained by mini-batch gradient descent.
#[derive(Clone, Debug)]
pub struct LinearRegression {
    trainer: GradientDescent<SquaredError>,
}

impl LinearRegression {
    /// Standardizes `features` and prepares zero weights. `labels` must be a
    /// single column with one row per observation.
    pub fn new(features: &Matrix, labels: &Matrix, config: TrainingConfig) -> Result<Self> {
        if labels.ncols() != 1 {
            return Err(Error::mismatch("label columns", 1, labels.ncols()));
        }

        let trainer = GradientDescent::new(
            SquaredError,
            features,
            labels,
            config,
            VarianceFloor::Epsilon(1e-7),
        )?;
        Ok(Self { trainer })
    }

    pub fn with_defaults(features: &Matrix, labels: &Matrix) -> Result<Self> {
        Self::new(features, labels, TrainingConfig::default())
    }

    pub fn train(&mut self) {
        self.trainer.train();
    }

    /// Raw predictions, one row per observation.
    pub fn predict(&self, observations: &Matrix) -> Result<Matrix> {
        self.trainer.predict_linear(observations)
    }

    /// R² of the predictions on a held-out set.
    pub fn test(&self, test_features: &Matrix, test_labels: &Matrix) -> Result<f64> {
        if test_features.nrows() != test_labels.nrows() {
            return Err(Error::mismatch(
                "test label rows",
                test_features.nrows(),
                test_labels.nrows(),
            ));
        }
        if test_labels.ncols() != 1 {
            return Err(Error::mismatch("test label columns", 1, test_labels.ncols()));
        }

        let predictions = self.predict(test_features)?;
        crate::metrics::r2_score(test_labels.column(0), predictions.column(0))
    }

    pub fn weights(&self) -> &Matrix {
        self.trainer.weights()
    }

    /// Mean squared error per epoch, most recent first.
    pub fn mse_history(&self) -> &VecDeque<f64> {
        self.trainer.cost_history()
    }

    pub fn learning_rate(&self) -> f64 {
        self.trainer.learning_rate()
    }

    pub fn config(&self) -> &TrainingConfig {
        self.trainer.config()
    }
}
