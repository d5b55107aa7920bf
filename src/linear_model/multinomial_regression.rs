use std::collections::VecDeque;

use ndarray::Array1;

use super::loss::{MulticlassCost, SoftmaxCrossEntropy};
use super::trainer::GradientDescent;
use crate::config::TrainingConfig;
use crate::error::{Error, Result};
use crate::metrics::argmax_rows;
use crate::preprocessing::VarianceFloor;
use crate::Matrix;

/// Softmax regression over one-hot encoded labels.
///
/// Constant feature columns (a blank pixel, say) are left unscaled rather
/// than divided by a floored variance.
#[derive(Clone, Debug)]
pub struct MultinomialRegression {
    trainer: GradientDescent<SoftmaxCrossEntropy>,
}

impl MultinomialRegression {
    /// `labels` has one column per class and exactly one `1.0` per row.
    pub fn new(features: &Matrix, labels: &Matrix, config: TrainingConfig) -> Result<Self> {
        Self::with_cost(features, labels, config, MulticlassCost::default())
    }

    /// Like [`MultinomialRegression::new`], choosing which cost drives the
    /// learning-rate adaptation.
    pub fn with_cost(
        features: &Matrix,
        labels: &Matrix,
        config: TrainingConfig,
        cost: MulticlassCost,
    ) -> Result<Self> {
        validate_one_hot(labels)?;

        let trainer = GradientDescent::new(
            SoftmaxCrossEntropy { cost },
            features,
            labels,
            config,
            VarianceFloor::ReplaceZero,
        )?;
        Ok(Self { trainer })
    }

    pub fn with_defaults(features: &Matrix, labels: &Matrix) -> Result<Self> {
        Self::new(features, labels, TrainingConfig::default())
    }

    pub fn train(&mut self) {
        self.trainer.train();
    }

    /// Class probabilities, one row per observation.
    pub fn predict_proba(&self, observations: &Matrix) -> Result<Matrix> {
        self.trainer.predict_activated(observations)
    }

    /// Index of the most probable class for each observation.
    pub fn predict(&self, observations: &Matrix) -> Result<Array1<usize>> {
        let probabilities = self.predict_proba(observations)?;
        Ok(argmax_rows(probabilities.view()))
    }

    /// Fraction of rows whose predicted class is the hot column of the label.
    pub fn test(&self, test_features: &Matrix, test_labels: &Matrix) -> Result<f64> {
        if test_features.nrows() != test_labels.nrows() {
            return Err(Error::mismatch(
                "test label rows",
                test_features.nrows(),
                test_labels.nrows(),
            ));
        }
        if test_labels.ncols() != self.n_classes() {
            return Err(Error::mismatch("test label columns", self.n_classes(), test_labels.ncols()));
        }
        validate_one_hot(test_labels)?;
        if test_labels.nrows() == 0 {
            return Err(Error::EmptyInput("test set has no rows".to_string()));
        }

        let predictions = self.predict(test_features)?;
        let expected = argmax_rows(test_labels.view());
        let correct = predictions
            .iter()
            .zip(expected.iter())
            .filter(|(p, e)| p == e)
            .count();

        Ok(correct as f64 / predictions.len() as f64)
    }

    pub fn n_classes(&self) -> usize {
        self.trainer.weights().ncols()
    }

    pub fn weights(&self) -> &Matrix {
        self.trainer.weights()
    }

    /// Cost per epoch, most recent first.
    pub fn cost_history(&self) -> &VecDeque<f64> {
        self.trainer.cost_history()
    }

    pub fn learning_rate(&self) -> f64 {
        self.trainer.learning_rate()
    }

    pub fn config(&self) -> &TrainingConfig {
        self.trainer.config()
    }
}

fn validate_one_hot(labels: &Matrix) -> Result<()> {
    if labels.ncols() < 2 {
        return Err(Error::InvalidLabels(format!(
            "one-hot labels need at least 2 columns, got {}",
            labels.ncols()
        )));
    }
    for (i, row) in labels.rows().into_iter().enumerate() {
        let ones = row.iter().filter(|&&v| v == 1.0).count();
        let zeros = row.iter().filter(|&&v| v == 0.0).count();
        if ones != 1 || ones + zeros != row.len() {
            return Err(Error::InvalidLabels(format!("row {} is not one-hot encoded", i)));
        }
    }
    Ok(())
}
