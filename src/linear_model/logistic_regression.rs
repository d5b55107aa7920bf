use std::collections::VecDeque;

use super::loss::SigmoidCrossEntropy;
use super::trainer::GradientDescent;
use crate::config::TrainingConfig;
use crate::error::{Error, Result};
use crate::preprocessing::VarianceFloor;
use crate::Matrix;

/// Binary classifier: sigmoid output, cross-entropy cost, thresholded at
/// `config.decision_boundary`.
#[derive(Clone, Debug)]
pub struct LogisticRegression {
    trainer: GradientDescent<SigmoidCrossEntropy>,
}

impl LogisticRegression {
    /// `labels` is a single column of 0s and 1s.
    pub fn new(features: &Matrix, labels: &Matrix, config: TrainingConfig) -> Result<Self> {
        if labels.ncols() != 1 {
            return Err(Error::mismatch("label columns", 1, labels.ncols()));
        }
        validate_labels(labels)?;
        config.validate_decision_boundary()?;

        let trainer = GradientDescent::new(
            SigmoidCrossEntropy,
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

    /// Probability of the positive class for each observation.
    pub fn predict_proba(&self, observations: &Matrix) -> Result<Matrix> {
        self.trainer.predict_activated(observations)
    }

    /// Class labels in {0, 1}. A probability equal to the boundary counts
    /// as positive.
    pub fn predict(&self, observations: &Matrix) -> Result<Matrix> {
        let boundary = self.trainer.config().decision_boundary;
        let probabilities = self.predict_proba(observations)?;
        Ok(probabilities.mapv(|p| if p >= boundary { 1.0 } else { 0.0 }))
    }

    /// Fraction of test rows whose predicted class matches the label.
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
        crate::metrics::accuracy_score(test_labels.column(0), predictions.column(0))
    }

    pub fn weights(&self) -> &Matrix {
        self.trainer.weights()
    }

    /// Cross-entropy per epoch, most recent first.
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

fn validate_labels(labels: &Matrix) -> Result<()> {
    for &label in labels.iter() {
        if label != 0.0 && label != 1.0 {
            return Err(Error::InvalidLabels(format!(
                "labels must be 0 or 1 for binary classification, found {}",
                label
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    /// Points around zero with a gap of at least 1 on either side,
    /// positive class for x > 0.
    fn separable(n: usize) -> (Matrix, Matrix) {
        let x = Matrix::from_shape_fn((n, 1), |(i, _)| {
            let k = (i * 7) % n;
            let v = -5.0 + 0.125 + k as f64 * 10.0 / n as f64;
            if v > 0.0 { v + 1.0 } else { v - 1.0 }
        });
        let y = x.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 });
        (x, y)
    }

    #[test]
    fn test_logistic_regression_separable() {
        let (x, y) = separable(40);
        let config = TrainingConfig::default()
            .with_learning_rate(0.5)
            .with_iterations(50);

        let mut model = LogisticRegression::new(&x, &y, config).unwrap();
        model.train();

        let test_x = array![[-5.5], [-3.1], [-1.5], [1.5], [2.2], [5.5]];
        let test_y = array![[0.0], [0.0], [0.0], [1.0], [1.0], [1.0]];
        assert_eq!(model.test(&test_x, &test_y).unwrap(), 1.0);
        assert_eq!(model.test(&x, &y).unwrap(), 1.0);
    }

    #[test]
    fn test_probabilities_and_cost_history() {
        let (x, y) = separable(40);
        let config = TrainingConfig::default().with_iterations(20);

        let mut model = LogisticRegression::new(&x, &y, config).unwrap();
        model.train();

        let proba = model.predict_proba(&array![[-4.0], [4.0]]).unwrap();
        assert!(proba[(0, 0)] < 0.5);
        assert!(proba[(1, 0)] > 0.5);

        let history = model.cost_history();
        assert_eq!(history.len(), 20);
        assert!(history[0] < history[19]);
        assert!(history[19] < 2.0f64.ln());
    }

    #[test]
    fn test_decision_boundary() {
        let (x, y) = separable(20);
        let strict = TrainingConfig::default().with_decision_boundary(0.99);

        // Untrained weights give probability 0.5 everywhere.
        let lenient = LogisticRegression::with_defaults(&x, &y).unwrap();
        let picky = LogisticRegression::new(&x, &y, strict).unwrap();

        let obs = array![[1.0]];
        assert_eq!(lenient.predict(&obs).unwrap()[(0, 0)], 1.0);
        assert_eq!(picky.predict(&obs).unwrap()[(0, 0)], 0.0);
    }

    #[test]
    fn test_out_of_range_boundary_rejected() {
        let (x, y) = separable(20);
        let config = TrainingConfig::default().with_decision_boundary(1.0);

        assert!(matches!(
            LogisticRegression::new(&x, &y, config),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_logistic_regression_invalid_labels() {
        let x = Matrix::zeros((10, 1));
        let mut y = Matrix::zeros((10, 1));
        y[(3, 0)] = 0.5;

        assert!(matches!(
            LogisticRegression::with_defaults(&x, &y),
            Err(Error::InvalidLabels(_))
        ));
    }

    #[test]
    fn test_test_set_row_mismatch() {
        let (x, y) = separable(10);
        let model = LogisticRegression::with_defaults(&x, &y).unwrap();

        let test_x = Matrix::zeros((3, 1));
        let test_y = Matrix::zeros((2, 1));
        assert!(model.test(&test_x, &test_y).is_err());
    }
}
