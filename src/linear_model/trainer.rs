use std::collections::VecDeque;
use std::ops::Range;

use ndarray::{s, ArrayView2};
use tracing::{debug, info, warn};

use super::loss::Loss;
use crate::config::TrainingConfig;
use crate::error::{Error, Result};
use crate::preprocessing::{StandardScaler, VarianceFloor};
use crate::Matrix;

/// Mini-batch gradient descent over standardized features.
///
/// Holds the frozen scaler, the standardized training matrix with its bias
/// column, the weight matrix and the per-epoch cost history. The loss
/// strategy `L` is the only thing that differs between estimators.
#[derive(Clone, Debug)]
pub struct GradientDescent<L> {
    loss: L,
    config: TrainingConfig,
    learning_rate: f64,
    scaler: StandardScaler,
    features: Matrix,
    labels: Matrix,
    weights: Matrix,
    history: VecDeque<f64>,
}

impl<L: Loss> GradientDescent<L> {
    pub fn new(
        loss: L,
        features: &Matrix,
        labels: &Matrix,
        config: TrainingConfig,
        floor: VarianceFloor,
    ) -> Result<Self> {
        if features.nrows() != labels.nrows() {
            return Err(Error::mismatch("label rows", features.nrows(), labels.nrows()));
        }
        if features.nrows() == 0 {
            return Err(Error::EmptyInput("training set has no rows".to_string()));
        }
        if labels.ncols() == 0 {
            return Err(Error::EmptyInput("label matrix has no columns".to_string()));
        }
        config.validate(features.nrows())?;

        let scaler = StandardScaler::fit(features, floor)?;
        let processed = scaler.transform_with_bias(features)?;
        let weights = Matrix::zeros((processed.ncols(), labels.ncols()));

        Ok(Self {
            loss,
            learning_rate: config.learning_rate,
            config,
            scaler,
            features: processed,
            labels: labels.clone(),
            weights,
            history: VecDeque::new(),
        })
    }

    /// Runs `config.iterations` epochs. A second call continues from the
    /// current weights, learning rate and history.
    pub fn train(&mut self) {
        let n_rows = self.features.nrows();
        let batch_size = self.config.batch_size;
        info!(
            rows = n_rows,
            features = self.scaler.n_features(),
            outputs = self.labels.ncols(),
            iterations = self.config.iterations,
            batch_size,
            learning_rate = self.learning_rate,
            "starting gradient descent"
        );

        for epoch in 0..self.config.iterations {
            for range in batch_ranges(n_rows, batch_size) {
                let feature_slice = self.features.slice(s![range.clone(), ..]);
                let label_slice = self.labels.slice(s![range, ..]);
                self.weights = gradient_step(
                    &self.loss,
                    feature_slice,
                    label_slice,
                    &self.weights,
                    self.learning_rate,
                );
            }

            let cost = self.record_cost();
            if !cost.is_finite() {
                warn!(epoch, cost, "cost is not finite");
            }
            self.learning_rate = next_learning_rate(self.learning_rate, &self.history);
            debug!(epoch, cost, learning_rate = self.learning_rate, "epoch complete");
        }

        info!(
            final_cost = self.history.front().copied(),
            learning_rate = self.learning_rate,
            "gradient descent finished"
        );
    }

    fn record_cost(&mut self) -> f64 {
        let linear = self.features.dot(&self.weights);
        let cost = self.loss.cost(&linear, self.labels.view());
        self.history.push_front(cost);
        cost
    }

    /// `X · W` for new observations, standardized with the training statistics.
    pub fn predict_linear(&self, observations: &Matrix) -> Result<Matrix> {
        let processed = self.scaler.transform_with_bias(observations)?;
        Ok(processed.dot(&self.weights))
    }

    /// Model outputs for new observations, after the loss's activation.
    pub fn predict_activated(&self, observations: &Matrix) -> Result<Matrix> {
        let linear = self.predict_linear(observations)?;
        Ok(self.loss.activate(linear))
    }

    pub fn loss(&self) -> &L {
        &self.loss
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Current learning rate, as adapted by the last epoch.
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    /// Standardized training features with the leading bias column.
    pub fn features(&self) -> &Matrix {
        &self.features
    }

    pub fn labels(&self) -> &Matrix {
        &self.labels
    }

    /// Shape `(n_features + 1, n_outputs)`; row 0 is the bias.
    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    /// Cost per epoch, most recent first.
    pub fn cost_history(&self) -> &VecDeque<f64> {
        &self.history
    }
}

/// One gradient-descent update on a single batch.
pub fn gradient_step<L: Loss + ?Sized>(
    loss: &L,
    features: ArrayView2<f64>,
    labels: ArrayView2<f64>,
    weights: &Matrix,
    learning_rate: f64,
) -> Matrix {
    let guesses = loss.activate(features.dot(weights));
    let slopes = loss.gradient(features, &guesses, labels);
    weights - &(slopes * learning_rate)
}

/// Row ranges of the full batches in an epoch. Rows past the last full
/// batch are not visited.
pub fn batch_ranges(n_rows: usize, batch_size: usize) -> impl Iterator<Item = Range<usize>> {
    let batch_quantity = if batch_size == 0 { 0 } else { n_rows / batch_size };
    (0..batch_quantity).map(move |j| {
        let start = j * batch_size;
        start..start + batch_size
    })
}

/// Hill-climbing rate control: halve after a worse epoch, grow by 5% otherwise.
/// `history[0]` is the newest cost.
pub fn next_learning_rate(learning_rate: f64, history: &VecDeque<f64>) -> f64 {
    if history.len() < 2 {
        return learning_rate;
    }

    if history[0] > history[1] {
        learning_rate / 2.0
    } else {
        learning_rate * 1.05
    }
}
