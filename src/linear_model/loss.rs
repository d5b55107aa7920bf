//! Loss strategies plugged into the gradient-descent trainer.
//!
//! Every strategy pairs an output activation with the loss that is its
//! canonical match (squared error with identity, binary cross-entropy with
//! sigmoid, categorical cross-entropy with softmax). For each pair the
//! gradient with respect to the weights reduces to the same expression,
//! `Xᵀ · (activate(X · W) - Y) / rows`, which is why [`Loss::gradient`] is a
//! provided method.

use ndarray::{ArrayView2, Axis};

use crate::Matrix;

/// Added inside every logarithm so a saturated probability never yields `ln(0)`.
pub const LOG_EPSILON: f64 = 1e-7;

pub trait Loss {
    /// Maps the linear combination `X · W` to model outputs.
    fn activate(&self, linear: Matrix) -> Matrix;

    /// Scalar cost of the linear combination `X · W` against `labels`.
    fn cost(&self, linear: &Matrix, labels: ArrayView2<f64>) -> f64;

    /// Gradient of the loss with respect to the weights.
    fn gradient(
        &self,
        features: ArrayView2<f64>,
        guesses: &Matrix,
        labels: ArrayView2<f64>,
    ) -> Matrix {
        let differences = guesses - &labels;
        features.t().dot(&differences) / features.nrows() as f64
    }
}

/// Ordinary least squares: identity activation, mean squared error.
#[derive(Clone, Copy, Debug, Default)]
pub struct SquaredError;

impl Loss for SquaredError {
    fn activate(&self, linear: Matrix) -> Matrix {
        linear
    }

    fn cost(&self, linear: &Matrix, labels: ArrayView2<f64>) -> f64 {
        let diff = linear - &labels;
        diff.mapv(|d| d * d).mean().unwrap_or(0.0)
    }
}

/// Binary logistic regression: sigmoid activation, binary cross-entropy.
#[derive(Clone, Copy, Debug, Default)]
pub struct SigmoidCrossEntropy;

impl Loss for SigmoidCrossEntropy {
    fn activate(&self, linear: Matrix) -> Matrix {
        linear.mapv_into(sigmoid)
    }

    fn cost(&self, linear: &Matrix, labels: ArrayView2<f64>) -> f64 {
        let guesses = linear.mapv(sigmoid);
        binary_cross_entropy(&guesses, labels).mean().unwrap_or(0.0)
    }
}

/// Which cost the multinomial trainer records each epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MulticlassCost {
    /// Categorical cross-entropy of the softmax output.
    #[default]
    Categorical,
    /// Binary cross-entropy of a per-class sigmoid, averaged over classes.
    PerClassSigmoid,
}

/// Multinomial logistic regression: row-wise softmax activation.
#[derive(Clone, Copy, Debug, Default)]
pub struct SoftmaxCrossEntropy {
    pub cost: MulticlassCost,
}

impl Loss for SoftmaxCrossEntropy {
    fn activate(&self, linear: Matrix) -> Matrix {
        softmax(linear)
    }

    fn cost(&self, linear: &Matrix, labels: ArrayView2<f64>) -> f64 {
        match self.cost {
            MulticlassCost::Categorical => {
                let n = linear.nrows() as f64;
                let guesses = softmax(linear.clone());
                let log_likelihood: f64 = guesses
                    .iter()
                    .zip(labels.iter())
                    .map(|(&p, &y)| y * (p + LOG_EPSILON).ln())
                    .sum();
                -log_likelihood / n
            }
            MulticlassCost::PerClassSigmoid => {
                let guesses = linear.mapv(sigmoid);
                binary_cross_entropy(&guesses, labels).mean().unwrap_or(0.0)
            }
        }
    }
}

/// Per-column mean binary cross-entropy, as a vector with one entry per output.
fn binary_cross_entropy(guesses: &Matrix, labels: ArrayView2<f64>) -> ndarray::Array1<f64> {
    let n = guesses.nrows() as f64;
    let term_one = labels.t().dot(&guesses.mapv(|p| (p + LOG_EPSILON).ln()));
    let term_two = labels
        .mapv(|y| 1.0 - y)
        .t()
        .dot(&guesses.mapv(|p| (1.0 - p + LOG_EPSILON).ln()));

    (term_one + term_two).diag().mapv(|v| -v / n)
}

pub fn sigmoid(z: f64) -> f64 {
    if z > 500.0 {
        1.0
    } else if z < -500.0 {
        0.0
    } else {
        1.0 / (1.0 + (-z).exp())
    }
}

/// Row-wise softmax, shifted by the row maximum to keep `exp` finite.
pub fn softmax(mut linear: Matrix) -> Matrix {
    for mut row in linear.axis_iter_mut(Axis(0)) {
        let max = row.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
        row.mapv_inplace(|v| (v - max).exp());
        let sum = row.sum();
        row /= sum;
    }
    linear
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_sigmoid_function() {
        assert_abs_diff_eq!(sigmoid(0.0), 0.5, epsilon = 1e-12);
        assert_eq!(sigmoid(1000.0), 1.0);
        assert_eq!(sigmoid(-1000.0), 0.0);
    }

    #[test]
    fn test_softmax_rows_sum_to_one() {
        let z = array![[1.0, 2.0, 3.0], [1000.0, 1000.0, -1000.0]];
        let p = softmax(z);
        for row in p.rows() {
            assert_abs_diff_eq!(row.sum(), 1.0, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(p[(1, 0)], 0.5, epsilon = 1e-12);
        assert!(p[(0, 2)] > p[(0, 1)] && p[(0, 1)] > p[(0, 0)]);
    }

    #[test]
    fn test_squared_error_gradient() {
        let x = array![[1.0, 2.0], [1.0, 4.0]];
        let y = array![[3.0], [5.0]];
        let guesses = array![[1.0], [1.0]];

        // differences = [-2, -4]; Xᵀ·d / 2 = [-3, -10]
        let grad = SquaredError.gradient(x.view(), &guesses, y.view());
        assert_eq!(grad, array![[-3.0], [-10.0]]);
    }

    #[test]
    fn test_squared_error_cost() {
        let linear = array![[1.0], [3.0]];
        let labels = array![[2.0], [1.0]];
        assert_abs_diff_eq!(SquaredError.cost(&linear, labels.view()), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_binary_cross_entropy_at_zero_weights() {
        // sigmoid(0) = 0.5 for every row, so the cost is ln 2 whatever the labels.
        let linear = Matrix::zeros((4, 1));
        let labels = array![[0.0], [1.0], [1.0], [0.0]];
        let cost = SigmoidCrossEntropy.cost(&linear, labels.view());
        assert_abs_diff_eq!(cost, 2.0f64.ln(), epsilon = 1e-6);
    }

    #[test]
    fn test_cross_entropy_is_finite_when_saturated() {
        let linear = array![[1000.0], [-1000.0]];
        let labels = array![[0.0], [1.0]];
        let cost = SigmoidCrossEntropy.cost(&linear, labels.view());
        assert!(cost.is_finite());
        assert_abs_diff_eq!(cost, -(LOG_EPSILON.ln()), epsilon = 1e-6);
    }

    #[test]
    fn test_categorical_cost_uniform() {
        let linear = Matrix::zeros((2, 3));
        let labels = array![[1.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
        let loss = SoftmaxCrossEntropy::default();
        assert_abs_diff_eq!(loss.cost(&linear, labels.view()), 3.0f64.ln(), epsilon = 1e-6);
    }

    #[test]
    fn test_per_class_sigmoid_cost() {
        let linear = Matrix::zeros((2, 3));
        let labels = array![[1.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
        let loss = SoftmaxCrossEntropy {
            cost: MulticlassCost::PerClassSigmoid,
        };
        assert_abs_diff_eq!(loss.cost(&linear, labels.view()), 2.0f64.ln(), epsilon = 1e-6);
    }
}
