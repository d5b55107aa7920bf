//! Linear models trained by mini-batch gradient descent.
//!
//! This module provides:
//! - `LinearRegression`: least squares regression, scored by R²
//! - `LogisticRegression`: binary classification with a decision boundary
//! - `MultinomialRegression`: softmax classification over one-hot labels
//!
//! All three standardize their features once at construction, prepend a bias
//! column, and share a single training loop ([`GradientDescent`]) that only
//! differs by its [`Loss`] strategy. After every epoch the cost over the whole
//! training set is recorded and the learning rate is halved if the cost got
//! worse, or grown by 5% otherwise.
//!
//! # Examples
//!
//! ## Linear Regression
//! ```rust
//! use regressions::{LinearRegression, Matrix, TrainingConfig};
//!
//! let x = Matrix::from_shape_fn((20, 1), |(i, _)| i as f64);
//! let y = x.mapv(|v| 1.0 + 2.0 * v);
//!
//! let config = TrainingConfig::default().with_iterations(100);
//! let mut model = LinearRegression::new(&x, &y, config).unwrap();
//! model.train();
//!
//! let r2 = model.test(&x, &y).unwrap();
//! assert!(r2 > 0.99);
//! ```
//!
//! ## Multinomial Regression
//! ```rust
//! use regressions::{dataset, Matrix, MultinomialRegression, TrainingConfig};
//! use ndarray::array;
//!
//! let x = array![[0.0], [1.0], [5.0], [6.0], [10.0], [11.0]];
//! let y = dataset::one_hot(&[0, 0, 1, 1, 2, 2], 3).unwrap();
//!
//! let config = TrainingConfig::default().with_batch_size(2).with_iterations(10);
//! let mut model = MultinomialRegression::new(&x, &y, config).unwrap();
//! model.train();
//! let classes = model.predict(&array![[0.5], [10.5]]).unwrap();
//! assert_eq!(classes.len(), 2);
//! ```

mod linear_regression;
pub mod loss;
mod logistic_regression;
mod multinomial_regression;
pub mod trainer;

pub use linear_regression::LinearRegression;
pub use logistic_regression::LogisticRegression;
pub use loss::{Loss, MulticlassCost, SigmoidCrossEntropy, SoftmaxCrossEntropy, SquaredError};
pub use multinomial_regression::MultinomialRegression;
pub use trainer::{batch_ranges, gradient_step, next_learning_rate, GradientDescent};
