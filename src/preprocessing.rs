use ndarray::{s, Axis};

use crate::error::{Error, Result};
use crate::{Matrix, Vector};

/// How a zero variance is kept out of the denominator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VarianceFloor {
    /// Add a small constant to every column's variance.
    Epsilon(f64),
    /// Replace exactly-zero variances with 1, leaving constant columns unscaled.
    ReplaceZero,
}

impl Default for VarianceFloor {
    fn default() -> Self {
        VarianceFloor::Epsilon(1e-7)
    }
}

/// Per-column standardization with statistics frozen at fit time.
///
/// There is no unfitted scaler: [`StandardScaler::fit`] is the only
/// constructor, and nothing afterwards recomputes the mean or variance.
#[derive(Clone, Debug)]
pub struct StandardScaler {
    mean: Vector,
    variance: Vector,
    std: Vector,
}

impl StandardScaler {
    pub fn fit(data: &Matrix, floor: VarianceFloor) -> Result<Self> {
        if data.ncols() == 0 {
            return Err(Error::EmptyInput("feature matrix has no columns".to_string()));
        }
        let mean = data
            .mean_axis(Axis(0))
            .ok_or_else(|| Error::EmptyInput("feature matrix has no rows".to_string()))?;
        let raw_variance = data.var_axis(Axis(0), 0.0);

        let variance = match floor {
            VarianceFloor::Epsilon(eps) => raw_variance + eps,
            VarianceFloor::ReplaceZero => raw_variance.mapv(|v| if v == 0.0 { 1.0 } else { v }),
        };
        let std = variance.mapv(f64::sqrt);

        Ok(Self { mean, variance, std })
    }

    pub fn mean(&self) -> &Vector {
        &self.mean
    }

    /// Variance after the floor has been applied.
    pub fn variance(&self) -> &Vector {
        &self.variance
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    pub fn transform(&self, data: &Matrix) -> Result<Matrix> {
        if data.ncols() != self.n_features() {
            return Err(Error::mismatch("feature columns", self.n_features(), data.ncols()));
        }

        let mut result = data.clone();
        for mut row in result.axis_iter_mut(Axis(0)) {
            row -= &self.mean;
            row /= &self.std;
        }

        Ok(result)
    }

    /// Standardizes `data` and prepends a bias column of ones.
    pub fn transform_with_bias(&self, data: &Matrix) -> Result<Matrix> {
        let scaled = self.transform(data)?;

        let mut result = Matrix::ones((scaled.nrows(), scaled.ncols() + 1));
        result.slice_mut(s![.., 1..]).assign(&scaled);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_standard_scaler() {
        let data = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let scaler = StandardScaler::fit(&data, VarianceFloor::ReplaceZero).unwrap();

        let scaled = scaler.transform(&data).unwrap();
        assert_eq!(scaled.shape(), data.shape());

        let means = scaled.mean_axis(Axis(0)).unwrap();
        let vars = scaled.var_axis(Axis(0), 0.0);
        for j in 0..2 {
            assert_abs_diff_eq!(means[j], 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(vars[j], 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_statistics_are_frozen() {
        let train = array![[0.0], [2.0], [4.0]];
        let scaler = StandardScaler::fit(&train, VarianceFloor::ReplaceZero).unwrap();

        // A later input with different moments is scaled with the training moments.
        let other = array![[100.0], [102.0]];
        let scaled = scaler.transform(&other).unwrap();
        let std = (8.0f64 / 3.0).sqrt();
        assert_abs_diff_eq!(scaled[(0, 0)], 98.0 / std, epsilon = 1e-12);
        assert_abs_diff_eq!(scaler.mean()[0], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_bias_column_and_single_application() {
        let data = array![[1.0, 10.0], [2.0, 20.0], [3.0, 60.0]];
        let scaler = StandardScaler::fit(&data, VarianceFloor::default()).unwrap();

        let processed = scaler.transform_with_bias(&data).unwrap();
        assert_eq!(processed.shape(), &[3, 3]);
        assert!(processed.column(0).iter().all(|&v| v == 1.0));

        let once = scaler.transform(&data).unwrap();
        assert_eq!(processed.slice(s![.., 1..]), once);

        // Applying the transform a second time gives a different matrix.
        let twice = scaler.transform(&once).unwrap();
        assert!((&twice - &once).iter().any(|d| d.abs() > 1e-3));
    }

    #[test]
    fn test_constant_column_epsilon() {
        let data = array![[5.0, 1.0], [5.0, 2.0], [5.0, 3.0]];
        let scaler = StandardScaler::fit(&data, VarianceFloor::Epsilon(1e-7)).unwrap();
        let scaled = scaler.transform(&data).unwrap();

        assert!(scaled.iter().all(|v| v.is_finite()));
        assert!(scaled.column(0).iter().all(|&v| v == 0.0));
        assert_abs_diff_eq!(scaler.variance()[0], 1e-7, epsilon = 1e-15);
    }

    #[test]
    fn test_constant_column_replace_zero() {
        let data = array![[5.0, 1.0], [5.0, 2.0]];
        let scaler = StandardScaler::fit(&data, VarianceFloor::ReplaceZero).unwrap();

        assert_eq!(scaler.variance()[0], 1.0);
        assert_abs_diff_eq!(scaler.variance()[1], 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_column_mismatch() {
        let data = array![[1.0, 2.0], [3.0, 4.0]];
        let scaler = StandardScaler::fit(&data, VarianceFloor::default()).unwrap();

        let wrong = array![[1.0, 2.0, 3.0]];
        assert!(matches!(
            scaler.transform(&wrong),
            Err(Error::DimensionMismatch { expected: 2, actual: 3, .. })
        ));
    }

    #[test]
    fn test_empty_input() {
        let data = Matrix::zeros((0, 3));
        assert!(matches!(
            StandardScaler::fit(&data, VarianceFloor::default()),
            Err(Error::EmptyInput(_))
        ));
    }
}
