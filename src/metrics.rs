use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

use crate::error::{Error, Result};

fn check_lengths(y_true: &ArrayView1<f64>, y_pred: &ArrayView1<f64>) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(Error::mismatch("y_true and y_pred lengths", y_true.len(), y_pred.len()));
    }
    if y_true.is_empty() {
        return Err(Error::EmptyInput("metrics need at least one sample".to_string()));
    }
    Ok(())
}

pub fn mean_squared_error(y_true: ArrayView1<f64>, y_pred: ArrayView1<f64>) -> Result<f64> {
    check_lengths(&y_true, &y_pred)?;

    let diff = &y_true - &y_pred;
    Ok(diff.mapv(|x| x * x).sum() / diff.len() as f64)
}

/// Coefficient of determination. Negative when the predictions do worse
/// than the label mean.
pub fn r2_score(y_true: ArrayView1<f64>, y_pred: ArrayView1<f64>) -> Result<f64> {
    check_lengths(&y_true, &y_pred)?;

    let y_mean = y_true.sum() / y_true.len() as f64;
    let ss_res = (&y_true - &y_pred).mapv(|x| x * x).sum();
    let ss_tot = y_true.mapv(|x| (x - y_mean) * (x - y_mean)).sum();

    if ss_tot == 0.0 {
        // Constant labels: only an exact fit explains them.
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }

    Ok(1.0 - ss_res / ss_tot)
}

/// Fraction of exact matches between predicted and true labels.
pub fn accuracy_score(y_true: ArrayView1<f64>, y_pred: ArrayView1<f64>) -> Result<f64> {
    check_lengths(&y_true, &y_pred)?;

    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t == p)
        .count();
    Ok(correct as f64 / y_true.len() as f64)
}

/// Mean of `|y_true - y_pred| / |y_true|`.
pub fn mean_relative_error(y_true: ArrayView1<f64>, y_pred: ArrayView1<f64>) -> Result<f64> {
    check_lengths(&y_true, &y_pred)?;

    let total: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(&t, &p)| ((t - p) / t).abs())
        .sum();
    Ok(total / y_true.len() as f64)
}

/// Column index of the largest entry in each row. Ties go to the lowest index.
pub fn argmax_rows(matrix: ArrayView2<f64>) -> Array1<usize> {
    matrix
        .axis_iter(Axis(0))
        .map(|row| {
            row.iter()
                .enumerate()
                .fold((0, f64::NEG_INFINITY), |(best, max), (j, &v)| {
                    if v > max { (j, v) } else { (best, max) }
                })
                .0
        })
        .collect()
}
