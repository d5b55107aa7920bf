//! Brute-force k-nearest-neighbours regression.
//!
//! No training step: `fit` only stores the standardized training rows, and
//! every prediction ranks all of them by Euclidean distance.

use ndarray::{ArrayView1, Axis};

use crate::error::{Error, Result};
use crate::preprocessing::{StandardScaler, VarianceFloor};
use crate::{Matrix, Vector};

#[derive(Clone, Debug)]
struct Fitted {
    scaler: StandardScaler,
    features: Matrix,
    labels: Vector,
}

#[derive(Clone, Debug)]
pub struct KNearestNeighbors {
    k: usize,
    fitted: Option<Fitted>,
}

impl KNearestNeighbors {
    pub fn new(k: usize) -> Result<Self> {
        if k == 0 {
            return Err(Error::InvalidConfig("k must be > 0".to_string()));
        }
        Ok(Self { k, fitted: None })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn fit(&mut self, features: &Matrix, labels: &Vector) -> Result<()> {
        if features.nrows() != labels.len() {
            return Err(Error::mismatch("label rows", features.nrows(), labels.len()));
        }

        let scaler = StandardScaler::fit(features, VarianceFloor::default())?;
        let scaled = scaler.transform(features)?;
        self.fitted = Some(Fitted {
            scaler,
            features: scaled,
            labels: labels.clone(),
        });
        Ok(())
    }

    /// Mean label of the `k` training rows closest to `point`. Equal
    /// distances keep training-row order; `k` is capped at the row count.
    pub fn predict_one(&self, point: ArrayView1<f64>) -> Result<f64> {
        let fitted = self.fitted.as_ref().ok_or(Error::NotFitted("KNearestNeighbors"))?;

        let point = point.insert_axis(Axis(0)).to_owned();
        let scaled = fitted.scaler.transform(&point)?;
        let target = scaled.row(0);

        let mut ranked: Vec<(f64, f64)> = fitted
            .features
            .axis_iter(Axis(0))
            .zip(fitted.labels.iter())
            .map(|(row, &label)| (euclidean_distance(row, target), label))
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

        let k = self.k.min(ranked.len());
        let sum: f64 = ranked.iter().take(k).map(|&(_, label)| label).sum();
        Ok(sum / k as f64)
    }

    pub fn predict(&self, observations: &Matrix) -> Result<Vector> {
        observations
            .axis_iter(Axis(0))
            .map(|row| self.predict_one(row))
            .collect::<Result<Vec<_>>>()
            .map(Vector::from)
    }
}

fn euclidean_distance(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}
