use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use ndarray::{s, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

use crate::error::{Error, Result};
use crate::Matrix;

/// Converts a raw CSV cell into a number.
pub type Converter = fn(&str) -> f64;

/// Which CSV columns become features and labels.
///
/// ```
/// use regressions::CsvOptions;
///
/// let options = CsvOptions::new(&["displacement", "horsepower"], &["passedemissions"])
///     .with_converter("passedemissions", |v| if v == "TRUE" { 1.0 } else { 0.0 });
/// assert_eq!(options.data_columns.len(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CsvOptions {
    pub data_columns: Vec<String>,
    pub label_columns: Vec<String>,
    /// Per-column converters; columns without one are parsed as `f64`.
    pub converters: HashMap<String, Converter>,
}

impl CsvOptions {
    pub fn new(data_columns: &[&str], label_columns: &[&str]) -> Self {
        Self {
            data_columns: data_columns.iter().map(|c| c.to_string()).collect(),
            label_columns: label_columns.iter().map(|c| c.to_string()).collect(),
            converters: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_converter(mut self, column: &str, converter: Converter) -> Self {
        self.converters.insert(column.to_string(), converter);
        self
    }
}

#[derive(Clone, Debug)]
pub struct Dataset {
    pub features: Matrix,
    pub labels: Matrix,
}

impl Dataset {
    pub fn new(features: Matrix, labels: Matrix) -> Result<Self> {
        if features.nrows() != labels.nrows() {
            return Err(Error::mismatch("label rows", features.nrows(), labels.nrows()));
        }

        Ok(Self { features, labels })
    }

    pub fn from_csv(path: impl AsRef<Path>, options: &CsvOptions) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_csv_reader(file, options)
    }

    /// Reads a CSV with a header row, keeping only the requested columns.
    pub fn from_csv_reader<R: Read>(reader: R, options: &CsvOptions) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if header.iter().all(String::is_empty) {
            return Err(Error::EmptyInput("CSV has no header".to_string()));
        }

        let column_index = |name: &String| {
            header
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| Error::MissingColumn(name.clone()))
        };
        let data_idx = options
            .data_columns
            .iter()
            .map(column_index)
            .collect::<Result<Vec<_>>>()?;
        let label_idx = options
            .label_columns
            .iter()
            .map(column_index)
            .collect::<Result<Vec<_>>>()?;

        let mut features = Vec::new();
        let mut labels = Vec::new();
        let mut n_rows = 0;

        for (i, record) in reader.records().enumerate() {
            let record = record?;
            let line = record.position().map_or(i + 2, |p| p.line() as usize);

            for &j in &data_idx {
                features.push(convert(&record, j, &header, line, options)?);
            }
            for &j in &label_idx {
                labels.push(convert(&record, j, &header, line, options)?);
            }
            n_rows += 1;
        }

        debug!(rows = n_rows, features = data_idx.len(), labels = label_idx.len(), "loaded CSV");

        let features = Matrix::from_shape_vec((n_rows, data_idx.len()), features)
            .map_err(|e| Error::EmptyInput(e.to_string()))?;
        let labels = Matrix::from_shape_vec((n_rows, label_idx.len()), labels)
            .map_err(|e| Error::EmptyInput(e.to_string()))?;
        Self::new(features, labels)
    }

    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    pub fn n_outputs(&self) -> usize {
        self.labels.ncols()
    }

    /// Reorders rows with a seeded permutation, keeping features and labels aligned.
    pub fn shuffle(&self, seed: u64) -> Self {
        let mut indices: Vec<usize> = (0..self.n_samples()).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        Self {
            features: self.features.select(Axis(0), &indices),
            labels: self.labels.select(Axis(0), &indices),
        }
    }

    /// Holds out the last `test_rows` rows as the test set.
    pub fn split(&self, test_rows: usize) -> Result<(Self, Self)> {
        if test_rows == 0 || test_rows >= self.n_samples() {
            return Err(Error::InvalidConfig(format!(
                "test_rows must be between 1 and {}, got {}",
                self.n_samples().saturating_sub(1),
                test_rows
            )));
        }

        let n_train = self.n_samples() - test_rows;

        let train = Dataset::new(
            self.features.slice(s![..n_train, ..]).to_owned(),
            self.labels.slice(s![..n_train, ..]).to_owned(),
        )?;
        let test = Dataset::new(
            self.features.slice(s![n_train.., ..]).to_owned(),
            self.labels.slice(s![n_train.., ..]).to_owned(),
        )?;

        Ok((train, test))
    }

    pub fn train_test_split(&self, test_size: f64) -> Result<(Self, Self)> {
        if test_size <= 0.0 || test_size >= 1.0 {
            return Err(Error::InvalidConfig("test_size must be between 0 and 1".to_string()));
        }

        let n_test = (self.n_samples() as f64 * test_size).round() as usize;
        self.split(n_test)
    }
}

/// One row per class index with a single `1.0` in that class's column.
pub fn one_hot(classes: &[usize], n_classes: usize) -> Result<Matrix> {
    let mut encoded = Matrix::zeros((classes.len(), n_classes));
    for (i, &class) in classes.iter().enumerate() {
        if class >= n_classes {
            return Err(Error::InvalidLabels(format!(
                "class {} out of range for {} classes",
                class, n_classes
            )));
        }
        encoded[(i, class)] = 1.0;
    }
    Ok(encoded)
}

fn convert(
    record: &StringRecord,
    index: usize,
    header: &[String],
    line: usize,
    options: &CsvOptions,
) -> Result<f64> {
    let column = &header[index];
    let value = record.get(index).unwrap_or("");

    if let Some(converter) = options.converters.get(column) {
        return Ok(converter(value));
    }

    value.parse::<f64>().map_err(|_| Error::Parse {
        line,
        column: column.clone(),
        value: value.to_string(),
    })
}
