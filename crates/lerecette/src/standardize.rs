// Feature Standardization
//
// *La Normalisation* (The Normalization) - Per-request z-score scaling of nutrition features

use crate::recipe::{NutritionVector, NUTRITION_DIM};
use serde::{Deserialize, Serialize};

/// Column means and standard deviations fitted on one candidate population
///
/// A standardizer is fitted per request on the filtered rows and thrown away
/// afterwards, so distances are only comparable within that request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Standardizer {
    mean: [f64; NUTRITION_DIM],
    std: [f64; NUTRITION_DIM],
    samples: usize,
}

impl Standardizer {
    /// Fit column statistics over `rows`
    ///
    /// Uses the population standard deviation (divides by N).
    ///
    /// # Returns
    ///
    /// `Err(Error::EmptyInput)` when there are no rows
    pub fn fit(rows: &[NutritionVector]) -> Result<Self, Error> {
        if rows.is_empty() {
            return Err(Error::EmptyInput);
        }

        let n = rows.len() as f64;
        let mut mean = [0.0; NUTRITION_DIM];
        for row in rows {
            for (m, v) in mean.iter_mut().zip(row.0.iter()) {
                *m += v;
            }
        }
        mean.iter_mut().for_each(|m| *m /= n);

        let mut var = [0.0; NUTRITION_DIM];
        for row in rows {
            for ((acc, v), m) in var.iter_mut().zip(row.0.iter()).zip(mean.iter()) {
                let d = v - m;
                *acc += d * d;
            }
        }

        let mut std = [0.0; NUTRITION_DIM];
        for (i, s) in std.iter_mut().enumerate() {
            // Identical values leave rounding noise in the deviation; pin those to 0
            let first = rows[0].0[i];
            if rows.iter().all(|r| r.0[i] == first) {
                continue;
            }
            *s = (var[i] / n).sqrt();
        }

        Ok(Self {
            mean,
            std,
            samples: rows.len(),
        })
    }

    /// Map a raw vector to z-scores
    ///
    /// Columns with zero deviation map to 0, whatever the input value.
    pub fn transform(&self, vector: &NutritionVector) -> NutritionVector {
        let mut out = [0.0; NUTRITION_DIM];
        for (i, z) in out.iter_mut().enumerate() {
            let std = self.std[i];
            *z = if std > 0.0 {
                (vector.0[i] - self.mean[i]) / std
            } else {
                0.0
            };
        }
        NutritionVector(out)
    }

    /// Transform every row
    pub fn transform_all(&self, rows: &[NutritionVector]) -> Vec<NutritionVector> {
        rows.iter().map(|r| self.transform(r)).collect()
    }

    /// Fitted column means
    pub fn mean(&self) -> &[f64; NUTRITION_DIM] {
        &self.mean
    }

    /// Fitted column standard deviations
    pub fn std(&self) -> &[f64; NUTRITION_DIM] {
        &self.std
    }

    /// Number of rows the statistics were computed from
    pub fn samples(&self) -> usize {
        self.samples
    }
}

/// Standardization errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// No rows to fit on
    #[error("Cannot fit standardizer on an empty subset")]
    EmptyInput,
}
