//! Column standardisation (zero mean, unit variance).

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

/// Per-column mean and population standard deviation.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Standardizer {
    pub means: Vec<f64>,
    pub stds: Vec<f64>,
}

impl Standardizer {
    pub fn fit(x: &Array2<f64>) -> Self {
        if x.nrows() == 0 {
            return Standardizer {
                means: vec![0.0; x.ncols()],
                stds: vec![1.0; x.ncols()],
            };
        }

        let n = x.nrows() as f64;
        let mut means = Vec::with_capacity(x.ncols());
        let mut stds = Vec::with_capacity(x.ncols());
        for column in x.axis_iter(Axis(1)) {
            let mean = column.sum() / n;
            let mut std = (column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();
            // Constant columns are only centred
            if std < 1e-10 {
                std = 1.0;
            }
            means.push(mean);
            stds.push(std);
        }
        Standardizer { means, stds }
    }

    /// Scale `x` in place. Columns beyond the fitted width are left as is.
    pub fn transform_inplace(&self, x: &mut Array2<f64>) {
        for (j, mut column) in x.axis_iter_mut(Axis(1)).enumerate() {
            if j < self.means.len() {
                let (mean, std) = (self.means[j], self.stds[j]);
                column.mapv_inplace(|v| (v - mean) / std);
            }
        }
    }

    pub fn transform(&self, x: &Array2<f64>) -> Array2<f64> {
        let mut out = x.clone();
        self.transform_inplace(&mut out);
        out
    }

    pub fn fit_transform(x: &Array2<f64>) -> (Self, Array2<f64>) {
        let scaler = Self::fit(x);
        let out = scaler.transform(x);
        (scaler, out)
    }
}
