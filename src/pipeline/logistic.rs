//! Binary logistic regression with L2 regularisation.
//!
//! Fitted by full-batch gradient descent on
//! `mean log-loss + ||w||² / (2·C·n)`. The intercept is not regularised.
//! Weights start at zero, so fitting is deterministic.

use super::config::TrainingConfig;
use ndarray::{Array1, Array2, ArrayView1};

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogisticParams {
    /// Inverse regularisation strength
    pub c: f64,
    pub learning_rate: f64,
    pub max_iter: usize,
    /// Stop once the largest gradient component falls below this
    pub tol: f64,
}

impl Default for LogisticParams {
    fn default() -> Self {
        LogisticParams {
            c: 1.0,
            learning_rate: 0.5,
            max_iter: 1000,
            tol: 1e-6,
        }
    }
}

impl From<&TrainingConfig> for LogisticParams {
    fn from(config: &TrainingConfig) -> Self {
        LogisticParams {
            c: config.c,
            learning_rate: config.learning_rate,
            max_iter: config.max_iter,
            tol: config.tol,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogisticRegression {
    pub weights: Array1<f64>,
    pub intercept: f64,
    params: LogisticParams,
}

impl LogisticRegression {
    pub fn new(params: LogisticParams) -> Self {
        LogisticRegression {
            weights: Array1::zeros(0),
            intercept: 0.0,
            params,
        }
    }

    /// Fit on `x` with 0/1 labels `y`. Returns the number of iterations run.
    pub fn fit(&mut self, x: &Array2<f64>, y: &[u8]) -> usize {
        let n = x.nrows();
        self.weights = Array1::zeros(x.ncols());
        self.intercept = 0.0;
        if n == 0 {
            return 0;
        }

        let targets: Array1<f64> = y.iter().map(|&l| f64::from(l)).collect();
        let n_f = n as f64;
        let penalty = 1.0 / (self.params.c * n_f);

        for iter in 0..self.params.max_iter {
            let logits = x.dot(&self.weights) + self.intercept;
            let residual = logits.mapv(sigmoid) - &targets;

            let grad_w = x.t().dot(&residual) / n_f + &self.weights * penalty;
            let grad_b = residual.sum() / n_f;

            let largest = grad_w
                .iter()
                .fold(grad_b.abs(), |acc, g| acc.max(g.abs()));
            if largest < self.params.tol {
                tracing::debug!(iterations = iter, "logistic regression converged");
                return iter;
            }

            self.weights.scaled_add(-self.params.learning_rate, &grad_w);
            self.intercept -= self.params.learning_rate * grad_b;
        }
        tracing::debug!(
            iterations = self.params.max_iter,
            "logistic regression hit max_iter"
        );
        self.params.max_iter
    }

    fn probability(&self, row: ArrayView1<f64>) -> f64 {
        sigmoid(row.dot(&self.weights) + self.intercept)
    }

    /// Probability of label 1 for each row.
    pub fn predict_proba(&self, x: &Array2<f64>) -> Vec<f64> {
        x.rows().into_iter().map(|row| self.probability(row)).collect()
    }

    pub fn predict(&self, x: &Array2<f64>) -> Vec<u8> {
        self.predict_proba(x)
            .into_iter()
            .map(|p| u8::from(p >= 0.5))
            .collect()
    }

    /// Fraction of rows predicted correctly; 0 for an empty set.
    pub fn accuracy(&self, x: &Array2<f64>, y: &[u8]) -> f64 {
        if y.is_empty() {
            return 0.0;
        }
        let correct = self
            .predict(x)
            .iter()
            .zip(y)
            .filter(|(p, l)| p == l)
            .count();
        correct as f64 / y.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_separable_data() {
        let x = array![[-2.0], [-1.5], [-1.0], [1.0], [1.5], [2.0]];
        let y = [0, 0, 0, 1, 1, 1];
        let mut model = LogisticRegression::new(LogisticParams::default());
        model.fit(&x, &y);
        assert_eq!(model.predict(&x), y.to_vec());
        assert_eq!(model.accuracy(&x, &y), 1.0);
        assert!(model.weights[0] > 0.0);
    }

    #[test]
    fn test_regularisation_shrinks_weights() {
        let x = array![[-1.0], [-0.5], [0.5], [1.0]];
        let y = [0, 0, 1, 1];
        let mut loose = LogisticRegression::new(LogisticParams { c: 100.0, ..Default::default() });
        let mut tight = LogisticRegression::new(LogisticParams { c: 0.01, ..Default::default() });
        loose.fit(&x, &y);
        tight.fit(&x, &y);
        assert!(tight.weights[0].abs() < loose.weights[0].abs());
    }

    #[test]
    fn test_constant_labels_predict_that_label() {
        let x = array![[0.3, 1.0], [0.1, -1.0], [0.7, 0.0]];
        let mut model = LogisticRegression::new(LogisticParams::default());
        model.fit(&x, &[1, 1, 1]);
        assert_eq!(model.predict(&x), vec![1, 1, 1]);
    }

    #[test]
    fn test_probabilities_are_bounded() {
        let model = LogisticRegression {
            weights: array![1000.0],
            intercept: 0.0,
            params: LogisticParams::default(),
        };
        let p = model.predict_proba(&array![[5.0], [-5.0]]);
        assert!(p[0] <= 1.0 && p[0] > 0.99);
        assert!(p[1] >= 0.0 && p[1] < 0.01);
    }
}
