//! Pairwise Pearson correlation between indicator columns.
//!
//! Each pair uses only the rows where both values are present. A pair with
//! fewer than two complete rows, or where either side is constant, has no
//! defined correlation and is stored as `NaN` (never 0).

use nalgebra::DMatrix;

use crate::domain::{Indicator, TidyTable};

/// Minimum complete observations for a coefficient to be defined.
const MIN_PERIODS: usize = 2;

#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    labels: Vec<Indicator>,
    values: DMatrix<f64>,
    counts: DMatrix<usize>,
}

impl CorrelationMatrix {
    /// Correlate all indicator columns of the table.
    pub fn from_table(table: &TidyTable) -> Self {
        let columns: Vec<Vec<Option<f64>>> = Indicator::ALL.iter().map(|&i| table.column(i)).collect();
        Self::from_columns(Indicator::ALL.to_vec(), &columns)
    }

    /// Correlate arbitrary equally-long nullable columns.
    pub fn from_columns(labels: Vec<Indicator>, columns: &[Vec<Option<f64>>]) -> Self {
        let k = labels.len().min(columns.len());
        let mut values = DMatrix::from_element(k, k, f64::NAN);
        let mut counts = DMatrix::from_element(k, k, 0usize);

        for i in 0..k {
            for j in i..k {
                let (xs, ys) = complete_pairs(&columns[i], &columns[j]);
                let r = if i == j { self_correlation(&xs) } else { pearson(&xs, &ys) };
                values[(i, j)] = r;
                values[(j, i)] = r;
                counts[(i, j)] = xs.len();
                counts[(j, i)] = xs.len();
            }
        }

        Self {
            labels: labels.into_iter().take(k).collect(),
            values,
            counts,
        }
    }

    pub fn labels(&self) -> &[Indicator] {
        &self.labels
    }

    pub fn dim(&self) -> usize {
        self.labels.len()
    }

    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.values[(row, col)]
    }

    /// Coefficient for a pair of indicators, `NaN` if either is absent.
    pub fn get(&self, a: Indicator, b: Indicator) -> f64 {
        let i = self.labels.iter().position(|&l| l == a);
        let j = self.labels.iter().position(|&l| l == b);
        match (i, j) {
            (Some(i), Some(j)) => self.values[(i, j)],
            _ => f64::NAN,
        }
    }

    /// Number of complete observations behind one coefficient.
    pub fn count(&self, row: usize, col: usize) -> usize {
        self.counts[(row, col)]
    }
}

fn complete_pairs(a: &[Option<f64>], b: &[Option<f64>]) -> (Vec<f64>, Vec<f64>) {
    a.iter()
        .zip(b.iter())
        .filter_map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some((*x, *y)),
            _ => None,
        })
        .unzip()
}

fn is_constant(xs: &[f64]) -> bool {
    xs.windows(2).all(|w| w[0] == w[1])
}

fn self_correlation(xs: &[f64]) -> f64 {
    if xs.len() < MIN_PERIODS || is_constant(xs) {
        f64::NAN
    } else {
        1.0
    }
}

/// Pearson coefficient, clamped to `[-1, 1]`.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < MIN_PERIODS || is_constant(&xs[..n]) || is_constant(&ys[..n]) {
        return f64::NAN;
    }

    let mean_x = xs[..n].iter().sum::<f64>() / n as f64;
    let mean_y = ys[..n].iter().sum::<f64>() / n as f64;

    let mut sxx = 0.0;
    let mut syy = 0.0;
    let mut sxy = 0.0;
    for (x, y) in xs[..n].iter().zip(ys[..n].iter()) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    let denom = (sxx * syy).sqrt();
    if !(denom.is_finite() && denom > 0.0) {
        return f64::NAN;
    }
    (sxy / denom).clamp(-1.0, 1.0)
}
