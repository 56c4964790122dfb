// Dense row-major score matrix: one row per input text, one column per topic.

use serde::{Serialize, Serializer};

/// Probabilities of shape `[texts × topics]`.
///
/// Rows produced by a normalization step sum to 1. Rows straight out of the
/// NLI scorer don't: each cell is an independent entailment probability.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMatrix {
    cols: usize,
    data: Vec<f64>,
}

impl ScoreMatrix {
    /// An empty matrix with `cols` columns and no rows.
    pub fn empty(cols: usize) -> Self {
        Self {
            cols,
            data: Vec::new(),
        }
    }

    /// Build from row vectors. Every row must have `cols` entries.
    pub fn from_rows(cols: usize, rows: Vec<Vec<f64>>) -> anyhow::Result<Self> {
        let mut matrix = Self::empty(cols);
        for row in rows {
            matrix.push_row(&row)?;
        }
        Ok(matrix)
    }

    pub fn num_rows(&self) -> usize {
        if self.cols == 0 {
            0
        } else {
            self.data.len() / self.cols
        }
    }

    pub fn num_cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks(0) panics, and a zero-column matrix has no rows anyway
        self.data.chunks(self.cols.max(1))
    }

    /// Append a row, rejecting one of the wrong width.
    pub fn push_row(&mut self, row: &[f64]) -> anyhow::Result<()> {
        if row.len() != self.cols {
            anyhow::bail!(
                "Row has {} scores but the matrix has {} topics",
                row.len(),
                self.cols
            );
        }
        self.data.extend_from_slice(row);
        Ok(())
    }

    /// Append all rows of `other` below this matrix's rows.
    pub fn append(&mut self, other: ScoreMatrix) -> anyhow::Result<()> {
        if other.cols != self.cols {
            anyhow::bail!(
                "Cannot stack a {}-column matrix under a {}-column matrix",
                other.cols,
                self.cols
            );
        }
        self.data.extend(other.data);
        Ok(())
    }

    /// Normalize every row into a probability distribution.
    pub fn softmax_rows(mut self) -> Self {
        if self.cols > 0 {
            for row in self.data.chunks_mut(self.cols) {
                softmax_in_place(row);
            }
        }
        self
    }

    /// Rows as nested vectors (for display and JSON output).
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.rows().map(<[f64]>::to_vec).collect()
    }
}

// Serialized as nested rows so JSON output reads as a matrix.
impl Serialize for ScoreMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows())
    }
}

/// Numerically stable softmax over a slice.
///
/// Inputs must be finite. A slice whose max is not finite is returned
/// unchanged, so callers reject NaN and infinities before calling this.
pub fn softmax(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    softmax_in_place(&mut out);
    out
}

fn softmax_in_place(values: &mut [f64]) {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return;
    }
    let mut sum = 0.0;
    for v in values.iter_mut() {
        *v = (*v - max).exp();
        sum += *v;
    }
    for v in values.iter_mut() {
        *v /= sum;
    }
}
