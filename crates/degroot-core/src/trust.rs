//! Trust Matrix
//!
//! Square, row-major influence weights. Entry `(i, j)` is the weight agent
//! `i` places on agent `j`. An update multiplies the belief row vector on the
//! left, so agent `j` receives `b[i] * T[i][j]` from every agent `i`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use degroot_events::InfluenceEdge;

use crate::rational::{FormatError, RationalFormat};

/// Shape errors between beliefs and trust.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DimensionError {
    #[error("model needs at least one agent")]
    Empty,
    #[error("trust matrix must be square: row {row} has {found} entries, expected {expected}")]
    NotSquare {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error(
        "incompatible dimensions: belief vector has length {beliefs}, \
         trust matrix has shape {trust_rows} x {trust_cols}"
    )]
    Mismatch {
        beliefs: usize,
        trust_rows: usize,
        trust_cols: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct TrustMatrix {
    n: usize,
    weights: Vec<f64>,
}

impl TrustMatrix {
    /// Builds a matrix from nested rows, rejecting empty or ragged input.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, DimensionError> {
        let n = rows.len();
        if n == 0 {
            return Err(DimensionError::Empty);
        }

        let mut weights = Vec::with_capacity(n * n);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != n {
                return Err(DimensionError::NotSquare {
                    row,
                    expected: n,
                    found: values.len(),
                });
            }
            weights.extend_from_slice(values);
        }

        Ok(Self { n, weights })
    }

    /// Every agent trusts only itself.
    pub fn identity(n: usize) -> Result<Self, DimensionError> {
        if n == 0 {
            return Err(DimensionError::Empty);
        }
        let mut weights = vec![0.0; n * n];
        for i in 0..n {
            weights[i * n + i] = 1.0;
        }
        Ok(Self { n, weights })
    }

    /// Number of agents.
    pub fn dimension(&self) -> usize {
        self.n
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.weights[i * self.n..(i + 1) * self.n]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.weights.chunks_exact(self.n)
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.rows().map(<[f64]>::to_vec).collect()
    }

    /// Non-zero weights as directed edges, in row-major order.
    pub fn edges(&self) -> Vec<InfluenceEdge> {
        self.rows()
            .enumerate()
            .flat_map(|(from, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(_, w)| **w != 0.0)
                    .map(move |(to, w)| InfluenceEdge::new(from, to, *w))
            })
            .collect()
    }

    /// Row vector times matrix: `out[j] = Σ_i beliefs[i] * T[i][j]`.
    ///
    /// Each row sums to one, so the total of `beliefs` is carried over
    /// unchanged. `beliefs.len()` must equal `dimension()`.
    pub fn apply(&self, beliefs: &[f64]) -> Vec<f64> {
        debug_assert_eq!(beliefs.len(), self.n);
        let mut out = vec![0.0; self.n];
        for (row, belief) in self.rows().zip(beliefs) {
            for (acc, weight) in out.iter_mut().zip(row) {
                *acc += belief * weight;
            }
        }
        out
    }
}

impl TryFrom<Vec<Vec<f64>>> for TrustMatrix {
    type Error = DimensionError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::from_rows(&rows)
    }
}

impl From<TrustMatrix> for Vec<Vec<f64>> {
    fn from(matrix: TrustMatrix) -> Self {
        matrix.to_rows()
    }
}

impl RationalFormat for TrustMatrix {
    type Output = Vec<Vec<String>>;

    fn format_rational(&self, max_denominator: u64) -> Result<Self::Output, FormatError> {
        self.rows()
            .map(|row| row.format_rational(max_denominator))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> TrustMatrix {
        TrustMatrix::from_rows(&[
            vec![0.0, 0.5, 0.5],
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_from_rows() {
        let matrix = reference();

        assert_eq!(matrix.dimension(), 3);
        assert_eq!(matrix.row(0), &[0.0, 0.5, 0.5]);
        assert_eq!(matrix.row(2)[1], 1.0);
        assert_eq!(matrix.rows().count(), 3);
    }

    #[test]
    fn test_empty_rejected() {
        let rows: Vec<Vec<f64>> = Vec::new();
        assert_eq!(TrustMatrix::from_rows(&rows), Err(DimensionError::Empty));
        assert_eq!(TrustMatrix::identity(0), Err(DimensionError::Empty));
    }

    #[test]
    fn test_ragged_rejected() {
        let result = TrustMatrix::from_rows(&[vec![0.5, 0.5], vec![1.0]]);

        assert_eq!(
            result,
            Err(DimensionError::NotSquare {
                row: 1,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_wide_rejected() {
        let result = TrustMatrix::from_rows(&[vec![0.5, 0.5, 0.0], vec![1.0, 0.0, 0.0]]);

        assert!(matches!(
            result,
            Err(DimensionError::NotSquare { row: 0, expected: 2, found: 3 })
        ));
    }

    #[test]
    fn test_identity_apply() {
        let identity = TrustMatrix::identity(3).unwrap();
        let beliefs = [0.2, 0.3, 0.5];

        assert_eq!(identity.apply(&beliefs), beliefs.to_vec());
    }

    #[test]
    fn test_apply_multiplies_row_vector() {
        let next = reference().apply(&[1.0, 0.0, 0.0]);

        assert_eq!(next, vec![0.0, 0.5, 0.5]);
    }

    #[test]
    fn test_apply_sends_belief_along_columns() {
        // Agent 1 trusts only agent 0, so all of agent 1's belief lands on agent 0
        let next = reference().apply(&[0.0, 1.0, 0.0]);

        assert_eq!(next, vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_apply_keeps_total() {
        let next = reference().apply(&[0.2, 0.3, 0.5]);

        assert_eq!(next, vec![0.3, 0.6, 0.1]);
        let total: f64 = next.iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_edges_skip_zero_weights() {
        let edges = reference().edges();

        assert_eq!(edges.len(), 4);
        assert_eq!(edges[0], InfluenceEdge::new(0, 1, 0.5));
        assert_eq!(edges[3], InfluenceEdge::new(2, 1, 1.0));
    }

    #[test]
    fn test_serde_as_nested_rows() {
        let json = serde_json::to_string(&reference()).unwrap();
        assert_eq!(json, "[[0.0,0.5,0.5],[1.0,0.0,0.0],[0.0,1.0,0.0]]");

        let parsed: TrustMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, reference());

        assert!(serde_json::from_str::<TrustMatrix>("[[1.0],[0.5,0.5]]").is_err());
    }

    #[test]
    fn test_rational_format() {
        let formatted = reference().format_rational(10).unwrap();

        assert_eq!(formatted[0], vec!["0", "1/2", "1/2"]);
        assert_eq!(formatted[2], vec!["0", "1", "0"]);
    }
}
