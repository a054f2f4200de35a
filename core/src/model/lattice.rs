use serde::{Deserialize, Serialize};

/// Direct-lattice basis vectors, one per row.
///
/// Only the 3×3 shape is enforced here; degenerate bases are left for the
/// server to reject.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LatticeMatrix(pub [[f64; 3]; 3]);

impl LatticeMatrix {
    pub fn new(rows: [[f64; 3]; 3]) -> Self {
        Self(rows)
    }

    pub fn rows(&self) -> &[[f64; 3]; 3] {
        &self.0
    }

    /// Cartesian position of a point given in fractional coordinates of this basis.
    pub fn to_cartesian(&self, fractional: [f64; 3]) -> [f64; 3] {
        let mut out = [0.0; 3];
        for (row, weight) in self.0.iter().zip(fractional) {
            for axis in 0..3 {
                out[axis] += row[axis] * weight;
            }
        }
        out
    }
}

impl Default for LatticeMatrix {
    /// Face-centred cubic primitive cell with unit conventional edge.
    fn default() -> Self {
        Self([[0.0, 0.5, 0.5], [0.5, 0.0, 0.5], [0.5, 0.5, 0.0]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_nested_array() {
        let lattice = LatticeMatrix::new([[1.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 3.0]]);
        let json = serde_json::to_value(lattice).unwrap();
        assert_eq!(json, serde_json::json!([[1.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 3.0]]));
    }

    #[test]
    fn rejects_ragged_rows() {
        let parsed: Result<LatticeMatrix, _> =
            serde_json::from_str("[[1, 0], [0, 1, 0], [0, 0, 1]]");
        assert!(parsed.is_err());
    }

    #[test]
    fn fractional_corner_maps_to_row_sum() {
        let lattice = LatticeMatrix::default();
        assert_eq!(lattice.to_cartesian([1.0, 1.0, 1.0]), [1.0, 1.0, 1.0]);
    }
}
